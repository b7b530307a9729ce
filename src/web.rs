//! Browser bridge: binds [`EditorCore`] to the DOM.
//!
//! - [`CanvasSurface`] paints the grid on a `<canvas>` overlay.
//! - [`DomHost`] creates element nodes and binds a manipulation-library
//!   instance to each through a JS factory supplied by the page.
//! - [`WebEditor`] is the `#[wasm_bindgen]` handle the page holds. It owns
//!   the `ResizeObserver`, the settings menu, and every DOM listener, and
//!   releases all of them on [`WebEditor::destroy`].

use std::cell::{RefCell, RefMut};
use std::collections::BTreeMap;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, EventTarget, HtmlCanvasElement, HtmlElement,
    HtmlInputElement, HtmlSelectElement, ResizeObserver,
};

use crate::adapter::{DragEvent, ManipulationEvent, Manipulator, Placement, ResizeEvent, RotateEvent};
use crate::editor::{EditorCore, EditorOptions, ElementHost};
use crate::element::{ElementId, ElementSpec, ManipulableElement};
use crate::error::{EditorError, RenderError, js_message};
use crate::geom::Line;
use crate::grid::{GridConfig, GridConfigPatch};
use crate::render::{Stroke, Surface, Viewport};
use crate::settings::{
    CONTROL_COLOR, CONTROL_OPACITY, CONTROL_SIZE, CONTROL_SNAP, CONTROL_VISIBLE, OPACITY_LABEL, SettingsCallbacks,
    SettingsControl,
};

type WebCore = EditorCore<CanvasSurface, DomHost>;

/// Class added to the editor container.
const CONTAINER_CLASS: &str = "canvas-editor-container";
/// Class of every element node.
const ELEMENT_CLASS: &str = "editor-element";
/// Class of the settings menu root.
const MENU_CLASS: &str = "editor-view-menu";

// =============================================================
// Start hook
// =============================================================

/// Install the console logger and panic hook.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        debug!("console logger already installed: {err}");
    }
}

// =============================================================
// Canvas surface
// =============================================================

/// [`Surface`] backed by a 2D canvas context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    viewport: Viewport,
}

impl CanvasSurface {
    /// # Errors
    ///
    /// Returns [`RenderError::NoContext`] if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, RenderError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(RenderError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderError::NoContext)?;
        Ok(Self { canvas, ctx, viewport: Viewport::default() })
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        // Resizing the backing store resets the context, transform included.
        self.canvas.set_width(viewport.device_width());
        self.canvas.set_height(viewport.device_height());
        let style = self.canvas.style();
        style.set_property("width", &px(viewport.width))?;
        style.set_property("height", &px(viewport.height))?;
        self.ctx.set_transform(viewport.dpr, 0.0, 0.0, viewport.dpr, 0.0, 0.0)?;
        self.viewport = viewport;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.ctx.clear_rect(0.0, 0.0, self.viewport.width, self.viewport.height);
        Ok(())
    }

    fn stroke_lines(&mut self, lines: &[Line], stroke: Stroke<'_>) -> Result<(), RenderError> {
        self.ctx.save();
        self.ctx.set_stroke_style_str(stroke.color);
        self.ctx.set_global_alpha(stroke.opacity);
        self.ctx.set_line_width(stroke.width);
        self.ctx.begin_path();
        for line in lines {
            self.ctx.move_to(line.from.x, line.from.y);
            self.ctx.line_to(line.to.x, line.to.y);
        }
        self.ctx.stroke();
        self.ctx.restore();
        Ok(())
    }
}

fn px(value: f64) -> String {
    format!("{value}px")
}

// =============================================================
// DOM element host
// =============================================================

/// Manipulation-library instance created by the page's factory.
struct JsManipulator {
    instance: JsValue,
}

impl Manipulator for JsManipulator {
    fn release(&mut self) {
        let destroy =
            Reflect::get(&self.instance, &JsValue::from_str("destroy")).and_then(|value| value.dyn_into::<Function>());
        match destroy {
            Ok(destroy) => {
                if let Err(err) = destroy.call0(&self.instance) {
                    warn!("manipulator destroy() threw: {}", js_message(&err));
                }
            }
            Err(_) => debug!("manipulator has no destroy()"),
        }
    }
}

/// [`ElementHost`] that keeps element nodes inside the editor container.
pub struct DomHost {
    document: Document,
    container: HtmlElement,
    factory: Function,
    nodes: BTreeMap<ElementId, HtmlElement>,
}

impl DomHost {
    #[must_use]
    pub fn new(document: Document, container: HtmlElement, factory: Function) -> Self {
        Self { document, container, factory, nodes: BTreeMap::new() }
    }

    fn create_node(&self, element: &ManipulableElement) -> Result<HtmlElement, EditorError> {
        let node = self
            .document
            .create_element("div")?
            .dyn_into::<HtmlElement>()
            .map_err(|_| EditorError::Host("created node is not an HTMLElement".into()))?;
        node.set_class_name(ELEMENT_CLASS);
        node.set_attribute("data-element-id", &element.id.to_string())?;
        if let Some(label) = &element.label {
            node.set_text_content(Some(label));
        }
        let style = node.style();
        for (name, value) in element.base_style() {
            style.set_property(name, value)?;
        }
        style.set_property("position", element.positioning.as_css())?;
        style.set_property("width", &px(element.size.width))?;
        style.set_property("height", &px(element.size.height))?;
        style.set_property("transform", &element.transform_css())?;
        Ok(node)
    }
}

impl ElementHost for DomHost {
    fn attach(&mut self, element: &ManipulableElement) -> Result<Box<dyn Manipulator>, EditorError> {
        let node = self.create_node(element)?;
        self.container.append_child(&node)?;
        let instance = match self.factory.call2(&JsValue::NULL, &self.container, &node) {
            Ok(instance) => instance,
            Err(err) => {
                node.remove();
                return Err(EditorError::Host(format!("manipulator factory threw: {}", js_message(&err))));
            }
        };
        self.nodes.insert(element.id, node);
        Ok(Box::new(JsManipulator { instance }))
    }

    fn detach(&mut self, id: ElementId) -> Result<(), EditorError> {
        match self.nodes.remove(&id) {
            Some(node) => {
                node.remove();
                Ok(())
            }
            None => Err(EditorError::Host(format!("{id} has no node"))),
        }
    }

    fn apply(&mut self, id: ElementId, placement: &Placement) -> Result<(), EditorError> {
        let node = self.nodes.get(&id).ok_or_else(|| EditorError::Host(format!("{id} has no node")))?;
        let style = node.style();
        let transform = placement.transform_css();
        if !transform.is_empty() {
            style.set_property("transform", &transform)?;
        }
        if let Some(size) = placement.size {
            style.set_property("width", &px(size.width))?;
            style.set_property("height", &px(size.height))?;
        }
        Ok(())
    }
}

// =============================================================
// Listeners
// =============================================================

/// A DOM event listener removed again when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn bind(target: &EventTarget, event: &'static str, handler: Box<dyn FnMut(Event)>) -> Result<Self, JsValue> {
        let callback = Closure::wrap(handler);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self { target: target.clone(), event, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            debug!("removing {} listener failed: {}", self.event, js_message(&err));
        }
    }
}

/// Raw value of a form control: `"true"`/`"false"` for checkboxes.
fn control_value(target: &EventTarget) -> Option<String> {
    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        return Some(if input.type_() == "checkbox" { input.checked().to_string() } else { input.value() });
    }
    target.dyn_ref::<HtmlSelectElement>().map(HtmlSelectElement::value)
}

fn current_viewport(container: &HtmlElement) -> Viewport {
    let rect = container.get_bounding_client_rect();
    let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
    Viewport::new(rect.width(), rect.height(), dpr)
}

// =============================================================
// WebEditor
// =============================================================

/// Page-facing editor handle.
#[wasm_bindgen]
pub struct WebEditor {
    core: Rc<RefCell<WebCore>>,
    document: Document,
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    menu: HtmlElement,
    observer: ResizeObserver,
    // Held so the observer callback stays alive.
    _on_resize: Closure<dyn FnMut()>,
    listeners: Vec<Listener>,
    destroyed: bool,
}

#[wasm_bindgen]
impl WebEditor {
    /// Mount an editor into the element with id `container_id`.
    ///
    /// `config_json` is an optional partial [`GridConfig`] (camelCase keys).
    /// `factory(container, element)` must return a manipulation-library
    /// instance exposing `destroy()`.
    ///
    /// # Errors
    ///
    /// Fails if the container does not exist, the configuration is invalid,
    /// or the canvas cannot be created.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str, config_json: Option<String>, factory: Function) -> Result<WebEditor, JsValue> {
        let config = match config_json.as_deref() {
            Some(raw) => GridConfig::from_json(raw).map_err(EditorError::from)?,
            None => GridConfig::default(),
        };
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| EditorError::Host("no document".into()))?;
        let Some(container) = document.get_element_by_id(container_id) else {
            return Err(EditorError::MissingContainer(container_id.to_owned()).into());
        };
        let container = container
            .dyn_into::<HtmlElement>()
            .map_err(|_| EditorError::Host(format!("#{container_id} is not an HTMLElement")))?;
        container.class_list().add_1(CONTAINER_CLASS)?;

        let canvas = create_canvas(&document)?;
        container.append_child(&canvas)?;
        let surface = CanvasSurface::new(canvas.clone()).map_err(|err| EditorError::Host(err.to_string()))?;
        let host = DomHost::new(document.clone(), container.clone(), factory);
        let callbacks = SettingsCallbacks {
            on_grid_toggle: Some(Box::new(|visible| info!("grid visibility: {visible}"))),
            on_snap_toggle: Some(Box::new(|enabled| info!("grid snapping: {enabled}"))),
            on_grid_size_change: Some(Box::new(|size| info!("grid size changed: {size}"))),
        };
        let core = EditorCore::new(config, surface, host, EditorOptions::default(), callbacks)?;
        let core = Rc::new(RefCell::new(core));
        core.borrow_mut().resize_container(current_viewport(&container));

        let on_resize = {
            let core = Rc::clone(&core);
            let container = container.clone();
            Closure::wrap(Box::new(move || match core.try_borrow_mut() {
                Ok(mut core) => core.resize_container(current_viewport(&container)),
                Err(_) => debug!("resize skipped: editor busy"),
            }) as Box<dyn FnMut()>)
        };
        let observer = ResizeObserver::new(on_resize.as_ref().unchecked_ref())?;
        observer.observe(&container);

        let menu = create_menu(&document, &core.borrow())?;
        let mut editor = WebEditor {
            core,
            document,
            container,
            canvas,
            menu,
            observer,
            _on_resize: on_resize,
            listeners: Vec::new(),
            destroyed: false,
        };
        editor.bind_settings()?;
        editor.bind_container_click()?;
        info!("editor mounted in #{container_id}");
        Ok(editor)
    }

    // --- Elements ---

    /// Add a text element. Returns its id.
    ///
    /// # Errors
    ///
    /// Fails after destroy or if the node cannot be created.
    #[wasm_bindgen(js_name = addText)]
    pub fn add_text(&self, label: &str, x: Option<f64>, y: Option<f64>) -> Result<u64, JsValue> {
        self.add(place(ElementSpec::text(label), x, y))
    }

    /// # Errors
    ///
    /// Fails after destroy or if the node cannot be created.
    #[wasm_bindgen(js_name = addBox)]
    pub fn add_box(&self, x: Option<f64>, y: Option<f64>) -> Result<u64, JsValue> {
        self.add(place(ElementSpec::boxed(), x, y))
    }

    /// # Errors
    ///
    /// Fails after destroy or if the node cannot be created.
    #[wasm_bindgen(js_name = addImage)]
    pub fn add_image(&self, x: Option<f64>, y: Option<f64>) -> Result<u64, JsValue> {
        self.add(place(ElementSpec::image(), x, y))
    }

    /// Remove one element. Returns false for unknown ids.
    ///
    /// # Errors
    ///
    /// Fails if the editor is busy.
    pub fn remove(&self, element_id: u64) -> Result<bool, JsValue> {
        Ok(self.core_mut()?.remove_element(ElementId(element_id)))
    }

    /// Remove every element. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Fails if the editor is busy.
    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&self) -> Result<usize, JsValue> {
        Ok(self.core_mut()?.clear_all())
    }

    #[wasm_bindgen(js_name = elementCount)]
    pub fn element_count(&self) -> usize {
        self.core.try_borrow().map_or(0, |core| core.len())
    }

    // --- Manipulation events ---

    /// Forward a drag. Returns the CSS transform applied, if any.
    ///
    /// # Errors
    ///
    /// Fails if the editor is busy.
    pub fn drag(&self, element_id: u64, x: f64, y: f64) -> Result<Option<String>, JsValue> {
        self.handle(element_id, &ManipulationEvent::Drag(DragEvent::new(x, y)))
    }

    /// Forward a resize with the translate reported alongside it.
    ///
    /// # Errors
    ///
    /// Fails if the editor is busy.
    pub fn resize(&self, element_id: u64, width: f64, height: f64, x: f64, y: f64) -> Result<Option<String>, JsValue> {
        let event = ResizeEvent { width, height, drag: DragEvent::new(x, y) };
        self.handle(element_id, &ManipulationEvent::Resize(event))
    }

    /// Forward a rotation, with the drag translate when the library reports one.
    ///
    /// # Errors
    ///
    /// Fails if the editor is busy.
    pub fn rotate(&self, element_id: u64, degrees: f64, x: Option<f64>, y: Option<f64>) -> Result<Option<String>, JsValue> {
        let drag = x.zip(y).map(|(x, y)| DragEvent::new(x, y));
        let event = RotateEvent { before_rotate: degrees, drag };
        self.handle(element_id, &ManipulationEvent::Rotate(event))
    }

    /// Forward an event encoded as JSON, e.g.
    /// `{"type":"drag","beforeTranslate":{"x":24,"y":35}}`.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or if the editor is busy.
    #[wasm_bindgen(js_name = handleEvent)]
    pub fn handle_event(&self, element_id: u64, event_json: &str) -> Result<Option<String>, JsValue> {
        let event: ManipulationEvent =
            serde_json::from_str(event_json).map_err(|err| JsValue::from_str(&format!("invalid event: {err}")))?;
        self.handle(element_id, &event)
    }

    // --- Grid ---

    /// # Errors
    ///
    /// Fails after destroy.
    #[wasm_bindgen(js_name = setGridVisible)]
    pub fn set_grid_visible(&self, visible: bool) -> Result<(), JsValue> {
        self.core_mut()?.set_grid_visible(visible)?;
        self.refresh_menu();
        Ok(())
    }

    /// # Errors
    ///
    /// Fails after destroy.
    #[wasm_bindgen(js_name = setSnapEnabled)]
    pub fn set_snap_enabled(&self, enabled: bool) -> Result<(), JsValue> {
        self.core_mut()?.set_snap_enabled(enabled)?;
        self.refresh_menu();
        Ok(())
    }

    /// # Errors
    ///
    /// Fails after destroy or for an invalid size.
    #[wasm_bindgen(js_name = setGridSize)]
    pub fn set_grid_size(&self, size: f64) -> Result<(), JsValue> {
        self.core_mut()?.set_grid_size(size)?;
        self.refresh_menu();
        Ok(())
    }

    /// Merge a partial configuration given as JSON.
    ///
    /// # Errors
    ///
    /// Fails after destroy or for invalid JSON or values.
    #[wasm_bindgen(js_name = updateGridConfig)]
    pub fn update_grid_config(&self, patch_json: &str) -> Result<(), JsValue> {
        let patch: GridConfigPatch =
            serde_json::from_str(patch_json).map_err(|err| JsValue::from_str(&format!("invalid patch: {err}")))?;
        self.core_mut()?.update_grid_config(patch)?;
        self.refresh_menu();
        Ok(())
    }

    /// The grid configuration as JSON.
    ///
    /// # Errors
    ///
    /// Fails if serialization fails.
    #[wasm_bindgen(js_name = gridConfig)]
    pub fn grid_config(&self) -> Result<String, JsValue> {
        let config = self.core.try_borrow().map_err(|_| busy())?.config();
        serde_json::to_string(&config).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    // --- Lifecycle ---

    /// Disconnect the resize observer, remove the menu and listeners, and
    /// release every adapter. Element nodes stay in the container.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.listeners.clear();
        self.observer.disconnect();
        self.menu.remove();
        self.canvas.remove();
        match self.core.try_borrow_mut() {
            Ok(mut core) => core.destroy(),
            Err(_) => warn!("editor busy during destroy; adapters released on drop"),
        }
    }

    #[wasm_bindgen(js_name = isDestroyed)]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl WebEditor {
    fn core_mut(&self) -> Result<RefMut<'_, WebCore>, JsValue> {
        self.core.try_borrow_mut().map_err(|_| busy())
    }

    fn add(&self, spec: ElementSpec) -> Result<u64, JsValue> {
        let id = self.core_mut()?.add_element(spec)?;
        Ok(id.0)
    }

    fn handle(&self, element_id: u64, event: &ManipulationEvent) -> Result<Option<String>, JsValue> {
        let placement = self.core_mut()?.handle_event(ElementId(element_id), event);
        Ok(placement.map(|p| p.transform_css()))
    }

    fn listen(&mut self, target: &EventTarget, event: &'static str, handler: Box<dyn FnMut(Event)>) -> Result<(), JsValue> {
        self.listeners.push(Listener::bind(target, event, handler)?);
        Ok(())
    }

    fn bind_settings(&mut self) -> Result<(), JsValue> {
        let label = self.menu.query_selector(&format!("#{OPACITY_LABEL}"))?;
        for (id, event) in [
            (CONTROL_VISIBLE, "change"),
            (CONTROL_SNAP, "change"),
            (CONTROL_SIZE, "change"),
            (CONTROL_OPACITY, "input"),
            (CONTROL_COLOR, "change"),
        ] {
            let Some(control) = self.menu.query_selector(&format!("#{id}"))? else {
                warn!("settings control #{id} missing from menu");
                continue;
            };
            let core = Rc::clone(&self.core);
            let label = label.clone();
            let handler = Box::new(move |event: Event| on_control(&core, label.as_ref(), id, &event));
            self.listen(control.as_ref(), event, handler)?;
        }
        Ok(())
    }

    /// Clicks on empty container space. Selection is owned by the
    /// manipulation library, so this only logs.
    fn bind_container_click(&mut self) -> Result<(), JsValue> {
        let container: EventTarget = self.container.clone().into();
        let target = container.clone();
        let handler = Box::new(move |event: Event| {
            if event.target().as_ref() == Some(&target) {
                debug!("container background clicked");
            }
        });
        self.listen(&container, "click", handler)
    }

    /// Re-render the menu after a programmatic grid change.
    fn refresh_menu(&self) {
        let Ok(core) = self.core.try_borrow() else {
            return;
        };
        let view = core.settings_view();
        sync_checkbox(&self.document, CONTROL_VISIBLE, view.visible);
        sync_checkbox(&self.document, CONTROL_SNAP, view.snap);
        if let Some(select) = self.document.get_element_by_id(CONTROL_SIZE) {
            if let Some(select) = select.dyn_ref::<HtmlSelectElement>() {
                let config = core.config();
                select.set_value(&config.size.to_string());
            }
        }
        if let Some(slider) = self.document.get_element_by_id(CONTROL_OPACITY) {
            if let Some(slider) = slider.dyn_ref::<HtmlInputElement>() {
                slider.set_value(&view.opacity.to_string());
            }
        }
        if let Some(label) = self.document.get_element_by_id(OPACITY_LABEL) {
            label.set_text_content(Some(&view.opacity_label));
        }
        if let Some(picker) = self.document.get_element_by_id(CONTROL_COLOR) {
            if let Some(picker) = picker.dyn_ref::<HtmlInputElement>() {
                picker.set_value(&view.color);
            }
        }
    }
}

impl Drop for WebEditor {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn busy() -> JsValue {
    JsValue::from_str("editor is busy")
}

fn place(spec: ElementSpec, x: Option<f64>, y: Option<f64>) -> ElementSpec {
    match x.zip(y) {
        Some((x, y)) => spec.at(x, y),
        None => spec,
    }
}

fn sync_checkbox(document: &Document, id: &str, checked: bool) {
    if let Some(input) = document.get_element_by_id(id) {
        if let Some(input) = input.dyn_ref::<HtmlInputElement>() {
            input.set_checked(checked);
        }
    }
}

fn on_control(core: &Rc<RefCell<WebCore>>, label: Option<&Element>, id: &'static str, event: &Event) {
    let Some(raw) = event.target().and_then(|target| control_value(&target)) else {
        return;
    };
    let control = match SettingsControl::parse(id, &raw) {
        Ok(control) => control,
        Err(err) => {
            warn!("{err}");
            return;
        }
    };
    let Ok(mut core) = core.try_borrow_mut() else {
        debug!("{id} change skipped: editor busy");
        return;
    };
    match core.apply_setting(control) {
        Ok(change) => {
            let view = core.settings_view();
            if let Some(label) = label {
                label.set_text_content(Some(&view.opacity_label));
            }
            if change.snapping {
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    sync_checkbox(&document, CONTROL_SNAP, view.snap);
                }
            }
        }
        Err(err) => warn!("{id}: {err}"),
    }
}

fn create_canvas(document: &Document) -> Result<HtmlCanvasElement, JsValue> {
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("created node is not a canvas"))?;
    let style = canvas.style();
    for (name, value) in [
        ("position", "absolute"),
        ("top", "0"),
        ("left", "0"),
        ("pointer-events", "none"),
        ("z-index", "1"),
        ("image-rendering", "crisp-edges"),
    ] {
        style.set_property(name, value)?;
    }
    Ok(canvas)
}

fn create_menu(document: &Document, core: &WebCore) -> Result<HtmlElement, JsValue> {
    let menu = document
        .create_element("div")?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str("created node is not an HTMLElement"))?;
    menu.set_class_name(MENU_CLASS);
    menu.set_inner_html(&core.settings_view().to_html());
    let body = document.body().ok_or_else(|| JsValue::from_str("document has no body"))?;
    body.append_child(&menu)?;
    Ok(menu)
}

// =============================================================
// Demo
// =============================================================

/// Mount an editor, wire the optional toolbar buttons, and add three
/// starter elements.
///
/// # Errors
///
/// Fails under the same conditions as [`WebEditor::new`].
#[wasm_bindgen(js_name = startDemo)]
pub fn start_demo(container_id: &str, factory: Function) -> Result<WebEditor, JsValue> {
    let mut editor = WebEditor::new(container_id, None, factory)?;

    let toolbar: [(&str, fn() -> ElementSpec); 3] = [
        ("add-text", || ElementSpec::text(format!("Text {}", timestamp_suffix()))),
        ("add-box", ElementSpec::boxed),
        ("add-image", ElementSpec::image),
    ];
    for (button_id, make) in toolbar {
        let Some(button) = editor.document.get_element_by_id(button_id) else {
            debug!("toolbar button #{button_id} not present");
            continue;
        };
        let core = Rc::clone(&editor.core);
        let handler = Box::new(move |_: Event| match core.try_borrow_mut() {
            Ok(mut core) => {
                if let Err(err) = core.add_element(make()) {
                    warn!("add from toolbar failed: {err}");
                }
            }
            Err(_) => debug!("toolbar click skipped: editor busy"),
        });
        editor.listen(button.as_ref(), "click", handler)?;
    }
    match editor.document.get_element_by_id("clear-canvas") {
        Some(button) => {
            let core = Rc::clone(&editor.core);
            let handler = Box::new(move |_: Event| {
                if let Ok(mut core) = core.try_borrow_mut() {
                    let removed = core.clear_all();
                    debug!("cleared {removed} element(s)");
                }
            });
            editor.listen(button.as_ref(), "click", handler)?;
        }
        None => debug!("toolbar button #clear-canvas not present"),
    }

    editor.add(ElementSpec::text("Welcome to Grid Editor!").at(40.0, 40.0))?;
    editor.add(ElementSpec::boxed().at(220.0, 60.0))?;
    editor.add(ElementSpec::image().at(80.0, 140.0))?;
    Ok(editor)
}

/// Last four digits of the current time in milliseconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn timestamp_suffix() -> u64 {
    (js_sys::Date::now() as u64) % 10_000
}
