//! Editor controller: owns the grid, the renderer, and one adapter per element.
//!
//! [`EditorCore`] holds every piece of editor logic that does not need a
//! browser. The DOM side is reached through two seams: a [`Surface`] the grid
//! is painted on, and an [`ElementHost`] that creates element nodes, binds a
//! manipulation-library instance to each, and applies placements to their
//! style. The `web` module supplies browser implementations of both; tests
//! use a [`crate::raster::Raster`] and a recording host.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::{debug, info, warn};

use crate::adapter::{Adapter, ManipulationEvent, Manipulator, Placement, SizeSnap};
use crate::consts::DEFAULT_ELEMENT_OFFSET_PX;
use crate::element::{ElementId, ElementSpec, ManipulableElement};
use crate::error::{AdapterError, EditorError, RenderError};
use crate::geom::Point;
use crate::grid::{GridChange, GridConfig, GridConfigPatch, GridModel, SharedGrid, SubscriptionId};
use crate::render::{GridRenderer, Surface, Viewport};
use crate::settings::{SettingsCallbacks, SettingsControl, SettingsPanel, SettingsView};

/// DOM-facing half of element management.
pub trait ElementHost {
    /// Create the node for `element` and bind a manipulation-library instance to it.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Host`] if the node or the instance cannot be created.
    fn attach(&mut self, element: &ManipulableElement) -> Result<Box<dyn Manipulator>, EditorError>;

    /// Remove the node for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Host`] if the node cannot be removed.
    fn detach(&mut self, id: ElementId) -> Result<(), EditorError>;

    /// Write a placement into the node's style.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Host`] if the style cannot be written.
    fn apply(&mut self, id: ElementId, placement: &Placement) -> Result<(), EditorError>;
}

/// Construction-time options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorOptions {
    pub size_snap: SizeSnap,
    /// Translate given to elements added without one.
    pub default_translate: Point,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            size_snap: SizeSnap::default(),
            default_translate: Point::new(DEFAULT_ELEMENT_OFFSET_PX, DEFAULT_ELEMENT_OFFSET_PX),
        }
    }
}

struct ElementRecord {
    element: ManipulableElement,
    adapter: Adapter,
}

/// Browser-independent editor state.
pub struct EditorCore<S: Surface, H: ElementHost> {
    grid: SharedGrid,
    renderer: GridRenderer<S>,
    host: H,
    elements: BTreeMap<ElementId, ElementRecord>,
    next_id: u64,
    options: EditorOptions,
    settings: SettingsPanel,
    subscription: Option<SubscriptionId>,
    redraw_pending: Rc<Cell<bool>>,
    render_failures: u64,
    destroyed: bool,
}

impl<S: Surface, H: ElementHost> EditorCore<S, H> {
    /// Build an editor around a validated grid configuration.
    ///
    /// Nothing is painted until the first [`Self::resize_container`].
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Grid`] if `config` is invalid.
    pub fn new(
        config: GridConfig,
        surface: S,
        host: H,
        options: EditorOptions,
        callbacks: SettingsCallbacks,
    ) -> Result<Self, EditorError> {
        let grid = GridModel::new(config)?.into_shared();
        let redraw_pending = Rc::new(Cell::new(false));
        let pending = Rc::clone(&redraw_pending);
        let subscription = grid.borrow_mut().subscribe(move |_, change| {
            if change.needs_redraw() {
                pending.set(true);
            }
        });
        info!("editor created: {:?}", grid.borrow().config());
        Ok(Self {
            grid,
            renderer: GridRenderer::new(surface),
            host,
            elements: BTreeMap::new(),
            next_id: 0,
            options,
            settings: SettingsPanel::new(callbacks),
            subscription: Some(subscription),
            redraw_pending,
            render_failures: 0,
            destroyed: false,
        })
    }

    // --- Elements ---

    /// Create an element, attach it to the host, and bind its adapter.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Destroyed`] after destroy, or the host's
    /// attach failure. A failed attach still consumes the id.
    pub fn add_element(&mut self, spec: ElementSpec) -> Result<ElementId, EditorError> {
        self.ensure_live()?;
        let id = ElementId(self.next_id);
        self.next_id += 1;

        let element = ManipulableElement::from_spec(id, spec, self.options.default_translate);
        let manipulator = self.host.attach(&element)?;
        let adapter = Adapter::new(id, Rc::clone(&self.grid), manipulator, self.options.size_snap);
        debug!("{id}: attached {:?} at {:?}", element.kind, element.translate);
        self.elements.insert(id, ElementRecord { element, adapter });
        Ok(id)
    }

    /// Destroy the element's adapter, then remove its node.
    ///
    /// Returns `false` for an unknown or already removed id.
    pub fn remove_element(&mut self, id: ElementId) -> bool {
        let Some(mut record) = self.elements.remove(&id) else {
            debug!("{id}: remove ignored, not attached");
            return false;
        };
        record.adapter.destroy();
        if let Err(err) = self.host.detach(id) {
            warn!("{id}: detach failed: {err}");
        }
        true
    }

    /// Remove every element in insertion order. Returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        let ids: Vec<ElementId> = self.elements.keys().copied().collect();
        ids.into_iter().filter(|&id| self.remove_element(id)).count()
    }

    /// Route a manipulation gesture to the element's adapter and push the
    /// resulting placement to the host.
    ///
    /// Returns `None` for unknown elements and after destroy.
    pub fn handle_event(&mut self, id: ElementId, event: &ManipulationEvent) -> Option<Placement> {
        if self.destroyed {
            return None;
        }
        let record = self.elements.get_mut(&id)?;
        let placement = record.adapter.handle(event, &mut record.element)?;
        if let Err(err) = self.host.apply(id, &placement) {
            warn!("{id}: applying placement failed: {err}");
        }
        Some(placement)
    }

    // --- Container ---

    /// Adopt new container dimensions. Performs exactly one redraw.
    pub fn resize_container(&mut self, viewport: Viewport) {
        if self.destroyed {
            return;
        }
        let result = self.renderer.resize(viewport, self.grid.borrow().config());
        self.redraw_pending.set(false);
        self.record_render(result);
    }

    // --- Grid relays ---

    /// Show or hide the grid lines.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Destroyed`] after destroy.
    pub fn set_grid_visible(&mut self, visible: bool) -> Result<GridChange, EditorError> {
        self.ensure_live()?;
        let change = self.grid.borrow_mut().set_visible(visible);
        self.flush_redraw();
        Ok(change)
    }

    /// Turn snapping on or off for every element.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Destroyed`] after destroy.
    pub fn set_snap_enabled(&mut self, enabled: bool) -> Result<GridChange, EditorError> {
        self.ensure_live()?;
        self.relay_snapping(enabled, None)
    }

    /// Change the cell size and turn snapping back on.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Destroyed`] after destroy, or
    /// [`EditorError::Grid`] for an invalid size.
    pub fn set_grid_size(&mut self, size: f64) -> Result<GridChange, EditorError> {
        self.ensure_live()?;
        self.relay_snapping(true, Some(size))
    }

    /// Merge a partial configuration into the grid.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Destroyed`] after destroy, or
    /// [`EditorError::Grid`] if any field is invalid.
    pub fn update_grid_config(&mut self, patch: GridConfigPatch) -> Result<GridChange, EditorError> {
        self.ensure_live()?;
        let result = self.grid.borrow_mut().update_config(patch);
        self.flush_redraw();
        Ok(result?)
    }

    /// Apply a settings form change, then run the matching callback.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Destroyed`] after destroy, or
    /// [`EditorError::Grid`] for a rejected value.
    pub fn apply_setting(&mut self, control: SettingsControl) -> Result<GridChange, EditorError> {
        self.ensure_live()?;
        let result = self.settings.apply(&self.grid, control);
        self.flush_redraw();
        Ok(result?)
    }

    /// Current control values for the settings form.
    #[must_use]
    pub fn settings_view(&self) -> SettingsView {
        SettingsPanel::view(&self.grid.borrow())
    }

    // --- Lifecycle ---

    /// Release every adapter, stop listening to the grid, and clear the surface.
    ///
    /// Element nodes stay in the container. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        for record in self.elements.values_mut() {
            record.adapter.destroy();
        }
        if let Some(subscription) = self.subscription.take() {
            self.grid.borrow_mut().unsubscribe(subscription);
        }
        let cleared = self.renderer.clear();
        self.record_render(cleared);
        info!("editor destroyed with {} element(s) released", self.elements.len());
    }

    // --- Queries ---

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&ManipulableElement> {
        self.elements.get(&id).map(|record| &record.element)
    }

    /// Attached element ids in insertion order.
    #[must_use]
    pub fn element_ids(&self) -> Vec<ElementId> {
        self.elements.keys().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether `id` has a live adapter.
    #[must_use]
    pub fn has_adapter(&self, id: ElementId) -> bool {
        self.elements.get(&id).is_some_and(|record| !record.adapter.is_destroyed())
    }

    /// Snapshot of the grid configuration.
    #[must_use]
    pub fn config(&self) -> GridConfig {
        self.grid.borrow().config().clone()
    }

    #[must_use]
    pub fn grid(&self) -> &SharedGrid {
        &self.grid
    }

    #[must_use]
    pub fn renderer(&self) -> &GridRenderer<S> {
        &self.renderer
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Redraws that failed and were swallowed.
    #[must_use]
    pub fn render_failures(&self) -> u64 {
        self.render_failures
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // --- Internals ---

    fn ensure_live(&self) -> Result<(), EditorError> {
        if self.destroyed { Err(EditorError::Destroyed) } else { Ok(()) }
    }

    /// Push a snapping change through every adapter. Without elements the
    /// grid is updated directly.
    fn relay_snapping(&mut self, enabled: bool, size: Option<f64>) -> Result<GridChange, EditorError> {
        let mut change = GridChange::default();
        let result = if self.elements.is_empty() {
            update_snapping(&self.grid, enabled, size).map(|c| change = c)
        } else {
            self.elements.values().try_for_each(|record| match record.adapter.update_grid_snapping(enabled, size) {
                Ok(c) => {
                    change = c;
                    Ok(())
                }
                Err(AdapterError::Grid(err)) => Err(EditorError::Grid(err)),
                Err(AdapterError::Destroyed(id)) => Err(EditorError::Host(format!("adapter for {id} released early"))),
            })
        };
        self.flush_redraw();
        result.map(|()| change)
    }

    fn flush_redraw(&mut self) {
        if !self.redraw_pending.replace(false) {
            return;
        }
        let result = self.renderer.redraw(self.grid.borrow().config());
        self.record_render(result);
    }

    fn record_render(&mut self, result: Result<(), RenderError>) {
        if let Err(err) = result {
            self.render_failures += 1;
            warn!("grid render failed ({} so far): {err}", self.render_failures);
        }
    }
}

fn update_snapping(grid: &SharedGrid, enabled: bool, size: Option<f64>) -> Result<GridChange, EditorError> {
    let mut grid = grid.borrow_mut();
    let mut change = GridChange::default();
    if let Some(size) = size {
        change = grid.set_size(size)?;
    }
    change.snapping = grid.set_enabled(enabled).snapping;
    Ok(change)
}

impl<S: Surface, H: ElementHost> Drop for EditorCore<S, H> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<S: Surface, H: ElementHost> std::fmt::Debug for EditorCore<S, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorCore")
            .field("elements", &self.elements.len())
            .field("next_id", &self.next_id)
            .field("options", &self.options)
            .field("render_failures", &self.render_failures)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}
