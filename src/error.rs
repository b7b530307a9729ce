//! Error types shared across the crate.
//!
//! Each concern gets its own enum. Grid validation errors are fail-fast:
//! an invalid value never reaches the stored configuration. Render errors
//! are reported to the caller but the editor logs and swallows them so that
//! element manipulation keeps working when the grid fails to paint.

use wasm_bindgen::JsValue;

/// Invalid grid configuration value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Cell size must be finite and at least [`crate::consts::MIN_GRID_SIZE`].
    #[error("grid size must be a number of at least 1px, got {0}")]
    InvalidSize(f64),
    /// Opacity must lie in `[0, 1]`.
    #[error("grid opacity must be within 0..=1, got {0}")]
    InvalidOpacity(f64),
    /// Snap threshold must be finite and non-negative.
    #[error("snap threshold must be a non-negative number, got {0}")]
    InvalidThreshold(f64),
    /// Color must be a non-empty CSS color string.
    #[error("grid color must not be empty")]
    InvalidColor,
    /// The JSON configuration could not be parsed.
    #[error("invalid grid config json: {0}")]
    Json(String),
}

/// Failure while drawing to a [`crate::render::Surface`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// A browser canvas call failed.
    #[error("canvas call failed: {0}")]
    Js(String),
    /// The canvas element did not provide a 2D context.
    #[error("canvas 2d context unavailable")]
    NoContext,
    /// The surface cannot interpret the configured color.
    #[error("unsupported color: {0}")]
    UnsupportedColor(String),
}

impl From<JsValue> for RenderError {
    fn from(value: JsValue) -> Self {
        Self::Js(js_message(&value))
    }
}

/// A settings form control reported something unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("unknown settings control: {0}")]
    UnknownControl(String),
    #[error("invalid value {value:?} for {control}")]
    InvalidValue { control: String, value: String },
}

/// Calls on an adapter after [`crate::adapter::Adapter::destroy`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdapterError {
    #[error("adapter for {0} has been destroyed")]
    Destroyed(String),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Editor controller failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    /// The container element the editor mounts into does not exist. Fatal.
    #[error("container with id \"{0}\" not found")]
    MissingContainer(String),
    /// The editor has already been torn down.
    #[error("editor has been destroyed")]
    Destroyed,
    /// The element host could not attach, detach, or style a node.
    #[error("element host failed: {0}")]
    Host(String),
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl From<JsValue> for EditorError {
    fn from(value: JsValue) -> Self {
        Self::Host(js_message(&value))
    }
}

/// Best-effort string form of a thrown JS value.
#[must_use]
pub fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl From<EditorError> for JsValue {
    fn from(err: EditorError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
