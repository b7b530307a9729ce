//! Grid model: configuration, snapping, and change notification.
//!
//! There is exactly one [`GridModel`] per editor. It is shared by every
//! element adapter through [`SharedGrid`] so that a configuration change is
//! seen by all of them immediately; nobody holds a copy of [`GridConfig`].
//!
//! Mutations go through setters or a [`GridConfigPatch`] merge. Each one
//! validates first, then stores, then reports a [`GridChange`] to every
//! subscriber. Visual changes are flagged so the owner can schedule a redraw.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_GRID_COLOR, DEFAULT_GRID_OPACITY, DEFAULT_GRID_SIZE, DEFAULT_SNAP_THRESHOLD, MIN_GRID_SIZE,
};
use crate::error::GridError;
use crate::geom::{Point, Size};

/// The grid model as shared between the editor and its adapters.
pub type SharedGrid = Rc<RefCell<GridModel>>;

/// Grid configuration as stored in the model and passed in from the host page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Snapping is applied to manipulation events.
    pub enabled: bool,
    /// Grid lines are drawn. Independent of `enabled`.
    pub visible: bool,
    /// Spacing between adjacent grid lines on both axes, in CSS pixels.
    pub size: f64,
    /// CSS color of the grid lines.
    pub color: String,
    /// Line opacity in `[0, 1]`.
    pub opacity: f64,
    /// Maximum distance from a grid line that still snaps, in CSS pixels.
    pub snap_threshold: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            visible: true,
            size: DEFAULT_GRID_SIZE,
            color: DEFAULT_GRID_COLOR.to_owned(),
            opacity: DEFAULT_GRID_OPACITY,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
        }
    }
}

impl GridConfig {
    /// Parse a (possibly partial) JSON configuration; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Json`] for malformed JSON, or the validation error
    /// for an out-of-range value.
    pub fn from_json(raw: &str) -> Result<Self, GridError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| GridError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), GridError> {
        validate_size(self.size)?;
        validate_opacity(self.opacity)?;
        validate_threshold(self.snap_threshold)?;
        validate_color(&self.color)?;
        Ok(())
    }
}

/// Sparse update for a grid configuration. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snap_threshold: Option<f64>,
}

impl GridConfigPatch {
    fn validate(&self) -> Result<(), GridError> {
        if let Some(size) = self.size {
            validate_size(size)?;
        }
        if let Some(opacity) = self.opacity {
            validate_opacity(opacity)?;
        }
        if let Some(threshold) = self.snap_threshold {
            validate_threshold(threshold)?;
        }
        if let Some(ref color) = self.color {
            validate_color(color)?;
        }
        Ok(())
    }
}

/// Which parts of the configuration a mutation touched.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridChange {
    /// `visible` was set.
    pub visibility: bool,
    /// `enabled` was set.
    pub snapping: bool,
    /// `size` was set.
    pub geometry: bool,
    /// `color` or `opacity` was set.
    pub appearance: bool,
    /// `snap_threshold` was set.
    pub threshold: bool,
}

impl GridChange {
    /// Whether the drawn grid may look different after this change.
    #[must_use]
    pub fn needs_redraw(self) -> bool {
        self.visibility || self.geometry || self.appearance
    }

    /// Whether nothing was touched.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::default()
    }
}

/// Handle returned by [`GridModel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&GridConfig, GridChange)>;

/// Owner of the grid configuration and the snapping rule.
pub struct GridModel {
    config: GridConfig,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for GridModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridModel")
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for GridModel {
    fn default() -> Self {
        Self {
            config: GridConfig::default(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }
}

impl GridModel {
    /// Create a model from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the first invariant `config` violates.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        Ok(Self { config, ..Self::default() })
    }

    /// Wrap the model for sharing between the editor and its adapters.
    #[must_use]
    pub fn into_shared(self) -> SharedGrid {
        Rc::new(RefCell::new(self))
    }

    /// The live configuration.
    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    // --- Snapping ---

    /// Snap a position to the grid, each axis independently.
    ///
    /// Identity when snapping is disabled. Otherwise an axis moves to the
    /// nearest multiple of `size` only if that multiple lies within
    /// `snap_threshold`; an element can snap on x while staying free on y.
    #[must_use]
    pub fn snap(&self, x: f64, y: f64) -> Point {
        if !self.config.enabled {
            return Point::new(x, y);
        }
        let GridConfig { size, snap_threshold, .. } = self.config;
        Point::new(snap_value(x, size, snap_threshold), snap_value(y, size, snap_threshold))
    }

    /// Snap a width/height pair with the same rule as [`Self::snap`].
    #[must_use]
    pub fn snap_size(&self, width: f64, height: f64) -> Size {
        if !self.config.enabled {
            return Size::new(width, height);
        }
        let GridConfig { size, snap_threshold, .. } = self.config;
        Size::new(
            snap_value(width, size, snap_threshold),
            snap_value(height, size, snap_threshold),
        )
    }

    // --- Setters ---

    /// Show or hide the grid lines. Snapping is unaffected.
    pub fn set_visible(&mut self, visible: bool) -> GridChange {
        self.config.visible = visible;
        self.emit(GridChange { visibility: true, ..GridChange::default() })
    }

    /// Turn snapping on or off. The drawn grid is unaffected.
    pub fn set_enabled(&mut self, enabled: bool) -> GridChange {
        self.config.enabled = enabled;
        self.emit(GridChange { snapping: true, ..GridChange::default() })
    }

    /// Change the cell size.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSize`] for a size below [`MIN_GRID_SIZE`] or non-finite.
    pub fn set_size(&mut self, size: f64) -> Result<GridChange, GridError> {
        validate_size(size)?;
        self.config.size = size;
        Ok(self.emit(GridChange { geometry: true, ..GridChange::default() }))
    }

    /// Change the line color.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidColor`] for an empty color.
    pub fn set_color(&mut self, color: &str) -> Result<GridChange, GridError> {
        validate_color(color)?;
        color.clone_into(&mut self.config.color);
        Ok(self.emit(GridChange { appearance: true, ..GridChange::default() }))
    }

    /// Change the line opacity.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidOpacity`] outside `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f64) -> Result<GridChange, GridError> {
        validate_opacity(opacity)?;
        self.config.opacity = opacity;
        Ok(self.emit(GridChange { appearance: true, ..GridChange::default() }))
    }

    /// Change the snap threshold.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidThreshold`] for a negative or non-finite value.
    pub fn set_snap_threshold(&mut self, threshold: f64) -> Result<GridChange, GridError> {
        validate_threshold(threshold)?;
        self.config.snap_threshold = threshold;
        Ok(self.emit(GridChange { threshold: true, ..GridChange::default() }))
    }

    /// Merge a partial configuration. The patch is validated as a whole
    /// before anything is stored.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field; the configuration is left untouched.
    pub fn update_config(&mut self, patch: GridConfigPatch) -> Result<GridChange, GridError> {
        patch.validate()?;
        let mut change = GridChange::default();
        if let Some(enabled) = patch.enabled {
            self.config.enabled = enabled;
            change.snapping = true;
        }
        if let Some(visible) = patch.visible {
            self.config.visible = visible;
            change.visibility = true;
        }
        if let Some(size) = patch.size {
            self.config.size = size;
            change.geometry = true;
        }
        if let Some(color) = patch.color {
            self.config.color = color;
            change.appearance = true;
        }
        if let Some(opacity) = patch.opacity {
            self.config.opacity = opacity;
            change.appearance = true;
        }
        if let Some(threshold) = patch.snap_threshold {
            self.config.snap_threshold = threshold;
            change.threshold = true;
        }
        if change.is_empty() {
            return Ok(change);
        }
        Ok(self.emit(change))
    }

    // --- Subscriptions ---

    /// Register a listener called after every mutation.
    ///
    /// Listeners run while the model is mutably borrowed and must not call
    /// back into it.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&GridConfig, GridChange) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn emit(&mut self, change: GridChange) -> GridChange {
        debug!("grid config changed: {change:?}");
        for (_, listener) in &mut self.listeners {
            listener(&self.config, change);
        }
        change
    }
}

/// Snap a single coordinate to the nearest multiple of `size` within `threshold`.
///
/// Halfway values round toward positive infinity.
#[must_use]
pub fn snap_value(value: f64, size: f64, threshold: f64) -> f64 {
    let candidate = (value / size + 0.5).floor() * size;
    if (value - candidate).abs() <= threshold {
        candidate
    } else {
        value
    }
}

fn validate_size(size: f64) -> Result<(), GridError> {
    if size.is_finite() && size >= MIN_GRID_SIZE {
        Ok(())
    } else {
        Err(GridError::InvalidSize(size))
    }
}

fn validate_opacity(opacity: f64) -> Result<(), GridError> {
    if (0.0..=1.0).contains(&opacity) {
        Ok(())
    } else {
        Err(GridError::InvalidOpacity(opacity))
    }
}

fn validate_threshold(threshold: f64) -> Result<(), GridError> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidThreshold(threshold))
    }
}

fn validate_color(color: &str) -> Result<(), GridError> {
    if color.trim().is_empty() {
        Err(GridError::InvalidColor)
    } else {
        Ok(())
    }
}
