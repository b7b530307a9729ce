//! Shared defaults for the gridsnap crate.

// ── Grid ────────────────────────────────────────────────────────

/// Default spacing between adjacent grid lines, in CSS pixels.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

/// Default grid line color.
pub const DEFAULT_GRID_COLOR: &str = "#e0e0e0";

/// Default grid line opacity.
pub const DEFAULT_GRID_OPACITY: f64 = 0.5;

/// Default maximum distance from a grid line that still snaps, in CSS pixels.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 10.0;

/// Smallest accepted grid size, in CSS pixels.
pub const MIN_GRID_SIZE: f64 = 1.0;

/// Grid sizes offered by the settings form.
pub const GRID_SIZE_CHOICES: [f64; 7] = [10.0, 15.0, 20.0, 25.0, 30.0, 40.0, 50.0];

// ── Rendering ───────────────────────────────────────────────────

/// Half-pixel offset that centers a 1px line on a pixel column.
pub const LINE_OFFSET_PX: f64 = 0.5;

/// Grid line width in CSS pixels.
pub const LINE_WIDTH_PX: f64 = 1.0;

/// Most lines drawn along one axis, whatever the container size.
pub const MAX_LINES_PER_AXIS: usize = 16_384;

// ── Settings form ───────────────────────────────────────────────

/// Lower bound of the opacity slider.
pub const OPACITY_SLIDER_MIN: f64 = 0.1;

/// Upper bound of the opacity slider.
pub const OPACITY_SLIDER_MAX: f64 = 1.0;

/// Opacity slider step.
pub const OPACITY_SLIDER_STEP: f64 = 0.1;

// ── Elements ────────────────────────────────────────────────────

/// Translate applied to newly added elements that carry no position.
pub const DEFAULT_ELEMENT_OFFSET_PX: f64 = 40.0;
