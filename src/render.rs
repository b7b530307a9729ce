//! Rendering: lays out grid lines and paints them onto a [`Surface`].
//!
//! The renderer never mutates grid state. Each redraw is a full clear
//! followed by a full repaint from the current [`GridConfig`], so calling it
//! twice before a frame is presented is harmless.
//!
//! Surfaces are abstract so the same layout can be painted onto a browser
//! canvas ([`crate::web::CanvasSurface`]) or a pixel buffer
//! ([`crate::raster::Raster`]).

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use log::debug;

use crate::consts::{LINE_OFFSET_PX, LINE_WIDTH_PX, MAX_LINES_PER_AXIS, MIN_GRID_SIZE};
use crate::error::RenderError;
use crate::geom::{Line, Point};
use crate::grid::GridConfig;

/// Container dimensions in CSS pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 0.0, height: 0.0, dpr: 1.0 }
    }
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64, dpr: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            dpr: if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 },
        }
    }

    /// Backing-store width in device pixels.
    #[must_use]
    pub fn device_width(&self) -> u32 {
        device_px(self.width * self.dpr)
    }

    /// Backing-store height in device pixels.
    #[must_use]
    pub fn device_height(&self) -> u32 {
        device_px(self.height * self.dpr)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn device_px(v: f64) -> u32 {
    v.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Stroke parameters for one batch of lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub opacity: f64,
    pub width: f64,
}

/// A 2D drawing target sized to a container.
///
/// Coordinates passed to `clear` and `stroke_lines` are CSS pixels; the
/// surface applies the device pixel ratio it was last resized with.
pub trait Surface {
    /// Resize the backing store to match `viewport`. Resets any scaling.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be resized.
    fn resize(&mut self, viewport: Viewport) -> Result<(), RenderError>;

    /// Erase the whole surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be cleared.
    fn clear(&mut self) -> Result<(), RenderError>;

    /// Stroke every line in a single path with `stroke`.
    ///
    /// # Errors
    ///
    /// Returns an error if a drawing call fails or the style is unsupported.
    fn stroke_lines(&mut self, lines: &[Line], stroke: Stroke<'_>) -> Result<(), RenderError>;
}

/// Grid line segments covering a `width` x `height` area.
///
/// Vertical lines sit at `x = k * size` for every `k` with `k * size <= width`,
/// horizontal lines likewise up to `height`. Each is offset by half a pixel so
/// a 1px stroke fills exactly one pixel column or row.
///
/// Sizes below [`MIN_GRID_SIZE`] produce nothing. Each axis stops at
/// [`MAX_LINES_PER_AXIS`] lines.
#[must_use]
pub fn grid_lines(size: f64, width: f64, height: f64) -> Vec<Line> {
    if !(size.is_finite() && size >= MIN_GRID_SIZE) {
        return Vec::new();
    }
    let (columns, rows) = (line_count(width, size), line_count(height, size));
    let mut lines = Vec::with_capacity(columns + rows);
    for k in 0..columns {
        let x = k as f64 * size + LINE_OFFSET_PX;
        lines.push(Line::new(Point::new(x, 0.0), Point::new(x, height)));
    }
    for k in 0..rows {
        let y = k as f64 * size + LINE_OFFSET_PX;
        lines.push(Line::new(Point::new(0.0, y), Point::new(width, y)));
    }
    lines
}

/// Number of multiples of `size` in `[0, extent]`, capped at [`MAX_LINES_PER_AXIS`].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn line_count(extent: f64, size: f64) -> usize {
    if !(extent.is_finite() && extent >= 0.0) {
        return 0;
    }
    ((extent / size).floor() as usize).saturating_add(1).min(MAX_LINES_PER_AXIS)
}

/// Keeps a surface in sync with the container size and grid configuration.
pub struct GridRenderer<S: Surface> {
    surface: S,
    viewport: Viewport,
    redraws: u64,
}

impl<S: Surface> GridRenderer<S> {
    /// Wrap a surface. Nothing is drawn until the first [`Self::resize`].
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self { surface, viewport: Viewport::default(), redraws: 0 }
    }

    /// Adopt new container dimensions and repaint once.
    ///
    /// # Errors
    ///
    /// Returns the first surface failure; the viewport is still recorded.
    pub fn resize(&mut self, viewport: Viewport, config: &GridConfig) -> Result<(), RenderError> {
        self.viewport = viewport;
        self.surface.resize(viewport)?;
        self.redraw(config)
    }

    /// Clear and, if the grid is visible, repaint every line.
    ///
    /// # Errors
    ///
    /// Returns the first surface failure.
    pub fn redraw(&mut self, config: &GridConfig) -> Result<(), RenderError> {
        self.redraws += 1;
        self.surface.clear()?;
        if !config.visible {
            return Ok(());
        }
        let lines = grid_lines(config.size, self.viewport.width, self.viewport.height);
        debug!(
            "grid redraw #{}: {} lines over {}x{}",
            self.redraws,
            lines.len(),
            self.viewport.width,
            self.viewport.height
        );
        let stroke = Stroke { color: &config.color, opacity: config.opacity, width: LINE_WIDTH_PX };
        self.surface.stroke_lines(&lines, stroke)
    }

    /// Erase the surface without counting a redraw.
    ///
    /// # Errors
    ///
    /// Returns the surface failure.
    pub fn clear(&mut self) -> Result<(), RenderError> {
        self.surface.clear()
    }

    /// Number of redraws performed so far.
    #[must_use]
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    /// Current container dimensions.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
