//! Headless pixel-buffer surface.
//!
//! `Raster` implements [`Surface`] over an in-memory RGBA buffer sized in
//! device pixels. Lines are filled as their stroke rectangle, which is exact
//! for the axis-aligned lines the grid produces. All lines of one
//! `stroke_lines` call form a single path, so crossings are painted once
//! rather than blended twice.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use crate::error::RenderError;
use crate::geom::Line;
use crate::render::{Stroke, Surface, Viewport};

/// One device pixel. A fully transparent pixel is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// An in-memory drawing surface.
#[derive(Debug, Clone, Default)]
pub struct Raster {
    width: u32,
    height: u32,
    dpr: f64,
    pixels: Vec<Rgba>,
}

impl Raster {
    #[must_use]
    pub fn new() -> Self {
        Self { dpr: 1.0, ..Self::default() }
    }

    /// Width in device pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in device pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pixel at device coordinates, if in bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Whether every pixel is fully transparent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| p.a == 0)
    }

    /// Number of pixels with non-zero alpha.
    #[must_use]
    pub fn painted_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.a != 0).count()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn fill_device_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                let i = self.index(x, y);
                self.pixels[i] = color;
            }
        }
    }

    /// Device-pixel span `[start, end)` covered by `[lo, hi]` in CSS pixels.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn span(&self, lo: f64, hi: f64) -> (u32, u32) {
        let start = (lo * self.dpr).floor().max(0.0);
        let end = (hi * self.dpr).ceil().max(0.0);
        (start.min(f64::from(u32::MAX)) as u32, end.min(f64::from(u32::MAX)) as u32)
    }
}

impl Surface for Raster {
    fn resize(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        self.width = viewport.device_width();
        self.height = viewport.device_height();
        self.dpr = viewport.dpr;
        self.pixels = vec![Rgba::default(); self.width as usize * self.height as usize];
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.pixels.fill(Rgba::default());
        Ok(())
    }

    fn stroke_lines(&mut self, lines: &[Line], stroke: Stroke<'_>) -> Result<(), RenderError> {
        let (r, g, b) =
            parse_hex_rgb(stroke.color).ok_or_else(|| RenderError::UnsupportedColor(stroke.color.to_owned()))?;
        let color = Rgba { r, g, b, a: alpha_byte(stroke.opacity) };
        if color.a == 0 {
            return Ok(());
        }
        let half = stroke.width / 2.0;
        for line in lines {
            let (min_x, max_x) = (line.from.x.min(line.to.x), line.from.x.max(line.to.x));
            let (min_y, max_y) = (line.from.y.min(line.to.y), line.from.y.max(line.to.y));
            let (x0, x1, y0, y1) = if line.is_vertical() {
                let (x0, x1) = self.span(min_x - half, max_x + half);
                let (y0, y1) = self.span(min_y, max_y);
                (x0, x1, y0, y1)
            } else {
                let (x0, x1) = self.span(min_x, max_x);
                let (y0, y1) = self.span(min_y - half, max_y + half);
                (x0, x1, y0, y1)
            };
            self.fill_device_rect(x0, y0, x1, y1, color);
        }
        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_byte(opacity: f64) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = hex_channel(&hex[0..1].repeat(2))?;
            let g = hex_channel(&hex[1..2].repeat(2))?;
            let b = hex_channel(&hex[2..3].repeat(2))?;
            Some((r, g, b))
        }
        6 => {
            let r = hex_channel(&hex[0..2])?;
            let g = hex_channel(&hex[2..4])?;
            let b = hex_channel(&hex[4..6])?;
            Some((r, g, b))
        }
        _ => None,
    }
}

fn hex_channel(pair: &str) -> Option<u8> {
    u8::from_str_radix(pair, 16).ok()
}
