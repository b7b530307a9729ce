#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point or translate offset in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of an element's box in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl From<Point> for Size {
    fn from(p: Point) -> Self {
        Self { width: p.x, height: p.y }
    }
}

/// A straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: Point,
    pub to: Point,
}

impl Line {
    #[must_use]
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    /// Whether both endpoints share the same x coordinate.
    #[must_use]
    pub fn is_vertical(&self) -> bool {
        (self.from.x - self.to.x).abs() < f64::EPSILON
    }
}
