//! Manipulable elements and the factories that describe new ones.
//!
//! An [`ElementSpec`] is what the host asks the editor to add; the editor turns
//! it into a [`ManipulableElement`] with an id and a resolved position. The
//! element is the authoritative geometry for one DOM node: adapters write
//! snapped placements into it and the host mirrors them onto the node's style.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Size};

/// Stable per-editor element identity. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element-{}", self.0)
    }
}

/// What an element looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Label on a rounded blue pill.
    Text,
    /// Plain green box.
    Box,
    /// Gradient placeholder standing in for an image.
    Image,
}

/// CSS `position` of an element inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Positioning {
    #[default]
    Absolute,
    Relative,
    Static,
}

impl Positioning {
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Relative => "relative",
            Self::Static => "static",
        }
    }
}

/// Request to add an element. Unset position fields take editor defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub kind: ElementKind,
    pub label: Option<String>,
    pub size: Size,
    pub translate: Option<Point>,
    pub positioning: Option<Positioning>,
}

impl ElementSpec {
    /// A 150x40 text pill.
    #[must_use]
    pub fn text(label: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Text,
            label: Some(label.into()),
            size: Size::new(150.0, 40.0),
            translate: None,
            positioning: None,
        }
    }

    /// A 120x80 box.
    #[must_use]
    pub fn boxed() -> Self {
        Self {
            kind: ElementKind::Box,
            label: None,
            size: Size::new(120.0, 80.0),
            translate: None,
            positioning: None,
        }
    }

    /// A 160x120 image placeholder.
    #[must_use]
    pub fn image() -> Self {
        Self {
            kind: ElementKind::Image,
            label: Some("IMAGE".to_owned()),
            size: Size::new(160.0, 120.0),
            translate: None,
            positioning: None,
        }
    }

    /// Place the element at an explicit translate.
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.translate = Some(Point::new(x, y));
        self
    }
}

/// A rectangle the user can drag, resize, and rotate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManipulableElement {
    pub id: ElementId,
    pub kind: ElementKind,
    pub label: Option<String>,
    /// Offset applied through the `translate` transform.
    pub translate: Point,
    pub size: Size,
    /// Clockwise rotation in degrees.
    pub rotation: f64,
    pub positioning: Positioning,
}

impl ManipulableElement {
    /// Resolve a spec, filling unset position fields from the defaults.
    #[must_use]
    pub fn from_spec(id: ElementId, spec: ElementSpec, default_translate: Point) -> Self {
        Self {
            id,
            kind: spec.kind,
            label: spec.label,
            translate: spec.translate.unwrap_or(default_translate),
            size: spec.size,
            rotation: 0.0,
            positioning: spec.positioning.unwrap_or_default(),
        }
    }

    /// The CSS `transform` for the element's current geometry.
    #[must_use]
    pub fn transform_css(&self) -> String {
        transform_css(Some(self.translate), Some(self.rotation).filter(|r| *r != 0.0))
    }

    /// Static style for the element's kind, as CSS property/value pairs.
    #[must_use]
    pub fn base_style(&self) -> Vec<(&'static str, &'static str)> {
        let mut style = vec![("cursor", "move"), ("user-select", "none")];
        match self.kind {
            ElementKind::Text => style.extend([
                ("background", "#007bff"),
                ("color", "white"),
                ("display", "flex"),
                ("align-items", "center"),
                ("justify-content", "center"),
                ("border-radius", "6px"),
                ("font-size", "14px"),
                ("font-weight", "500"),
            ]),
            ElementKind::Box => style.extend([
                ("background", "#28a745"),
                ("border-radius", "6px"),
                ("border", "2px solid #1e7e34"),
            ]),
            ElementKind::Image => style.extend([
                ("background", "linear-gradient(45deg, #ff6b6b, #4ecdc4)"),
                ("border-radius", "8px"),
                ("display", "flex"),
                ("align-items", "center"),
                ("justify-content", "center"),
                ("color", "white"),
                ("font-size", "14px"),
                ("font-weight", "bold"),
            ]),
        }
        style
    }
}

/// Build a CSS transform applying translate before rotate.
#[must_use]
pub fn transform_css(translate: Option<Point>, rotation: Option<f64>) -> String {
    match (translate, rotation) {
        (Some(t), Some(r)) => format!("translate({}px, {}px) rotate({r}deg)", t.x, t.y),
        (Some(t), None) => format!("translate({}px, {}px)", t.x, t.y),
        (None, Some(r)) => format!("rotate({r}deg)"),
        (None, None) => String::new(),
    }
}
