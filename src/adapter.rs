//! Adapter between an external manipulation library and the grid.
//!
//! Each element gets one [`Adapter`]. The manipulation library (e.g. Moveable
//! in the host page) reports raw geometry for three kinds of gesture; the
//! adapter decides whether to replace that geometry with a snapped value,
//! writes the result into the element, and returns the [`Placement`] the host
//! applies to the element's style.
//!
//! The adapter keeps no position state of its own. Every event carries the
//! authoritative raw value, and the grid is read live from the shared model.

#[cfg(test)]
#[path = "adapter_test.rs"]
mod adapter_test;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::element::{ElementId, ManipulableElement, transform_css};
use crate::error::AdapterError;
use crate::geom::{Point, Size};
use crate::grid::{GridChange, SharedGrid};

/// Handle to one manipulation-library instance bound to an element.
pub trait Manipulator {
    /// Detach every event subscription and free the instance.
    ///
    /// Called at most once per instance.
    fn release(&mut self);
}

/// Raw drag geometry: translate before any snapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragEvent {
    pub before_translate: Point,
}

impl DragEvent {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { before_translate: Point::new(x, y) }
    }
}

/// Raw resize geometry. Resizing from a top or left edge also moves the
/// element, so the accompanying drag translate is applied together with the size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeEvent {
    pub width: f64,
    pub height: f64,
    pub drag: DragEvent,
}

/// Raw rotation, optionally with a simultaneous drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotateEvent {
    /// Rotation in degrees.
    pub before_rotate: f64,
    pub drag: Option<DragEvent>,
}

/// A gesture reported by the manipulation library.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ManipulationEvent {
    Drag(DragEvent),
    Resize(ResizeEvent),
    Rotate(RotateEvent),
}

/// How resize dimensions are snapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeSnap {
    /// Treat width/height as a coordinate pair and run the position snap.
    #[default]
    Position,
    /// Use [`crate::grid::GridModel::snap_size`].
    Dedicated,
}

/// Style changes produced by one gesture. Absent fields are left unchanged.
///
/// Translate and rotation share the CSS `transform`, so a drag or resize of a
/// rotated element still carries its current rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub translate: Option<Point>,
    pub size: Option<Size>,
    pub rotation: Option<f64>,
}

impl Placement {
    /// The CSS `transform`, translate before rotate. Empty if neither is set.
    #[must_use]
    pub fn transform_css(&self) -> String {
        transform_css(self.translate, self.rotation)
    }
}

/// Grid-aware binding for one element.
pub struct Adapter {
    element_id: ElementId,
    grid: SharedGrid,
    manipulator: Option<Box<dyn Manipulator>>,
    size_snap: SizeSnap,
}

impl Adapter {
    #[must_use]
    pub fn new(element_id: ElementId, grid: SharedGrid, manipulator: Box<dyn Manipulator>, size_snap: SizeSnap) -> Self {
        Self { element_id, grid, manipulator: Some(manipulator), size_snap }
    }

    #[must_use]
    pub fn element_id(&self) -> ElementId {
        self.element_id
    }

    /// Whether [`Self::destroy`] has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.manipulator.is_none()
    }

    /// Apply one gesture to `target`, snapping when the grid is enabled.
    ///
    /// Returns `None` without touching `target` once the adapter is destroyed
    /// or if `target` is not this adapter's element.
    pub fn handle(&mut self, event: &ManipulationEvent, target: &mut ManipulableElement) -> Option<Placement> {
        if self.is_destroyed() {
            debug!("{}: dropping {event:?} after destroy", self.element_id);
            return None;
        }
        if target.id != self.element_id {
            warn!("{}: event routed to foreign element {}", self.element_id, target.id);
            return None;
        }

        let current_rotation = Some(target.rotation).filter(|r| *r != 0.0);
        let placement = match *event {
            ManipulationEvent::Drag(drag) => Placement {
                translate: Some(self.snap_translate(drag.before_translate)),
                size: None,
                rotation: current_rotation,
            },
            ManipulationEvent::Resize(resize) => Placement {
                translate: Some(self.snap_translate(resize.drag.before_translate)),
                size: Some(self.snap_dimensions(resize.width, resize.height)),
                rotation: current_rotation,
            },
            ManipulationEvent::Rotate(rotate) => {
                let translate = match rotate.drag {
                    Some(drag) => self.snap_translate(drag.before_translate),
                    None => target.translate,
                };
                Placement {
                    translate: Some(translate),
                    size: None,
                    rotation: Some(rotate.before_rotate),
                }
            }
        };

        if let Some(translate) = placement.translate {
            target.translate = translate;
        }
        if let Some(size) = placement.size {
            target.size = size;
        }
        if let Some(rotation) = placement.rotation {
            target.rotation = rotation;
        }
        Some(placement)
    }

    /// Relay a snapping change to the shared grid. Every adapter sees it.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Destroyed`] after destroy, or the grid's
    /// validation error for a bad size (in which case `enabled` is not applied).
    pub fn update_grid_snapping(&self, enabled: bool, size: Option<f64>) -> Result<GridChange, AdapterError> {
        if self.is_destroyed() {
            return Err(AdapterError::Destroyed(self.element_id.to_string()));
        }
        let mut grid = self.grid.borrow_mut();
        let mut change = GridChange::default();
        if let Some(size) = size {
            change = grid.set_size(size)?;
        }
        let snapping = grid.set_enabled(enabled);
        change.snapping = snapping.snapping;
        Ok(change)
    }

    /// Release the manipulation-library instance. Safe to call repeatedly.
    ///
    /// Returns `true` if this call performed the release.
    pub fn destroy(&mut self) -> bool {
        let Some(mut manipulator) = self.manipulator.take() else {
            return false;
        };
        manipulator.release();
        debug!("{}: adapter destroyed", self.element_id);
        true
    }

    fn snap_translate(&self, raw: Point) -> Point {
        let grid = self.grid.borrow();
        if grid.config().enabled {
            grid.snap(raw.x, raw.y)
        } else {
            raw
        }
    }

    fn snap_dimensions(&self, width: f64, height: f64) -> Size {
        let grid = self.grid.borrow();
        if !grid.config().enabled {
            return Size::new(width, height);
        }
        match self.size_snap {
            SizeSnap::Position => Size::from(grid.snap(width, height)),
            SizeSnap::Dedicated => grid.snap_size(width, height),
        }
    }
}

impl Drop for Adapter {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for Adapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter")
            .field("element_id", &self.element_id)
            .field("destroyed", &self.is_destroyed())
            .field("size_snap", &self.size_snap)
            .finish_non_exhaustive()
    }
}
