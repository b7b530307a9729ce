#![allow(clippy::float_cmp)]

use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::element::ElementSpec;
use crate::grid::{GridConfig, GridModel};

// =============================================================
// Helpers
// =============================================================

struct CountingManipulator {
    releases: Rc<Cell<usize>>,
}

impl Manipulator for CountingManipulator {
    fn release(&mut self) {
        self.releases.set(self.releases.get() + 1);
    }
}

fn shared_grid() -> SharedGrid {
    GridModel::new(GridConfig::default()).expect("valid config").into_shared()
}

fn setup(size_snap: SizeSnap) -> (Adapter, ManipulableElement, SharedGrid, Rc<Cell<usize>>) {
    let grid = shared_grid();
    let releases = Rc::new(Cell::new(0));
    let manipulator = Box::new(CountingManipulator { releases: Rc::clone(&releases) });
    let id = ElementId(0);
    let adapter = Adapter::new(id, Rc::clone(&grid), manipulator, size_snap);
    let element = ManipulableElement::from_spec(id, ElementSpec::boxed(), Point::new(40.0, 40.0));
    (adapter, element, grid, releases)
}

fn drag(x: f64, y: f64) -> ManipulationEvent {
    ManipulationEvent::Drag(DragEvent::new(x, y))
}

// =============================================================
// Drag
// =============================================================

#[test]
fn drag_snaps_translate_when_enabled() {
    let (mut adapter, mut el, _grid, _) = setup(SizeSnap::Position);
    let placement = adapter.handle(&drag(24.0, 35.0), &mut el);
    assert_eq!(placement.and_then(|p| p.translate), Some(Point::new(20.0, 40.0)));
    assert_eq!(el.translate, Point::new(20.0, 40.0));
}

#[test]
fn drag_passes_raw_translate_when_disabled() {
    let (mut adapter, mut el, grid, _) = setup(SizeSnap::Position);
    grid.borrow_mut().set_enabled(false);
    let placement = adapter.handle(&drag(24.0, 35.0), &mut el);
    assert_eq!(placement.map(|p| p.transform_css()), Some("translate(24px, 35px)".to_owned()));
    assert_eq!(el.translate, Point::new(24.0, 35.0));
}

#[test]
fn drag_leaves_size_and_rotation_alone() {
    let (mut adapter, mut el, _grid, _) = setup(SizeSnap::Position);
    el.rotation = 30.0;
    let placement = adapter.handle(&drag(1.0, 1.0), &mut el);
    assert_eq!(placement.and_then(|p| p.size), None);
    assert_eq!(el.size, Size::new(120.0, 80.0));
    assert_eq!(el.rotation, 30.0);
}

#[test]
fn drag_outside_threshold_on_one_axis_only() {
    let (mut adapter, mut el, grid, _) = setup(SizeSnap::Position);
    assert!(grid.borrow_mut().set_snap_threshold(3.0).is_ok());
    adapter.handle(&drag(41.0, 50.0), &mut el);
    assert_eq!(el.translate, Point::new(40.0, 50.0));
}

// =============================================================
// Resize
// =============================================================

#[test]
fn resize_snaps_size_and_translate_together() {
    let (mut adapter, mut el, _grid, _) = setup(SizeSnap::Position);
    let event = ManipulationEvent::Resize(ResizeEvent { width: 124.0, height: 75.0, drag: DragEvent::new(18.0, 63.0) });
    let placement = adapter.handle(&event, &mut el).expect("placement");
    assert_eq!(placement.size, Some(Size::new(120.0, 80.0)));
    assert_eq!(placement.translate, Some(Point::new(20.0, 60.0)));
    assert_eq!(el.size, Size::new(120.0, 80.0));
    assert_eq!(el.translate, Point::new(20.0, 60.0));
}

#[test]
fn resize_dedicated_size_snap_matches_position_snap() {
    let event = ManipulationEvent::Resize(ResizeEvent { width: 133.0, height: 47.0, drag: DragEvent::new(0.0, 0.0) });
    let (mut a, mut el_a, _ga, _) = setup(SizeSnap::Position);
    let (mut b, mut el_b, _gb, _) = setup(SizeSnap::Dedicated);
    assert_eq!(a.handle(&event, &mut el_a), b.handle(&event, &mut el_b));
}

#[test]
fn resize_disabled_keeps_raw_values() {
    let (mut adapter, mut el, grid, _) = setup(SizeSnap::Dedicated);
    grid.borrow_mut().set_enabled(false);
    let event = ManipulationEvent::Resize(ResizeEvent { width: 133.0, height: 47.0, drag: DragEvent::new(3.0, 4.0) });
    adapter.handle(&event, &mut el);
    assert_eq!(el.size, Size::new(133.0, 47.0));
    assert_eq!(el.translate, Point::new(3.0, 4.0));
}

// =============================================================
// Rotate
// =============================================================

#[test]
fn rotate_with_drag_snaps_translate_then_rotates() {
    let (mut adapter, mut el, _grid, _) = setup(SizeSnap::Position);
    let event = ManipulationEvent::Rotate(RotateEvent { before_rotate: 37.5, drag: Some(DragEvent::new(62.0, 18.0)) });
    let placement = adapter.handle(&event, &mut el).expect("placement");
    assert_eq!(placement.transform_css(), "translate(60px, 20px) rotate(37.5deg)");
    assert_eq!(el.rotation, 37.5);
}

#[test]
fn drag_after_rotate_keeps_rotation_in_transform() {
    let (mut adapter, mut el, _grid, _) = setup(SizeSnap::Position);
    let rotate = ManipulationEvent::Rotate(RotateEvent { before_rotate: 45.0, drag: None });
    adapter.handle(&rotate, &mut el).expect("placement");
    let placement = adapter.handle(&drag(24.0, 35.0), &mut el).expect("placement");
    assert_eq!(placement.rotation, Some(45.0));
    assert_eq!(placement.transform_css(), "translate(20px, 40px) rotate(45deg)");
    assert_eq!(placement.transform_css(), el.transform_css());
}

#[test]
fn resize_after_rotate_keeps_rotation_in_transform() {
    let (mut adapter, mut el, _grid, _) = setup(SizeSnap::Position);
    let rotate = ManipulationEvent::Rotate(RotateEvent { before_rotate: 45.0, drag: None });
    adapter.handle(&rotate, &mut el).expect("placement");
    let resize = ManipulationEvent::Resize(ResizeEvent { width: 124.0, height: 75.0, drag: DragEvent::new(18.0, 63.0) });
    let placement = adapter.handle(&resize, &mut el).expect("placement");
    assert_eq!(placement.size, Some(Size::new(120.0, 80.0)));
    assert_eq!(placement.transform_css(), "translate(20px, 60px) rotate(45deg)");
    assert_eq!(el.rotation, 45.0);
}

#[test]
fn drag_of_unrotated_element_has_no_rotate_in_transform() {
    let (mut adapter, mut el, _grid, _) = setup(SizeSnap::Position);
    let placement = adapter.handle(&drag(24.0, 35.0), &mut el).expect("placement");
    assert_eq!(placement.rotation, None);
    assert_eq!(placement.transform_css(), "translate(20px, 40px)");
}

#[test]
fn rotate_with_drag_unsnapped_when_disabled() {
    let (mut adapter, mut el, grid, _) = setup(SizeSnap::Position);
    grid.borrow_mut().set_enabled(false);
    let event = ManipulationEvent::Rotate(RotateEvent { before_rotate: 10.0, drag: Some(DragEvent::new(62.0, 18.0)) });
    let placement = adapter.handle(&event, &mut el).expect("placement");
    assert_eq!(placement.transform_css(), "translate(62px, 18px) rotate(10deg)");
}

#[test]
fn rotate_without_drag_keeps_stored_translate() {
    let (mut adapter, mut el, _grid, _) = setup(SizeSnap::Position);
    let event = ManipulationEvent::Rotate(RotateEvent { before_rotate: 90.0, drag: None });
    let placement = adapter.handle(&event, &mut el).expect("placement");
    assert_eq!(placement.transform_css(), "translate(40px, 40px) rotate(90deg)");
    assert_eq!(el.translate, Point::new(40.0, 40.0));
}

// =============================================================
// Grid relay
// =============================================================

#[test]
fn update_grid_snapping_mutates_shared_model() {
    let (adapter, _el, grid, _) = setup(SizeSnap::Position);
    let change = adapter.update_grid_snapping(false, Some(40.0));
    assert!(change.is_ok_and(|c| c.geometry && c.snapping));
    assert!(!grid.borrow().config().enabled);
    assert_eq!(grid.borrow().config().size, 40.0);
}

#[test]
fn update_grid_snapping_is_seen_by_sibling_adapters() {
    let (first, _el, grid, _) = setup(SizeSnap::Position);
    let releases = Rc::new(Cell::new(0));
    let mut second = Adapter::new(
        ElementId(1),
        Rc::clone(&grid),
        Box::new(CountingManipulator { releases }),
        SizeSnap::Position,
    );
    let mut el = ManipulableElement::from_spec(ElementId(1), ElementSpec::boxed(), Point::default());

    assert!(first.update_grid_snapping(true, Some(50.0)).is_ok());
    second.handle(&drag(55.0, 30.0), &mut el);
    assert_eq!(el.translate, Point::new(50.0, 30.0));
}

#[test]
fn update_grid_snapping_rejects_bad_size_without_toggling() {
    let (adapter, _el, grid, _) = setup(SizeSnap::Position);
    let result = adapter.update_grid_snapping(false, Some(0.0));
    assert!(matches!(result, Err(AdapterError::Grid(_))));
    assert!(grid.borrow().config().enabled);
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn destroy_releases_once_and_is_idempotent() {
    let (mut adapter, _el, _grid, releases) = setup(SizeSnap::Position);
    assert!(adapter.destroy());
    assert!(!adapter.destroy());
    assert!(adapter.is_destroyed());
    assert_eq!(releases.get(), 1);
}

#[test]
fn drop_releases_if_not_destroyed() {
    let (adapter, _el, _grid, releases) = setup(SizeSnap::Position);
    drop(adapter);
    assert_eq!(releases.get(), 1);
}

#[test]
fn drop_after_destroy_does_not_release_again() {
    let (mut adapter, _el, _grid, releases) = setup(SizeSnap::Position);
    adapter.destroy();
    drop(adapter);
    assert_eq!(releases.get(), 1);
}

#[test]
fn events_after_destroy_are_ignored() {
    let (mut adapter, mut el, _grid, _) = setup(SizeSnap::Position);
    adapter.destroy();
    assert_eq!(adapter.handle(&drag(24.0, 35.0), &mut el), None);
    assert_eq!(el.translate, Point::new(40.0, 40.0));
}

#[test]
fn update_after_destroy_errors() {
    let (mut adapter, _el, _grid, _) = setup(SizeSnap::Position);
    adapter.destroy();
    assert_eq!(
        adapter.update_grid_snapping(true, None),
        Err(AdapterError::Destroyed("element-0".into()))
    );
}

#[test]
fn events_for_foreign_element_are_ignored() {
    let (mut adapter, _el, _grid, _) = setup(SizeSnap::Position);
    let mut other = ManipulableElement::from_spec(ElementId(9), ElementSpec::boxed(), Point::default());
    assert_eq!(adapter.handle(&drag(24.0, 35.0), &mut other), None);
    assert_eq!(other.translate, Point::default());
}

#[test]
fn manipulation_event_deserializes_from_host_json() {
    let raw = r#"{ "type": "rotate", "beforeRotate": 15, "drag": { "beforeTranslate": { "x": 1, "y": 2 } } }"#;
    let event: ManipulationEvent = serde_json::from_str(raw).expect("valid event json");
    assert_eq!(
        event,
        ManipulationEvent::Rotate(RotateEvent { before_rotate: 15.0, drag: Some(DragEvent::new(1.0, 2.0)) })
    );
}
