#![allow(clippy::float_cmp)]

use std::cell::RefCell;
use std::rc::Rc;

use super::*;

fn model(size: f64, threshold: f64) -> GridModel {
    let config = GridConfig { size, snap_threshold: threshold, ..GridConfig::default() };
    GridModel::new(config).expect("valid config")
}

// =============================================================
// Defaults and validation
// =============================================================

#[test]
fn default_config_matches_editor_defaults() {
    let c = GridConfig::default();
    assert!(c.enabled);
    assert!(c.visible);
    assert_eq!(c.size, 20.0);
    assert_eq!(c.color, "#e0e0e0");
    assert_eq!(c.opacity, 0.5);
    assert_eq!(c.snap_threshold, 10.0);
}

#[test]
fn new_rejects_zero_size() {
    let config = GridConfig { size: 0.0, ..GridConfig::default() };
    assert_eq!(GridModel::new(config).err(), Some(GridError::InvalidSize(0.0)));
}

#[test]
fn new_rejects_negative_size() {
    let config = GridConfig { size: -5.0, ..GridConfig::default() };
    assert!(matches!(GridModel::new(config), Err(GridError::InvalidSize(_))));
}

#[test]
fn new_rejects_size_below_minimum() {
    let config = GridConfig { size: 1e-300, ..GridConfig::default() };
    assert_eq!(GridModel::new(config).err(), Some(GridError::InvalidSize(1e-300)));
    let config = GridConfig { size: 0.5, ..GridConfig::default() };
    assert!(matches!(GridModel::new(config), Err(GridError::InvalidSize(_))));
}

#[test]
fn new_accepts_minimum_size() {
    let m = model(MIN_GRID_SIZE, 0.5);
    assert_eq!(m.config().size, 1.0);
    assert_eq!(m.snap(3.4, 7.6), Point::new(3.0, 8.0));
}

#[test]
fn new_rejects_nan_size() {
    let config = GridConfig { size: f64::NAN, ..GridConfig::default() };
    assert!(matches!(GridModel::new(config), Err(GridError::InvalidSize(_))));
}

#[test]
fn new_rejects_opacity_out_of_range() {
    let config = GridConfig { opacity: 1.5, ..GridConfig::default() };
    assert_eq!(GridModel::new(config).err(), Some(GridError::InvalidOpacity(1.5)));
}

#[test]
fn new_rejects_negative_threshold() {
    let config = GridConfig { snap_threshold: -1.0, ..GridConfig::default() };
    assert_eq!(GridModel::new(config).err(), Some(GridError::InvalidThreshold(-1.0)));
}

#[test]
fn new_rejects_blank_color() {
    let config = GridConfig { color: "  ".into(), ..GridConfig::default() };
    assert_eq!(GridModel::new(config).err(), Some(GridError::InvalidColor));
}

#[test]
fn from_json_fills_missing_fields_with_defaults() {
    let c = GridConfig::from_json(r#"{ "size": 25, "snapThreshold": 4 }"#).expect("valid json");
    assert_eq!(c.size, 25.0);
    assert_eq!(c.snap_threshold, 4.0);
    assert_eq!(c.color, "#e0e0e0");
    assert!(c.visible);
}

#[test]
fn from_json_rejects_malformed_input() {
    assert!(matches!(GridConfig::from_json("{ size: }"), Err(GridError::Json(_))));
}

#[test]
fn from_json_rejects_invalid_values() {
    assert_eq!(GridConfig::from_json(r#"{ "size": 0 }"#).err(), Some(GridError::InvalidSize(0.0)));
    assert_eq!(GridConfig::from_json(r#"{ "size": 1e-300 }"#).err(), Some(GridError::InvalidSize(1e-300)));
}

// =============================================================
// snap
// =============================================================

#[test]
fn snap_within_threshold_moves_to_nearest_line() {
    let m = model(20.0, 10.0);
    assert_eq!(m.snap(24.0, 35.0), Point::new(20.0, 40.0));
}

#[test]
fn snap_equidistant_outside_threshold_keeps_raw() {
    let m = model(20.0, 5.0);
    assert_eq!(m.snap(50.0, 50.0), Point::new(50.0, 50.0));
}

#[test]
fn snap_axes_are_independent() {
    let m = model(20.0, 3.0);
    let p = m.snap(41.0, 50.0);
    assert_eq!(p.x, 40.0);
    assert_eq!(p.y, 50.0);
}

#[test]
fn snap_disabled_is_identity() {
    let mut m = model(20.0, 10.0);
    m.set_enabled(false);
    assert_eq!(m.snap(24.0, 35.0), Point::new(24.0, 35.0));
}

#[test]
fn snap_is_idempotent() {
    let m = model(20.0, 10.0);
    for raw in [-33.0, -7.5, 0.0, 3.0, 24.0, 35.0, 119.9] {
        let once = m.snap(raw, raw);
        let twice = m.snap(once.x, once.y);
        assert_eq!(once, twice, "raw {raw}");
    }
}

#[test]
fn snap_result_is_a_multiple_or_unchanged() {
    let m = model(15.0, 4.0);
    for i in 0..400 {
        let raw = f64::from(i) * 0.37 - 20.0;
        let snapped = m.snap(raw, 0.0).x;
        let is_multiple = ((snapped / 15.0).round() * 15.0 - snapped).abs() < 1e-9;
        assert!(snapped == raw || (is_multiple && (snapped - raw).abs() <= 4.0), "raw {raw} -> {snapped}");
    }
}

#[test]
fn snap_threshold_at_half_size_snaps_everything() {
    let m = model(20.0, 10.0);
    for raw in [1.0, 9.0, 11.0, 29.9, 30.0, 57.0] {
        let snapped = m.snap(raw, raw).x;
        assert_eq!(snapped % 20.0, 0.0, "raw {raw}");
    }
}

#[test]
fn snap_zero_threshold_only_keeps_exact_lines() {
    let m = model(20.0, 0.0);
    assert_eq!(m.snap(40.0, 41.0), Point::new(40.0, 41.0));
}

#[test]
fn snap_negative_coordinates() {
    let m = model(20.0, 10.0);
    assert_eq!(m.snap(-24.0, -36.0), Point::new(-20.0, -40.0));
}

#[test]
fn snap_value_halfway_rounds_up() {
    assert_eq!(snap_value(-10.0, 20.0, 10.0), 0.0);
    assert_eq!(snap_value(10.0, 20.0, 10.0), 20.0);
}

#[test]
fn snap_size_uses_same_rule() {
    let m = model(20.0, 10.0);
    assert_eq!(m.snap_size(124.0, 75.0), Size::new(120.0, 80.0));
    let p = m.snap(124.0, 75.0);
    assert_eq!(Size::from(p), m.snap_size(124.0, 75.0));
}

// =============================================================
// Setters and change reporting
// =============================================================

#[test]
fn set_visible_requests_redraw() {
    let mut m = GridModel::default();
    let change = m.set_visible(false);
    assert!(change.needs_redraw());
    assert!(!m.config().visible);
}

#[test]
fn set_enabled_does_not_request_redraw() {
    let mut m = GridModel::default();
    let change = m.set_enabled(false);
    assert!(!change.needs_redraw());
    assert!(change.snapping);
}

#[test]
fn set_size_rejects_non_positive_and_keeps_previous() {
    let mut m = GridModel::default();
    assert_eq!(m.set_size(-1.0), Err(GridError::InvalidSize(-1.0)));
    assert_eq!(m.set_size(0.25), Err(GridError::InvalidSize(0.25)));
    assert_eq!(m.config().size, 20.0);
}

#[test]
fn set_size_requests_redraw() {
    let mut m = GridModel::default();
    let change = m.set_size(40.0).expect("accepted");
    assert!(change.geometry);
    assert!(change.needs_redraw());
    assert_eq!(m.config().size, 40.0);
}

#[test]
fn set_threshold_does_not_request_redraw() {
    let mut m = GridModel::default();
    let change = m.set_snap_threshold(3.0).expect("accepted");
    assert!(change.threshold);
    assert!(!change.needs_redraw());
}

#[test]
fn set_color_and_opacity_are_appearance_changes() {
    let mut m = GridModel::default();
    assert!(m.set_color("#ff0000").expect("accepted").appearance);
    assert!(m.set_opacity(0.8).expect("accepted").appearance);
    assert_eq!(m.config().color, "#ff0000");
    assert_eq!(m.config().opacity, 0.8);
}

#[test]
fn update_config_merges_present_fields_only() {
    let mut m = GridModel::default();
    let patch = GridConfigPatch { opacity: Some(0.3), color: Some("#000".into()), ..Default::default() };
    let change = m.update_config(patch).expect("accepted");
    assert!(change.appearance);
    assert!(!change.geometry);
    assert_eq!(m.config().opacity, 0.3);
    assert_eq!(m.config().color, "#000");
    assert_eq!(m.config().size, 20.0);
}

#[test]
fn update_config_rejects_whole_patch_on_invalid_field() {
    let mut m = GridModel::default();
    let patch = GridConfigPatch { visible: Some(false), size: Some(0.0), ..Default::default() };
    assert!(m.update_config(patch).is_err());
    assert!(m.config().visible);
    assert_eq!(m.config().size, 20.0);
}

#[test]
fn update_config_empty_patch_is_empty_change() {
    let mut m = GridModel::default();
    let change = m.update_config(GridConfigPatch::default()).expect("accepted");
    assert!(change.is_empty());
}

#[test]
fn patch_deserializes_camel_case() {
    let patch: GridConfigPatch = serde_json::from_str(r#"{ "snapThreshold": 2 }"#).expect("valid patch json");
    assert_eq!(patch.snap_threshold, Some(2.0));
    assert_eq!(patch.size, None);
}

// =============================================================
// Subscriptions
// =============================================================

#[test]
fn subscribers_receive_changes() {
    let mut m = GridModel::default();
    let seen: Rc<RefCell<Vec<(f64, GridChange)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    m.subscribe(move |config, change| sink.borrow_mut().push((config.size, change)));

    m.set_size(30.0).expect("accepted");
    m.set_enabled(false);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, 30.0);
    assert!(seen[0].1.geometry);
    assert!(seen[1].1.snapping);
}

#[test]
fn rejected_mutation_does_not_notify() {
    let mut m = GridModel::default();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    m.subscribe(move |_, _| *sink.borrow_mut() += 1);
    assert!(m.set_opacity(2.0).is_err());
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn unsubscribe_stops_notifications() {
    let mut m = GridModel::default();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    let id = m.subscribe(move |_, _| *sink.borrow_mut() += 1);
    m.set_visible(false);
    assert!(m.unsubscribe(id));
    m.set_visible(true);
    assert_eq!(*count.borrow(), 1);
    assert_eq!(m.subscriber_count(), 0);
}

#[test]
fn unsubscribe_unknown_id_returns_false() {
    let mut m = GridModel::default();
    let id = m.subscribe(|_, _| {});
    assert!(m.unsubscribe(id));
    assert!(!m.unsubscribe(id));
}

#[test]
fn shared_model_is_seen_by_all_holders() {
    let shared = GridModel::default().into_shared();
    let other = Rc::clone(&shared);
    shared.borrow_mut().set_enabled(false);
    assert!(!other.borrow().config().enabled);
}
