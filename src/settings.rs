//! Grid settings panel: a view of the grid configuration plus control handling.
//!
//! The panel keeps no copy of the configuration. [`SettingsPanel::view`] reads
//! the live [`GridModel`] every time it renders, and [`SettingsPanel::apply`]
//! forwards each control change to the matching grid setter before invoking
//! the host's optional callback.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use crate::consts::{GRID_SIZE_CHOICES, OPACITY_SLIDER_MAX, OPACITY_SLIDER_MIN, OPACITY_SLIDER_STEP};
use crate::error::{GridError, SettingsError};
use crate::grid::{GridChange, GridConfigPatch, GridModel, SharedGrid};

/// DOM id of the visibility checkbox.
pub const CONTROL_VISIBLE: &str = "grid-visible";
/// DOM id of the snap checkbox.
pub const CONTROL_SNAP: &str = "grid-snap";
/// DOM id of the size selector.
pub const CONTROL_SIZE: &str = "grid-size";
/// DOM id of the opacity slider.
pub const CONTROL_OPACITY: &str = "grid-opacity";
/// DOM id of the opacity percentage label.
pub const OPACITY_LABEL: &str = "opacity-value";
/// DOM id of the color picker.
pub const CONTROL_COLOR: &str = "grid-color";

/// One entry of the size selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeOption {
    pub value: f64,
    pub selected: bool,
}

/// Control values for one render of the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsView {
    pub visible: bool,
    pub snap: bool,
    pub size_options: Vec<SizeOption>,
    pub opacity: f64,
    pub opacity_label: String,
    pub color: String,
}

impl SettingsView {
    /// Render the form markup.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::from("<div class=\"menu-section\"><h3>Grid Settings</h3>");
        write_checkbox(&mut html, CONTROL_VISIBLE, "Show Grid", self.visible);
        write_checkbox(&mut html, CONTROL_SNAP, "Snap to Grid", self.snap);

        html.push_str(&format!(
            "<div class=\"menu-item\"><label for=\"{CONTROL_SIZE}\">Grid Size:</label><select id=\"{CONTROL_SIZE}\">"
        ));
        for option in &self.size_options {
            let selected = if option.selected { " selected" } else { "" };
            html.push_str(&format!("<option value=\"{v}\"{selected}>{v}px</option>", v = option.value));
        }
        html.push_str("</select></div>");

        html.push_str(&format!(
            "<div class=\"menu-item\"><label for=\"{CONTROL_OPACITY}\">Grid Opacity:</label>\
             <input type=\"range\" id=\"{CONTROL_OPACITY}\" min=\"{OPACITY_SLIDER_MIN}\" max=\"{OPACITY_SLIDER_MAX}\" \
             step=\"{OPACITY_SLIDER_STEP}\" value=\"{}\"><span id=\"{OPACITY_LABEL}\">{}</span></div>",
            self.opacity,
            escape_html(&self.opacity_label),
        ));
        html.push_str(&format!(
            "<div class=\"menu-item\"><label for=\"{CONTROL_COLOR}\">Grid Color:</label>\
             <input type=\"color\" id=\"{CONTROL_COLOR}\" value=\"{}\"></div>",
            escape_html(&self.color),
        ));
        html.push_str("</div>");
        html
    }
}

fn write_checkbox(html: &mut String, id: &str, label: &str, checked: bool) {
    let checked = if checked { " checked" } else { "" };
    html.push_str(&format!(
        "<div class=\"menu-item\"><label><input type=\"checkbox\" id=\"{id}\"{checked}> {label}</label></div>"
    ));
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// A change event from one form control.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsControl {
    Visible(bool),
    Snap(bool),
    Size(f64),
    Opacity(f64),
    Color(String),
}

impl SettingsControl {
    /// Build a control change from a DOM id and the control's raw value.
    ///
    /// Checkbox values are `"true"`/`"false"`; numeric controls are decimal.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownControl`] for an unrecognised id, or
    /// [`SettingsError::InvalidValue`] when the value does not parse.
    pub fn parse(id: &str, raw: &str) -> Result<Self, SettingsError> {
        let invalid = || SettingsError::InvalidValue { control: id.to_owned(), value: raw.to_owned() };
        let raw = raw.trim();
        match id {
            CONTROL_VISIBLE => raw.parse().map(Self::Visible).map_err(|_| invalid()),
            CONTROL_SNAP => raw.parse().map(Self::Snap).map_err(|_| invalid()),
            CONTROL_SIZE => raw.parse().map(Self::Size).map_err(|_| invalid()),
            CONTROL_OPACITY => raw.parse().map(Self::Opacity).map_err(|_| invalid()),
            CONTROL_COLOR => Ok(Self::Color(raw.to_owned())),
            other => Err(SettingsError::UnknownControl(other.to_owned())),
        }
    }
}

/// Optional host callbacks, invoked after the grid has been updated.
#[derive(Default)]
pub struct SettingsCallbacks {
    pub on_grid_toggle: Option<Box<dyn FnMut(bool)>>,
    pub on_snap_toggle: Option<Box<dyn FnMut(bool)>>,
    pub on_grid_size_change: Option<Box<dyn FnMut(f64)>>,
}

/// Binds form controls to grid setters.
#[derive(Default)]
pub struct SettingsPanel {
    callbacks: SettingsCallbacks,
}

impl SettingsPanel {
    #[must_use]
    pub fn new(callbacks: SettingsCallbacks) -> Self {
        Self { callbacks }
    }

    /// Read the live grid state into control values.
    #[must_use]
    pub fn view(grid: &GridModel) -> SettingsView {
        let config = grid.config();
        let size_options = GRID_SIZE_CHOICES
            .iter()
            .map(|&value| SizeOption { value, selected: (value - config.size).abs() < f64::EPSILON })
            .collect();
        SettingsView {
            visible: config.visible,
            snap: config.enabled,
            size_options,
            opacity: config.opacity,
            opacity_label: opacity_label(config.opacity),
            color: config.color.clone(),
        }
    }

    /// Apply one control change to the grid, then invoke its callback.
    ///
    /// The grid borrow is released before the callback runs. A size change
    /// also turns snapping on.
    ///
    /// # Errors
    ///
    /// Returns the grid's validation error; no callback runs in that case.
    pub fn apply(&mut self, grid: &SharedGrid, control: SettingsControl) -> Result<GridChange, GridError> {
        let change = {
            let mut grid = grid.borrow_mut();
            match control {
                SettingsControl::Visible(visible) => grid.set_visible(visible),
                SettingsControl::Snap(enabled) => grid.set_enabled(enabled),
                SettingsControl::Size(size) => grid.update_config(GridConfigPatch {
                    size: Some(size),
                    enabled: Some(true),
                    ..GridConfigPatch::default()
                })?,
                SettingsControl::Opacity(opacity) => grid.set_opacity(quantize_opacity(opacity))?,
                SettingsControl::Color(ref color) => grid.set_color(color)?,
            }
        };

        match control {
            SettingsControl::Visible(visible) => {
                if let Some(cb) = self.callbacks.on_grid_toggle.as_mut() {
                    cb(visible);
                }
            }
            SettingsControl::Snap(enabled) => {
                if let Some(cb) = self.callbacks.on_snap_toggle.as_mut() {
                    cb(enabled);
                }
            }
            SettingsControl::Size(size) => {
                if let Some(cb) = self.callbacks.on_grid_size_change.as_mut() {
                    cb(size);
                }
            }
            SettingsControl::Opacity(_) | SettingsControl::Color(_) => {}
        }
        Ok(change)
    }
}

/// Percentage label shown next to the opacity slider.
#[must_use]
pub fn opacity_label(opacity: f64) -> String {
    format!("{}%", (opacity * 100.0).round())
}

/// Clamp to the slider range and round to the slider step.
#[must_use]
pub fn quantize_opacity(opacity: f64) -> f64 {
    let clamped = if opacity.is_nan() {
        OPACITY_SLIDER_MAX
    } else {
        opacity.clamp(OPACITY_SLIDER_MIN, OPACITY_SLIDER_MAX)
    };
    let steps = (1.0 / OPACITY_SLIDER_STEP).round();
    (clamped * steps).round() / steps
}
