//! Snapping grid overlay and grid-aware element manipulation for canvas editors.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It draws a
//! grid of evenly spaced lines over an editing surface and reconciles the raw
//! geometry reported by an external drag/resize/rotate library with that grid.
//! The host page is responsible only for loading the manipulation library and
//! forwarding its events to [`web::WebEditor`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`grid`] | Grid configuration, snapping, and change notification |
//! | [`render`] | Grid line layout and the [`render::Surface`] abstraction |
//! | [`raster`] | Headless pixel-buffer surface |
//! | [`adapter`] | Per-element bridge between manipulation events and the grid |
//! | [`element`] | Manipulable element model and element factories |
//! | [`editor`] | Testable [`editor::EditorCore`] owning elements and adapters |
//! | [`settings`] | Grid settings form view and control handling |
//! | [`web`] | DOM, canvas, and `wasm_bindgen` bindings |
//! | [`geom`] | Point, size, and line value types |
//! | [`error`] | Error types |
//! | [`consts`] | Shared defaults (grid size, colors, offsets, etc.) |

pub mod adapter;
pub mod consts;
pub mod editor;
pub mod element;
pub mod error;
pub mod geom;
pub mod grid;
pub mod raster;
pub mod render;
pub mod settings;
pub mod web;
