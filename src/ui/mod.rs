//! UI modules for the earthquake map.
//!
//! The UI is split into distinct parts:
//! - Top bar: title, status, and overlay load progress
//! - Central canvas: tiles, overlays, popups and attribution
//! - Layer control: floating top-right, always expanded
//! - Legend: floating bottom-right

pub mod colors;

mod canvas;
mod layer_control;
mod legend;
mod top_bar;

pub use canvas::render_canvas;
pub use layer_control::render_layer_control;
pub use legend::render_legend;
pub use top_bar::render_top_bar;
