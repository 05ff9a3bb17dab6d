//! Earthquake styling: magnitude scale, legend, and the feature layer builder.

mod builder;
mod legend;
mod style;

pub use builder::{populate, BuildReport, LayerStyle};
pub use legend::{legend_entries, LegendEntry};
pub use style::{magnitude_color, marker_radius, ColorToken};
