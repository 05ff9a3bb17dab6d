//! Magnitude legend bands.

use super::style::{magnitude_color, ColorToken};

/// Lower bounds of the legend bands.
pub const LEGEND_GRADES: [u32; 6] = [0, 1, 2, 3, 4, 5];

/// One swatch in the legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub color: ColorToken,
    pub label: String,
}

/// Builds the legend: one swatch per grade, colored by the magnitude scale.
///
/// Every band but the last reads `low–high`; the last is open-ended (`5+`).
pub fn legend_entries() -> Vec<LegendEntry> {
    LEGEND_GRADES
        .iter()
        .enumerate()
        .map(|(i, &grade)| {
            let label = match LEGEND_GRADES.get(i + 1) {
                Some(next) => format!("{grade}\u{2013}{next}"),
                None => format!("{grade}+"),
            };
            LegendEntry {
                color: magnitude_color(grade as f64),
                label,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_has_six_bands() {
        let entries = legend_entries();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[5].label, "5+");
        assert_eq!(entries[0].label, "0\u{2013}1");
        assert_eq!(entries[4].label, "4\u{2013}5");
    }

    #[test]
    fn test_bounded_labels_use_en_dash() {
        for entry in &legend_entries()[..5] {
            let (low, high) = entry.label.split_once('\u{2013}').unwrap();
            let low: u32 = low.parse().unwrap();
            let high: u32 = high.parse().unwrap();
            assert_eq!(high, low + 1);
        }
    }

    #[test]
    fn test_swatches_follow_color_scale() {
        let entries = legend_entries();
        assert_eq!(entries[0].color.hex(), "#ffffcc");
        assert_eq!(entries[1].color.hex(), "#ffffcc");
        assert_eq!(entries[2].color.hex(), "#ffeda0");
        assert_eq!(entries[5].color.hex(), "#fd8d3c");
    }
}
