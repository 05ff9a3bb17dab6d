//! Magnitude-driven marker sizing and coloring.

use eframe::egui::Color32;

/// Pixels of marker radius per unit of magnitude.
pub const RADIUS_PER_MAGNITUDE: f64 = 2.0;

/// A named color from the magnitude scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorToken {
    hex: &'static str,
    rgb: [u8; 3],
}

impl ColorToken {
    const fn new(hex: &'static str, rgb: [u8; 3]) -> Self {
        Self { hex, rgb }
    }

    /// Hex form, e.g. `#fc4e2a`.
    pub fn hex(&self) -> &'static str {
        self.hex
    }

    pub fn to_color32(self) -> Color32 {
        let [r, g, b] = self.rgb;
        Color32::from_rgb(r, g, b)
    }

    /// Color with the given opacity (0.0 - 1.0) applied.
    pub fn with_opacity(self, opacity: f32) -> Color32 {
        let [r, g, b] = self.rgb;
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color32::from_rgba_unmultiplied(r, g, b, alpha)
    }
}

/// Magnitude color scale, ordered from the highest bucket down.
///
/// Each entry is `(lower bound, color)`; a magnitude belongs to the first
/// entry whose bound it strictly exceeds. The final entry catches everything
/// else, including NaN.
pub const MAGNITUDE_SCALE: [(f64, ColorToken); 9] = [
    (8.0, ColorToken::new("#800026", [0x80, 0x00, 0x26])),
    (7.0, ColorToken::new("#bd0026", [0xbd, 0x00, 0x26])),
    (6.0, ColorToken::new("#e31a1c", [0xe3, 0x1a, 0x1c])),
    (5.0, ColorToken::new("#fc4e2a", [0xfc, 0x4e, 0x2a])),
    (4.0, ColorToken::new("#fd8d3c", [0xfd, 0x8d, 0x3c])),
    (3.0, ColorToken::new("#feb24c", [0xfe, 0xb2, 0x4c])),
    (2.0, ColorToken::new("#fed976", [0xfe, 0xd9, 0x76])),
    (1.0, ColorToken::new("#ffeda0", [0xff, 0xed, 0xa0])),
    (f64::NEG_INFINITY, ColorToken::new("#ffffcc", [0xff, 0xff, 0xcc])),
];

/// Marker radius for a magnitude. Not clamped: zero or negative magnitudes
/// give a zero or negative radius.
pub fn marker_radius(magnitude: f64) -> f64 {
    magnitude * RADIUS_PER_MAGNITUDE
}

/// Index into [`MAGNITUDE_SCALE`] for a magnitude (0 = highest bucket).
pub fn magnitude_bucket(magnitude: f64) -> usize {
    MAGNITUDE_SCALE
        .iter()
        .position(|(bound, _)| magnitude > *bound)
        .unwrap_or(MAGNITUDE_SCALE.len() - 1)
}

/// Fill color for a magnitude.
pub fn magnitude_color(magnitude: f64) -> ColorToken {
    MAGNITUDE_SCALE[magnitude_bucket(magnitude)].1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_radius_is_linear() {
        for m in [-1.5, 0.0, 0.3, 1.0, 2.5, 5.2, 9.1] {
            assert_eq!(marker_radius(m), 2.0 * m);
        }
        assert_eq!(marker_radius(0.0), 0.0);
        assert!(marker_radius(-0.4) < 0.0);
    }

    #[test]
    fn test_thresholds_are_strict() {
        assert_eq!(magnitude_color(8.0).hex(), "#bd0026");
        assert_eq!(magnitude_color(8.01).hex(), "#800026");
        assert_eq!(magnitude_color(7.0).hex(), "#e31a1c");
        assert_eq!(magnitude_color(6.0).hex(), "#fc4e2a");
        assert_eq!(magnitude_color(5.0).hex(), "#fd8d3c");
        assert_eq!(magnitude_color(4.0).hex(), "#feb24c");
        assert_eq!(magnitude_color(3.0).hex(), "#fed976");
        assert_eq!(magnitude_color(2.0).hex(), "#ffeda0");
        assert_eq!(magnitude_color(1.0).hex(), "#ffffcc");
        assert_eq!(magnitude_color(0.0).hex(), "#ffffcc");
        assert_eq!(magnitude_color(-3.0).hex(), "#ffffcc");
    }

    #[test]
    fn test_exactly_eight_matches_above_seven_bucket() {
        assert_eq!(magnitude_color(8.0), magnitude_color(7.5));
        assert_ne!(magnitude_color(8.0), magnitude_color(8.5));
    }

    #[test]
    fn test_buckets_are_monotonic() {
        let samples: Vec<f64> = (-40..=120).map(|i| i as f64 * 0.1).collect();
        for pair in samples.windows(2) {
            // Lower index means a higher bucket.
            assert!(magnitude_bucket(pair[1]) <= magnitude_bucket(pair[0]));
        }
    }

    #[test]
    fn test_every_value_matches_one_bucket() {
        for value in [f64::NEG_INFINITY, -10.0, 0.5, 1.0, 4.999, 8.0, 100.0, f64::NAN] {
            let matches = (0..MAGNITUDE_SCALE.len())
                .filter(|&i| {
                    let above_own = i == MAGNITUDE_SCALE.len() - 1 || value > MAGNITUDE_SCALE[i].0;
                    let not_above_higher =
                        MAGNITUDE_SCALE[..i].iter().all(|(bound, _)| !(value > *bound));
                    above_own && not_above_higher
                })
                .count();
            assert_eq!(matches, 1, "value {value} matched {matches} buckets");
        }
        assert_eq!(magnitude_color(f64::NAN).hex(), "#ffffcc");
    }

    #[test]
    fn test_color_conversion() {
        let token = magnitude_color(5.2);
        assert_eq!(token.to_color32(), Color32::from_rgb(0xfc, 0x4e, 0x2a));
        assert_eq!(token.with_opacity(1.0).a(), 255);
        assert_eq!(token.with_opacity(0.0).a(), 0);
    }
}
