use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Colour of the reference point marker.
pub const REFERENCE_COLOR: Color32 = Color32::from_rgb(220, 40, 40);

/// Generates `n` visually distinct colours using evenly spaced hues.
/// Hues start away from red so restaurant pins never look like the
/// reference marker.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 40.0 + (i as f32 / n as f32) * 280.0;
            let hsl = Hsl::new(hue, 0.75, 0.5);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the values of a categorical column (cuisine type) to distinct colours.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new(values: &BTreeSet<String>) -> Self {
        let palette = generate_palette(values.len());
        ColorMap {
            mapping: values.iter().cloned().zip(palette).collect(),
        }
    }

    /// Colour for a value; grey for missing or unseen values.
    pub fn color_for(&self, value: Option<&str>) -> Color32 {
        value
            .and_then(|v| self.mapping.get(v))
            .copied()
            .unwrap_or(Color32::GRAY)
    }

    /// Legend entries (value → colour) for the UI.
    pub fn legend_entries(&self) -> impl Iterator<Item = (&str, Color32)> {
        self.mapping.iter().map(|(v, c)| (v.as_str(), *c))
    }
}
