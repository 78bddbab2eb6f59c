use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CategoryValue;

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Color palette generators
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            hsl_to_color32(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

/// Sequential orange → dark red scale; `t` is clamped to `0.0..=1.0`.
pub fn heat_color(t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0) as f32;
    let hue = 40.0 - 40.0 * t;
    let lightness = 0.80 - 0.45 * t;
    hsl_to_color32(Hsl::new(hue, 0.85, lightness))
}

/// Position of `value` within `[min, max]`, 0.5 when the range is empty.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range.abs() < f64::EPSILON {
        0.5
    } else {
        (value - min) / range
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the values of one dimension to distinct colours, so a category keeps
/// its colour in the sidebar and in charts.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<CategoryValue, Color32>,
}

impl ColorMap {
    pub fn new(values: &BTreeSet<CategoryValue>) -> Self {
        let palette = generate_palette(values.len());
        let mapping = values.iter().cloned().zip(palette).collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &CategoryValue) -> Color32 {
        self.mapping.get(value).copied().unwrap_or(Color32::GRAY)
    }

    pub fn color_for_text(&self, value: &str) -> Color32 {
        self.color_for(&CategoryValue::text(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn color_map_is_stable_and_falls_back() {
        let values: BTreeSet<_> = ["hibrido", "presencial", "remoto"]
            .into_iter()
            .map(CategoryValue::text)
            .collect();
        let map = ColorMap::new(&values);
        assert_eq!(map.color_for_text("remoto"), map.color_for_text("remoto"));
        assert_ne!(map.color_for_text("remoto"), map.color_for_text("hibrido"));
        assert_eq!(map.color_for_text("unknown"), Color32::GRAY);
    }

    #[test]
    fn heat_scale_darkens() {
        let low = heat_color(0.0);
        let high = heat_color(1.0);
        let luma = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(luma(low) > luma(high));
        assert_eq!(normalize(5.0, 5.0, 5.0), 0.5);
        assert_eq!(normalize(7.5, 5.0, 10.0), 0.5);
    }
}
