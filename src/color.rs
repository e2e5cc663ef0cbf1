use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use career_dash::data::model::{CompanySize, Modality, Seniority};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Blend from `low` to `high` by `t` in `[0, 1]`, for heatmap cells.
pub fn ramp(low: Color32, high: Color32, t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0) as f32;
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color32::from_rgb(
        mix(low.r(), high.r()),
        mix(low.g(), high.g()),
        mix(low.b(), high.b()),
    )
}

// ---------------------------------------------------------------------------
// Series colours: category label → Color32
// ---------------------------------------------------------------------------

/// Stable colours for every categorical series the charts draw, so a
/// modality or seniority keeps its colour across tabs and filter changes.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl SeriesColors {
    pub fn new(labels: &[&str]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels
            .iter()
            .zip(palette)
            .map(|(label, c)| (label.to_string(), c))
            .collect();
        SeriesColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Colours for the fixed domains (seniority, modality, company size).
    pub fn for_domains() -> Self {
        let labels: Vec<&str> = Seniority::ALL
            .iter()
            .map(|s| s.label())
            .chain(Modality::ALL.iter().map(|m| m.label()))
            .chain(CompanySize::ALL.iter().map(|c| c.label()))
            .collect();
        Self::new(&labels)
    }

    /// Look up the colour for a series label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}
