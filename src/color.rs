use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Colour of single-series charts (manufacturer bars, yearly trend line).
pub const SERIES_COLOR: Color32 = Color32::from_rgb(0x36, 0xA2, 0xEB);

/// Slice colours used first, before falling back to generated hues.
const BASE_SLICE_COLORS: [Color32; 4] = [
    Color32::from_rgb(0xFF, 0x63, 0x84),
    Color32::from_rgb(0x36, 0xA2, 0xEB),
    Color32::from_rgb(0xFF, 0xCE, 0x56),
    Color32::from_rgb(0x4B, 0xC0, 0xC0),
];

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

/// One colour per pie slice: the four base colours, then generated hues
/// offset so they do not start on the same red as the first base colour.
pub fn slice_colors(n: usize) -> Vec<Color32> {
    let extra = n.saturating_sub(BASE_SLICE_COLORS.len());
    let generated = generate_palette(extra + 1);
    BASE_SLICE_COLORS
        .iter()
        .copied()
        .chain(generated.into_iter().skip(1))
        .take(n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_colors_match_the_requested_count() {
        assert!(slice_colors(0).is_empty());
        assert_eq!(slice_colors(3), BASE_SLICE_COLORS[..3].to_vec());
        let many = slice_colors(9);
        assert_eq!(many.len(), 9);
        assert_eq!(many[..4], BASE_SLICE_COLORS);
    }

    #[test]
    fn palette_hues_are_distinct() {
        let colors = generate_palette(6);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
