use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Used when no palette colour can be produced.
pub const DEFAULT_COLOR: &str = "#808080";

/// Generates `n` visually distinct colours using evenly spaced hues, as
/// `#rrggbb` strings.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

/// Colour of a chart's single value series.
pub fn series_color() -> String {
    generate_palette(1)
        .into_iter()
        .next()
        .unwrap_or_else(|| DEFAULT_COLOR.to_string())
}
