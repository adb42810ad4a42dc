use eframe::egui::Color32;
use palette::{Darken, Hsl, IntoColor, Srgb};

use crate::data::model::Metric;

/// Foreground for titles, axis labels and tick text on the dark theme.
pub const TEXT: Color32 = Color32::from_rgb(0xf4, 0xf4, 0xf4);
/// Axis lines and grid.
pub const AXIS: Color32 = Color32::from_rgb(0x88, 0x88, 0x88);

// ---------------------------------------------------------------------------
// Metric colours
// ---------------------------------------------------------------------------

/// Hex colour of each metric's bars.
pub fn metric_hex(metric: Metric) -> &'static str {
    match metric {
        Metric::Points => "#f39c12",   // orange-gold
        Metric::Rebounds => "#27ae60", // green
        Metric::Assists => "#8e44ad",  // purple
    }
}

/// Parse a `#rrggbb` string; anything unparseable becomes gray.
pub fn from_hex(hex: &str) -> Color32 {
    match hex.parse::<Srgb<u8>>() {
        Ok(rgb) => Color32::from_rgb(rgb.red, rgb.green, rgb.blue),
        Err(e) => {
            log::warn!("Invalid colour {hex:?}: {e}");
            Color32::GRAY
        }
    }
}

/// Bar fill for a metric.
pub fn metric_color(metric: Metric) -> Color32 {
    from_hex(metric_hex(metric))
}

/// A darker shade of `color` in HSL space, used for bar outlines.
pub fn outline(color: Color32) -> Color32 {
    let rgb: Srgb = Srgb::new(color.r(), color.g(), color.b()).into_format();
    let hsl: Hsl = rgb.into_color();
    let darker: Srgb = hsl.darken(0.25).into_color();
    Color32::from_rgb(
        (darker.red * 255.0).round() as u8,
        (darker.green * 255.0).round() as u8,
        (darker.blue * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_colours_parse() {
        assert_eq!(metric_color(Metric::Points), Color32::from_rgb(0xf3, 0x9c, 0x12));
        assert_eq!(metric_color(Metric::Rebounds), Color32::from_rgb(0x27, 0xae, 0x60));
        assert_eq!(metric_color(Metric::Assists), Color32::from_rgb(0x8e, 0x44, 0xad));
    }

    #[test]
    fn invalid_hex_falls_back_to_gray() {
        assert_eq!(from_hex("not-a-colour"), Color32::GRAY);
    }

    #[test]
    fn outline_is_darker() {
        let fill = metric_color(Metric::Points);
        let edge = outline(fill);
        let luma = |c: Color32| u32::from(c.r()) + u32::from(c.g()) + u32::from(c.b());
        assert!(luma(edge) < luma(fill));
    }
}
