use std::str::FromStr;

use anyhow::{Context, Result};
use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::stats::JumpKind;

// ---------------------------------------------------------------------------
// Chart colours
// ---------------------------------------------------------------------------

pub const CM_JUMP_HEX: &str = "#22c55e";
pub const SQUAT_JUMP_HEX: &str = "#3b82f6";
pub const RADAR_HEX: &str = "#636efa";

/// Parse a `#rrggbb` string into an egui colour.
pub fn hex_color(hex: &str) -> Result<Color32> {
    let rgb = Srgb::<u8>::from_str(hex).with_context(|| format!("invalid colour '{hex}'"))?;
    Ok(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

/// Like [`hex_color`], falling back to grey for a malformed constant.
fn color_or_gray(hex: &str) -> Color32 {
    hex_color(hex).unwrap_or_else(|e| {
        log::warn!("{e:#}");
        Color32::GRAY
    })
}

pub fn jump_color(kind: JumpKind) -> Color32 {
    match kind {
        JumpKind::CounterMovement => color_or_gray(CM_JUMP_HEX),
        JumpKind::Squat => color_or_gray(SQUAT_JUMP_HEX),
    }
}

pub fn radar_color() -> Color32 {
    color_or_gray(RADAR_HEX)
}

/// A lighter, translucent version of `color` for polygon fills.
pub fn fill_tint(color: Color32) -> Color32 {
    let rgb = Srgb::new(
        color.r() as f32 / 255.0,
        color.g() as f32 / 255.0,
        color.b() as f32 / 255.0,
    );
    let mut hsl: Hsl = rgb.into_color();
    hsl.lightness = (hsl.lightness + 0.15).min(0.9);
    let light: Srgb = hsl.into_color();
    Color32::from_rgba_unmultiplied(
        (light.red * 255.0) as u8,
        (light.green * 255.0) as u8,
        (light.blue * 255.0) as u8,
        90,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#22c55e").unwrap(), Color32::from_rgb(0x22, 0xc5, 0x5e));
        assert_eq!(hex_color("3b82f6").unwrap(), Color32::from_rgb(0x3b, 0x82, 0xf6));
        assert!(hex_color("#zzzzzz").is_err());
    }

    #[test]
    fn test_jump_colors_are_distinct() {
        assert_ne!(jump_color(JumpKind::CounterMovement), jump_color(JumpKind::Squat));
    }

    #[test]
    fn test_fill_tint_is_translucent() {
        let tint = fill_tint(radar_color());
        assert!(tint.a() < 255);
    }
}
