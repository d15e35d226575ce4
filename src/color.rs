use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Hex colours
// ---------------------------------------------------------------------------

/// Decode `"#RRGGBB"` / `"RRGGBB"` into its three components.
fn parse_hex(hex: &str) -> Result<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidArgument(format!(
            "invalid hex color `{hex}`, expected 6 hex digits"
        )));
    }

    let mut rgb = [0u8; 3];
    for (i, slot) in rgb.iter_mut().enumerate() {
        let pair = &digits[i * 2..i * 2 + 2];
        *slot = u8::from_str_radix(pair, 16)
            .map_err(|e| Error::InvalidArgument(format!("invalid hex color `{hex}`: {e}")))?;
    }
    Ok(rgb)
}

fn check_alpha(alpha: f64) -> Result<()> {
    if (0.0..=1.0).contains(&alpha) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "alpha must be between 0.0 and 1.0, got {alpha}"
        )))
    }
}

/// Convert a hex colour to a CSS `rgba(r, g, b, a)` string.
///
/// Fails with [`Error::InvalidArgument`] when `alpha` is outside `[0, 1]`
/// (NaN included) or `hex` is not exactly six hex digits after an optional `#`.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Result<String> {
    check_alpha(alpha)?;
    let [r, g, b] = parse_hex(hex)?;
    Ok(format!("rgba({r}, {g}, {b}, {})", alpha_text(alpha)))
}

/// Shortest round-trip text, keeping one decimal for whole numbers (`1.0`).
fn alpha_text(alpha: f64) -> String {
    if alpha.fract() == 0.0 {
        format!("{alpha:.1}")
    } else {
        alpha.to_string()
    }
}

/// Same contract as [`hex_to_rgba`], producing an egui colour.
pub fn hex_to_color32(hex: &str, alpha: f64) -> Result<Color32> {
    check_alpha(alpha)?;
    let [r, g, b] = parse_hex(hex)?;
    Ok(Color32::from_rgba_unmultiplied(
        r,
        g,
        b,
        (alpha * 255.0).round() as u8,
    ))
}

// ---------------------------------------------------------------------------
// Series palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.45);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn brand_colour_with_and_without_hash() {
        assert_eq!(hex_to_rgba("#114B80", 0.3).unwrap(), "rgba(17, 75, 128, 0.3)");
        assert_eq!(hex_to_rgba("114b80", 0.5).unwrap(), "rgba(17, 75, 128, 0.5)");
    }

    #[test]
    fn whole_alphas_keep_a_decimal() {
        assert_eq!(hex_to_rgba("#114B80", 1.0).unwrap(), "rgba(17, 75, 128, 1.0)");
        assert_eq!(hex_to_rgba("#114B80", 0.0).unwrap(), "rgba(17, 75, 128, 0.0)");
    }

    #[test]
    fn rejects_bad_digits_and_lengths() {
        assert!(matches!(hex_to_rgba("GGGGGG", 0.5), Err(Error::InvalidArgument(_))));
        assert!(matches!(hex_to_rgba("#FFF", 0.5), Err(Error::InvalidArgument(_))));
        assert!(matches!(hex_to_rgba("+1+2+3", 0.5), Err(Error::InvalidArgument(_))));
        assert!(matches!(hex_to_rgba("##114B80", 0.5), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn rejects_alpha_out_of_range() {
        assert!(matches!(hex_to_rgba("114B80", 1.5), Err(Error::InvalidArgument(_))));
        assert!(matches!(hex_to_rgba("114B80", -0.1), Err(Error::InvalidArgument(_))));
        assert!(matches!(hex_to_rgba("114B80", f64::NAN), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn color32_carries_alpha() {
        let c = hex_to_color32("#567389", 1.0).unwrap();
        assert_eq!(c, Color32::from_rgb(0x56, 0x73, 0x89));
    }

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colours = generate_palette(5);
        assert_eq!(colours.len(), 5);
        assert_ne!(colours[0], colours[1]);
    }

    proptest! {
        #[test]
        fn decodes_every_component(
            r in any::<u8>(),
            g in any::<u8>(),
            b in any::<u8>(),
            alpha in 0.0f64..=1.0,
            hash in any::<bool>(),
        ) {
            let hex = format!("{}{r:02X}{g:02X}{b:02x}", if hash { "#" } else { "" });
            let rgba = hex_to_rgba(&hex, alpha).unwrap();
            let prefix = format!("rgba({r}, {g}, {b}, ");
            prop_assert!(rgba.starts_with(&prefix), "{}", rgba);
            let alpha_part = rgba[prefix.len()..].trim_end_matches(')');
            prop_assert_eq!(alpha_part.parse::<f64>().unwrap(), alpha);
        }
    }
}
