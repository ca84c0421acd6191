use std::fmt;
use std::str::FromStr;

/// Linear RGBA color with straight (non-premultiplied) alpha.
///
/// Values are linear so they can be written to uniforms and clear colors of an
/// sRGB surface as-is; the surface performs the sRGB encode.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn linear(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from sRGB-encoded bytes (`0`–`255`), e.g. from a hex literal.
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: srgb_to_linear(r as f32 / 255.0),
            g: srgb_to_linear(g as f32 / 255.0),
            b: srgb_to_linear(b as f32 / 255.0),
            a: a as f32 / 255.0,
        }
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (sRGB).
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorParseError(s.to_string()));
        }

        let byte = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| ColorParseError(s.to_string()))
        };

        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::from_srgb_u8(byte(0)?, byte(2)?, byte(4)?, a))
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Invalid hex color literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color '{}': expected #rrggbb or #rrggbbaa", self.0)
    }
}

impl std::error::Error for ColorParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_extremes_map_to_linear_extremes() {
        assert_eq!(Color::from_hex("#000000").unwrap(), Color::linear(0.0, 0.0, 0.0, 1.0));
        assert_eq!(Color::from_hex("#ffffffff").unwrap(), Color::linear(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn hex_mid_grey_is_darker_in_linear() {
        let c = Color::from_hex("#808080").unwrap();
        assert!((c.r - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert!(Color::from_hex("#xyzxyz").is_err());
        assert!(Color::from_hex("#1234").is_err());
        assert!("nope".parse::<Color>().is_err());
    }
}
