//! sRGB color type
//!
//! sRGB is the encoding paint swatches, backgrounds and results are exchanged
//! in. Hex strings (`#RRGGBB`) are the wire form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::linear_rgb::LinearRgb;
use crate::paint::ParseColorError;

/// IEC 61966-2-1 encoding: linear light to gamma-encoded value.
#[inline]
pub(crate) fn encode_gamma(linear: f64) -> f64 {
    let linear = linear.clamp(0.0, 1.0);
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// IEC 61966-2-1 decoding: gamma-encoded value to linear light.
#[inline]
pub(crate) fn decode_gamma(encoded: f64) -> f64 {
    if encoded <= 0.04045 {
        encoded / 12.92
    } else {
        ((encoded + 0.055) / 1.055).powf(2.4)
    }
}

/// A color in sRGB color space.
///
/// Values are in the range 0.0..=1.0 (mapping to 0..255 for 8-bit).
/// Serializes as an uppercase `#RRGGBB` hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    /// Red channel (gamma-corrected, 0.0..=1.0)
    pub r: f64,
    /// Green channel (gamma-corrected, 0.0..=1.0)
    pub g: f64,
    /// Blue channel (gamma-corrected, 0.0..=1.0)
    pub b: f64,
}

impl Srgb {
    /// Create a new Srgb color from float values.
    #[inline]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Create an Srgb color from 8-bit unsigned integer values.
    ///
    /// # Example
    /// ```
    /// use pigment_mix::Srgb;
    /// let red = Srgb::from_u8(255, 0, 0);
    /// assert_eq!(red.r, 1.0);
    /// ```
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Create an Srgb color from a byte array [R, G, B].
    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::from_u8(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array [R, G, B].
    ///
    /// Rounds and clamps values to the 0..=255 range.
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [
            (self.r * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.g * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.b * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }

    /// Format as an uppercase `#RRGGBB` hex string.
    ///
    /// # Example
    /// ```
    /// use pigment_mix::Srgb;
    /// assert_eq!(Srgb::from_u8(255, 128, 0).to_hex(), "#FF8000");
    /// ```
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_bytes();
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}

impl From<LinearRgb> for Srgb {
    /// Gamma-encode a linear color. Out-of-range channels are clamped.
    fn from(linear: LinearRgb) -> Self {
        Self {
            r: encode_gamma(linear.r),
            g: encode_gamma(linear.g),
            b: encode_gamma(linear.b),
        }
    }
}

impl FromStr for Srgb {
    type Err = ParseColorError;

    /// Parse an sRGB color from a hex string.
    ///
    /// Supports `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`. Parsing is
    /// case-insensitive and surrounding whitespace is trimmed.
    ///
    /// # Examples
    ///
    /// ```
    /// use pigment_mix::Srgb;
    ///
    /// let white: Srgb = "#FFFFFF".parse().unwrap();
    /// assert_eq!(white.r, 1.0);
    ///
    /// let red: Srgb = "#F00".parse().unwrap();
    /// assert_eq!(red.r, 1.0);
    /// assert_eq!(red.g, 0.0);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }
        if let Some(c) = s.chars().find(|c| *c == '+' || *c == '-') {
            return Err(ParseColorError::InvalidDigit(c));
        }

        match s.len() {
            3 => {
                // Shorthand: expand each digit by multiplying by 17 (0xF -> 0xFF)
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::from_u8(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::from_u8(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

impl fmt::Display for Srgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        hex.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// u8 -> Srgb -> LinearRgb -> Srgb -> u8 must be lossless for every value.
    #[test]
    fn test_srgb_round_trip_exact() {
        for i in 0..=255u8 {
            let original = Srgb::from_u8(i, i, i);
            let back = Srgb::from(LinearRgb::from(original));
            assert_eq!(back.to_bytes(), [i, i, i], "round trip changed value {i}");
        }
    }

    #[test]
    fn test_srgb_constructors() {
        let color = Srgb::from_u8(255, 128, 0);
        assert_eq!(color.r, 1.0);
        assert!((color.g - 128.0 / 255.0).abs() < 1e-12);
        assert_eq!(color.b, 0.0);

        assert_eq!(Srgb::from_bytes([255, 128, 0]), color);
        assert_eq!(Srgb::from_u8(0, 0, 0).to_bytes(), [0, 0, 0]);
        assert_eq!(Srgb::from_u8(255, 255, 255).to_bytes(), [255, 255, 255]);
    }

    #[test]
    fn test_known_gamma_values() {
        // sRGB 0.5 -> linear 0.214041...
        let linear = LinearRgb::from(Srgb::new(0.5, 0.5, 0.5));
        assert!((linear.r - 0.214041).abs() < 1e-6);

        // linear 0.5 -> sRGB 0.735356...
        let srgb = Srgb::from(LinearRgb::new(0.5, 0.5, 0.5));
        assert!((srgb.r - 0.735356).abs() < 1e-6);
    }

    #[test]
    fn test_parse_hex_6_digit() {
        let color: Srgb = "#FF8000".parse().unwrap();
        assert_eq!(color.to_bytes(), [255, 128, 0]);

        let color: Srgb = "ff8000".parse().unwrap();
        assert_eq!(color.to_bytes(), [255, 128, 0]);

        let color: Srgb = "  #f7f5ef  ".parse().unwrap();
        assert_eq!(color.to_hex(), "#F7F5EF");
    }

    #[test]
    fn test_parse_hex_3_digit() {
        let color: Srgb = "#F80".parse().unwrap();
        assert_eq!(color.to_bytes(), [255, 136, 0]);
    }

    #[test]
    fn test_parse_hex_errors() {
        assert_eq!(
            "#FFFF".parse::<Srgb>().unwrap_err(),
            ParseColorError::InvalidLength
        );
        assert_eq!("".parse::<Srgb>().unwrap_err(), ParseColorError::InvalidLength);
        assert!(matches!(
            "#GGGGGG".parse::<Srgb>(),
            Err(ParseColorError::InvalidHex(_))
        ));
        assert!("#ÿÿÿ".parse::<Srgb>().is_err());
        assert_eq!(
            "#+F0000".parse::<Srgb>().unwrap_err(),
            ParseColorError::InvalidDigit('+')
        );
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(Srgb::from_u8(1, 2, 3).to_string(), "#010203");
    }

    #[test]
    fn test_serde_as_hex_string() {
        let color = Srgb::from_u8(0x12, 0xAB, 0xFF);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#12ABFF\"");

        let back: Srgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);

        assert!(serde_json::from_str::<Srgb>("\"nope\"").is_err());
    }
}
