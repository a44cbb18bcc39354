//! CIE XYZ and CIELAB
//!
//! CIELAB (D65 white point) is the perceptual space every match is ranked in.
//! Distances are CIE76 delta E, so the familiar thresholds apply: below 2 is
//! hard to tell apart, above 10 is a different color.

use serde::{Deserialize, Serialize};

use super::linear_rgb::LinearRgb;
use super::srgb::Srgb;

/// D65 reference white, Y normalised to 1.
const WHITE_X: f64 = 0.95047;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 1.08883;

/// (6/29)^3
const EPSILON: f64 = 216.0 / 24389.0;
/// (29/3)^3
const KAPPA: f64 = 24389.0 / 27.0;

/// A color in CIE 1931 XYZ (D65), Y normalised to 1 for white.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<LinearRgb> for Xyz {
    fn from(rgb: LinearRgb) -> Self {
        Self {
            x: 0.4124564 * rgb.r + 0.3575761 * rgb.g + 0.1804375 * rgb.b,
            y: 0.2126729 * rgb.r + 0.7151522 * rgb.g + 0.0721750 * rgb.b,
            z: 0.0193339 * rgb.r + 0.1191920 * rgb.g + 0.9503041 * rgb.b,
        }
    }
}

/// A color in CIELAB.
///
/// - `l`: lightness, 0 (black) to 100 (white)
/// - `a`: green (negative) to red (positive)
/// - `b`: blue (negative) to yellow (positive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    #[inline]
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// CIE76 color difference: Euclidean distance in CIELAB.
    ///
    /// Symmetric, never negative, and zero only for identical colors.
    ///
    /// # Example
    ///
    /// ```
    /// use pigment_mix::Lab;
    ///
    /// let a = Lab::new(50.0, 10.0, -10.0);
    /// let b = Lab::new(53.0, 14.0, -10.0);
    /// assert_eq!(a.delta_e(b), 5.0);
    /// assert_eq!(a.delta_e(a), 0.0);
    /// ```
    #[inline]
    pub fn delta_e(self, other: Lab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }

    /// Chroma, the distance from the neutral axis.
    #[inline]
    pub fn chroma(self) -> f64 {
        self.a.hypot(self.b)
    }
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

impl From<Xyz> for Lab {
    fn from(xyz: Xyz) -> Self {
        let fx = lab_f(xyz.x / WHITE_X);
        let fy = lab_f(xyz.y / WHITE_Y);
        let fz = lab_f(xyz.z / WHITE_Z);
        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

impl From<LinearRgb> for Lab {
    #[inline]
    fn from(rgb: LinearRgb) -> Self {
        Lab::from(Xyz::from(rgb))
    }
}

impl From<Srgb> for Lab {
    #[inline]
    fn from(srgb: Srgb) -> Self {
        Lab::from(LinearRgb::from(srgb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_and_black() {
        let white = Lab::from(Srgb::from_u8(255, 255, 255));
        assert!((white.l - 100.0).abs() < 0.01);
        assert!(white.a.abs() < 0.01);
        assert!(white.b.abs() < 0.01);

        let black = Lab::from(Srgb::from_u8(0, 0, 0));
        assert!(black.l.abs() < 1e-9);
    }

    #[test]
    fn test_known_reference_values() {
        // sRGB red in CIELAB D65: (53.24, 80.09, 67.20)
        let red = Lab::from(Srgb::from_u8(255, 0, 0));
        assert!((red.l - 53.24).abs() < 0.05, "L = {}", red.l);
        assert!((red.a - 80.09).abs() < 0.1, "a = {}", red.a);
        assert!((red.b - 67.20).abs() < 0.1, "b = {}", red.b);

        // sRGB blue: (32.30, 79.19, -107.86)
        let blue = Lab::from(Srgb::from_u8(0, 0, 255));
        assert!((blue.l - 32.30).abs() < 0.05, "L = {}", blue.l);
        assert!((blue.b + 107.86).abs() < 0.1, "b = {}", blue.b);
    }

    #[test]
    fn test_delta_e_symmetric_and_zero_on_self() {
        let colors = [
            Srgb::from_u8(255, 0, 0),
            Srgb::from_u8(12, 200, 99),
            Srgb::from_u8(247, 245, 239),
            Srgb::from_u8(0, 0, 0),
        ];
        for &a in &colors {
            let la = Lab::from(a);
            assert_eq!(la.delta_e(la), 0.0);
            for &b in &colors {
                let lb = Lab::from(b);
                assert_eq!(la.delta_e(lb), lb.delta_e(la));
                assert!(la.delta_e(lb) >= 0.0);
            }
        }
    }

    #[test]
    fn test_gray_has_no_chroma() {
        let gray = Lab::from(Srgb::from_u8(128, 128, 128));
        assert!(gray.chroma() < 0.01);
    }
}
