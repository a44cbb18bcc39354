//! Linear RGB color type
//!
//! Linear RGB is proportional to light power. Spectral integration,
//! residual corrections and background modulation all happen here.

use std::ops::{Add, AddAssign, Mul, Sub};

use super::srgb::{decode_gamma, Srgb};

/// A color in linear RGB color space.
///
/// Values are typically in the range 0.0..=1.0, but intermediate results
/// (residual corrections) may leave that range until clamped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearRgb {
    /// Red channel (linear light intensity)
    pub r: f64,
    /// Green channel (linear light intensity)
    pub g: f64,
    /// Blue channel (linear light intensity)
    pub b: f64,
}

impl LinearRgb {
    /// Create a new LinearRgb color from linear RGB values.
    #[inline]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Relative luminance (Rec. 709 / sRGB primaries).
    #[inline]
    pub fn luminance(self) -> f64 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    /// Channel-wise product, used to modulate a correction by a substrate.
    #[inline]
    pub fn modulate(self, other: LinearRgb) -> Self {
        Self::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    /// Clamp every channel to 0.0..=1.0.
    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }
}

impl From<Srgb> for LinearRgb {
    /// Gamma-decode with the exact IEC 61966-2-1 transfer function.
    fn from(srgb: Srgb) -> Self {
        Self {
            r: decode_gamma(srgb.r),
            g: decode_gamma(srgb.g),
            b: decode_gamma(srgb.b),
        }
    }
}

impl Add for LinearRgb {
    type Output = LinearRgb;

    #[inline]
    fn add(self, rhs: LinearRgb) -> LinearRgb {
        LinearRgb::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for LinearRgb {
    #[inline]
    fn add_assign(&mut self, rhs: LinearRgb) {
        *self = *self + rhs;
    }
}

impl Sub for LinearRgb {
    type Output = LinearRgb;

    #[inline]
    fn sub(self, rhs: LinearRgb) -> LinearRgb {
        LinearRgb::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl Mul<f64> for LinearRgb {
    type Output = LinearRgb;

    #[inline]
    fn mul(self, rhs: f64) -> LinearRgb {
        LinearRgb::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}
