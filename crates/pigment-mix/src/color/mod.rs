//! Color types and conversion utilities
//!
//! - **sRGB** ([`Srgb`]): swatches, backgrounds and results; hex on the wire.
//! - **Linear RGB** ([`LinearRgb`]): light arithmetic and spectral integration.
//! - **CIELAB** ([`Lab`]): perceptual distance used to rank matches.
//! - **Reflectance** ([`Reflectance`]): per-wavelength surface response used
//!   for subtractive mixing.
//!
//! # Example
//!
//! ```
//! use pigment_mix::{Lab, LinearRgb, Srgb};
//!
//! let swatch: Srgb = "#E34234".parse().unwrap();
//! let linear = LinearRgb::from(swatch);
//! let lab = Lab::from(linear);
//! assert!(lab.a > 0.0);
//! assert_eq!(Srgb::from(linear).to_hex(), "#E34234");
//! ```

mod lab;
mod linear_rgb;
mod spectrum;
mod srgb;

pub use lab::{Lab, Xyz};
pub use linear_rgb::LinearRgb;
pub(crate) use spectrum::{reflectance_from_ks, spectrum_to_linear};
pub use spectrum::{
    Reflectance, FIRST_WAVELENGTH_NM, REFLECTANCE_FLOOR, SAMPLE_COUNT, WAVELENGTH_STEP_NM,
};
pub use srgb::Srgb;

/// The recommended paper/canvas color when nothing else is known.
pub const OFF_WHITE_HEX: &str = "#F7F5EF";

/// Perceptual distance between two colors (CIE76 delta E).
///
/// # Example
///
/// ```
/// use pigment_mix::{perceptual_distance, Srgb};
///
/// let a = Srgb::from_u8(200, 30, 30);
/// let b = Srgb::from_u8(30, 30, 200);
/// assert_eq!(perceptual_distance(a, a), 0.0);
/// assert_eq!(perceptual_distance(a, b), perceptual_distance(b, a));
/// ```
#[inline]
pub fn perceptual_distance(a: Srgb, b: Srgb) -> f64 {
    Lab::from(a).delta_e(Lab::from(b))
}
