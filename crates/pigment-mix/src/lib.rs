#![allow(clippy::module_inception, clippy::excessive_precision)]

//! pigment-mix: subtractive paint mixing and color matching
//!
//! This library models how real paints combine and finds the mixtures of a
//! paint set that come closest to a target color.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use pigment_mix::{Consistency, Medium, MixingEngine, Paint, Srgb, OFF_WHITE_HEX};
//!
//! let red = Arc::new(Paint::new("acme", 1, "Cadmium Red", Medium::Oil, Srgb::from_u8(255, 0, 0)));
//! let yellow = Arc::new(Paint::new("acme", 2, "Cadmium Yellow", Medium::Oil, Srgb::from_u8(255, 255, 0)));
//!
//! let engine = MixingEngine::new(Medium::Oil, OFF_WHITE_HEX.parse().unwrap());
//! let orange = engine.mix(&[red, yellow], &[1, 1], false, Consistency::Thick).unwrap();
//!
//! let [r, g, b] = orange.color.to_bytes();
//! assert!(r > g && g > b);
//! ```
//!
//! # Finding a Color
//!
//! ```
//! use pigment_mix::{Medium, Paint, PaintSet, PreparedPaintSet, SearchOptions, SimilaritySearch, Srgb};
//!
//! let set = PaintSet::new(Medium::Acrylic, vec![
//!     Paint::new("acme", 1, "Red", Medium::Acrylic, Srgb::from_u8(255, 0, 0)),
//!     Paint::new("acme", 2, "Yellow", Medium::Acrylic, Srgb::from_u8(255, 255, 0)),
//!     Paint::new("acme", 3, "White", Medium::Acrylic, Srgb::from_u8(255, 255, 255)),
//! ]).unwrap();
//! let prepared = PreparedPaintSet::new(set);
//! let search = SimilaritySearch::new(&prepared, Srgb::from_u8(247, 245, 239));
//!
//! let options = SearchOptions::new().limit_results(3).max_delta_e(50.0);
//! let matches = search.find(Srgb::from_u8(255, 160, 60), false, &options);
//! assert!(!matches.is_empty() && matches.len() <= 3);
//! ```
//!
//! # Color Science
//!
//! ## Four Representations
//!
//! | Representation | Used For |
//! |----------------|----------|
//! | **sRGB** | Swatches, backgrounds and results; hex strings on the wire |
//! | **Linear RGB** | Light arithmetic, residual correction |
//! | **CIELAB (D65)** | Perceptual distance (CIE76 delta E) for ranking |
//! | **Reflectance** | 36 samples, 380 to 730 nm; the quantity pigments actually mix in |
//!
//! Mixing light (adding RGB) makes red and green yellow; mixing pigment
//! does not. Pigments absorb, so mixing happens per wavelength on the
//! absorption/scattering ratio K/S of single-constant Kubelka–Munk theory:
//!
//! ```text
//! K/S = (1 - R)^2 / 2R            R = 1 + K/S - sqrt((K/S)^2 + 2 K/S)
//! ```
//!
//! Each paint's concentration is its parts times its tinting strength
//! (relative luminance, floored at 0.05), normalised over the mix.
//!
//! ## Spectra From Swatches
//!
//! Most catalog paints only have a swatch color. Their spectrum is
//! reconstructed from three smooth bands that sum to one at every
//! wavelength:
//!
//! ```text
//! blue  = 1 - logistic((λ - 495) / 12)
//! red   = logistic((λ - 590) / 10)
//! green = 1 - blue - red
//! R(λ)  = 0.03 + 0.97 * (r·red + g·green + b·blue)      (r, g, b linear)
//! ```
//!
//! Spectra are integrated back to linear RGB with the analytic CIE 1931
//! observer of Wyman, Sloan and Shirley, normalised so a perfect white
//! reflector gives exactly (1, 1, 1). The tables are generated by
//! `build.rs`.
//!
//! A reconstructed spectrum does not hit its swatch exactly, so each paint
//! carries its residual in linear RGB. The residual is mixed along with the
//! K/S values, which makes a single paint reproduce its swatch exactly and
//! keeps mixtures of near-identical paints near-identical.
//!
//! ## Layering
//!
//! See [`mixing::model`]. Body color hides the background; a glaze
//! multiplies the background's reflectance by the layer's; a thin wash
//! does the same at half optical density.
//!
//! # Canonical Mixes
//!
//! Fractions live in `1..=8` and are always reduced ([`Ratio`]), parts are
//! sorted by `(brand, id)`, and [`PaintMix::id`] hashes the canonical form.
//! The same mix therefore has the same id whether it was typed in by hand or
//! found by a search.

pub mod color;
pub mod mixing;
pub mod paint;
pub mod search;


pub use color::{
    perceptual_distance, Lab, LinearRgb, Reflectance, Srgb, Xyz, FIRST_WAVELENGTH_NM,
    OFF_WHITE_HEX, REFLECTANCE_FLOOR, SAMPLE_COUNT, WAVELENGTH_STEP_NM,
};
pub use mixing::{
    compare_by_consistency, compare_by_data_index, compare_by_name, to_mixable, Consistency,
    MixPart, MixableColor, MixingEngine, PaintMix, Pipet,
};
pub use paint::{
    CompositionError, Fraction, Medium, Paint, PaintError, PaintKey, PaintSet, PaintSetError,
    ParseColorError, Ratio, MAX_FRACTION, MAX_PAINTS_IN_SET,
};
pub use search::{
    compare_by_delta_e, compare_by_paint_count, PreparedPaintSet, SearchOptions, SearchStats,
    SimilarColor, SimilaritySearch,
};
