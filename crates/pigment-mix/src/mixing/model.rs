//! Subtractive mixing model
//!
//! Paints are mixed with single-constant Kubelka–Munk theory: each paint's
//! reflectance is turned into an absorption/scattering ratio K/S per
//! wavelength, the ratios are averaged by concentration, and the average is
//! turned back into reflectance. Concentrations are the fractions weighted by
//! each paint's tinting strength (its luminance, floored), so a part of white
//! lightens as much as a part of a dark pigment darkens.
//!
//! How the pigment layer meets the background is decided by [`Layering`]:
//!
//! | Layering | Reflectance | Background |
//! |----------|-------------|------------|
//! | `Body`   | `R_mix` | hidden by the opaque layer |
//! | `Glaze`  | `R_bg · R_mix` | filtered once by the transparent layer |
//! | `Wash`   | `R_bg · R_mix^0.5` | diluted layer, half the optical density |
//!
//! Spectral reconstruction cannot hit every swatch exactly, so each paint
//! carries its residual (swatch minus reconstructed color, in linear RGB).
//! Residuals are mixed with the same concentrations and added back, which
//! makes a single paint reproduce its own swatch exactly.

use crate::color::{
    reflectance_from_ks, spectrum_to_linear, Lab, LinearRgb, Reflectance, Srgb, SAMPLE_COUNT,
};
use crate::paint::Paint;

use super::paint_mix::Consistency;

/// Floor for tinting strength so black still has an effect in a mix.
const MIN_TINTING_STRENGTH: f64 = 0.05;

/// Optical density of a diluted (thin) layer relative to a full-strength one.
pub const WASH_DENSITY: f64 = 0.5;

/// A paint prepared for mixing.
#[derive(Debug, Clone, PartialEq)]
pub struct MixableColor {
    ks: [f64; SAMPLE_COUNT],
    residual: LinearRgb,
    tinting_strength: f64,
}

impl MixableColor {
    /// Prepare a paint: measured spectrum if known, reconstructed otherwise.
    pub fn from_paint(paint: &Paint) -> Self {
        Self::from_reflectance(&paint.reflectance(), paint.rgb)
    }

    /// Prepare a spectrum that should display as `swatch` on its own.
    pub fn from_reflectance(reflectance: &Reflectance, swatch: Srgb) -> Self {
        let target = LinearRgb::from(swatch);
        Self {
            ks: reflectance.to_ks(),
            residual: target - reflectance.to_linear_rgb(),
            tinting_strength: target.luminance().max(MIN_TINTING_STRENGTH),
        }
    }

    pub fn tinting_strength(&self) -> f64 {
        self.tinting_strength
    }
}

/// Convert a catalog paint into its mixable form.
#[inline]
pub fn to_mixable(paint: &Paint) -> MixableColor {
    MixableColor::from_paint(paint)
}

/// The background a mix is laid on, precomputed once per session.
#[derive(Debug, Clone, PartialEq)]
pub struct Substrate {
    color: Srgb,
    reflectance: Reflectance,
    linear: LinearRgb,
}

impl Substrate {
    pub fn new(color: Srgb) -> Self {
        let linear = LinearRgb::from(color);
        Self {
            color,
            reflectance: Reflectance::from_linear_rgb(linear),
            linear,
        }
    }

    pub fn color(&self) -> Srgb {
        self.color
    }
}

/// How the mixed pigment layer is composited with the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layering {
    /// Opaque body color.
    Body,
    /// Transparent layer over a dried base.
    Glaze,
    /// Diluted layer over the paper.
    Wash,
}

impl Layering {
    pub fn new(is_glaze: bool, consistency: Consistency) -> Self {
        match (consistency, is_glaze) {
            (Consistency::Thin, _) => Layering::Wash,
            (Consistency::Thick, true) => Layering::Glaze,
            (Consistency::Thick, false) => Layering::Body,
        }
    }
}

/// Result of the mixing math.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedColor {
    pub reflectance: Reflectance,
    pub linear: LinearRgb,
}

impl MixedColor {
    pub fn srgb(&self) -> Srgb {
        Srgb::from(self.linear)
    }

    pub fn lab(&self) -> Lab {
        Lab::from(self.linear)
    }
}

/// Mix paints given as `(color, parts)` pairs.
///
/// Parts need not be normalised; they are scaled to concentrations here.
/// Callers guarantee at least one component with positive parts.
pub fn mix(components: &[(&MixableColor, f64)], substrate: &Substrate, layering: Layering) -> MixedColor {
    debug_assert!(!components.is_empty(), "mix of nothing");

    let total: f64 = components
        .iter()
        .map(|(color, parts)| parts * color.tinting_strength)
        .sum();

    let mut ks = [0.0; SAMPLE_COUNT];
    let mut residual = LinearRgb::default();
    for (color, parts) in components {
        let concentration = parts * color.tinting_strength / total;
        for (acc, value) in ks.iter_mut().zip(color.ks.iter()) {
            *acc += concentration * value;
        }
        residual += color.residual * concentration;
    }

    let mut reflectance = [0.0; SAMPLE_COUNT];
    for (r, &value) in reflectance.iter_mut().zip(ks.iter()) {
        *r = reflectance_from_ks(value);
    }

    let background = substrate.reflectance.samples();
    let residual = match layering {
        Layering::Body => residual,
        Layering::Glaze => {
            for (r, bg) in reflectance.iter_mut().zip(background.iter()) {
                *r *= bg;
            }
            residual.modulate(substrate.linear)
        }
        Layering::Wash => {
            for (r, bg) in reflectance.iter_mut().zip(background.iter()) {
                *r = bg * r.powf(WASH_DENSITY);
            }
            residual.modulate(substrate.linear) * WASH_DENSITY
        }
    };

    let linear = (spectrum_to_linear(&reflectance) + residual).clamped();
    MixedColor {
        reflectance: Reflectance::from_raw(reflectance),
        linear,
    }
}
