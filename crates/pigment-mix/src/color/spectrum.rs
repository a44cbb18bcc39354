//! Reflectance spectra
//!
//! A [`Reflectance`] is sampled every 10 nm from 380 nm to 730 nm. It is the
//! representation subtractive mixing works on: pigments absorb per
//! wavelength, so mixing must happen per wavelength too.
//!
//! # Reconstruction from a swatch
//!
//! Most catalog paints only come with an sRGB swatch. A plausible spectrum is
//! rebuilt from three smooth bands (blue falling off around 495 nm, red rising
//! around 590 nm, green filling the rest) weighted by the swatch's linear RGB
//! channels. The bands overlap, so a blue paint keeps some reflectance in the
//! cyan-green region and a yellow paint loses its blue: blue + yellow mixes
//! toward green instead of grey. Reflectance never drops below
//! [`REFLECTANCE_FLOOR`], which keeps Kubelka–Munk absorption finite.
//!
//! The tables are generated by `build.rs` from an analytic fit of the CIE 1931
//! 2° observer, white-normalised so a flat 100 % spectrum is exactly linear
//! white.

use serde::{Deserialize, Serialize};

use super::linear_rgb::LinearRgb;
use crate::paint::PaintError;

mod tables {
    include!(concat!(env!("OUT_DIR"), "/spectral_tables.rs"));
}

pub use tables::SAMPLE_COUNT;
use tables::{RECONSTRUCTION_BANDS, RGB_WEIGHTS};

/// Wavelength of the first sample in nanometers.
pub const FIRST_WAVELENGTH_NM: u32 = 380;
/// Distance between samples in nanometers.
pub const WAVELENGTH_STEP_NM: u32 = 10;
/// Lowest reflectance a reconstructed or measured spectrum may take.
pub const REFLECTANCE_FLOOR: f64 = 0.03;

/// A wavelength-sampled reflectance spectrum, every value in `0.0..=1.0`.
///
/// Paint spectra are kept at or above [`REFLECTANCE_FLOOR`]. Mixed results
/// may fall below it: a glaze filters the background through the pigment
/// layer, multiplying two floored spectra. Deserialization keeps samples as
/// stored so a saved mix reloads unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<f64>", try_from = "Vec<f64>")]
pub struct Reflectance {
    samples: [f64; SAMPLE_COUNT],
}

impl Reflectance {
    /// A spectrum with the same reflectance at every wavelength.
    pub fn flat(value: f64) -> Self {
        Self {
            samples: [value.clamp(REFLECTANCE_FLOOR, 1.0); SAMPLE_COUNT],
        }
    }

    /// Wrap measured samples.
    ///
    /// # Errors
    ///
    /// [`PaintError::InvalidSpectrum`] when the sample count is wrong,
    /// [`PaintError::ReflectanceOutOfRange`] when a sample is outside
    /// 0.0..=1.0 or not finite. Values below [`REFLECTANCE_FLOOR`] are raised
    /// to it.
    pub fn from_samples(samples: &[f64]) -> Result<Self, PaintError> {
        let mut spectrum = Self::checked(samples)?;
        for slot in spectrum.samples.iter_mut() {
            *slot = slot.max(REFLECTANCE_FLOOR);
        }
        Ok(spectrum)
    }

    /// Count and range checks only; no floor.
    fn checked(samples: &[f64]) -> Result<Self, PaintError> {
        if samples.len() != SAMPLE_COUNT {
            return Err(PaintError::InvalidSpectrum {
                expected: SAMPLE_COUNT,
                actual: samples.len(),
            });
        }
        let mut out = [0.0; SAMPLE_COUNT];
        for (index, (&value, slot)) in samples.iter().zip(out.iter_mut()).enumerate() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PaintError::ReflectanceOutOfRange { index, value });
            }
            *slot = value;
        }
        Ok(Self { samples: out })
    }

    /// Reconstruct a plausible spectrum from a single linear RGB measurement.
    pub fn from_linear_rgb(rgb: LinearRgb) -> Self {
        let rgb = rgb.clamped();
        let span = 1.0 - REFLECTANCE_FLOOR;
        let mut samples = [0.0; SAMPLE_COUNT];
        for (i, slot) in samples.iter_mut().enumerate() {
            let band = rgb.r * RECONSTRUCTION_BANDS[0][i]
                + rgb.g * RECONSTRUCTION_BANDS[1][i]
                + rgb.b * RECONSTRUCTION_BANDS[2][i];
            *slot = (REFLECTANCE_FLOOR + span * band).clamp(REFLECTANCE_FLOOR, 1.0);
        }
        Self { samples }
    }

    #[inline]
    pub(crate) fn from_raw(samples: [f64; SAMPLE_COUNT]) -> Self {
        Self { samples }
    }

    /// The raw samples, shortest wavelength first.
    #[inline]
    pub fn samples(&self) -> &[f64; SAMPLE_COUNT] {
        &self.samples
    }

    /// Sample wavelengths in nanometers, matching [`samples`](Self::samples).
    pub fn wavelengths() -> impl Iterator<Item = u32> {
        (0..SAMPLE_COUNT as u32).map(|i| FIRST_WAVELENGTH_NM + i * WAVELENGTH_STEP_NM)
    }

    /// Integrate against the observer to get the linear RGB of this surface
    /// under the reference white.
    #[inline]
    pub fn to_linear_rgb(&self) -> LinearRgb {
        spectrum_to_linear(&self.samples)
    }

    /// Kubelka–Munk absorption/scattering ratio per wavelength.
    pub fn to_ks(&self) -> [f64; SAMPLE_COUNT] {
        let mut ks = [0.0; SAMPLE_COUNT];
        for (slot, &r) in ks.iter_mut().zip(self.samples.iter()) {
            *slot = ks_from_reflectance(r);
        }
        ks
    }
}

/// Kubelka–Munk: K/S = (1 - R)² / 2R.
#[inline]
pub(crate) fn ks_from_reflectance(r: f64) -> f64 {
    let absorbed = 1.0 - r;
    absorbed * absorbed / (2.0 * r)
}

/// Inverse Kubelka–Munk for an opaque layer: R = 1 + K/S - sqrt((K/S)² + 2 K/S).
#[inline]
pub(crate) fn reflectance_from_ks(ks: f64) -> f64 {
    1.0 + ks - (ks * ks + 2.0 * ks).sqrt()
}

#[inline]
pub(crate) fn spectrum_to_linear(samples: &[f64; SAMPLE_COUNT]) -> LinearRgb {
    let mut rgb = [0.0; 3];
    for (channel, weights) in RGB_WEIGHTS.iter().enumerate() {
        rgb[channel] = weights
            .iter()
            .zip(samples.iter())
            .map(|(w, r)| w * r)
            .sum();
    }
    LinearRgb::new(rgb[0], rgb[1], rgb[2])
}

impl From<Reflectance> for Vec<f64> {
    fn from(reflectance: Reflectance) -> Self {
        reflectance.samples.to_vec()
    }
}

impl TryFrom<Vec<f64>> for Reflectance {
    type Error = PaintError;

    fn try_from(samples: Vec<f64>) -> Result<Self, Self::Error> {
        Reflectance::checked(&samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Lab, Srgb};

    #[test]
    fn test_flat_white_is_linear_white() {
        let white = Reflectance::flat(1.0).to_linear_rgb();
        assert!((white.r - 1.0).abs() < 1e-9);
        assert!((white.g - 1.0).abs() < 1e-9);
        assert!((white.b - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bands_sum_to_one() {
        for i in 0..SAMPLE_COUNT {
            let sum: f64 = RECONSTRUCTION_BANDS.iter().map(|band| band[i]).sum();
            assert!((sum - 1.0).abs() < 1e-9, "bands sum to {sum} at sample {i}");
        }
    }

    #[test]
    fn test_reconstruction_stays_in_range() {
        for hex in ["#000000", "#FFFFFF", "#FF0000", "#00FF00", "#0000FF", "#7F3F1F"] {
            let srgb: Srgb = hex.parse().unwrap();
            let spectrum = Reflectance::from_linear_rgb(LinearRgb::from(srgb));
            for &r in spectrum.samples() {
                assert!((REFLECTANCE_FLOOR..=1.0).contains(&r), "{hex}: {r}");
            }
        }
    }

    /// The band model is an approximation; near-neutral swatches should still
    /// come back close before any residual correction is applied.
    #[test]
    fn test_reconstruction_close_for_neutrals() {
        for hex in ["#F7F5EF", "#FFFFFF", "#C0C0C0"] {
            let srgb: Srgb = hex.parse().unwrap();
            let rebuilt = Reflectance::from_linear_rgb(LinearRgb::from(srgb)).to_linear_rgb();
            let delta_e = Lab::from(srgb).delta_e(Lab::from(rebuilt));
            assert!(delta_e < 3.0, "{hex} rebuilt with delta E {delta_e}");
        }
    }

    #[test]
    fn test_blue_reflects_more_green_than_red() {
        let blue = Reflectance::from_linear_rgb(LinearRgb::new(0.0, 0.0, 1.0));
        let samples = blue.samples();
        // 520 nm vs 640 nm
        assert!(samples[14] > samples[26]);
    }

    #[test]
    fn test_from_samples_validation() {
        assert!(matches!(
            Reflectance::from_samples(&[0.5; 10]),
            Err(PaintError::InvalidSpectrum {
                expected: SAMPLE_COUNT,
                actual: 10
            })
        ));

        let mut samples = vec![0.5; SAMPLE_COUNT];
        samples[3] = 1.5;
        assert!(matches!(
            Reflectance::from_samples(&samples),
            Err(PaintError::ReflectanceOutOfRange { index: 3, .. })
        ));

        samples[3] = 0.0;
        let spectrum = Reflectance::from_samples(&samples).unwrap();
        assert_eq!(spectrum.samples()[3], REFLECTANCE_FLOOR);
    }

    #[test]
    fn test_kubelka_munk_inverse() {
        for r in [REFLECTANCE_FLOOR, 0.1, 0.5, 0.9, 1.0] {
            let back = reflectance_from_ks(ks_from_reflectance(r));
            assert!((back - r).abs() < 1e-9, "{r} -> {back}");
        }
    }

    #[test]
    fn test_wavelengths() {
        let wavelengths: Vec<u32> = Reflectance::wavelengths().collect();
        assert_eq!(wavelengths.len(), SAMPLE_COUNT);
        assert_eq!(wavelengths[0], 380);
        assert_eq!(wavelengths[SAMPLE_COUNT - 1], 730);
    }

    #[test]
    fn test_serde_as_sample_list() {
        let spectrum = Reflectance::flat(0.5);
        let json = serde_json::to_string(&spectrum).unwrap();
        let back: Reflectance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spectrum);
        assert!(serde_json::from_str::<Reflectance>("[0.5, 0.5]").is_err());
    }

    #[test]
    fn test_serde_keeps_samples_below_floor() {
        let mut samples = [0.5; SAMPLE_COUNT];
        samples[0] = 0.0012;
        let spectrum = Reflectance::from_raw(samples);
        let json = serde_json::to_string(&spectrum).unwrap();
        let back: Reflectance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spectrum);

        let mut out_of_range = vec![0.5; SAMPLE_COUNT];
        out_of_range[1] = -0.1;
        let json = serde_json::to_string(&out_of_range).unwrap();
        assert!(serde_json::from_str::<Reflectance>(&json).is_err());
    }
}
