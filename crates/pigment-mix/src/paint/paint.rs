//! Catalog paints and the media they belong to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::PaintError;
use crate::color::{LinearRgb, Reflectance, Srgb};

/// Paint medium (paint type).
///
/// The medium decides how paints of a set may be combined: how many go into
/// one mix, whether glazing applies, how fine the fractions are, and whether
/// a diluted (thin) variant exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Medium {
    Watercolor,
    Gouache,
    Acrylic,
    Oil,
    ColoredPencils,
    WatercolorPencils,
}

impl Medium {
    /// Every medium, in display order.
    pub const ALL: [Medium; 6] = [
        Medium::Watercolor,
        Medium::Gouache,
        Medium::Acrylic,
        Medium::Oil,
        Medium::ColoredPencils,
        Medium::WatercolorPencils,
    ];

    /// Largest number of distinct paints in one mix.
    pub fn max_paints_per_mix(self) -> usize {
        match self {
            Medium::Watercolor | Medium::Gouache | Medium::Acrylic | Medium::Oil => 3,
            Medium::ColoredPencils | Medium::WatercolorPencils => 1,
        }
    }

    /// Whether a mix can be laid as a transparent glaze over a dried base.
    pub fn supports_glaze(self) -> bool {
        !matches!(self, Medium::Gouache)
    }

    /// Largest fraction (relative parts) a single paint may take in a mix.
    pub fn fraction_granularity(self) -> u8 {
        match self {
            Medium::ColoredPencils | Medium::WatercolorPencils => 1,
            _ => super::fraction::MAX_FRACTION,
        }
    }

    /// Whether the medium is diluted with water, giving a thin variant.
    pub fn supports_dilution(self) -> bool {
        matches!(self, Medium::Watercolor | Medium::WatercolorPencils)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Medium::Watercolor => "watercolor",
            Medium::Gouache => "gouache",
            Medium::Acrylic => "acrylic",
            Medium::Oil => "oil",
            Medium::ColoredPencils => "colored_pencils",
            Medium::WatercolorPencils => "watercolor_pencils",
        }
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Medium {
    type Err = PaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Medium::ALL
            .into_iter()
            .find(|medium| medium.as_str() == normalized)
            .ok_or_else(|| PaintError::UnknownMedium(s.to_string()))
    }
}

/// Identity of a catalog paint: brand slug plus the brand's numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaintKey {
    pub brand: String,
    pub id: u32,
}

impl PaintKey {
    pub fn new(brand: impl Into<String>, id: u32) -> Self {
        Self {
            brand: brand.into(),
            id,
        }
    }
}

impl fmt::Display for PaintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.brand, self.id)
    }
}

/// An immutable catalog paint.
///
/// # Example
///
/// ```
/// use pigment_mix::{Medium, Paint, Srgb};
///
/// let paint = Paint::new("acme", 12, "Cadmium Red", Medium::Oil, Srgb::from_u8(227, 0, 34));
/// assert_eq!(paint.label(), "12 Cadmium Red");
/// assert!(paint.measured_reflectance().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    pub brand: String,
    pub id: u32,
    pub name: String,
    pub medium: Medium,
    pub rgb: Srgb,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_measured"
    )]
    reflectance: Option<Reflectance>,
}

/// Measured spectra are floored the same way on every path in.
fn deserialize_measured<'de, D>(deserializer: D) -> Result<Option<Reflectance>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let samples: Option<Vec<f64>> = Option::deserialize(deserializer)?;
    samples
        .map(|samples| Reflectance::from_samples(&samples))
        .transpose()
        .map_err(serde::de::Error::custom)
}

impl Paint {
    pub fn new(
        brand: impl Into<String>,
        id: u32,
        name: impl Into<String>,
        medium: Medium,
        rgb: Srgb,
    ) -> Self {
        Self {
            brand: brand.into(),
            id,
            name: name.into(),
            medium,
            rgb,
            reflectance: None,
        }
    }

    /// Attach a measured reflectance spectrum.
    ///
    /// # Errors
    ///
    /// See [`Reflectance::from_samples`].
    pub fn with_reflectance(mut self, samples: &[f64]) -> Result<Self, PaintError> {
        self.reflectance = Some(Reflectance::from_samples(samples)?);
        Ok(self)
    }

    pub fn key(&self) -> PaintKey {
        PaintKey::new(self.brand.clone(), self.id)
    }

    /// Display label, `"<id> <name>"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.id, self.name)
    }

    pub fn measured_reflectance(&self) -> Option<&Reflectance> {
        self.reflectance.as_ref()
    }

    /// Measured spectrum if there is one, otherwise one reconstructed from
    /// the swatch.
    pub fn reflectance(&self) -> Reflectance {
        self.reflectance
            .unwrap_or_else(|| Reflectance::from_linear_rgb(LinearRgb::from(self.rgb)))
    }
}
