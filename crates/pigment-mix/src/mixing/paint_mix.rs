//! The canonical result of mixing a composition.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::color::{Lab, Reflectance, Srgb};
use crate::paint::{Fraction, Medium, Paint};

/// Bytes of the SHA-256 digest kept in a mix id.
const ID_BYTES: usize = 16;

/// Dilution of a mix.
///
/// `Thick` is paint with enough pigment load to show as an opaque swatch;
/// `Thin` is the diluted wash of a medium thinned with water. Thick sorts
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consistency {
    Thick,
    Thin,
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Consistency::Thick => f.write_str("thick"),
            Consistency::Thin => f.write_str("thin"),
        }
    }
}

/// One paint and its parts within a mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixPart {
    pub paint: Arc<Paint>,
    pub fraction: Fraction,
}

/// Where in a reference image a mix was picked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pipet {
    pub x: f64,
    pub y: f64,
    pub diameter: f64,
}

/// A mixed color and everything needed to reproduce it.
///
/// Parts are sorted by paint key, so the same composition always looks the
/// same and gets the same [`id`](Self::id) however it was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintMix {
    pub id: String,
    pub medium: Medium,
    pub parts: Vec<MixPart>,
    pub background: Srgb,
    pub is_glaze: bool,
    pub consistency: Consistency,
    pub color: Srgb,
    pub lab: Lab,
    pub reflectance: Reflectance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_file_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipet: Option<Pipet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_index: Option<i64>,
}

impl PaintMix {
    pub fn fractions(&self) -> Vec<u8> {
        self.parts.iter().map(|part| part.fraction.get()).collect()
    }

    pub fn paint_count(&self) -> usize {
        self.parts.len()
    }

    pub fn is_thick(&self) -> bool {
        self.consistency == Consistency::Thick
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_pipet(mut self, pipet: Pipet, image_file_id: Option<u64>) -> Self {
        self.pipet = Some(pipet);
        self.image_file_id = image_file_id;
        self
    }

    pub fn with_data_index(mut self, data_index: i64) -> Self {
        self.data_index = Some(data_index);
        self
    }
}

/// Deterministic id of a mix: hex of a truncated SHA-256 over the canonical
/// composition, background, glaze flag and consistency.
///
/// `parts` must already be in canonical order.
pub fn mix_id(
    medium: Medium,
    parts: &[MixPart],
    background: Srgb,
    is_glaze: bool,
    consistency: Consistency,
) -> String {
    let composition = parts
        .iter()
        .map(|part| format!("{}:{}={}", part.paint.brand, part.paint.id, part.fraction))
        .collect::<Vec<_>>()
        .join(";");
    let key = format!(
        "{medium}|{composition}|{}|{}|{consistency}",
        background.to_hex(),
        u8::from(is_glaze)
    );
    let digest = Sha256::digest(key.as_bytes());
    hex::encode(&digest[..ID_BYTES])
}

/// Thick before thin, then by id.
pub fn compare_by_consistency(a: &PaintMix, b: &PaintMix) -> Ordering {
    a.consistency
        .cmp(&b.consistency)
        .then_with(|| a.id.cmp(&b.id))
}

/// Most recently created first; mixes without a creation index last.
pub fn compare_by_data_index(a: &PaintMix, b: &PaintMix) -> Ordering {
    match (a.data_index, b.data_index) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    }
}

/// By name, case-insensitive; unnamed mixes last.
pub fn compare_by_name(a: &PaintMix, b: &PaintMix) -> Ordering {
    match (&a.name, &b.name) {
        (Some(x), Some(y)) => x
            .to_lowercase()
            .cmp(&y.to_lowercase())
            .then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(id: u32, fraction: u8) -> MixPart {
        MixPart {
            paint: Arc::new(Paint::new(
                "acme",
                id,
                "Test",
                Medium::Oil,
                Srgb::from_u8(0, 0, 0),
            )),
            fraction: Fraction::new(fraction).unwrap(),
        }
    }

    fn white() -> Srgb {
        Srgb::from_u8(255, 255, 255)
    }

    #[test]
    fn test_mix_id_is_stable_and_short() {
        let parts = [part(1, 1), part(2, 3)];
        let id = mix_id(Medium::Oil, &parts, white(), false, Consistency::Thick);
        assert_eq!(id.len(), ID_BYTES * 2);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(
            id,
            mix_id(Medium::Oil, &parts, white(), false, Consistency::Thick)
        );
    }

    #[test]
    fn test_mix_id_distinguishes_inputs() {
        let parts = [part(1, 1), part(2, 3)];
        let base = mix_id(Medium::Oil, &parts, white(), false, Consistency::Thick);

        let other_fraction = [part(1, 1), part(2, 2)];
        assert_ne!(
            base,
            mix_id(Medium::Oil, &other_fraction, white(), false, Consistency::Thick)
        );
        assert_ne!(
            base,
            mix_id(Medium::Oil, &parts, Srgb::from_u8(0, 0, 0), false, Consistency::Thick)
        );
        assert_ne!(
            base,
            mix_id(Medium::Oil, &parts, white(), true, Consistency::Thick)
        );
        assert_ne!(
            base,
            mix_id(Medium::Oil, &parts, white(), false, Consistency::Thin)
        );
        assert_ne!(
            base,
            mix_id(Medium::Acrylic, &parts, white(), false, Consistency::Thick)
        );
    }

    #[test]
    fn test_consistency_orders_thick_first() {
        assert!(Consistency::Thick < Consistency::Thin);
        assert_eq!(Consistency::Thin.to_string(), "thin");
        assert_eq!(
            serde_json::to_string(&Consistency::Thick).unwrap(),
            "\"thick\""
        );
    }
}
