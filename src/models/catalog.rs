//! On-disk catalog format and paint set definitions.

use pigment_mix::Medium;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One catalog file: the paints of one brand in one medium.
///
/// ```yaml
/// brand: studio
/// full_name: Studio Artists' Oils
/// medium: oil
/// paints:
///   - {id: 1, name: Primary Red, hex: "#FF0000"}
/// sets:
///   Primaries: [1]
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CatalogFile {
    pub brand: String,

    #[serde(default)]
    pub full_name: Option<String>,

    pub medium: Medium,

    #[serde(default)]
    pub paints: Vec<CatalogPaint>,

    /// Store-bought sets by name, as paint ids of this brand
    #[serde(default)]
    pub sets: BTreeMap<String, Vec<u32>>,
}

/// A paint as written in a catalog file
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CatalogPaint {
    pub id: u32,
    pub name: String,
    pub hex: String,

    /// Measured reflectance, 36 samples from 380 to 730 nm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflectance: Option<Vec<f64>>,
}

/// Reference to a store-bought set of one brand
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct StoreBoughtPaintSet {
    pub brand: String,
    pub name: String,
}

/// A user's paint set selection, resolved against the catalog.
///
/// Paints are listed per brand; a brand without listed colors takes the
/// colors of the referenced store-bought set, if that set is of the brand.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaintSetDefinition {
    #[serde(alias = "type")]
    pub medium: Medium,

    /// Selected brands, in display order
    #[serde(default)]
    pub brands: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_bought_paint_set: Option<StoreBoughtPaintSet>,

    /// Paint ids per brand
    #[serde(default)]
    pub colors: BTreeMap<String, Vec<u32>>,
}

impl PaintSetDefinition {
    pub fn new(medium: Medium) -> Self {
        Self {
            medium,
            brands: Vec::new(),
            store_bought_paint_set: None,
            colors: BTreeMap::new(),
        }
    }

    /// Add colors of one brand, selecting the brand if needed.
    pub fn with_colors(mut self, brand: &str, ids: &[u32]) -> Self {
        if !self.brands.iter().any(|b| b == brand) {
            self.brands.push(brand.to_string());
        }
        self.colors
            .entry(brand.to_string())
            .or_default()
            .extend_from_slice(ids);
        self
    }

    /// Use a store-bought set, selecting its brand if needed.
    pub fn with_store_bought(mut self, brand: &str, name: &str) -> Self {
        if !self.brands.iter().any(|b| b == brand) {
            self.brands.push(brand.to_string());
        }
        self.store_bought_paint_set = Some(StoreBoughtPaintSet {
            brand: brand.to_string(),
            name: name.to_string(),
        });
        self
    }
}
