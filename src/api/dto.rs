//! Request parameters and result shapes of the RPC methods.

use pigment_mix::{
    compare_by_data_index, compare_by_delta_e, compare_by_name, compare_by_paint_count,
    Consistency, Medium, PaintKey, PaintMix, Pipet, SearchOptions, SimilarColor,
};
use serde::{Deserialize, Serialize};

/// Order of `listMixes` results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MixSort {
    /// Most recently saved first
    #[default]
    DataIndex,
    Name,
}

impl MixSort {
    pub fn sort(self, mixes: &mut [PaintMix]) {
        match self {
            MixSort::DataIndex => mixes.sort_by(compare_by_data_index),
            MixSort::Name => mixes.sort_by(compare_by_name),
        }
    }
}

/// Order of `findSimilarColors` results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SimilarColorSort {
    /// Closest first
    #[default]
    Similarity,
    /// Fewest paints first, then closest
    PaintCount,
}

impl SimilarColorSort {
    pub fn sort(self, results: &mut [SimilarColor]) {
        match self {
            SimilarColorSort::Similarity => results.sort_by(compare_by_delta_e),
            SimilarColorSort::PaintCount => results.sort_by(compare_by_paint_count),
        }
    }
}

/// Parameters of `setBackground`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBackgroundParams {
    #[serde(alias = "colorHex")]
    pub color: String,
}

/// Parameters of `findSimilarColors`. Options left out take the configured defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindSimilarColorsParams {
    #[serde(alias = "targetColorHex")]
    pub target_color: String,
    #[serde(default)]
    pub is_glaze: bool,
    #[serde(default)]
    pub limit_results: Option<usize>,
    #[serde(default)]
    pub delta_e_limit: Option<f64>,
    #[serde(default)]
    pub tight_search: Option<bool>,
    #[serde(default)]
    pub max_delta_e: Option<f64>,
    #[serde(default)]
    pub sort: SimilarColorSort,
}

impl FindSimilarColorsParams {
    pub fn options(&self, defaults: &SearchOptions) -> SearchOptions {
        SearchOptions::new()
            .limit_results(self.limit_results.unwrap_or(defaults.limit_results))
            .delta_e_limit(self.delta_e_limit.unwrap_or(defaults.delta_e_limit))
            .tight_search(self.tight_search.unwrap_or(defaults.tight_search))
            .max_delta_e(self.max_delta_e.unwrap_or(defaults.max_delta_e))
    }
}

/// Parameters of `mixPaints`.
///
/// Paints come from the active paint set, or from the catalog when a
/// medium is given. Without a background the session default is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixPaintsParams {
    pub paints: Vec<PaintKey>,
    pub fractions: Vec<u8>,
    #[serde(default, alias = "backgroundColorHex")]
    pub background: Option<String>,
    #[serde(default)]
    pub medium: Option<Medium>,
}

/// Parameters of `saveMix`: a composition plus what the user attached to it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMixParams {
    #[serde(flatten)]
    pub composition: MixPaintsParams,
    #[serde(default)]
    pub is_glaze: bool,
    #[serde(default)]
    pub consistency: Option<Consistency>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pipet: Option<Pipet>,
    #[serde(default)]
    pub image_file_id: Option<u64>,
}

/// Parameters of `listMixes`. Defaults to the active medium, newest first.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMixesParams {
    #[serde(default)]
    pub medium: Option<Medium>,
    #[serde(default)]
    pub sort: MixSort,
}

/// Parameters of `deleteAllMixes`. Defaults to the active medium.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediumParams {
    #[serde(default)]
    pub medium: Option<Medium>,
}

/// Parameters of `deleteMix`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMixParams {
    #[serde(alias = "id")]
    pub paint_mix_id: String,
}

/// One paint of a composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionEntry {
    pub brand: String,
    pub id: u32,
    pub name: String,
    pub fraction: u8,
}

/// One result of `findSimilarColors`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarColorDto {
    pub paint_mix_id: String,
    pub resulting_color_hex: String,
    pub composition: Vec<CompositionEntry>,
    pub delta_e: f64,
    pub consistency: Consistency,
    pub is_glaze: bool,
}

pub fn composition(mix: &PaintMix) -> Vec<CompositionEntry> {
    mix.parts
        .iter()
        .map(|part| CompositionEntry {
            brand: part.paint.brand.clone(),
            id: part.paint.id,
            name: part.paint.name.clone(),
            fraction: part.fraction.get(),
        })
        .collect()
}

impl From<&SimilarColor> for SimilarColorDto {
    fn from(similar: &SimilarColor) -> Self {
        let mix = &similar.paint_mix;
        Self {
            paint_mix_id: mix.id.clone(),
            resulting_color_hex: mix.color.to_hex(),
            composition: composition(mix),
            delta_e: similar.delta_e,
            consistency: mix.consistency,
            is_glaze: mix.is_glaze,
        }
    }
}

/// Result of `deleteAllMixes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCount {
    pub deleted: usize,
}
