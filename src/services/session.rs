//! Color mixer session state.
//!
//! A session owns the active paint set (with its per-set precomputation) and
//! the background. It is synchronous and single-threaded; the worker in
//! [`color_mixer`](super::color_mixer) gives it an async boundary.

use crate::error::ServiceError;
use pigment_mix::{
    Consistency, Medium, MixingEngine, Paint, PaintMix, PaintSet, PreparedPaintSet, SearchOptions,
    SimilarColor, SimilaritySearch, Srgb,
};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemoKey {
    revision: u64,
    background: [u8; 3],
    target: [u8; 3],
    is_glaze: bool,
    limit_results: usize,
    delta_e_limit: u64,
    tight_search: bool,
    max_delta_e: u64,
}

impl MemoKey {
    fn new(revision: u64, background: Srgb, target: Srgb, is_glaze: bool, options: &SearchOptions) -> Self {
        Self {
            revision,
            background: background.to_bytes(),
            target: target.to_bytes(),
            is_glaze,
            limit_results: options.limit_results,
            delta_e_limit: options.delta_e_limit.to_bits(),
            tight_search: options.tight_search,
            max_delta_e: options.max_delta_e.to_bits(),
        }
    }
}

/// Active paint set, background and memoized search results
pub struct ColorMixerSession {
    prepared: PreparedPaintSet,
    background: Srgb,
    revision: u64,
    memo: HashMap<MemoKey, Vec<SimilarColor>>,
    memo_capacity: usize,
}

impl ColorMixerSession {
    /// A session with an empty paint set
    pub fn new(background: Srgb, memo_capacity: usize) -> Self {
        Self {
            prepared: PreparedPaintSet::new(PaintSet::empty(Medium::Oil)),
            background,
            revision: 0,
            memo: HashMap::new(),
            memo_capacity,
        }
    }

    pub fn paint_set(&self) -> &PaintSet {
        self.prepared.paint_set()
    }

    pub fn background(&self) -> Srgb {
        self.background
    }

    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Replace the active set and rebuild its precomputation
    pub fn set_paint_set(&mut self, paint_set: PaintSet) {
        tracing::debug!(
            medium = %paint_set.medium(),
            paints = paint_set.len(),
            "Setting paint set"
        );
        self.prepared = PreparedPaintSet::new(paint_set);
        self.revision += 1;
        self.memo.clear();
    }

    /// Parse and store the background
    pub fn set_background(&mut self, color_hex: &str) -> Result<(), ServiceError> {
        let background = parse_color(color_hex)?;
        if background != self.background {
            self.background = background;
            self.memo.clear();
        }
        Ok(())
    }

    /// Closest mixes of the active set to a target color
    pub fn find_similar_colors(
        &mut self,
        target_hex: &str,
        is_glaze: bool,
        options: &SearchOptions,
    ) -> Result<Vec<SimilarColor>, ServiceError> {
        let target = parse_color(target_hex)?;
        if self.prepared.is_empty() {
            return Ok(Vec::new());
        }

        let key = MemoKey::new(self.revision, self.background, target, is_glaze, options);
        if let Some(results) = self.memo.get(&key) {
            tracing::debug!(target = %target, "Search served from memo");
            return Ok(results.clone());
        }

        let search = SimilaritySearch::new(&self.prepared, self.background);
        let (results, stats) = search.find_with_stats(target, is_glaze, options);
        tracing::debug!(
            target = %target,
            is_glaze,
            subsets = stats.subsets,
            candidates = stats.candidates,
            retained = stats.retained,
            stopped_early = stats.stopped_early,
            "Similarity search finished"
        );

        if self.memo.len() >= self.memo_capacity {
            self.memo.clear();
        }
        if self.memo_capacity > 0 {
            self.memo.insert(key, results.clone());
        }
        Ok(results)
    }

    /// Mix a composition: the thick mix, plus its thin variant where the
    /// medium is diluted, thick first.
    pub fn mix_paints(
        &self,
        paints: &[Arc<Paint>],
        fractions: &[u8],
        background_hex: &str,
    ) -> Result<Vec<PaintMix>, ServiceError> {
        Ok(engine_for(paints, background_hex)?.mix_paints(paints, fractions)?)
    }

    /// Mix one composition as requested: body or glaze, thick or thin.
    pub fn mix(
        &self,
        paints: &[Arc<Paint>],
        fractions: &[u8],
        is_glaze: bool,
        consistency: Consistency,
        background_hex: &str,
    ) -> Result<PaintMix, ServiceError> {
        Ok(engine_for(paints, background_hex)?.mix(paints, fractions, is_glaze, consistency)?)
    }
}

/// Engine for the medium of the first paint
fn engine_for(paints: &[Arc<Paint>], background_hex: &str) -> Result<MixingEngine, ServiceError> {
    let background = parse_color(background_hex)?;
    let medium = paints
        .first()
        .map(|paint| paint.medium)
        .ok_or(pigment_mix::CompositionError::Empty)?;
    Ok(MixingEngine::new(medium, background))
}

fn parse_color(hex: &str) -> Result<Srgb, ServiceError> {
    hex.parse()
        .map_err(|e| ServiceError::invalid_color(hex, e))
}
