//! Bounded search for the mixes closest to a target color.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::color::{Lab, Srgb};
use crate::mixing::{Consistency, MixableColor, MixingEngine, PaintMix};
use crate::paint::{Medium, Paint, PaintSet, Ratio};

use super::combinations::{coprime_ratios, Combinations};
use super::options::SearchOptions;

/// A paint set with every paint already converted to its mixable form.
///
/// Building this is the per-set precomputation; keep it around for as long
/// as the set is active.
#[derive(Debug, Clone)]
pub struct PreparedPaintSet {
    paint_set: PaintSet,
    mixables: Vec<MixableColor>,
}

impl PreparedPaintSet {
    pub fn new(paint_set: PaintSet) -> Self {
        let mixables = paint_set
            .paints()
            .iter()
            .map(|paint| MixableColor::from_paint(paint))
            .collect();
        Self {
            paint_set,
            mixables,
        }
    }

    pub fn paint_set(&self) -> &PaintSet {
        &self.paint_set
    }

    pub fn medium(&self) -> Medium {
        self.paint_set.medium()
    }

    pub fn len(&self) -> usize {
        self.paint_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paint_set.is_empty()
    }

    fn paint(&self, index: usize) -> &Arc<Paint> {
        &self.paint_set.paints()[index]
    }
}

impl From<PaintSet> for PreparedPaintSet {
    fn from(paint_set: PaintSet) -> Self {
        Self::new(paint_set)
    }
}

/// A mix and its distance to the color that was searched for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarColor {
    pub paint_mix: PaintMix,
    pub delta_e: f64,
}

/// Counters from one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Paint subsets visited.
    pub subsets: u64,
    /// Compositions evaluated, thin variants included.
    pub candidates: u64,
    /// Matches returned.
    pub retained: usize,
    /// The search stopped before visiting every composition.
    pub stopped_early: bool,
}

#[derive(Debug)]
struct Candidate {
    delta_e: f64,
    indices: Vec<usize>,
    fractions: Vec<u8>,
    consistency: Consistency,
}

impl Candidate {
    /// What the mix id is derived from, within one search.
    fn key(&self) -> (Vec<usize>, Vec<u8>, Consistency) {
        (self.indices.clone(), self.fractions.clone(), self.consistency)
    }
}

/// Best `limit` distinct candidates seen so far, ascending by distance.
/// Equal distances keep discovery order.
#[derive(Debug)]
struct TopN {
    limit: usize,
    items: Vec<Candidate>,
    seen: HashSet<(Vec<usize>, Vec<u8>, Consistency)>,
}

impl TopN {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            items: Vec::with_capacity(limit + 1),
            seen: HashSet::new(),
        }
    }

    fn accepts(&self, delta_e: f64) -> bool {
        match self.items.last() {
            Some(worst) if self.items.len() >= self.limit => delta_e < worst.delta_e,
            _ => self.limit > 0,
        }
    }

    /// Insert unless an equal composition was inserted before. Returns
    /// whether the candidate was new.
    fn insert(&mut self, candidate: Candidate) -> bool {
        if !self.seen.insert(candidate.key()) {
            return false;
        }
        let at = self
            .items
            .partition_point(|item| item.delta_e <= candidate.delta_e);
        self.items.insert(at, candidate);
        self.items.truncate(self.limit);
        true
    }

    /// Full, and even the worst entry is within `delta_e_limit`.
    fn is_settled(&self, delta_e_limit: f64) -> bool {
        self.items.len() >= self.limit
            && self
                .items
                .last()
                .is_some_and(|worst| worst.delta_e <= delta_e_limit)
    }
}

/// Enumerates compositions from a prepared paint set and keeps the ones
/// closest to a target.
///
/// Subsets are visited by size (1 up to the medium's maximum), then in
/// lexicographic index order; each subset tries every reduced fraction
/// vector up to the medium's granularity, and for diluted media both the
/// thick and the thin variant. Only the finalists become full
/// [`PaintMix`] values.
///
/// # Example
///
/// ```
/// use pigment_mix::{Medium, Paint, PaintSet, PreparedPaintSet, SearchOptions, SimilaritySearch, Srgb};
///
/// let set = PaintSet::new(Medium::Oil, vec![
///     Paint::new("acme", 1, "Red", Medium::Oil, Srgb::from_u8(255, 0, 0)),
///     Paint::new("acme", 2, "Yellow", Medium::Oil, Srgb::from_u8(255, 255, 0)),
/// ]).unwrap();
/// let prepared = PreparedPaintSet::new(set);
/// let search = SimilaritySearch::new(&prepared, Srgb::from_u8(247, 245, 239));
///
/// let matches = search.find(Srgb::from_u8(255, 255, 0), false, &SearchOptions::default());
/// assert!(matches[0].delta_e < 1e-6);
/// ```
#[derive(Debug)]
pub struct SimilaritySearch<'a> {
    prepared: &'a PreparedPaintSet,
    engine: MixingEngine,
}

impl<'a> SimilaritySearch<'a> {
    pub fn new(prepared: &'a PreparedPaintSet, background: Srgb) -> Self {
        Self {
            prepared,
            engine: MixingEngine::new(prepared.medium(), background),
        }
    }

    pub fn engine(&self) -> &MixingEngine {
        &self.engine
    }

    /// Closest mixes to `target`, best first.
    pub fn find(&self, target: Srgb, is_glaze: bool, options: &SearchOptions) -> Vec<SimilarColor> {
        self.find_with_stats(target, is_glaze, options).0
    }

    /// Like [`find`](Self::find), also reporting how much work was done.
    pub fn find_with_stats(
        &self,
        target: Srgb,
        is_glaze: bool,
        options: &SearchOptions,
    ) -> (Vec<SimilarColor>, SearchStats) {
        let mut stats = SearchStats::default();
        if self.prepared.is_empty() || options.limit_results == 0 {
            return (Vec::new(), stats);
        }

        let target = Lab::from(target);
        let medium = self.prepared.medium();
        let max_paints = medium.max_paints_per_mix().min(self.prepared.len());
        let consistencies = self.engine.consistencies();
        let mut top = TopN::new(options.limit_results);
        let mut components: Vec<(&MixableColor, f64)> = Vec::with_capacity(max_paints);

        'search: for size in 1..=max_paints {
            let ratios = coprime_ratios(size, medium.fraction_granularity());
            for subset in Combinations::new(self.prepared.len(), size) {
                stats.subsets += 1;
                for ratio in &ratios {
                    components.clear();
                    components.extend(
                        subset
                            .iter()
                            .zip(ratio)
                            .map(|(&i, &parts)| (&self.prepared.mixables[i], parts as f64)),
                    );
                    for &consistency in consistencies {
                        stats.candidates += 1;
                        let lab = self.engine.evaluate(&components, is_glaze, consistency);
                        let delta_e = target.delta_e(lab);
                        if delta_e > options.max_delta_e || !top.accepts(delta_e) {
                            continue;
                        }
                        let inserted = top.insert(Candidate {
                            delta_e,
                            indices: subset.clone(),
                            fractions: ratio.clone(),
                            consistency,
                        });
                        if inserted
                            && options.tight_search && top.is_settled(options.delta_e_limit) {
                            stats.stopped_early = true;
                            break 'search;
                        }
                    }
                }
            }
        }

        let results: Vec<SimilarColor> = top
            .items
            .iter()
            .map(|candidate| SimilarColor {
                paint_mix: self.build(candidate, is_glaze),
                delta_e: candidate.delta_e,
            })
            .collect();
        stats.retained = results.len();
        (results, stats)
    }

    fn build(&self, candidate: &Candidate, is_glaze: bool) -> PaintMix {
        let ratio = Ratio::from_reduced(&candidate.fractions);
        let entries = candidate
            .indices
            .iter()
            .zip(ratio.fractions())
            .map(|(&i, &fraction)| (self.prepared.paint(i), fraction, &self.prepared.mixables[i]))
            .collect();
        self.engine.build(entries, is_glaze, candidate.consistency)
    }
}

/// Closest first; ties broken by id.
pub fn compare_by_delta_e(a: &SimilarColor, b: &SimilarColor) -> Ordering {
    a.delta_e
        .total_cmp(&b.delta_e)
        .then_with(|| a.paint_mix.id.cmp(&b.paint_mix.id))
}

/// Fewer paints first, then closest.
pub fn compare_by_paint_count(a: &SimilarColor, b: &SimilarColor) -> Ordering {
    a.paint_mix
        .paint_count()
        .cmp(&b.paint_mix.paint_count())
        .then_with(|| compare_by_delta_e(a, b))
}
