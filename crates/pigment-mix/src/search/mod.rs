//! Similarity search over a paint set.

mod combinations;
mod options;
mod similarity;

pub use combinations::{binomial, coprime_ratios, Combinations};
pub use options::SearchOptions;
pub use similarity::{
    compare_by_delta_e, compare_by_paint_count, PreparedPaintSet, SearchStats, SimilarColor,
    SimilaritySearch,
};
