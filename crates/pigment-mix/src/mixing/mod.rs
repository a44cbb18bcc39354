//! Subtractive mixing and the canonical [`PaintMix`].
//!
//! [`model`] holds the spectral math; [`MixingEngine`] validates a
//! composition, canonicalises it and produces a [`PaintMix`].

mod engine;
pub mod model;
mod paint_mix;

pub use engine::MixingEngine;
pub use model::{to_mixable, Layering, MixableColor, MixedColor, Substrate, WASH_DENSITY};
pub use paint_mix::{
    compare_by_consistency, compare_by_data_index, compare_by_name, mix_id, Consistency, MixPart,
    PaintMix, Pipet,
};
