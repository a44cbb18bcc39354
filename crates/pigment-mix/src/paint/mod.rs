//! Paints, paint sets and fractions
//!
//! This module holds the catalog-side types and their validation errors.

mod error;
mod fraction;
mod paint;
mod paint_set;

pub use error::{CompositionError, PaintError, PaintSetError, ParseColorError};
pub use fraction::{gcd, gcd_all, Fraction, Ratio, MAX_FRACTION};
pub use paint::{Medium, Paint, PaintKey};
pub use paint_set::{PaintSet, MAX_PAINTS_IN_SET};
