//! Error types for paint, paint set and composition validation

use std::num::ParseIntError;

use thiserror::Error;

use super::paint::{Medium, PaintKey};

/// Error type for parsing hex color strings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 characters)")]
    InvalidLength,
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
    /// A sign or other non-digit character where a hex digit belongs
    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),
}

/// Error type for a single catalog paint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaintError {
    /// Measured spectrum has the wrong number of samples
    #[error("reflectance spectrum must have {expected} samples, got {actual}")]
    InvalidSpectrum { expected: usize, actual: usize },
    /// A measured sample is not a reflectance fraction
    #[error("reflectance sample {index} is out of range: {value}")]
    ReflectanceOutOfRange { index: usize, value: f64 },
    /// Unknown medium name
    #[error("unknown paint medium: {0}")]
    UnknownMedium(String),
}

/// Error type for paint set validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaintSetError {
    /// The same paint appears twice
    #[error("duplicate paint {key}")]
    DuplicatePaint { key: PaintKey },
    /// A paint of another medium was added to the set
    #[error("paint {key} is {actual}, but the set is {expected}")]
    MediumMismatch {
        key: PaintKey,
        expected: Medium,
        actual: Medium,
    },
    /// More paints than a set may hold
    #[error("paint set has {count} paints (max {max})")]
    TooManyPaints { count: usize, max: usize },
}

/// Error type for a concrete mix composition. These are caller contract
/// violations; no degenerate color is ever produced instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompositionError {
    /// No paints given
    #[error("composition has no paints")]
    Empty,
    /// Paints and fractions differ in length
    #[error("composition has {paints} paints but {fractions} fractions")]
    LengthMismatch { paints: usize, fractions: usize },
    /// A fraction is outside 1..=8
    #[error("fraction {value} is out of range (expected 1..={max})")]
    FractionOutOfRange { value: u8, max: u8 },
    /// Every fraction is zero
    #[error("total fraction of composition is zero")]
    ZeroTotalFraction,
    /// The medium does not allow that many paints in one mix
    #[error("{medium} allows at most {max} paints per mix, got {count}")]
    TooManyPaints {
        medium: Medium,
        count: usize,
        max: usize,
    },
    /// The same paint appears twice
    #[error("paint {key} appears more than once")]
    DuplicatePaint { key: PaintKey },
    /// Paints of different media cannot be mixed
    #[error("paint {key} is {actual}, expected {expected}")]
    MixedMedia {
        key: PaintKey,
        expected: Medium,
        actual: Medium,
    },
    /// A thin variant was requested for a medium that is not diluted
    #[error("{medium} has no thin consistency")]
    DilutionUnsupported { medium: Medium },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_error_display() {
        assert_eq!(
            ParseColorError::InvalidLength.to_string(),
            "invalid hex color length (expected 3 or 6 characters)"
        );
        let err: ParseColorError = u8::from_str_radix("zz", 16).unwrap_err().into();
        assert!(err.to_string().starts_with("invalid hex character"));
    }

    #[test]
    fn test_composition_error_display() {
        assert_eq!(
            CompositionError::FractionOutOfRange { value: 9, max: 8 }.to_string(),
            "fraction 9 is out of range (expected 1..=8)"
        );
        assert_eq!(
            CompositionError::TooManyPaints {
                medium: Medium::Oil,
                count: 4,
                max: 3
            }
            .to_string(),
            "oil allows at most 3 paints per mix, got 4"
        );
    }

    #[test]
    fn test_paint_set_error_display() {
        let key = PaintKey::new("winsor_newton", 7);
        assert_eq!(
            PaintSetError::DuplicatePaint { key }.to_string(),
            "duplicate paint winsor_newton:7"
        );
    }
}
