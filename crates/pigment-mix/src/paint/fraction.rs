//! Integer fractions and reduced ratios.
//!
//! A [`Ratio`] can only be built in lowest terms, so `{2, 2}` and `{1, 1}`
//! are the same value and every mix derived from them gets the same id.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::CompositionError;

/// Largest number of parts one paint may take in a mix.
pub const MAX_FRACTION: u8 = 8;

/// Relative parts of one paint in a mix, always in `1..=MAX_FRACTION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Fraction(u8);

impl Fraction {
    pub const ONE: Fraction = Fraction(1);

    pub fn new(value: u8) -> Result<Self, CompositionError> {
        if (1..=MAX_FRACTION).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CompositionError::FractionOutOfRange {
                value,
                max: MAX_FRACTION,
            })
        }
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Fraction {
    type Error = CompositionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Fraction::new(value)
    }
}

impl From<Fraction> for u8 {
    fn from(fraction: Fraction) -> Self {
        fraction.0
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Greatest common divisor.
pub fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Greatest common divisor of a whole list; 0 for an empty or all-zero list.
pub fn gcd_all(values: &[u8]) -> u32 {
    values.iter().fold(0, |acc, &v| gcd(acc, v as u32))
}

/// The fractions of one mix, reduced to lowest terms.
///
/// # Example
///
/// ```
/// use pigment_mix::Ratio;
///
/// let a = Ratio::new(&[2, 4, 6]).unwrap();
/// let b = Ratio::new(&[1, 2, 3]).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.values(), vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ratio(Vec<Fraction>);

impl Ratio {
    /// Validate and reduce raw fractions.
    ///
    /// # Errors
    ///
    /// - [`CompositionError::Empty`] for an empty list
    /// - [`CompositionError::ZeroTotalFraction`] when every value is zero
    /// - [`CompositionError::FractionOutOfRange`] for a value outside 1..=8
    pub fn new(values: &[u8]) -> Result<Self, CompositionError> {
        if values.is_empty() {
            return Err(CompositionError::Empty);
        }
        if values.iter().all(|&v| v == 0) {
            return Err(CompositionError::ZeroTotalFraction);
        }
        let fractions = values
            .iter()
            .map(|&v| Fraction::new(v))
            .collect::<Result<Vec<_>, _>>()?;

        let divisor = gcd_all(values) as u8;
        Ok(Self(
            fractions
                .into_iter()
                .map(|f| Fraction(f.0 / divisor))
                .collect(),
        ))
    }

    /// Wrap values already known to be in range and coprime.
    pub(crate) fn from_reduced(values: &[u8]) -> Self {
        debug_assert_eq!(gcd_all(values), 1, "ratio {values:?} is not reduced");
        Self(values.iter().map(|&v| Fraction(v)).collect())
    }

    pub fn fractions(&self) -> &[Fraction] {
        &self.0
    }

    pub fn values(&self) -> Vec<u8> {
        self.0.iter().map(|f| f.0).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all parts.
    pub fn total(&self) -> u32 {
        self.0.iter().map(|f| f.0 as u32).sum()
    }
}
