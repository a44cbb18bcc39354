//! The paints a session mixes from.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use super::error::PaintSetError;
use super::paint::{Medium, Paint, PaintKey};

/// Largest number of paints a set may hold. Keeps the similarity search
/// tractable: 36 paints and 3-paint mixes is about 7 000 subsets.
pub const MAX_PAINTS_IN_SET: usize = 36;

/// An ordered, duplicate-free selection of paints of one medium.
///
/// Paints are shared (`Arc`) so mixes built from the set can hold them
/// without copying spectra.
///
/// # Example
///
/// ```
/// use pigment_mix::{Medium, Paint, PaintSet, Srgb};
///
/// let paints = vec![
///     Paint::new("acme", 1, "Red", Medium::Oil, Srgb::from_u8(255, 0, 0)),
///     Paint::new("acme", 2, "Yellow", Medium::Oil, Srgb::from_u8(255, 255, 0)),
/// ];
/// let set = PaintSet::new(Medium::Oil, paints).unwrap();
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct PaintSet {
    medium: Medium,
    paints: Vec<Arc<Paint>>,
}

impl PaintSet {
    /// Build a paint set, keeping the given order.
    ///
    /// # Errors
    ///
    /// - [`PaintSetError::TooManyPaints`] above [`MAX_PAINTS_IN_SET`]
    /// - [`PaintSetError::MediumMismatch`] for a paint of another medium
    /// - [`PaintSetError::DuplicatePaint`] when a `(brand, id)` repeats
    pub fn new(medium: Medium, paints: Vec<Paint>) -> Result<Self, PaintSetError> {
        if paints.len() > MAX_PAINTS_IN_SET {
            return Err(PaintSetError::TooManyPaints {
                count: paints.len(),
                max: MAX_PAINTS_IN_SET,
            });
        }

        let mut seen = HashSet::new();
        for paint in &paints {
            if paint.medium != medium {
                return Err(PaintSetError::MediumMismatch {
                    key: paint.key(),
                    expected: medium,
                    actual: paint.medium,
                });
            }
            if !seen.insert(paint.key()) {
                return Err(PaintSetError::DuplicatePaint { key: paint.key() });
            }
        }

        Ok(Self {
            medium,
            paints: paints.into_iter().map(Arc::new).collect(),
        })
    }

    /// An empty set. Searching it yields no results.
    pub fn empty(medium: Medium) -> Self {
        Self {
            medium,
            paints: Vec::new(),
        }
    }

    pub fn medium(&self) -> Medium {
        self.medium
    }

    pub fn paints(&self) -> &[Arc<Paint>] {
        &self.paints
    }

    pub fn len(&self) -> usize {
        self.paints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paints.is_empty()
    }

    pub fn get(&self, key: &PaintKey) -> Option<&Arc<Paint>> {
        self.paints
            .iter()
            .find(|paint| paint.brand == key.brand && paint.id == key.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;

    fn paint(id: u32, medium: Medium) -> Paint {
        Paint::new("acme", id, format!("Paint {id}"), medium, Srgb::from_u8(id as u8, 0, 0))
    }

    #[test]
    fn test_keeps_order() {
        let set = PaintSet::new(
            Medium::Acrylic,
            vec![paint(3, Medium::Acrylic), paint(1, Medium::Acrylic)],
        )
        .unwrap();
        let ids: Vec<u32> = set.paints().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(set.get(&PaintKey::new("acme", 1)).unwrap().id, 1);
        assert!(set.get(&PaintKey::new("other", 1)).is_none());
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = PaintSet::new(
            Medium::Oil,
            vec![paint(1, Medium::Oil), paint(2, Medium::Oil), paint(1, Medium::Oil)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            PaintSetError::DuplicatePaint {
                key: PaintKey::new("acme", 1)
            }
        );
    }

    #[test]
    fn test_rejects_medium_mismatch() {
        let err = PaintSet::new(
            Medium::Oil,
            vec![paint(1, Medium::Oil), paint(2, Medium::Watercolor)],
        )
        .unwrap_err();
        assert!(matches!(err, PaintSetError::MediumMismatch { .. }));
    }

    #[test]
    fn test_rejects_oversize() {
        let paints: Vec<Paint> = (0..=MAX_PAINTS_IN_SET as u32)
            .map(|id| paint(id, Medium::Oil))
            .collect();
        assert_eq!(
            PaintSet::new(Medium::Oil, paints).unwrap_err(),
            PaintSetError::TooManyPaints { count: 37, max: 36 }
        );
    }

    #[test]
    fn test_empty() {
        let set = PaintSet::empty(Medium::Gouache);
        assert!(set.is_empty());
        assert_eq!(set.medium(), Medium::Gouache);
    }
}
