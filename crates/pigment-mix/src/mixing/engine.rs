//! Turns a concrete composition into a canonical [`PaintMix`].

use std::collections::HashSet;
use std::sync::Arc;

use crate::color::{Lab, Srgb};
use crate::paint::{CompositionError, Fraction, Medium, Paint, Ratio};

use super::model::{mix, Layering, MixableColor, Substrate};
use super::paint_mix::{compare_by_consistency, mix_id, Consistency, MixPart, PaintMix};

const THICK_ONLY: &[Consistency] = &[Consistency::Thick];
const THICK_AND_THIN: &[Consistency] = &[Consistency::Thick, Consistency::Thin];

/// Mixing engine bound to one medium and one background.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use pigment_mix::{Consistency, Medium, MixingEngine, Paint, Srgb};
///
/// let red = Arc::new(Paint::new("acme", 1, "Red", Medium::Oil, Srgb::from_u8(255, 0, 0)));
/// let yellow = Arc::new(Paint::new("acme", 2, "Yellow", Medium::Oil, Srgb::from_u8(255, 255, 0)));
///
/// let engine = MixingEngine::new(Medium::Oil, "#F7F5EF".parse().unwrap());
/// let a = engine.mix(&[red.clone(), yellow.clone()], &[1, 1], false, Consistency::Thick).unwrap();
/// let b = engine.mix(&[yellow, red], &[4, 4], false, Consistency::Thick).unwrap();
/// assert_eq!(a.id, b.id);
/// assert_eq!(a.color, b.color);
/// ```
#[derive(Debug, Clone)]
pub struct MixingEngine {
    medium: Medium,
    substrate: Substrate,
}

impl MixingEngine {
    pub fn new(medium: Medium, background: Srgb) -> Self {
        Self {
            medium,
            substrate: Substrate::new(background),
        }
    }

    pub fn medium(&self) -> Medium {
        self.medium
    }

    pub fn background(&self) -> Srgb {
        self.substrate.color()
    }

    /// Glazing only applies to media that support it.
    #[inline]
    pub fn glaze_applies(&self, requested: bool) -> bool {
        requested && self.medium.supports_glaze()
    }

    /// The consistencies a mix of this medium comes in, thick first.
    pub fn consistencies(&self) -> &'static [Consistency] {
        if self.medium.supports_dilution() {
            THICK_AND_THIN
        } else {
            THICK_ONLY
        }
    }

    /// Mix a composition given as parallel paint and fraction lists.
    ///
    /// Fractions are reduced to lowest terms first, so `[2, 4]` and `[1, 2]`
    /// give the same mix. Order of the inputs does not matter.
    ///
    /// # Errors
    ///
    /// Any [`CompositionError`]: no paints, mismatched lengths, fractions
    /// outside 1..=8 or all zero, too many paints for the medium, duplicate
    /// paints, paints of another medium, or a thin variant of a medium that
    /// is not diluted.
    pub fn mix(
        &self,
        paints: &[Arc<Paint>],
        fractions: &[u8],
        is_glaze: bool,
        consistency: Consistency,
    ) -> Result<PaintMix, CompositionError> {
        if paints.is_empty() {
            return Err(CompositionError::Empty);
        }
        if paints.len() != fractions.len() {
            return Err(CompositionError::LengthMismatch {
                paints: paints.len(),
                fractions: fractions.len(),
            });
        }
        let max = self.medium.max_paints_per_mix();
        if paints.len() > max {
            return Err(CompositionError::TooManyPaints {
                medium: self.medium,
                count: paints.len(),
                max,
            });
        }
        if consistency == Consistency::Thin && !self.medium.supports_dilution() {
            return Err(CompositionError::DilutionUnsupported {
                medium: self.medium,
            });
        }

        let mut seen = HashSet::new();
        for paint in paints {
            if paint.medium != self.medium {
                return Err(CompositionError::MixedMedia {
                    key: paint.key(),
                    expected: self.medium,
                    actual: paint.medium,
                });
            }
            if !seen.insert(paint.key()) {
                return Err(CompositionError::DuplicatePaint { key: paint.key() });
            }
        }

        let ratio = Ratio::new(fractions)?;
        let mixables: Vec<MixableColor> = paints.iter().map(|p| MixableColor::from_paint(p)).collect();
        let entries = paints
            .iter()
            .zip(ratio.fractions())
            .zip(mixables.iter())
            .map(|((paint, &fraction), mixable)| (paint, fraction, mixable))
            .collect();

        Ok(self.build(entries, is_glaze, consistency))
    }

    /// Mix a composition the way the interactive mixer shows it: the thick
    /// mix, plus its thin variant for media diluted with water, thick first.
    pub fn mix_paints(
        &self,
        paints: &[Arc<Paint>],
        fractions: &[u8],
    ) -> Result<Vec<PaintMix>, CompositionError> {
        let mut mixes = self
            .consistencies()
            .iter()
            .map(|&consistency| self.mix(paints, fractions, false, consistency))
            .collect::<Result<Vec<_>, _>>()?;
        mixes.sort_by(compare_by_consistency);
        Ok(mixes)
    }

    /// Perceptual color of a prepared composition, without building a
    /// [`PaintMix`]. Fractions are expected in lowest terms.
    #[inline]
    pub fn evaluate(
        &self,
        components: &[(&MixableColor, f64)],
        is_glaze: bool,
        consistency: Consistency,
    ) -> Lab {
        let layering = Layering::new(self.glaze_applies(is_glaze), consistency);
        mix(components, &self.substrate, layering).lab()
    }

    /// Build the canonical mix of already validated, reduced entries.
    pub(crate) fn build(
        &self,
        mut entries: Vec<(&Arc<Paint>, Fraction, &MixableColor)>,
        is_glaze: bool,
        consistency: Consistency,
    ) -> PaintMix {
        entries.sort_by(|a, b| (&a.0.brand, a.0.id).cmp(&(&b.0.brand, b.0.id)));

        let is_glaze = self.glaze_applies(is_glaze);
        let components: Vec<(&MixableColor, f64)> = entries
            .iter()
            .map(|&(_, fraction, mixable)| (mixable, fraction.get() as f64))
            .collect();
        let mixed = mix(
            &components,
            &self.substrate,
            Layering::new(is_glaze, consistency),
        );

        let parts: Vec<MixPart> = entries
            .iter()
            .map(|&(paint, fraction, _)| MixPart {
                paint: Arc::clone(paint),
                fraction,
            })
            .collect();
        let background = self.background();

        PaintMix {
            id: mix_id(self.medium, &parts, background, is_glaze, consistency),
            medium: self.medium,
            parts,
            background,
            is_glaze,
            consistency,
            color: mixed.srgb(),
            lab: mixed.lab(),
            reflectance: mixed.reflectance,
            name: None,
            image_file_id: None,
            pipet: None,
            data_index: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::OFF_WHITE_HEX;

    fn paint(id: u32, hex: &str, medium: Medium) -> Arc<Paint> {
        Arc::new(Paint::new("acme", id, hex, medium, hex.parse().unwrap()))
    }

    fn engine(medium: Medium) -> MixingEngine {
        MixingEngine::new(medium, OFF_WHITE_HEX.parse().unwrap())
    }

    #[test]
    fn test_rejects_empty_and_zero() {
        let engine = engine(Medium::Oil);
        assert_eq!(
            engine.mix(&[], &[], false, Consistency::Thick).unwrap_err(),
            CompositionError::Empty
        );
        let red = paint(1, "#FF0000", Medium::Oil);
        assert_eq!(
            engine
                .mix(&[red.clone()], &[0], false, Consistency::Thick)
                .unwrap_err(),
            CompositionError::ZeroTotalFraction
        );
        assert_eq!(
            engine
                .mix(&[red], &[1, 1], false, Consistency::Thick)
                .unwrap_err(),
            CompositionError::LengthMismatch {
                paints: 1,
                fractions: 2
            }
        );
    }

    #[test]
    fn test_rejects_too_many_paints() {
        let engine = engine(Medium::Oil);
        let paints: Vec<_> = (1..=4)
            .map(|id| paint(id, "#808080", Medium::Oil))
            .collect();
        assert!(matches!(
            engine.mix(&paints, &[1, 1, 1, 1], false, Consistency::Thick),
            Err(CompositionError::TooManyPaints { count: 4, max: 3, .. })
        ));
    }

    #[test]
    fn test_rejects_duplicates_and_mixed_media() {
        let engine = engine(Medium::Oil);
        let red = paint(1, "#FF0000", Medium::Oil);
        assert!(matches!(
            engine.mix(&[red.clone(), red.clone()], &[1, 1], false, Consistency::Thick),
            Err(CompositionError::DuplicatePaint { .. })
        ));
        let wc = paint(2, "#00FF00", Medium::Watercolor);
        assert!(matches!(
            engine.mix(&[red, wc], &[1, 1], false, Consistency::Thick),
            Err(CompositionError::MixedMedia { .. })
        ));
    }

    #[test]
    fn test_rejects_thin_for_undiluted_medium() {
        let engine = engine(Medium::Oil);
        let red = paint(1, "#FF0000", Medium::Oil);
        assert_eq!(
            engine.mix(&[red], &[1], false, Consistency::Thin).unwrap_err(),
            CompositionError::DilutionUnsupported {
                medium: Medium::Oil
            }
        );
    }

    #[test]
    fn test_fractions_are_reduced() {
        let engine = engine(Medium::Acrylic);
        let a = paint(1, "#FF0000", Medium::Acrylic);
        let b = paint(2, "#0000FF", Medium::Acrylic);
        let mix = engine
            .mix(&[a, b], &[4, 6], false, Consistency::Thick)
            .unwrap();
        assert_eq!(mix.fractions(), vec![2, 3]);
    }

    #[test]
    fn test_parts_sorted_canonically() {
        let engine = engine(Medium::Oil);
        let a = paint(9, "#FF0000", Medium::Oil);
        let b = paint(3, "#FFFF00", Medium::Oil);
        let mix = engine
            .mix(&[a, b], &[1, 2], false, Consistency::Thick)
            .unwrap();
        let ids: Vec<u32> = mix.parts.iter().map(|p| p.paint.id).collect();
        assert_eq!(ids, vec![3, 9]);
        assert_eq!(mix.fractions(), vec![2, 1]);
    }

    #[test]
    fn test_identity_ignores_background() {
        let red = paint(1, "#C8102E", Medium::Oil);
        for background in ["#FFFFFF", "#000000", "#3C5AC8"] {
            let engine = MixingEngine::new(Medium::Oil, background.parse().unwrap());
            let mix = engine
                .mix(&[red.clone()], &[1], false, Consistency::Thick)
                .unwrap();
            assert_eq!(mix.color.to_hex(), "#C8102E");
        }
    }

    #[test]
    fn test_glaze_ignored_for_gouache() {
        let engine = MixingEngine::new(Medium::Gouache, Srgb::from_u8(40, 60, 200));
        let yellow = paint(1, "#FFD700", Medium::Gouache);
        let plain = engine
            .mix(&[yellow.clone()], &[1], false, Consistency::Thick)
            .unwrap();
        let glazed = engine
            .mix(&[yellow], &[1], true, Consistency::Thick)
            .unwrap();
        assert!(!glazed.is_glaze);
        assert_eq!(plain.id, glazed.id);
        assert_eq!(plain.color, glazed.color);
    }

    #[test]
    fn test_mix_paints_adds_thin_for_watercolor() {
        let engine = engine(Medium::Watercolor);
        let blue = paint(1, "#1F3A93", Medium::Watercolor);
        let mixes = engine.mix_paints(&[blue.clone()], &[1]).unwrap();
        assert_eq!(mixes.len(), 2);
        assert!(mixes[0].is_thick());
        assert_eq!(mixes[1].consistency, Consistency::Thin);
        assert_ne!(mixes[0].id, mixes[1].id);
        assert!(mixes[1].lab.l > mixes[0].lab.l);

        let oil = self::engine(Medium::Oil);
        let red = paint(2, "#FF0000", Medium::Oil);
        assert_eq!(oil.mix_paints(&[red], &[1]).unwrap().len(), 1);
    }

    #[test]
    fn test_evaluate_agrees_with_mix() {
        let engine = engine(Medium::Oil);
        let a = paint(1, "#FF0000", Medium::Oil);
        let b = paint(2, "#FFFF00", Medium::Oil);
        let mix = engine
            .mix(&[a.clone(), b.clone()], &[1, 3], false, Consistency::Thick)
            .unwrap();
        let ma = MixableColor::from_paint(&a);
        let mb = MixableColor::from_paint(&b);
        let lab = engine.evaluate(&[(&ma, 1.0), (&mb, 3.0)], false, Consistency::Thick);
        assert!(lab.delta_e(mix.lab) < 1e-9);
    }

    #[test]
    fn test_dark_glaze_survives_json_round_trip() {
        let engine = MixingEngine::new(Medium::Oil, "#141414".parse().unwrap());
        let blue = paint(1, "#0A1478", Medium::Oil);
        let mix = engine.mix(&[blue], &[1], true, Consistency::Thick).unwrap();
        assert!(mix
            .reflectance
            .samples()
            .iter()
            .any(|&r| r < crate::color::REFLECTANCE_FLOOR));

        let json = serde_json::to_string(&mix).unwrap();
        let back: PaintMix = serde_json::from_str(&json).unwrap();
        assert_eq!(back.reflectance, mix.reflectance);
        assert_eq!(back, mix);
    }
}
