//! Text measurement capability and face-handle cache.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! Layout never touches font data directly. It asks a [`TextMeasurer`] for a
//! face handle per (weight, slant) pair and then measures runs against that
//! handle. [`ApproximateMeasurer`] needs no font files and is what the tests
//! and the font-less CLI use.

use serde::Serialize;
use thiserror::Error;

use crate::style::{FontStyle, FontWeight};

/// Opaque font identity handed out by a [`TextMeasurer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FaceId(pub u32);

impl FaceId {
    /// The canonical handle for a (weight, slant) pair: normal roman is 0,
    /// normal italic 1, bold roman 2, bold italic 3.
    #[must_use]
    pub fn for_variant(weight: FontWeight, slant: FontStyle) -> Self {
        Self(u32::from(slot(weight, slant)))
    }
}

/// Result of fitting a run into a width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fit {
    /// Number of leading characters (not bytes) that fit.
    pub chars: usize,
    /// Advance width of those characters.
    pub width: f32,
}

/// Errors raised by a [`TextMeasurer`].
#[derive(Debug, Error)]
pub enum MeasureError {
    /// No face is available for the requested variant.
    #[error("no font face available for {weight} {slant}")]
    Unavailable {
        /// Requested weight.
        weight: FontWeight,
        /// Requested slant.
        slant: FontStyle,
    },
    /// The handle was not issued by this measurer.
    #[error("unknown font face {0:?}")]
    UnknownFace(FaceId),
    /// The backend failed for another reason.
    #[error("font backend error: {0}")]
    Backend(String),
}

/// Measurement capability injected into layout.
pub trait TextMeasurer {
    /// Resolve a face handle for a weight and slant.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::Unavailable`] if no face can serve the variant.
    fn resolve(&self, weight: FontWeight, slant: FontStyle) -> Result<FaceId, MeasureError>;

    /// Fit as many leading characters of `text` as possible into `max_width`.
    ///
    /// A negative or zero `max_width` may fit nothing.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::UnknownFace`] for a foreign handle.
    fn measure(
        &self,
        face: FaceId,
        size: f32,
        text: &str,
        max_width: f32,
    ) -> Result<Fit, MeasureError>;

    /// Baseline-to-baseline distance for the face at `size`.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::UnknownFace`] for a foreign handle.
    fn line_spacing(&self, face: FaceId, size: f32) -> Result<f32, MeasureError>;

    /// Signed ascent for the face at `size`. Negative, since y grows downward.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::UnknownFace`] for a foreign handle.
    fn ascent(&self, face: FaceId, size: f32) -> Result<f32, MeasureError>;
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn resolve(&self, weight: FontWeight, slant: FontStyle) -> Result<FaceId, MeasureError> {
        (**self).resolve(weight, slant)
    }

    fn measure(
        &self,
        face: FaceId,
        size: f32,
        text: &str,
        max_width: f32,
    ) -> Result<Fit, MeasureError> {
        (**self).measure(face, size, text, max_width)
    }

    fn line_spacing(&self, face: FaceId, size: f32) -> Result<f32, MeasureError> {
        (**self).line_spacing(face, size)
    }

    fn ascent(&self, face: FaceId, size: f32) -> Result<f32, MeasureError> {
        (**self).ascent(face, size)
    }
}

/// Greedy prefix fit over per-character advances.
///
/// Control characters have no advance. Shared by every measurer that knows
/// its glyph advances one character at a time.
#[must_use]
pub fn fit_by_advance(text: &str, max_width: f32, mut advance: impl FnMut(char) -> f32) -> Fit {
    let mut fit = Fit {
        chars: 0,
        width: 0.0,
    };
    for ch in text.chars() {
        let step = if ch.is_control() { 0.0 } else { advance(ch) };
        if fit.width + step > max_width {
            break;
        }
        fit.width += step;
        fit.chars += 1;
    }
    fit
}

/// Fixed-ratio metrics for use without font files.
///
/// The average advance of Latin glyphs in a proportional font is roughly
/// 0.6× the font size; line spacing is 1.2×, the upper end of the
/// recommended range for `line-height: normal`; ascent is 0.8×.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasurer;

impl ApproximateMeasurer {
    /// Advance width of one character relative to the font size.
    pub const CHAR_WIDTH_RATIO: f32 = 0.6;
    /// Line spacing relative to the font size.
    pub const LINE_SPACING_RATIO: f32 = 1.2;
    /// Ascent relative to the font size.
    pub const ASCENT_RATIO: f32 = 0.8;

    fn check(face: FaceId) -> Result<(), MeasureError> {
        if face.0 < 4 {
            Ok(())
        } else {
            Err(MeasureError::UnknownFace(face))
        }
    }
}

impl TextMeasurer for ApproximateMeasurer {
    fn resolve(&self, weight: FontWeight, slant: FontStyle) -> Result<FaceId, MeasureError> {
        Ok(FaceId::for_variant(weight, slant))
    }

    fn measure(
        &self,
        face: FaceId,
        size: f32,
        text: &str,
        max_width: f32,
    ) -> Result<Fit, MeasureError> {
        Self::check(face)?;
        let advance = size * Self::CHAR_WIDTH_RATIO;
        Ok(fit_by_advance(text, max_width, |_| advance))
    }

    fn line_spacing(&self, face: FaceId, size: f32) -> Result<f32, MeasureError> {
        Self::check(face)?;
        Ok(size * Self::LINE_SPACING_RATIO)
    }

    fn ascent(&self, face: FaceId, size: f32) -> Result<f32, MeasureError> {
        Self::check(face)?;
        Ok(-size * Self::ASCENT_RATIO)
    }
}

const fn slot(weight: FontWeight, slant: FontStyle) -> u8 {
    let w = match weight {
        FontWeight::Normal => 0,
        FontWeight::Bold => 2,
    };
    let s = match slant {
        FontStyle::Roman => 0,
        FontStyle::Italic => 1,
    };
    w + s
}

/// Per-layout cache of resolved face handles, one slot per variant.
#[derive(Debug, Clone, Default)]
pub struct FaceCache {
    slots: [Option<FaceId>; 4],
}

impl FaceCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached handle for a variant, resolving it through `measurer` on
    /// first use.
    ///
    /// # Errors
    ///
    /// Propagates the measurer's resolution error; nothing is cached then.
    pub fn get_or_resolve<M: TextMeasurer + ?Sized>(
        &mut self,
        measurer: &M,
        weight: FontWeight,
        slant: FontStyle,
    ) -> Result<FaceId, MeasureError> {
        let entry = &mut self.slots[usize::from(slot(weight, slant))];
        if let Some(face) = *entry {
            return Ok(face);
        }
        let face = measurer.resolve(weight, slant)?;
        *entry = Some(face);
        Ok(face)
    }

    /// Number of variants resolved so far.
    #[must_use]
    pub fn resolved(&self) -> usize {
        self.slots.iter().flatten().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn fit_stops_at_width() {
        let fit = ApproximateMeasurer
            .measure(FaceId(0), 10.0, "abcdef", 20.0)
            .unwrap();
        // Each char is 6 wide.
        assert_eq!(fit.chars, 3);
        assert!((fit.width - 18.0).abs() < 1e-4);
    }

    #[test]
    fn negative_width_fits_nothing() {
        let fit = ApproximateMeasurer
            .measure(FaceId(0), 10.0, "abc", -5.0)
            .unwrap();
        assert_eq!(fit.chars, 0);
        assert!(fit.width.abs() < f32::EPSILON);
    }

    #[test]
    fn fit_counts_chars_not_bytes() {
        let fit = fit_by_advance("héllo", 100.0, |_| 1.0);
        assert_eq!(fit.chars, 5);
    }

    #[test]
    fn approximate_metrics() {
        let m = ApproximateMeasurer;
        assert!((m.line_spacing(FaceId(0), 10.0).unwrap() - 12.0).abs() < 1e-4);
        assert!(m.ascent(FaceId(0), 10.0).unwrap() < 0.0);
        assert!(matches!(
            m.line_spacing(FaceId(9), 10.0),
            Err(MeasureError::UnknownFace(FaceId(9)))
        ));
    }

    struct CountingMeasurer {
        calls: Cell<usize>,
    }

    impl TextMeasurer for CountingMeasurer {
        fn resolve(&self, weight: FontWeight, slant: FontStyle) -> Result<FaceId, MeasureError> {
            self.calls.set(self.calls.get() + 1);
            ApproximateMeasurer.resolve(weight, slant)
        }
        fn measure(&self, f: FaceId, s: f32, t: &str, w: f32) -> Result<Fit, MeasureError> {
            ApproximateMeasurer.measure(f, s, t, w)
        }
        fn line_spacing(&self, f: FaceId, s: f32) -> Result<f32, MeasureError> {
            ApproximateMeasurer.line_spacing(f, s)
        }
        fn ascent(&self, f: FaceId, s: f32) -> Result<f32, MeasureError> {
            ApproximateMeasurer.ascent(f, s)
        }
    }

    #[test]
    fn cache_resolves_each_variant_once() {
        let measurer = CountingMeasurer {
            calls: Cell::new(0),
        };
        let mut cache = FaceCache::new();
        for _ in 0..3 {
            let _ = cache
                .get_or_resolve(&measurer, FontWeight::Bold, FontStyle::Italic)
                .unwrap();
            let _ = cache
                .get_or_resolve(&measurer, FontWeight::Normal, FontStyle::Roman)
                .unwrap();
        }
        assert_eq!(measurer.calls.get(), 2);
        assert_eq!(cache.resolved(), 2);
    }

    #[test]
    fn variants_get_distinct_faces() {
        let faces = [
            FaceId::for_variant(FontWeight::Normal, FontStyle::Roman),
            FaceId::for_variant(FontWeight::Normal, FontStyle::Italic),
            FaceId::for_variant(FontWeight::Bold, FontStyle::Roman),
            FaceId::for_variant(FontWeight::Bold, FontStyle::Italic),
        ];
        assert_eq!(faces, [FaceId(0), FaceId(1), FaceId(2), FaceId(3)]);
    }
}
