//! Font metrics backed by fontdue for accurate text measurement during layout.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};
use thiserror::Error;
use wren_layout::{
    FaceId, Fit, FontStyle, FontWeight, MeasureError, TextMeasurer, fit_by_advance,
};

/// Common system font paths to search for a default (regular) font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// System font paths for bold variants.
const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// System font paths for italic variants.
const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

/// System font paths for bold-italic variants.
const FONT_BOLD_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// Errors raised while loading font files.
#[derive(Debug, Error)]
pub enum FontError {
    /// The file could not be read.
    #[error("failed to read font '{}': {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// fontdue rejected the data.
    #[error("failed to parse font '{label}': {message}")]
    Parse {
        /// Path or label of the font.
        label: String,
        /// fontdue's message.
        message: &'static str,
    },
}

/// Text measurer backed by fontdue's per-glyph metrics.
///
/// Holds a regular face and up to three variants. A missing variant falls
/// back to the closest loaded one: bold-italic tries bold, then italic;
/// everything ends at regular.
///
/// Uses `Font::metrics()` (not `Font::rasterize()`) to avoid the cost of
/// bitmap generation when only measurements are needed.
pub struct FontdueMeasurer {
    /// Indexed by `FaceId`: regular, italic, bold, bold-italic.
    faces: [Option<Font>; 4],
}

impl FontdueMeasurer {
    /// A measurer with only a regular face.
    #[must_use]
    pub fn new(regular: Font) -> Self {
        Self {
            faces: [Some(regular), None, None, None],
        }
    }

    /// Parse a regular face from raw font data.
    ///
    /// # Errors
    ///
    /// Returns [`FontError::Parse`] if fontdue rejects the data.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FontError> {
        parse_font(data, "regular").map(Self::new)
    }

    /// Load a regular face and any variants from files.
    ///
    /// # Errors
    ///
    /// Returns a [`FontError`] if any given file cannot be read or parsed.
    pub fn from_files(
        regular: &Path,
        bold: Option<&Path>,
        italic: Option<&Path>,
        bold_italic: Option<&Path>,
    ) -> Result<Self, FontError> {
        let mut measurer = Self::new(load_font(regular)?);
        let variants = [
            (FontWeight::Bold, FontStyle::Roman, bold),
            (FontWeight::Normal, FontStyle::Italic, italic),
            (FontWeight::Bold, FontStyle::Italic, bold_italic),
        ];
        for (weight, slant, path) in variants {
            if let Some(path) = path {
                measurer.set_face(weight, slant, load_font(path)?);
            }
        }
        Ok(measurer)
    }

    /// Search well-known system locations for a regular face and variants.
    ///
    /// Returns `None` if no regular face is found.
    #[must_use]
    pub fn system() -> Option<Self> {
        let mut measurer = Self::new(load_font_from_paths(FONT_SEARCH_PATHS, "regular")?);
        let variants = [
            (FontWeight::Bold, FontStyle::Roman, FONT_BOLD_SEARCH_PATHS, "bold"),
            (FontWeight::Normal, FontStyle::Italic, FONT_ITALIC_SEARCH_PATHS, "italic"),
            (
                FontWeight::Bold,
                FontStyle::Italic,
                FONT_BOLD_ITALIC_SEARCH_PATHS,
                "bold-italic",
            ),
        ];
        for (weight, slant, paths, label) in variants {
            if let Some(font) = load_font_from_paths(paths, label) {
                measurer.set_face(weight, slant, font);
            }
        }
        Some(measurer)
    }

    /// Install the face for a variant, replacing any earlier one.
    pub fn set_face(&mut self, weight: FontWeight, slant: FontStyle, font: Font) {
        let index = face_index(FaceId::for_variant(weight, slant));
        self.faces[index] = Some(font);
    }

    /// Whether a dedicated face is loaded for the variant.
    #[must_use]
    pub fn has_face(&self, weight: FontWeight, slant: FontStyle) -> bool {
        self.faces[face_index(FaceId::for_variant(weight, slant))].is_some()
    }

    fn font(&self, face: FaceId) -> Result<&Font, MeasureError> {
        self.faces
            .get(face_index(face))
            .and_then(Option::as_ref)
            .ok_or(MeasureError::UnknownFace(face))
    }
}

impl TextMeasurer for FontdueMeasurer {
    fn resolve(&self, weight: FontWeight, slant: FontStyle) -> Result<FaceId, MeasureError> {
        let preferred = FaceId::for_variant(weight, slant);
        let fallbacks = [
            preferred,
            FaceId::for_variant(weight, FontStyle::Roman),
            FaceId::for_variant(FontWeight::Normal, slant),
            FaceId::for_variant(FontWeight::Normal, FontStyle::Roman),
        ];
        fallbacks
            .into_iter()
            .find(|&face| self.font(face).is_ok())
            .ok_or(MeasureError::Unavailable { weight, slant })
    }

    fn measure(
        &self,
        face: FaceId,
        size: f32,
        text: &str,
        max_width: f32,
    ) -> Result<Fit, MeasureError> {
        let font = self.font(face)?;
        Ok(fit_by_advance(text, max_width, |ch| {
            font.metrics(ch, size).advance_width
        }))
    }

    fn line_spacing(&self, face: FaceId, size: f32) -> Result<f32, MeasureError> {
        // [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
        //
        // "We recommend a used value for 'normal' between 1.0 and 1.2."
        //
        // Fonts without horizontal metrics fall back to 1.2×.
        let font = self.font(face)?;
        Ok(font
            .horizontal_line_metrics(size)
            .map_or(size * 1.2, |metrics| metrics.new_line_size))
    }

    fn ascent(&self, face: FaceId, size: f32) -> Result<f32, MeasureError> {
        // fontdue reports ascent as positive-up; layout's y grows downward.
        let font = self.font(face)?;
        Ok(font
            .horizontal_line_metrics(size)
            .map_or(-size * 0.8, |metrics| -metrics.ascent))
    }
}

fn face_index(face: FaceId) -> usize {
    usize::try_from(face.0).unwrap_or(usize::MAX)
}

fn parse_font(data: &[u8], label: &str) -> Result<Font, FontError> {
    Font::from_bytes(data, FontSettings::default()).map_err(|message| FontError::Parse {
        label: label.to_string(),
        message,
    })
}

fn load_font(path: &Path) -> Result<Font, FontError> {
    let data = std::fs::read(path).map_err(|source| FontError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_font(&data, &path.display().to_string())
}

/// Try to load a font from a list of filesystem paths.
fn load_font_from_paths(paths: &[&str], label: &str) -> Option<Font> {
    for path in paths {
        if let Ok(data) = std::fs::read(path)
            && let Ok(font) = Font::from_bytes(data, FontSettings::default())
        {
            log::debug!("Loaded {label} font: {path}");
            return Some(font);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_data_is_rejected() {
        let err = FontdueMeasurer::from_bytes(b"not a font").err().unwrap();
        assert!(matches!(err, FontError::Parse { .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = FontdueMeasurer::from_files(Path::new("/no/such/font.ttf"), None, None, None)
            .err()
            .unwrap();
        assert!(err.to_string().contains("/no/such/font.ttf"));
    }

    #[test]
    fn system_font_measures_and_falls_back() {
        // Hosts without any of the well-known fonts have nothing to check.
        let Some(measurer) = FontdueMeasurer::system() else {
            return;
        };
        let face = measurer.resolve(FontWeight::Bold, FontStyle::Italic).unwrap();
        let fit = measurer.measure(face, 32.0, "hello world", 1.0e6).unwrap();
        assert_eq!(fit.chars, 11);
        assert!(fit.width > 0.0);

        let narrow = measurer.measure(face, 32.0, "hello world", fit.width / 2.0).unwrap();
        assert!(narrow.chars < 11);
        assert!(narrow.width <= fit.width / 2.0);

        assert!(measurer.line_spacing(face, 32.0).unwrap() > 0.0);
        assert!(measurer.ascent(face, 32.0).unwrap() < 0.0);
        assert!(measurer.measure(FaceId(42), 32.0, "x", 10.0).is_err());
    }
}
