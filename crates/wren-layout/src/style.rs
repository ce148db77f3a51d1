//! Inherited text style and the style stack.
//!
//! A [`Style`] is a small `Copy` value. Tags never edit the style in effect;
//! they derive a new one with [`Style::with_weight`] and friends and push it,
//! and the matching close tag pops it again.

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::constants::{FONT_SIZE, MIN_FONT_SIZE};

/// [§ 3.2 'font-weight'](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// [§ 3.3 'font-style'](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright glyphs.
    #[default]
    Roman,
    /// Slanted glyphs.
    Italic,
}

/// Horizontal placement of a finished line.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Lines start at the left inset.
    #[default]
    Left,
    /// Lines are centered in the window.
    Center,
}

/// Vertical placement of a run relative to its line's baseline.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    /// Sit on the baseline.
    #[default]
    Baseline,
    /// Raised by the run's font ascent.
    Super,
}

/// Text style inherited down the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Style {
    /// Normal or bold.
    pub font_weight: FontWeight,
    /// Roman or italic.
    pub font_style: FontStyle,
    /// Line alignment in effect when a line is flushed.
    pub text_align: TextAlign,
    /// Baseline or superscript.
    pub vertical_align: VerticalAlign,
    /// Font size in device units.
    pub font_size: i32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            font_weight: FontWeight::default(),
            font_style: FontStyle::default(),
            text_align: TextAlign::default(),
            vertical_align: VerticalAlign::default(),
            font_size: FONT_SIZE,
        }
    }
}

impl Style {
    /// Copy of this style with a different weight.
    #[must_use]
    pub const fn with_weight(self, font_weight: FontWeight) -> Self {
        Self {
            font_weight,
            ..self
        }
    }

    /// Copy of this style with a different slant.
    #[must_use]
    pub const fn with_slant(self, font_style: FontStyle) -> Self {
        Self { font_style, ..self }
    }

    /// Copy of this style with a different line alignment.
    #[must_use]
    pub const fn with_text_align(self, text_align: TextAlign) -> Self {
        Self { text_align, ..self }
    }

    /// Copy of this style with a different vertical alignment.
    #[must_use]
    pub const fn with_vertical_align(self, vertical_align: VerticalAlign) -> Self {
        Self {
            vertical_align,
            ..self
        }
    }

    /// Copy of this style with its font size shifted by `delta`, never going
    /// below [`MIN_FONT_SIZE`].
    #[must_use]
    pub fn with_size_delta(self, delta: i32) -> Self {
        Self {
            font_size: self.font_size.saturating_add(delta).max(MIN_FONT_SIZE),
            ..self
        }
    }
}

/// Push/pop stack of styles mirroring tag nesting.
///
/// Seeded with [`Style::default`]. Only the top entry is ever read.
#[derive(Debug, Clone)]
pub struct StyleStack {
    styles: Vec<Style>,
}

impl Default for StyleStack {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleStack {
    /// A stack holding only the default style.
    #[must_use]
    pub fn new() -> Self {
        Self {
            styles: vec![Style::default()],
        }
    }

    /// The style in effect, or `None` if the stack has underflowed.
    #[must_use]
    pub fn current(&self) -> Option<Style> {
        self.styles.last().copied()
    }

    /// Push a derived style.
    pub fn push(&mut self, style: Style) {
        self.styles.push(style);
    }

    /// Pop the style in effect. Returns `None` on underflow.
    pub fn pop(&mut self) -> Option<Style> {
        self.styles.pop()
    }

    /// Number of styles on the stack, including the seed.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.styles.len()
    }
}
