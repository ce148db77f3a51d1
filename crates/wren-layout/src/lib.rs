//! Line layout for the Wren renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Style stack** - inherited weight, slant, alignment, vertical
//!   alignment and size, adjusted by `i`, `b`, `small`, `big`, `sup` and `h1`
//! - **Text measurement** - the [`TextMeasurer`] capability, a fixed-ratio
//!   [`ApproximateMeasurer`], and a per-pass face cache
//! - **Line breaking** - greedy word wrapping with a forced mid-word break
//!   when a single word cannot fit
//! - **Display list** - positioned, styled text runs with a tracked maximum
//!   vertical extent
//!
//! # Not Implemented
//!
//! - CSS box generation, margins, and the cascade
//! - Bidirectional text and shaping
//! - Painting; hosts draw the display list themselves

/// Layout constants shared with renderers.
pub mod constants;
/// Positioned text runs.
pub mod display_list;
/// The tree-walking layout pass.
pub mod engine;
/// Measurement capability and face cache.
pub mod font;
/// Text styles and the style stack.
pub mod style;
/// Whitespace normalization and reference decoding ahead of line breaking.
pub mod text;

pub use display_list::{DisplayItem, DisplayList, Paint};
pub use engine::{Layout, LayoutError, layout};
pub use font::{
    ApproximateMeasurer, FaceCache, FaceId, Fit, MeasureError, TextMeasurer, fit_by_advance,
};
pub use style::{FontStyle, FontWeight, Style, StyleStack, TextAlign, VerticalAlign};
