//! Layout constants shared with renderers.

/// Left and top inset of the content area, in device units.
pub const HSTEP: f32 = 10.0;

/// Base font size, in device units.
pub const FONT_SIZE: i32 = 32;

/// Extra vertical gap added after a paragraph closes.
pub const VSTEP: f32 = 32.0;

/// Font-size decrement for `<small>`.
pub const SMALL_STEP: i32 = FONT_SIZE / 8;

/// Font-size increment for `<big>`, and the decrement for `<sup>`.
pub const BIG_STEP: i32 = FONT_SIZE / 4;

/// Smallest font size a derived style may have.
pub const MIN_FONT_SIZE: i32 = 1;

/// Content width used when the host doesn't supply one.
pub const DEFAULT_WIDTH: f32 = 800.0;
