//! Tree-walking line layout.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."
//!
//! This is a much smaller model than CSS: every text node flows into a
//! single column of lines, a handful of presentational tags adjust the
//! inherited [`Style`], and `br`, `h1` and `p` force line breaks.

use thiserror::Error;
use wren_common::warning::{DiagnosticSink, TerminalSink};
use wren_dom::{ElementData, NodeId, NodeTree, NodeType};

use crate::constants::{BIG_STEP, HSTEP, SMALL_STEP, VSTEP};
use crate::display_list::{DisplayItem, DisplayList, Paint};
use crate::font::{FaceCache, FaceId, MeasureError, TextMeasurer};
use crate::style::{FontStyle, FontWeight, Style, StyleStack, TextAlign, VerticalAlign};
use crate::text::prepare;

/// Errors that abort a layout pass.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The measurer could not supply a face for the active style.
    #[error("Font resolution error: {0}")]
    Resolve(#[source] MeasureError),
    /// The measurer failed while measuring a run.
    #[error("Measurement error: {0}")]
    Measure(#[source] MeasureError),
}

/// Lay out `tree` into a display list `width` units wide, reporting
/// diagnostics to the terminal.
///
/// # Errors
///
/// Returns a [`LayoutError`] if the measurer fails.
pub fn layout<M: TextMeasurer>(
    tree: &NodeTree,
    width: f32,
    measurer: M,
) -> Result<DisplayList, LayoutError> {
    Layout::new(width, measurer).run(tree)
}

/// One layout pass.
///
/// Holds the style stack, the line cursor, the pending line, and the face
/// cache. Consumed by [`Layout::run`].
pub struct Layout<M, S = TerminalSink> {
    width: f32,
    measurer: M,
    sink: S,
    styles: StyleStack,
    faces: FaceCache,
    cursor_x: f32,
    cursor_y: f32,
    line: Vec<DisplayItem>,
    display_list: DisplayList,
    previous: Option<NodeId>,
    current: Option<NodeId>,
}

impl<M: TextMeasurer> Layout<M> {
    /// A pass over a window `width` units wide.
    #[must_use]
    pub fn new(width: f32, measurer: M) -> Self {
        Self {
            width,
            measurer,
            sink: TerminalSink,
            styles: StyleStack::new(),
            faces: FaceCache::new(),
            cursor_x: HSTEP,
            cursor_y: VSTEP,
            line: Vec::new(),
            display_list: DisplayList::new(),
            previous: None,
            current: None,
        }
    }
}

impl<M: TextMeasurer, S: DiagnosticSink> Layout<M, S> {
    /// Send diagnostics to `sink` instead of the terminal.
    #[must_use]
    pub fn with_sink<T: DiagnosticSink>(self, sink: T) -> Layout<M, T> {
        Layout {
            width: self.width,
            measurer: self.measurer,
            sink,
            styles: self.styles,
            faces: self.faces,
            cursor_x: self.cursor_x,
            cursor_y: self.cursor_y,
            line: self.line,
            display_list: self.display_list,
            previous: self.previous,
            current: self.current,
        }
    }

    /// Walk `tree` from its root and return the finished display list.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the measurer fails.
    pub fn run(mut self, tree: &NodeTree) -> Result<DisplayList, LayoutError> {
        if let Some(root) = tree.root() {
            self.recurse(tree, root)?;
        }
        self.flush(tree);
        log::debug!(
            "layout produced {} items, max_y {}",
            self.display_list.len(),
            self.display_list.max_y()
        );
        Ok(self.display_list)
    }

    fn recurse(&mut self, tree: &NodeTree, id: NodeId) -> Result<(), LayoutError> {
        self.previous = self.current;
        self.current = Some(id);

        let Some(node) = tree.get(id) else {
            return Ok(());
        };
        match &node.node_type {
            NodeType::Text(text) => self.word(tree, &prepare(text)),
            NodeType::Element(element) => {
                self.open_tag(tree, element);
                for &child in tree.children(id) {
                    self.recurse(tree, child)?;
                }
                self.close_tag(tree, element);
                Ok(())
            }
        }
    }

    /// The style in effect. On underflow, report and fall back to the
    /// default style.
    fn style(&mut self, tree: &NodeTree) -> Style {
        if let Some(style) = self.styles.current() {
            return style;
        }
        let describe = |id: Option<NodeId>| {
            id.map_or_else(|| "none".to_string(), |id| tree.describe(id))
        };
        let message = format!(
            "style stack underflow (previous: {}, current: {})",
            describe(self.previous),
            describe(self.current)
        );
        self.sink.warn("Layout", &message);
        Style::default()
    }

    fn open_tag(&mut self, tree: &NodeTree, element: &ElementData) {
        match element.tag_name.as_str() {
            "i" => {
                let style = self.style(tree).with_slant(FontStyle::Italic);
                self.styles.push(style);
            }
            "b" => {
                let style = self.style(tree).with_weight(FontWeight::Bold);
                self.styles.push(style);
            }
            "small" => {
                let style = self.style(tree).with_size_delta(-SMALL_STEP);
                self.styles.push(style);
            }
            "big" => {
                let style = self.style(tree).with_size_delta(BIG_STEP);
                self.styles.push(style);
            }
            "sup" => {
                let style = self
                    .style(tree)
                    .with_vertical_align(VerticalAlign::Super)
                    .with_size_delta(-BIG_STEP);
                self.styles.push(style);
            }
            "br" => self.flush(tree),
            "h1" => {
                self.flush(tree);
                let align = if is_title(element) {
                    TextAlign::Center
                } else {
                    TextAlign::Left
                };
                let style = self
                    .style(tree)
                    .with_text_align(align)
                    .with_size_delta(BIG_STEP * 2);
                self.styles.push(style);
            }
            _ => {}
        }
    }

    fn close_tag(&mut self, tree: &NodeTree, element: &ElementData) {
        match element.tag_name.as_str() {
            "i" | "b" | "small" | "big" | "sup" => {
                let _ = self.styles.pop();
            }
            "p" => {
                self.flush(tree);
                self.cursor_y += VSTEP;
            }
            "h1" => {
                self.flush(tree);
                let _ = self.styles.pop();
            }
            _ => {}
        }
    }

    /// Break `text` into runs that fit the remaining width.
    fn word(&mut self, tree: &NodeTree, text: &str) -> Result<(), LayoutError> {
        if text.is_empty() {
            return Ok(());
        }

        let style = self.style(tree);
        let face = self
            .faces
            .get_or_resolve(&self.measurer, style.font_weight, style.font_style)
            .map_err(LayoutError::Resolve)?;
        let paint = self.paint_for(face, style)?;

        let mut rest = text;
        while !rest.is_empty() {
            let available = self.width - self.cursor_x - HSTEP;
            let fit = self
                .measurer
                .measure(face, paint.size, rest, available)
                .map_err(LayoutError::Measure)?;
            let split = byte_offset(rest, fit.chars);

            if split == rest.len() {
                self.emit(style, paint, rest, fit.width);
                break;
            }

            let prefix = &rest[..split];
            if let Some(brk) = prefix.rfind([' ', '\n']) {
                let before = &prefix[..brk];
                if !before.is_empty() {
                    let width = self.width_of(face, paint.size, before)?;
                    self.emit(style, paint, before, width);
                }
                self.flush_as(style.text_align);
                // Both break characters are one byte wide.
                rest = &rest[brk + 1..];
            } else if !self.line.is_empty() {
                // Starting a fresh line may leave enough room.
                self.flush_as(style.text_align);
            } else {
                // Nothing fits even on an empty line; break mid-word.
                let split = if split == 0 {
                    byte_offset(rest, 1)
                } else {
                    split
                };
                let forced = &rest[..split];
                let width = self.width_of(face, paint.size, forced)?;
                self.emit(style, paint, forced, width);
                self.flush_as(style.text_align);
                rest = &rest[split..];
            }
        }
        Ok(())
    }

    fn paint_for(&self, face: FaceId, style: Style) -> Result<Paint, LayoutError> {
        let size = style.font_size as f32;
        let line_spacing = self
            .measurer
            .line_spacing(face, size)
            .map_err(LayoutError::Measure)?;
        let ascent = self
            .measurer
            .ascent(face, size)
            .map_err(LayoutError::Measure)?;
        Ok(Paint {
            face,
            size,
            line_spacing,
            ascent,
        })
    }

    fn width_of(&self, face: FaceId, size: f32, text: &str) -> Result<f32, LayoutError> {
        self.measurer
            .measure(face, size, text, f32::INFINITY)
            .map(|fit| fit.width)
            .map_err(LayoutError::Measure)
    }

    /// Add a run at the cursor and advance past it.
    fn emit(&mut self, style: Style, paint: Paint, text: &str, width: f32) {
        self.line.push(DisplayItem::new(
            style,
            paint,
            self.cursor_x,
            self.cursor_y,
            text,
        ));
        self.cursor_x += width;
    }

    /// Flush using the alignment of the style in effect.
    fn flush(&mut self, tree: &NodeTree) {
        if self.line.is_empty() {
            return;
        }
        let align = self.style(tree).text_align;
        self.flush_as(align);
    }

    /// Commit the pending line at its baseline.
    fn flush_as(&mut self, align: TextAlign) {
        if self.line.is_empty() {
            return;
        }

        let line_height = self
            .line
            .iter()
            .map(|item| item.paint.line_spacing)
            .fold(f32::NEG_INFINITY, f32::max);
        let baseline = self.cursor_y + line_height;

        let offset = match align {
            TextAlign::Center => self.width / 2.0 - (self.cursor_x - HSTEP) / 2.0,
            TextAlign::Left => 0.0,
        };

        for item in self.line.drain(..) {
            let x = item.x + offset;
            let y = match item.style.vertical_align {
                VerticalAlign::Super => baseline + item.paint.ascent,
                VerticalAlign::Baseline => baseline,
            };
            self.display_list.push(item.with_position(x, y));
        }
        log::trace!("flushed line at baseline {baseline}");

        self.cursor_y = baseline;
        self.cursor_x = HSTEP;
    }
}

/// Whether an `h1` asks to be centered: a `title` attribute, or `title`
/// among its classes.
fn is_title(element: &ElementData) -> bool {
    element.attrs.contains("title") || element.has_class("title")
}

/// Byte offset of the `chars`-th character, clamped to the end.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(offset, _)| offset)
}
