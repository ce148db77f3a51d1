//! Positioned text runs produced by layout.
//!
//! The display list is the renderer contract: each [`DisplayItem`] carries
//! everything needed to draw one run without consulting the tree again.

use serde::Serialize;

use crate::font::FaceId;
use crate::style::Style;

/// Paint handle for a run: the face plus the metrics layout used for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Paint {
    /// Face handle from the measurer.
    pub face: FaceId,
    /// Font size in device units.
    pub size: f32,
    /// Line spacing reported for this face and size.
    pub line_spacing: f32,
    /// Signed ascent reported for this face and size (negative).
    pub ascent: f32,
}

/// One positioned run of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayItem {
    /// Style the run was laid out with.
    pub style: Style,
    /// Face and metrics to paint with.
    pub paint: Paint,
    /// Left edge.
    pub x: f32,
    /// Baseline, already adjusted for superscript.
    pub y: f32,
    /// The run's text.
    pub text: String,
}

impl DisplayItem {
    /// A new item at `(x, y)`.
    #[must_use]
    pub fn new(style: Style, paint: Paint, x: f32, y: f32, text: impl Into<String>) -> Self {
        Self {
            style,
            paint,
            x,
            y,
            text: text.into(),
        }
    }

    /// The same run moved to `(x, y)`.
    #[must_use]
    pub fn with_position(self, x: f32, y: f32) -> Self {
        Self { x, y, ..self }
    }
}

/// Ordered display items plus the largest `y` among them.
///
/// `max_y` is 0 for an empty list and otherwise equals the maximum item `y`
/// after every mutation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayList {
    items: Vec<DisplayItem>,
    max_y: f32,
}

impl DisplayList {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item.
    pub fn push(&mut self, item: DisplayItem) {
        self.max_y = if self.items.is_empty() {
            item.y
        } else {
            self.max_y.max(item.y)
        };
        self.items.push(item);
    }

    /// Remove and return the item at `index`, or `None` if out of range.
    ///
    /// Only rescans when the removed item held the maximum.
    #[allow(clippy::float_cmp)]
    pub fn remove(&mut self, index: usize) -> Option<DisplayItem> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        if item.y == self.max_y {
            self.max_y = self
                .items
                .iter()
                .map(|item| item.y)
                .reduce(f32::max)
                .unwrap_or(0.0);
        }
        Some(item)
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.max_y = 0.0;
    }

    /// Largest item `y`, or 0 when empty.
    #[must_use]
    pub const fn max_y(&self) -> f32 {
        self.max_y
    }

    /// The items in paint order.
    #[must_use]
    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    /// Iterate the items in paint order.
    pub fn iter(&self) -> std::slice::Iter<'_, DisplayItem> {
        self.items.iter()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The texts of all items joined with `sep`.
    #[must_use]
    pub fn joined_text(&self, sep: &str) -> String {
        self.items
            .iter()
            .map(|item| item.text.as_str())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl<'a> IntoIterator for &'a DisplayList {
    type Item = &'a DisplayItem;
    type IntoIter = std::slice::Iter<'a, DisplayItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_at(y: f32) -> DisplayItem {
        let paint = Paint {
            face: FaceId(0),
            size: 32.0,
            line_spacing: 38.4,
            ascent: -25.6,
        };
        DisplayItem::new(Style::default(), paint, 10.0, y, "x")
    }

    #[test]
    fn empty_list_has_zero_max() {
        let list = DisplayList::new();
        assert!(list.is_empty());
        assert!(list.max_y().abs() < f32::EPSILON);
    }

    #[test]
    fn max_tracks_push_and_remove() {
        let mut list = DisplayList::new();
        list.push(item_at(5.0));
        list.push(item_at(40.0));
        list.push(item_at(20.0));
        assert!((list.max_y() - 40.0).abs() < f32::EPSILON);

        let removed = list.remove(1).unwrap();
        assert!((removed.y - 40.0).abs() < f32::EPSILON);
        assert!((list.max_y() - 20.0).abs() < f32::EPSILON);

        assert!(list.remove(7).is_none());
        let _ = list.remove(0).unwrap();
        let _ = list.remove(0).unwrap();
        assert!(list.max_y().abs() < f32::EPSILON);
    }

    #[test]
    fn negative_positions_are_tracked() {
        let mut list = DisplayList::new();
        list.push(item_at(-8.0));
        assert!((list.max_y() + 8.0).abs() < f32::EPSILON);
        list.clear();
        assert!(list.max_y().abs() < f32::EPSILON);
    }

    #[test]
    fn with_position_keeps_the_rest() {
        let moved = item_at(1.0).with_position(3.0, 4.0);
        assert!((moved.x - 3.0).abs() < f32::EPSILON);
        assert!((moved.y - 4.0).abs() < f32::EPSILON);
        assert_eq!(moved.text, "x");
    }
}
