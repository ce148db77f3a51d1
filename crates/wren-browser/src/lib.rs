//! High-level pipeline API for the Wren renderer.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - read markup from a file or an inline
//!   `data:text/html` URL
//! - **Tree Building** - parse the markup and keep the recovery issues
//! - **Font Metrics** - a fontdue-backed [`FontdueMeasurer`] for layout
//! - **Layout** - run the line layout pass into a display list
//!
//! # Not Yet Implemented
//!
//! - Network fetching (`http://`, `https://`)
//! - Painting the display list to pixels

pub mod fonts;

pub use fonts::{FontError, FontdueMeasurer};
pub use wren_dom as dom;
pub use wren_html as html;
pub use wren_layout as layout;

use std::fs;

use thiserror::Error;
use wren_common::data_url::{DataUrl, DataUrlError};
use wren_common::warning::DiagnosticSink;
use wren_dom::NodeTree;
use wren_html::Parser;
use wren_layout::{DisplayList, Layout, LayoutError, TextMeasurer};

/// A loaded and parsed document.
pub struct LoadedDocument {
    /// Original markup.
    pub html_source: String,

    /// Source path or URL. Empty for documents parsed from a string.
    pub source_path: String,

    /// Parsed node tree.
    pub tree: NodeTree,

    /// Recoveries made while building the tree.
    pub parse_issues: Vec<String>,
}

impl LoadedDocument {
    /// Lay the document out `width` units wide, reporting diagnostics to the
    /// terminal.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the measurer fails.
    pub fn layout<M: TextMeasurer>(
        &self,
        width: f32,
        measurer: M,
    ) -> Result<DisplayList, LayoutError> {
        Layout::new(width, measurer).run(&self.tree)
    }

    /// Lay the document out with diagnostics sent to `sink`.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the measurer fails.
    pub fn layout_with_sink<M: TextMeasurer, S: DiagnosticSink>(
        &self,
        width: f32,
        measurer: M,
        sink: S,
    ) -> Result<DisplayList, LayoutError> {
        Layout::new(width, measurer).with_sink(sink).run(&self.tree)
    }
}

/// Error type for document loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read a file.
    #[error("File error: failed to read '{path}': {source}")]
    File {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Malformed `data:` URL.
    #[error("Data URL error: {0}")]
    DataUrl(#[from] DataUrlError),
    /// A `data:` URL whose media type is not HTML.
    #[error("Data URL error: unsupported media type '{0}'")]
    UnsupportedMediaType(String),
    /// A remote URL; only local sources are supported.
    #[error("Network error: fetching '{0}' is not supported")]
    Network(String),
}

/// Read markup from a file path or a `data:text/html` URL.
///
/// Data URLs without a media type default to HTML. Bytes that are not valid
/// UTF-8 are replaced with U+FFFD.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file cannot be read, the data URL is
/// malformed or not HTML, or the source is a network URL.
pub fn load_source(path: &str) -> Result<String, LoadError> {
    if path.starts_with("data:") {
        let url = DataUrl::parse(path)?;
        if !url.media_type.is_empty() && url.media_type != "text/html" {
            return Err(LoadError::UnsupportedMediaType(url.media_type));
        }
        let bytes = url.decode()?;
        return Ok(String::from_utf8_lossy(&bytes).into_owned());
    }

    if path.starts_with("http://") || path.starts_with("https://") {
        return Err(LoadError::Network(path.to_string()));
    }

    fs::read_to_string(path).map_err(|source| LoadError::File {
        path: path.to_string(),
        source,
    })
}

/// Load and parse a document from a file path or data URL.
///
/// # Errors
///
/// Returns a [`LoadError`] if the source cannot be read.
pub fn load_document(path: &str) -> Result<LoadedDocument, LoadError> {
    let html_source = load_source(path)?;
    let mut doc = parse_html_string(&html_source);
    doc.source_path = path.to_string();
    Ok(doc)
}

/// Parse a markup string into a [`LoadedDocument`].
#[must_use]
pub fn parse_html_string(html: &str) -> LoadedDocument {
    let (tree, issues) = Parser::new().run_with_issues(html.chars());
    let parse_issues = issues.iter().map(ToString::to_string).collect();
    log::debug!("parsed {} nodes", tree.len());

    LoadedDocument {
        html_source: html.to_string(),
        source_path: String::new(),
        tree,
        parse_issues,
    }
}
