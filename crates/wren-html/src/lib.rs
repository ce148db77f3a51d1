//! HTML tree builder for the Wren renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Attribute parsing** - tag bodies into case-insensitive attribute maps
//! - **Tree building** - a streaming, single-pass tokenizer that builds a
//!   [`wren_dom::NodeTree`] directly, with implicit `html`/`head`/`body`,
//!   auto-closing `p`/`li`, and void elements
//! - **Character references** - named and numeric reference decoding, used by
//!   layout on text content
//!
//! # Not Implemented
//!
//! - The full WHATWG tokenizer state machine (raw text, script data, etc.)
//! - Insertion modes beyond the implicit-tag rules above
//! - Adoption agency algorithm and foster parenting

/// Attribute parsing for tag bodies.
pub mod attributes;
/// Named and numeric character reference decoding.
pub mod entities;
/// Streaming tokenizer and tree builder.
pub mod parser;

pub use attributes::parse_attributes;
pub use entities::decode_entities;
pub use parser::{IssueKind, ParseIssue, Parser, format_tree, parse, print_tree};
