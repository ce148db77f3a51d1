//! Common utilities for the Wren renderer.
//!
//! This crate provides shared infrastructure used by all pipeline stages:
//! - **Warning System** - colored, de-duplicated terminal output and the
//!   injectable [`warning::DiagnosticSink`] used by layout
//! - **Data URLs** - decoding of inline `data:` documents

pub mod data_url;
pub mod warning;
