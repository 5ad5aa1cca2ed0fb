// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. search::SearchError)
    clippy::module_name_repetitions
)]

//! # Quoteline
//!
//! A search box that highlights quoted phrases as you type.
//!
//! Quoteline keeps a single-line query in a small rendering tree and, on
//! every edit, rebuilds that tree so each quoted run (`"..."` or `'...'`)
//! sits in its own styled element, without moving the caret. Submitted
//! queries go to an external ranking program whose JSON answer is shown
//! as a results table.
//!
//! ## Architecture
//!
//! Quoteline uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`surface`]: Rendering tree abstraction and caret mapping
//! - [`highlight`]: Quoted span tokenizer
//! - [`rerender`]: Live highlight controller (one edit cycle per change)
//! - [`search`]: Result sources and the background fetcher
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved command-line defaults

pub mod app;
pub mod config;
pub mod highlight;
pub mod rerender;
pub mod search;
pub mod surface;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::highlight::{QuoteMatching, Span, SpanKind, find_quoted_spans};
    pub use crate::rerender::{HighlightContext, LiveHighlighter};
    pub use crate::surface::{Caret, Fragment, NodeTree, Surface};
}
