//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`style`]: Theming and colors
//! - the query line, drawn by walking the rendering tree
//! - the results table and status bar

pub mod style;

mod render;
mod status;

pub use render::{query_line, render};

/// Rows taken by the bordered query box.
pub const QUERY_HEIGHT: u16 = 3;
