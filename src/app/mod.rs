//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, ResultsState};
pub use update::{Message, update};

use std::sync::Arc;

use crate::rerender::HighlightContext;
use crate::search::{DEFAULT_MAX_RESULTS, ResultSource, Unconfigured};

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    source: Arc<dyn ResultSource>,
    highlight: HighlightContext,
    max_results: usize,
    initial_query: Option<String>,
    light_background: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Arc::new(Unconfigured))
    }
}

impl App {
    /// Create a new application that asks `source` for results.
    pub fn new(source: Arc<dyn ResultSource>) -> Self {
        Self {
            source,
            highlight: HighlightContext::default(),
            max_results: DEFAULT_MAX_RESULTS,
            initial_query: None,
            light_background: false,
        }
    }

    /// Set how quoted runs are found and tagged.
    #[must_use]
    pub fn with_highlight(mut self, highlight: HighlightContext) -> Self {
        self.highlight = highlight;
        self
    }

    /// Cap the number of result rows.
    #[must_use]
    pub const fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Pre-fill the query line.
    #[must_use]
    pub fn with_initial_query(mut self, query: Option<String>) -> Self {
        self.initial_query = query;
        self
    }

    /// Use colours suited to a light terminal background.
    #[must_use]
    pub const fn with_light_background(mut self, light: bool) -> Self {
        self.light_background = light;
        self
    }
}

#[cfg(test)]
mod tests;
