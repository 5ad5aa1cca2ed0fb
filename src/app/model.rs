use crate::rerender::{EditCycle, HighlightContext, LiveHighlighter};
use crate::search::{DEFAULT_MAX_RESULTS, ResultView, SearchResult, visible_results};
use crate::surface::{NodeTree, capture_caret, flat_text};

/// Where the results pane stands.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsState {
    /// Nothing submitted yet.
    Idle,
    /// Waiting on the source for `query`.
    Searching { query: String },
    /// The source answered with nothing worth showing.
    NoMatches { query: String },
    /// Ranked rows for `query`.
    Rows {
        query: String,
        rows: Vec<SearchResult>,
    },
    /// The source failed.
    Failed { query: String, message: String },
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Rendering tree behind the query line
    pub input: NodeTree,
    /// Re-renders `input` after each edit
    highlighter: LiveHighlighter,
    /// Result of the most recent edit cycle
    pub last_cycle: Option<EditCycle>,
    /// Results pane state
    pub results: ResultsState,
    /// Selected row in the results table
    pub selected: Option<usize>,
    /// Maximum rows kept from a response
    pub max_results: usize,
    /// Query submitted by the last update, waiting to be handed to the fetcher
    pending_query: Option<String>,
    /// Whether quoted runs should use colours for a light background
    pub light_background: bool,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(LiveHighlighter::default())
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("query", &self.query())
            .field("caret", &self.caret())
            .field("results", &self.results)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model with an empty query line.
    pub fn new(highlighter: LiveHighlighter) -> Self {
        Self {
            input: NodeTree::new(),
            highlighter,
            last_cycle: None,
            results: ResultsState::Idle,
            selected: None,
            max_results: DEFAULT_MAX_RESULTS,
            pending_query: None,
            light_background: false,
            should_quit: false,
        }
    }

    /// Start with `query` typed in and highlighted, caret at the end.
    #[must_use]
    pub fn with_query(mut self, query: &str) -> Self {
        self.input = NodeTree::with_text(query);
        self.rerender();
        self
    }

    #[must_use]
    pub const fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub const fn with_light_background(mut self, light: bool) -> Self {
        self.light_background = light;
        self
    }

    /// Current query text.
    pub fn query(&self) -> String {
        flat_text(&self.input)
    }

    /// Caret position in the query, in characters.
    pub fn caret(&self) -> usize {
        capture_caret(&self.input)
    }

    pub const fn highlight_context(&self) -> &HighlightContext {
        self.highlighter.context()
    }

    /// Run one edit cycle on the query line.
    pub(super) fn rerender(&mut self) {
        self.last_cycle = Some(self.highlighter.on_text_changed(&mut self.input));
    }

    /// Queue `query` for the fetcher and show the pane as searching.
    pub(super) fn begin_search(&mut self, query: String) {
        self.results = ResultsState::Searching {
            query: query.clone(),
        };
        self.selected = None;
        self.pending_query = Some(query);
    }

    /// Hand the queued query to whoever performs the fetch.
    pub fn take_pending_query(&mut self) -> Option<String> {
        self.pending_query.take()
    }

    /// Apply a response if it answers the search in flight.
    ///
    /// Returns `false` for stale responses.
    pub(super) fn apply_results(
        &mut self,
        query: &str,
        result: Result<Vec<SearchResult>, String>,
    ) -> bool {
        if !matches!(&self.results, ResultsState::Searching { query: current } if current == query)
        {
            return false;
        }
        let query = query.to_string();
        self.results = match result {
            Ok(results) => match visible_results(results, self.max_results) {
                ResultView::NoMatches => ResultsState::NoMatches { query },
                ResultView::Rows(rows) => ResultsState::Rows { query, rows },
            },
            Err(message) => ResultsState::Failed { query, message },
        };
        self.selected = self.rows().first().map(|_| 0);
        true
    }

    /// Rows currently on display.
    pub fn rows(&self) -> &[SearchResult] {
        match &self.results {
            ResultsState::Rows { rows, .. } => rows,
            _ => &[],
        }
    }

    pub fn selected_row(&self) -> Option<&SearchResult> {
        self.selected.and_then(|idx| self.rows().get(idx))
    }

    pub(super) fn select_next(&mut self) {
        let count = self.rows().len();
        if count == 0 {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |idx| (idx + 1).min(count - 1)));
    }

    pub(super) fn select_prev(&mut self) {
        if self.rows().is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |idx| idx.saturating_sub(1)));
    }
}
