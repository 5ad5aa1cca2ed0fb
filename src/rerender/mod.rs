//! Live re-rendering of the query line.
//!
//! Every text change runs one synchronous edit cycle: read the flat text,
//! capture the caret, find quoted runs, rebuild the root's children and put
//! the caret back at the same flat offset.

use tracing::trace;

use crate::highlight::{QuoteMatching, Span, SpanKind, find_quoted_spans_with, segments};
use crate::surface::{Fragment, Surface, byte_index, capture_caret, flat_text, restore_caret};

/// Class attached to the inline elements that wrap quoted runs.
pub const QUOTED_CLASS: &str = "string-literal";

/// Settings the controller is built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightContext {
    /// Class given to each styled element.
    pub quoted_class: String,
    /// Closing rule for quotes.
    pub quote_matching: QuoteMatching,
}

impl Default for HighlightContext {
    fn default() -> Self {
        Self {
            quoted_class: QUOTED_CLASS.to_string(),
            quote_matching: QuoteMatching::AnyQuote,
        }
    }
}

/// What one edit cycle saw and produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCycle {
    /// Flat text at the start of the cycle.
    pub text: String,
    /// Caret offset after the rebuild.
    pub caret: usize,
    /// Quoted spans found in `text`.
    pub spans: Vec<Span>,
}

/// Rebuilds a surface's content so quoted runs are wrapped in styled elements.
#[derive(Debug, Clone, Default)]
pub struct LiveHighlighter {
    context: HighlightContext,
}

impl LiveHighlighter {
    pub const fn new(context: HighlightContext) -> Self {
        Self { context }
    }

    pub const fn context(&self) -> &HighlightContext {
        &self.context
    }

    /// Handle a text-change notification from the host.
    ///
    /// Holding `&mut S` for the whole cycle keeps any other handler from
    /// seeing the tree between the rebuild and the caret restore.
    pub fn on_text_changed<S: Surface + ?Sized>(&self, surface: &mut S) -> EditCycle {
        let text = flat_text(&*surface);
        let offset = capture_caret(&*surface);
        let spans = find_quoted_spans_with(&text, self.context.quote_matching);

        let fragment = self.build_fragment(&text, &spans);
        let root = surface.root();
        surface.replace_children(root, fragment);
        let caret = restore_caret(surface, offset);

        trace!(
            chars = text.chars().count(),
            quoted = spans.len(),
            caret,
            "query line re-rendered"
        );

        EditCycle { text, caret, spans }
    }

    /// Build the detached replacement for the root's children.
    pub fn build_fragment(&self, text: &str, spans: &[Span]) -> Fragment {
        let mut fragment = Fragment::new();
        let len = text.chars().count();
        for segment in segments(len, spans) {
            let start = byte_index(text, segment.begin);
            let end = byte_index(text, segment.end);
            let piece = &text[start..end];
            match segment.kind {
                SpanKind::Plain => fragment.push_text(piece),
                SpanKind::Quoted => fragment.push_styled(&self.context.quoted_class, piece),
            }
        }
        fragment
    }
}
