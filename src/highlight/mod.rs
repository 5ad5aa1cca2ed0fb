//! Quoted-phrase highlighting for the query line.
//!
//! Scans flat text for quoted runs and describes them as [`Span`]s over
//! character offsets. Plain text is never returned by the scanner itself;
//! [`segments`] fills in the gaps when a full cover is needed.

/// Whether a span is plain text or a quoted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Plain,
    Quoted,
}

/// A half-open `[begin, end)` range of character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
    pub kind: SpanKind,
}

impl Span {
    pub const fn plain(begin: usize, end: usize) -> Self {
        Self {
            begin,
            end,
            kind: SpanKind::Plain,
        }
    }

    pub const fn quoted(begin: usize, end: usize) -> Self {
        Self {
            begin,
            end,
            kind: SpanKind::Quoted,
        }
    }

    pub const fn len(&self) -> usize {
        self.end - self.begin
    }

    pub const fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

/// Which characters may close an open quote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteMatching {
    /// Any quote character closes any opener, so `"abc'` is one run.
    #[default]
    AnyQuote,
    /// Only the opening character closes the run.
    SameChar,
}

const fn is_quote(ch: char) -> bool {
    matches!(ch, '"' | '\'')
}

/// Find quoted runs, letting `"` and `'` close each other.
///
/// An opener without a closer extends to the end of the text and ends the
/// scan.
///
/// # Example
///
/// ```
/// use quoteline::highlight::{find_quoted_spans, Span};
///
/// assert_eq!(find_quoted_spans("a \"b' c"), vec![Span::quoted(2, 5)]);
/// ```
pub fn find_quoted_spans(text: &str) -> Vec<Span> {
    find_quoted_spans_with(text, QuoteMatching::AnyQuote)
}

/// Find quoted runs using the given closing rule.
pub fn find_quoted_spans_with(text: &str, matching: QuoteMatching) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut chars = text.chars().enumerate();

    while let Some((begin, opener)) = chars.next() {
        if !is_quote(opener) {
            continue;
        }
        let closer = chars.find(|&(_, ch)| match matching {
            QuoteMatching::AnyQuote => is_quote(ch),
            QuoteMatching::SameChar => ch == opener,
        });
        match closer {
            Some((close, _)) => spans.push(Span::quoted(begin, close + 1)),
            None => {
                spans.push(Span::quoted(begin, text.chars().count()));
                break;
            }
        }
    }

    spans
}

/// Interleave `quoted` spans with the plain gaps between them.
///
/// The result covers `[0, len)` in order with no empty plain segments.
pub fn segments(len: usize, quoted: &[Span]) -> Vec<Span> {
    let mut out = Vec::with_capacity(quoted.len() * 2 + 1);
    let mut cursor = 0;
    for span in quoted {
        if span.begin > cursor {
            out.push(Span::plain(cursor, span.begin));
        }
        out.push(*span);
        cursor = span.end;
    }
    if cursor < len {
        out.push(Span::plain(cursor, len));
    }
    out
}
