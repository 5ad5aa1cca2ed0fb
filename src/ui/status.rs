use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ResultsState};
use crate::highlight::QuoteMatching;

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(status_text(model))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status, area);
}

pub(super) fn status_text(model: &Model) -> String {
    let result_info = match &model.results {
        ResultsState::Rows { rows, .. } => {
            let position = model.selected.map_or(0, |idx| idx + 1);
            format!("  [{position}/{}]", rows.len())
        }
        ResultsState::Searching { .. } => "  [searching]".to_string(),
        ResultsState::NoMatches { .. } => "  [0 results]".to_string(),
        ResultsState::Failed { .. } => "  [error]".to_string(),
        ResultsState::Idle => String::new(),
    };
    let strict = match model.highlight_context().quote_matching {
        QuoteMatching::SameChar => " [strict quotes]",
        QuoteMatching::AnyQuote => "",
    };

    // Same display column the query line draws the caret at.
    let (_, caret_col) = super::query_line(model);
    format!(
        " quoteline  Col {}{}{}  Enter:search  Esc:quit",
        caret_col + 1,
        result_info,
        strict
    )
}
