use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use unicode_width::UnicodeWidthStr;

use crate::app::{Model, ResultsState};
use crate::surface::{NodeId, NodeKind, NodeTree, Surface, byte_index};

use super::{QUERY_HEIGHT, status, style};

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(QUERY_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_query(model, frame, chunks[0]);
    render_results(model, frame, chunks[1]);
    status::render_status_bar(model, frame, chunks[2]);
}

fn render_query(model: &Model, frame: &mut Frame, area: Rect) {
    let block = Block::default().title("Query").borders(Borders::ALL);
    let inner_width = usize::from(block.inner(area).width);
    let (line, caret_col) = query_line(model);

    // Keep the caret cell inside the box.
    let scroll = (caret_col + 1).saturating_sub(inner_width);
    let scroll = u16::try_from(scroll).unwrap_or(u16::MAX);

    let query = Paragraph::new(line).block(block).scroll((0, scroll));
    frame.render_widget(query, area);
}

/// Draw the query line from the rendering tree.
///
/// Returns the line and the display column of the caret cell, which is
/// drawn reversed. A caret at the end gets a trailing blank cell.
pub fn query_line(model: &Model) -> (Line<'static>, usize) {
    let caret = model.caret();
    let mut spans = Vec::new();
    let mut seen = 0;
    let mut col = 0;
    let mut caret_col = None;

    for (text, seg_style) in styled_segments(&model.input, model.light_background) {
        let len = text.chars().count();
        if caret_col.is_none() && caret < seen + len {
            let local = caret - seen;
            let at = byte_index(&text, local);
            let next = byte_index(&text, local + 1);
            let (before, cursor_char, after) = (&text[..at], &text[at..next], &text[next..]);

            if !before.is_empty() {
                spans.push(Span::styled(before.to_string(), seg_style));
            }
            caret_col = Some(col + before.width());
            spans.push(Span::styled(
                cursor_char.to_string(),
                seg_style.patch(style::caret_style()),
            ));
            if !after.is_empty() {
                spans.push(Span::styled(after.to_string(), seg_style));
            }
        } else {
            spans.push(Span::styled(text.clone(), seg_style));
        }
        col += text.width();
        seen += len;
    }

    let caret_col = caret_col.unwrap_or_else(|| {
        spans.push(Span::styled(" ", style::caret_style()));
        col
    });
    (Line::from(spans), caret_col)
}

/// Text leaves of the tree in document order, each with the style of the
/// elements around it.
fn styled_segments(tree: &NodeTree, light_bg: bool) -> Vec<(String, Style)> {
    let mut out = Vec::new();
    collect_segments(tree, tree.root(), Style::default(), light_bg, &mut out);
    out
}

fn collect_segments(
    tree: &NodeTree,
    node: NodeId,
    inherited: Style,
    light_bg: bool,
    out: &mut Vec<(String, Style)>,
) {
    for &child in tree.children(node) {
        match tree.kind(child) {
            Some(NodeKind::Text(text)) if !text.is_empty() => out.push((text.clone(), inherited)),
            Some(NodeKind::Element { class }) => {
                let nested = class.as_deref().map_or(inherited, |class| {
                    inherited.patch(style::style_for_class(class, light_bg))
                });
                collect_segments(tree, child, nested, light_bg, out);
            }
            _ => {}
        }
    }
}

fn render_results(model: &Model, frame: &mut Frame, area: Rect) {
    let light_bg = model.light_background;
    let block = Block::default().title("Results").borders(Borders::ALL);

    let message = match &model.results {
        ResultsState::Rows { rows, .. } => {
            let table_rows: Vec<Row> = rows
                .iter()
                .map(|result| {
                    Row::new([
                        Cell::from(format!("{:>7.3}", result.score))
                            .style(style::score_style(light_bg)),
                        Cell::from(result.identifier.clone()),
                    ])
                })
                .collect();
            let header = Row::new(["  Score", "Identifier"])
                .style(Style::default().add_modifier(Modifier::BOLD));
            let table = Table::new(table_rows, [Constraint::Length(8), Constraint::Min(1)])
                .header(header)
                .block(block)
                .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            let mut state = TableState::default().with_selected(model.selected);
            frame.render_stateful_widget(table, area, &mut state);
            return;
        }
        ResultsState::Idle => Line::styled(
            "Type a query and press Enter to search",
            style::hint_style(light_bg),
        ),
        ResultsState::Searching { query } => Line::styled(
            format!("Searching for {query} ..."),
            style::hint_style(light_bg),
        ),
        ResultsState::NoMatches { .. } => Line::raw("No results :("),
        ResultsState::Failed { message, .. } => {
            Line::styled(format!("Search failed: {message}"), style::error_style())
        }
    };

    frame.render_widget(Paragraph::new(message).block(block), area);
}
