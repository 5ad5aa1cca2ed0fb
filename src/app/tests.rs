use std::sync::Arc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::highlight::{QuoteMatching, Span};
use crate::rerender::{HighlightContext, LiveHighlighter, QUOTED_CLASS};
use crate::search::{Fetcher, ResultSource, SearchError, SearchResult};
use crate::surface::{NodeKind, Surface};

use super::{App, Message, Model, ResultsState, update};

fn create_test_model() -> Model {
    Model::default()
}

fn type_str(mut model: Model, text: &str) -> Model {
    for c in text.chars() {
        model = update(model, Message::InsertText(c.to_string()));
    }
    model
}

fn styled_runs(model: &Model) -> Vec<String> {
    let tree = &model.input;
    tree.children(tree.root())
        .iter()
        .filter(|&&child| tree.class(child) == Some(QUOTED_CLASS))
        .map(|&child| {
            tree.children(child)
                .iter()
                .filter_map(|&leaf| match tree.kind(leaf) {
                    Some(NodeKind::Text(text)) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

fn searching(model: Model, query: &str) -> Model {
    let model = type_str(model, query);
    let mut model = update(model, Message::Submit);
    assert_eq!(model.take_pending_query().as_deref(), Some(query));
    model
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

struct Fixed(Vec<SearchResult>);

impl ResultSource for Fixed {
    fn fetch(&self, _query: &str) -> Result<Vec<SearchResult>, SearchError> {
        Ok(self.0.clone())
    }
}

#[test]
fn test_typing_builds_query_and_moves_caret() {
    let model = type_str(create_test_model(), "abc");
    assert_eq!(model.query(), "abc");
    assert_eq!(model.caret(), 3);
    assert!(styled_runs(&model).is_empty());
}

#[test]
fn test_typing_a_quoted_run_highlights_it() {
    let model = type_str(create_test_model(), "say \"hi\" now");
    assert_eq!(model.query(), "say \"hi\" now");
    assert_eq!(styled_runs(&model), vec!["\"hi\"".to_string()]);
    assert_eq!(model.caret(), 12);
}

#[test]
fn test_unterminated_quote_highlights_to_end_while_typing() {
    let model = type_str(create_test_model(), "abc \"de");
    assert_eq!(styled_runs(&model), vec!["\"de".to_string()]);
    let cycle = model.last_cycle.clone().unwrap();
    assert_eq!(cycle.spans, vec![Span::quoted(4, 7)]);
    assert_eq!(cycle.caret, 7);
}

#[test]
fn test_typing_inside_highlight_keeps_caret() {
    let model = type_str(create_test_model(), "a \"bc\" d");
    // Move caret between b and c.
    let mut model = update(model, Message::CaretHome);
    for _ in 0..4 {
        model = update(model, Message::CaretRight);
    }
    assert_eq!(model.caret(), 4);

    let model = update(model, Message::InsertText("X".to_string()));
    assert_eq!(model.query(), "a \"bXc\" d");
    assert_eq!(model.caret(), 5);
    assert_eq!(styled_runs(&model), vec!["\"bXc\"".to_string()]);
}

#[test]
fn test_deleting_closing_quote_extends_highlight() {
    let model = type_str(create_test_model(), "\"a\" b");
    let mut model = update(model, Message::CaretHome);
    for _ in 0..3 {
        model = update(model, Message::CaretRight);
    }
    let model = update(model, Message::DeleteBack);
    assert_eq!(model.query(), "\"a b");
    assert_eq!(model.caret(), 2);
    assert_eq!(styled_runs(&model), vec!["\"a b".to_string()]);
}

#[test]
fn test_delete_forward_at_end_is_noop() {
    let model = type_str(create_test_model(), "ab");
    let before = model.last_cycle.clone();
    let model = update(model, Message::DeleteForward);
    assert_eq!(model.query(), "ab");
    assert_eq!(model.last_cycle, before);
}

#[test]
fn test_backspace_on_empty_query_does_not_rerender() {
    let model = update(create_test_model(), Message::DeleteBack);
    assert_eq!(model.query(), "");
    assert!(model.last_cycle.is_none());
}

#[test]
fn test_caret_motion_clamps() {
    let model = type_str(create_test_model(), "ab");
    let model = update(model, Message::CaretRight);
    assert_eq!(model.caret(), 2);
    let model = update(model, Message::CaretHome);
    let model = update(model, Message::CaretLeft);
    assert_eq!(model.caret(), 0);
    let model = update(model, Message::CaretEnd);
    assert_eq!(model.caret(), 2);
}

#[test]
fn test_clear_query_empties_line() {
    let model = type_str(create_test_model(), "x \"y\"");
    let model = update(model, Message::ClearQuery);
    assert_eq!(model.query(), "");
    assert_eq!(model.caret(), 0);
    assert!(styled_runs(&model).is_empty());
}

#[test]
fn test_paste_multibyte_text() {
    let model = update(
        create_test_model(),
        Message::InsertText("é \"ü\"".to_string()),
    );
    assert_eq!(model.query(), "é \"ü\"");
    assert_eq!(model.caret(), 5);
    assert_eq!(styled_runs(&model), vec!["\"ü\"".to_string()]);
}

#[test]
fn test_strict_quotes_require_same_char() {
    let highlighter = LiveHighlighter::new(HighlightContext {
        quote_matching: QuoteMatching::SameChar,
        ..HighlightContext::default()
    });
    let model = type_str(Model::new(highlighter), "\"it's\"");
    assert_eq!(styled_runs(&model), vec!["\"it's\"".to_string()]);
}

#[test]
fn test_with_query_prefills_and_highlights() {
    let model = create_test_model().with_query("find 'me'");
    assert_eq!(model.query(), "find 'me'");
    assert_eq!(model.caret(), 9);
    assert_eq!(styled_runs(&model), vec!["'me'".to_string()]);
}

#[test]
fn test_submit_blank_query_does_nothing() {
    let model = type_str(create_test_model(), "   ");
    let mut model = update(model, Message::Submit);
    assert_eq!(model.results, ResultsState::Idle);
    assert!(model.take_pending_query().is_none());
}

#[test]
fn test_submit_enters_searching() {
    let model = searching(create_test_model(), "rust");
    assert_eq!(
        model.results,
        ResultsState::Searching {
            query: "rust".to_string()
        }
    );
}

#[test]
fn test_results_arrive_and_select_first_row() {
    let model = searching(create_test_model(), "q");
    let model = update(
        model,
        Message::ResultsArrived {
            query: "q".to_string(),
            result: Ok(vec![
                SearchResult::new("a.txt", 0.9),
                SearchResult::new("b.txt", 0.5),
                SearchResult::new("c.txt", 0.0),
            ]),
        },
    );
    let ids: Vec<_> = model.rows().iter().map(|r| r.identifier.as_str()).collect();
    assert_eq!(ids, vec!["a.txt", "b.txt"]);
    assert_eq!(model.selected, Some(0));
}

#[test]
fn test_zero_best_score_shows_no_matches() {
    let model = searching(create_test_model(), "q");
    let model = update(
        model,
        Message::ResultsArrived {
            query: "q".to_string(),
            result: Ok(vec![SearchResult::new("a.txt", 0.0)]),
        },
    );
    assert_eq!(
        model.results,
        ResultsState::NoMatches {
            query: "q".to_string()
        }
    );
    assert_eq!(model.selected, None);
}

#[test]
fn test_empty_response_shows_no_matches() {
    let model = searching(create_test_model(), "q");
    let model = update(
        model,
        Message::ResultsArrived {
            query: "q".to_string(),
            result: Ok(Vec::new()),
        },
    );
    assert!(matches!(model.results, ResultsState::NoMatches { .. }));
}

#[test]
fn test_rows_capped_at_max_results() {
    let model = searching(create_test_model().with_max_results(2), "q");
    let rows = (0..5)
        .map(|i| SearchResult::new(format!("f{i}"), 1.0))
        .collect();
    let model = update(
        model,
        Message::ResultsArrived {
            query: "q".to_string(),
            result: Ok(rows),
        },
    );
    assert_eq!(model.rows().len(), 2);
}

#[test]
fn test_stale_results_are_dropped() {
    let model = searching(create_test_model(), "old");
    let model = update(model, Message::ClearQuery);
    let model = searching(model, "new");

    let model = update(
        model,
        Message::ResultsArrived {
            query: "old".to_string(),
            result: Ok(vec![SearchResult::new("stale", 1.0)]),
        },
    );
    assert_eq!(
        model.results,
        ResultsState::Searching {
            query: "new".to_string()
        }
    );
}

#[test]
fn test_failed_fetch_shows_message() {
    let model = searching(create_test_model(), "q");
    let model = update(
        model,
        Message::ResultsArrived {
            query: "q".to_string(),
            result: Err("boom".to_string()),
        },
    );
    assert_eq!(
        model.results,
        ResultsState::Failed {
            query: "q".to_string(),
            message: "boom".to_string()
        }
    );
}

#[test]
fn test_selection_moves_and_clamps() {
    let model = searching(create_test_model(), "q");
    let model = update(
        model,
        Message::ResultsArrived {
            query: "q".to_string(),
            result: Ok(vec![
                SearchResult::new("a", 3.0),
                SearchResult::new("b", 2.0),
            ]),
        },
    );
    let model = update(model, Message::SelectNext);
    assert_eq!(model.selected, Some(1));
    let model = update(model, Message::SelectNext);
    assert_eq!(model.selected, Some(1));
    assert_eq!(model.selected_row().map(|r| r.identifier.as_str()), Some("b"));
    let model = update(model, Message::SelectPrev);
    let model = update(model, Message::SelectPrev);
    assert_eq!(model.selected, Some(0));
}

#[test]
fn test_selection_ignored_without_rows() {
    let model = update(create_test_model(), Message::SelectNext);
    assert_eq!(model.selected, None);
}

#[test]
fn test_quit_sets_flag() {
    let model = update(create_test_model(), Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_submit_side_effect_fetches_and_drains() {
    let fetcher = Fetcher::new(Arc::new(Fixed(vec![SearchResult::new("hit.txt", 0.4)])));
    let model = type_str(create_test_model(), "\"exact\"");
    let mut model = update(model, Message::Submit);
    App::handle_message_side_effects(&mut model, &fetcher, &Message::Submit);
    assert!(model.take_pending_query().is_none());

    let outcome = fetcher.recv().unwrap();
    let mut model = update(
        model,
        Message::ResultsArrived {
            query: outcome.query,
            result: outcome.result.map_err(|err| err.to_string()),
        },
    );
    assert_eq!(model.rows().len(), 1);
    assert!(!App::drain_fetch_outcomes(&mut model, &fetcher));
}

#[test]
fn test_key_mapping() {
    let model = create_test_model();
    assert_eq!(
        App::handle_key(key(KeyCode::Char('"')), &model),
        Some(Message::InsertText("\"".to_string()))
    );
    assert_eq!(App::handle_key(key(KeyCode::Enter), &model), Some(Message::Submit));
    assert_eq!(App::handle_key(key(KeyCode::Esc), &model), Some(Message::Quit));
    assert_eq!(App::handle_key(ctrl('c'), &model), Some(Message::Quit));
    assert_eq!(App::handle_key(ctrl('u'), &model), Some(Message::ClearQuery));
    assert_eq!(App::handle_key(key(KeyCode::Backspace), &model), Some(Message::DeleteBack));
    assert_eq!(App::handle_key(key(KeyCode::Home), &model), Some(Message::CaretHome));
}

#[test]
fn test_arrow_keys_select_only_with_rows() {
    let model = create_test_model();
    assert_eq!(App::handle_key(key(KeyCode::Down), &model), None);

    let model = searching(model, "q");
    let model = update(
        model,
        Message::ResultsArrived {
            query: "q".to_string(),
            result: Ok(vec![SearchResult::new("a", 1.0)]),
        },
    );
    assert_eq!(App::handle_key(key(KeyCode::Down), &model), Some(Message::SelectNext));
    assert_eq!(App::handle_key(key(KeyCode::Up), &model), Some(Message::SelectPrev));
}

#[test]
fn test_key_release_is_ignored() {
    let model = create_test_model();
    let mut release = key(KeyCode::Char('a'));
    release.kind = KeyEventKind::Release;
    assert_eq!(App::handle_event(Event::Key(release), &model), None);
}

#[test]
fn test_paste_flattens_newlines() {
    let model = create_test_model();
    assert_eq!(
        App::handle_event(Event::Paste("a\r\nb".to_string()), &model),
        Some(Message::InsertText("a b".to_string()))
    );
    assert_eq!(App::handle_event(Event::Paste(String::new()), &model), None);
}
