use tracing::debug;

use crate::app::Model;
use crate::search::is_submittable;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Query line
    /// Insert text at the caret (typing or paste)
    InsertText(String),
    /// Delete character before caret (Backspace)
    DeleteBack,
    /// Delete character at caret (Delete)
    DeleteForward,
    /// Move caret one character left
    CaretLeft,
    /// Move caret one character right
    CaretRight,
    /// Move caret to start of query (Home)
    CaretHome,
    /// Move caret to end of query (End)
    CaretEnd,
    /// Remove the whole query
    ClearQuery,

    // Search
    /// Submit the current query
    Submit,
    /// A fetch finished
    ResultsArrived {
        query: String,
        result: Result<Vec<crate::search::SearchResult>, String>,
    },
    /// Select next result row
    SelectNext,
    /// Select previous result row
    SelectPrev,

    // Window
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// No side effects should occur in this function.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Query line: host edit first, then one re-render per change.
        Message::InsertText(text) => {
            if model.input.insert_text(&text) {
                model.rerender();
            }
        }
        Message::DeleteBack => {
            if model.input.delete_backward() {
                model.rerender();
            }
        }
        Message::DeleteForward => {
            if model.input.delete_forward() {
                model.rerender();
            }
        }
        Message::ClearQuery => {
            if model.input.clear() {
                model.rerender();
            }
        }
        Message::CaretLeft => model.input.move_caret(-1),
        Message::CaretRight => model.input.move_caret(1),
        Message::CaretHome => model.input.move_caret_to_start(),
        Message::CaretEnd => model.input.move_caret_to_end(),

        // Search
        Message::Submit => {
            let query = model.query();
            if is_submittable(&query) {
                model.begin_search(query);
            }
        }
        Message::ResultsArrived { query, result } => {
            if !model.apply_results(&query, result) {
                debug!(query = %query, "dropping stale results");
            }
        }
        Message::SelectNext => model.select_next(),
        Message::SelectPrev => model.select_prev(),

        Message::Redraw => {}
        Message::Quit => {
            model.should_quit = true;
        }
    }
    model
}
