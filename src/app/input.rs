use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::app::{App, Message, Model};

impl App {
    pub(super) fn handle_event(event: Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(key, model),
            Event::Paste(text) => paste_message(&text),
            Event::Resize(_, _) => Some(Message::Redraw),
            _ => None,
        }
    }

    pub(super) fn handle_key(key: event::KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => Some(Message::Quit),
            KeyCode::Char('u') if ctrl => Some(Message::ClearQuery),
            KeyCode::Char('a') if ctrl => Some(Message::CaretHome),
            KeyCode::Char('e') if ctrl => Some(Message::CaretEnd),
            KeyCode::Char('n') if ctrl => Some(Message::SelectNext),
            KeyCode::Char('p') if ctrl => Some(Message::SelectPrev),
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                Some(Message::InsertText(c.to_string()))
            }
            KeyCode::Esc => Some(Message::Quit),
            KeyCode::Enter => Some(Message::Submit),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Left => Some(Message::CaretLeft),
            KeyCode::Right => Some(Message::CaretRight),
            KeyCode::Home => Some(Message::CaretHome),
            KeyCode::End => Some(Message::CaretEnd),
            KeyCode::Down | KeyCode::Tab if !model.rows().is_empty() => Some(Message::SelectNext),
            KeyCode::Up | KeyCode::BackTab if !model.rows().is_empty() => {
                Some(Message::SelectPrev)
            }
            _ => None,
        }
    }
}

/// The query is a single line, so pasted line breaks become spaces.
fn paste_message(text: &str) -> Option<Message> {
    let flattened: String = text
        .chars()
        .filter(|&c| c != '\r')
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    if flattened.is_empty() {
        None
    } else {
        Some(Message::InsertText(flattened))
    }
}
