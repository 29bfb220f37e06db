use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;

use crate::events::Event;

/// Converts a crossterm event into a gridlife event
pub fn convert_event(event: CrossTermEvent) -> Option<Event> {
    let CrossTermEvent::Key(key_event) = event else {
        return None;
    };

    // Windows reports releases too
    if key_event.kind == KeyEventKind::Release {
        return None;
    }

    match key_event {
        KeyEvent {
            code: KeyCode::Char('q') | KeyCode::Esc,
            ..
        }
        | KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => Some(Event::Exit),
        KeyEvent {
            code: KeyCode::Char(' '),
            ..
        } => Some(Event::Skip),
        _ => None,
    }
}
