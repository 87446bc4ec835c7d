use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Free scroll, same as one wheel notch
    ScrollDown,
    ScrollUp,
    /// Jump to a chapter by position
    JumpTo(usize),
    JumpFirst,
    JumpLast,
    FocusLeft,
    FocusRight,
    ToggleFocus,
    MoveUp,
    MoveDown,
    /// Jump to the chapter under the cursor
    Select,
    ToggleSound,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Free scrolling
        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Char(' '), KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::PageDown, _) => Action::ScrollDown,
        (KeyCode::PageUp, _) => Action::ScrollUp,

        // Cursor inside the focused list
        (KeyCode::Down, KeyModifiers::NONE) => Action::MoveDown,
        (KeyCode::Up, KeyModifiers::NONE) => Action::MoveUp,
        (KeyCode::Enter, KeyModifiers::NONE) => Action::Select,

        // Switching lists
        (KeyCode::Char('h'), KeyModifiers::NONE) => Action::FocusLeft,
        (KeyCode::Char('l'), KeyModifiers::NONE) => Action::FocusRight,
        (KeyCode::Left, KeyModifiers::NONE) => Action::FocusLeft,
        (KeyCode::Right, KeyModifiers::NONE) => Action::FocusRight,
        (KeyCode::Tab, _) => Action::ToggleFocus,

        // Direct jumps: 1-9 are chapters one to nine, 0 is the tenth
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::JumpTo(c as usize - '1' as usize)
        }
        (KeyCode::Char('0'), KeyModifiers::NONE) => Action::JumpTo(9),
        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => Action::JumpFirst,
        (KeyCode::Char('G'), KeyModifiers::SHIFT) | (KeyCode::End, _) => Action::JumpLast,

        (KeyCode::Char('s'), KeyModifiers::NONE) => Action::ToggleSound,

        _ => Action::None,
    }
}

/// Apply an action to the application state
pub fn apply_action(app: &mut App, action: Action) {
    if action != Action::None && action != Action::ToggleSound {
        app.clear_status();
    }
    match action {
        Action::Quit => app.quit(),
        Action::ScrollDown => app.scroll(true),
        Action::ScrollUp => app.scroll(false),
        Action::JumpTo(index) => app.jump(index),
        Action::JumpFirst => app.jump_first(),
        Action::JumpLast => app.jump_last(),
        Action::FocusLeft => app.focus_left(),
        Action::FocusRight => app.focus_right(),
        Action::ToggleFocus => app.toggle_focus(),
        Action::MoveUp => app.move_up(),
        Action::MoveDown => app.move_down(),
        Action::Select => app.jump_to_cursor(),
        Action::ToggleSound => app.toggle_sound(),
        Action::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use scrollreel_core::AppConfig;
    use std::sync::Arc;

    fn app() -> App {
        App::new(Arc::new(AppConfig::default()), Theme::default()).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_digit_jumps() {
        assert_eq!(handle_key_event(key(KeyCode::Char('1'))), Action::JumpTo(0));
        assert_eq!(handle_key_event(key(KeyCode::Char('4'))), Action::JumpTo(3));
        assert_eq!(handle_key_event(key(KeyCode::Char('0'))), Action::JumpTo(9));
    }

    #[test]
    fn test_scroll_and_quit_keys() {
        assert_eq!(handle_key_event(key(KeyCode::Char('j'))), Action::ScrollDown);
        assert_eq!(handle_key_event(key(KeyCode::PageUp)), Action::ScrollUp);
        assert_eq!(handle_key_event(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Action::JumpLast
        );
        assert_eq!(handle_key_event(key(KeyCode::Char('x'))), Action::None);
    }

    #[test]
    fn test_apply_focus_and_select() {
        let mut app = app();
        apply_action(&mut app, Action::ToggleFocus);
        assert_eq!(app.focus, crate::app::Focus::Right);
        apply_action(&mut app, Action::MoveDown);
        apply_action(&mut app, Action::Select);
        assert!(app.navigator.is_in_flight());
        assert_eq!(app.navigator.active_request().map(|r| r.to), Some(1));
    }
}
