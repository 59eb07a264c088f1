//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`].
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in `ui::draw_status_bar`.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_tab(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.previous_tab(),
        KeyCode::Char(c @ '1'..='9') => app.select_tab(c as usize - '1' as usize),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    use crate::app::{sweep, test_registry};
    use crate::source::EndpointKey;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_and_esc_quit() {
        let registry = test_registry();
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = App::new(&registry, "http://test");
            handle_key_event(&mut app, press(code));
            assert!(app.quit);
        }
    }

    #[test]
    fn release_events_are_ignored() {
        let registry = test_registry();
        let mut app = App::new(&registry, "http://test");
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Release);

        handle_key_event(&mut app, release);
        assert!(!app.quit);
    }

    #[test]
    fn tab_keys_switch_endpoint() {
        let registry = test_registry();
        let mut app = App::new(&registry, "http://test");

        handle_key_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.active_key(), EndpointKey::Tensorboards);

        handle_key_event(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.active_key(), EndpointKey::Sweeps);

        handle_key_event(&mut app, press(KeyCode::Char('3')));
        assert_eq!(app.active_key(), EndpointKey::Data);

        handle_key_event(&mut app, press(KeyCode::Char('9')));
        assert_eq!(app.active_key(), EndpointKey::Data);
    }

    #[test]
    fn j_and_k_scroll() {
        let registry = test_registry();
        let mut app = App::new(&registry, "http://test");
        registry
            .endpoint(EndpointKey::Sweeps)
            .channel
            .publish(vec![sweep("a", "running"), sweep("b", "running")]);
        app.refresh();

        handle_key_event(&mut app, press(KeyCode::Char('j')));
        handle_key_event(&mut app, press(KeyCode::Char('j')));
        assert_eq!(app.active_tab().list_state.selected(), Some(1));

        handle_key_event(&mut app, press(KeyCode::Char('k')));
        assert_eq!(app.active_tab().list_state.selected(), Some(0));
    }
}
