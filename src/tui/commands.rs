//! # Key Mapping
//!
//! Translates raw terminal key events into [`CommandEvent`]s. The mapping
//! is focus-sensitive: Enter submits whichever form owns the focused
//! input, matching the save-on-Enter / delete-on-Enter bindings of the
//! dashboard.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::tui::events::{CommandEvent, InputField};

/// Stateless registry mapping key events to command events.
pub struct KeymapRegistry;

impl KeymapRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Map one key event, given the currently focused input.
    ///
    /// Returns an empty vector for keys the dashboard does not bind.
    pub fn process_key(&self, key: KeyEvent, focused: InputField) -> Vec<CommandEvent> {
        // Key release/repeat events would double every keystroke on
        // platforms that report them.
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => vec![CommandEvent::QuitRequested],
                KeyCode::Char('r') => vec![CommandEvent::RefreshEntriesRequested],
                KeyCode::Char('s') => vec![CommandEvent::FetchStatsRequested],
                _ => Vec::new(),
            };
        }

        match key.code {
            KeyCode::Esc => vec![CommandEvent::QuitRequested],
            KeyCode::Tab => vec![CommandEvent::FocusNextRequested],
            KeyCode::BackTab => vec![CommandEvent::FocusPreviousRequested],
            KeyCode::Backspace => vec![CommandEvent::DeleteCharRequested],
            KeyCode::Enter => match focused {
                InputField::SaveKey | InputField::SaveValue => {
                    vec![CommandEvent::SaveRequested]
                }
                InputField::DeleteKey => vec![CommandEvent::DeleteEntryRequested],
            },
            KeyCode::Char(ch) => vec![CommandEvent::InsertCharRequested { ch }],
            _ => Vec::new(),
        }
    }
}

impl Default for KeymapRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_enter_in_save_fields_submits_save() {
        let registry = KeymapRegistry::new();
        for field in [InputField::SaveKey, InputField::SaveValue] {
            let events = registry.process_key(key(KeyCode::Enter), field);
            assert_eq!(events, vec![CommandEvent::SaveRequested]);
        }
    }

    #[test]
    fn test_enter_in_delete_field_submits_delete() {
        let registry = KeymapRegistry::new();
        let events = registry.process_key(key(KeyCode::Enter), InputField::DeleteKey);
        assert_eq!(events, vec![CommandEvent::DeleteEntryRequested]);
    }

    #[test]
    fn test_plain_characters_insert_into_focused_input() {
        let registry = KeymapRegistry::new();
        let events = registry.process_key(key(KeyCode::Char('x')), InputField::SaveKey);
        assert_eq!(events, vec![CommandEvent::InsertCharRequested { ch: 'x' }]);
    }

    #[test]
    fn test_tab_and_backtab_move_focus() {
        let registry = KeymapRegistry::new();
        assert_eq!(
            registry.process_key(key(KeyCode::Tab), InputField::SaveKey),
            vec![CommandEvent::FocusNextRequested]
        );
        assert_eq!(
            registry.process_key(key(KeyCode::BackTab), InputField::SaveKey),
            vec![CommandEvent::FocusPreviousRequested]
        );
    }

    #[test]
    fn test_control_bindings() {
        let registry = KeymapRegistry::new();
        assert_eq!(
            registry.process_key(ctrl('r'), InputField::SaveKey),
            vec![CommandEvent::RefreshEntriesRequested]
        );
        assert_eq!(
            registry.process_key(ctrl('s'), InputField::SaveKey),
            vec![CommandEvent::FetchStatsRequested]
        );
        assert_eq!(
            registry.process_key(ctrl('c'), InputField::SaveKey),
            vec![CommandEvent::QuitRequested]
        );
    }

    #[test]
    fn test_esc_quits() {
        let registry = KeymapRegistry::new();
        assert_eq!(
            registry.process_key(key(KeyCode::Esc), InputField::DeleteKey),
            vec![CommandEvent::QuitRequested]
        );
    }

    #[test]
    fn test_unbound_keys_produce_nothing() {
        let registry = KeymapRegistry::new();
        assert!(registry
            .process_key(key(KeyCode::F(5)), InputField::SaveKey)
            .is_empty());
        assert!(registry
            .process_key(ctrl('z'), InputField::SaveKey)
            .is_empty());
    }

    #[test]
    fn test_release_events_are_ignored() {
        let registry = KeymapRegistry::new();
        let mut release = key(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;
        assert!(registry.process_key(release, InputField::SaveKey).is_empty());
    }
}
