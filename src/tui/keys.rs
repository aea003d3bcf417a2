//! Physical key → logical action table.
//!
//! Which table applies depends on the modal: while typing, letters are text;
//! while confirming, only yes/no keys mean anything.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::action::{Action, KeyAction};
use crate::core::state::Modal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    Navigation,
    TextEntry,
    Confirmation,
}

impl InputContext {
    pub fn for_modal(modal: &Modal) -> Self {
        if modal.accepts_text() {
            InputContext::TextEntry
        } else if modal.is_confirmation() {
            InputContext::Confirmation
        } else {
            InputContext::Navigation
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Binding {
    code: KeyCode,
    modifiers: KeyModifiers,
    action: KeyAction,
}

const fn key(code: KeyCode, action: KeyAction) -> Binding {
    Binding {
        code,
        modifiers: KeyModifiers::NONE,
        action,
    }
}

const fn ctrl(c: char, action: KeyAction) -> Binding {
    Binding {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::CONTROL,
        action,
    }
}

pub struct KeyBindings {
    navigation: Vec<Binding>,
    confirmation: Vec<Binding>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use KeyAction::*;
        Self {
            navigation: vec![
                key(KeyCode::Up, MoveUp),
                key(KeyCode::Char('k'), MoveUp),
                key(KeyCode::Down, MoveDown),
                key(KeyCode::Char('j'), MoveDown),
                key(KeyCode::Left, MoveLeft),
                key(KeyCode::Char('h'), MoveLeft),
                key(KeyCode::Right, MoveRight),
                key(KeyCode::Char('l'), MoveRight),
                key(KeyCode::Tab, SwitchPane),
                key(KeyCode::Char('n'), New),
                key(KeyCode::Char('d'), Delete),
                key(KeyCode::Enter, Open),
                key(KeyCode::Esc, Cancel),
                key(KeyCode::Char(' '), ToggleComplete),
                key(KeyCode::Char('s'), Sort),
                key(KeyCode::Char('/'), Filter),
                key(KeyCode::Char('q'), Quit),
                ctrl('c', Quit),
            ],
            confirmation: vec![
                key(KeyCode::Char('y'), Confirm),
                key(KeyCode::Enter, Confirm),
                key(KeyCode::Char('n'), Cancel),
                key(KeyCode::Esc, Cancel),
                key(KeyCode::Char('q'), Quit),
                ctrl('c', Quit),
            ],
        }
    }
}

impl KeyBindings {
    /// Translates one key press into the action the engine should see.
    pub fn resolve(&self, context: InputContext, event: &KeyEvent) -> Option<Action> {
        match context {
            InputContext::TextEntry => Self::resolve_text(event),
            InputContext::Navigation => Self::lookup(&self.navigation, event).map(Action::Key),
            InputContext::Confirmation => Self::lookup(&self.confirmation, event).map(Action::Key),
        }
    }

    fn resolve_text(event: &KeyEvent) -> Option<Action> {
        let control = event.modifiers.contains(KeyModifiers::CONTROL);
        match event.code {
            KeyCode::Char('c') if control => Some(Action::Key(KeyAction::Quit)),
            KeyCode::Char(_) if control => None,
            KeyCode::Char(c) => Some(Action::Input(c)),
            KeyCode::Enter => Some(Action::Key(KeyAction::Confirm)),
            KeyCode::Esc => Some(Action::Key(KeyAction::Cancel)),
            KeyCode::Backspace => Some(Action::Backspace),
            _ => None,
        }
    }

    fn lookup(table: &[Binding], event: &KeyEvent) -> Option<KeyAction> {
        // Shift is implied by the character itself ('?' vs '/'), so ignore it
        let modifiers = event.modifiers.difference(KeyModifiers::SHIFT);
        table
            .iter()
            .find(|b| b.code == event.code && b.modifiers == modifiers)
            .map(|b| b.action)
    }
}
