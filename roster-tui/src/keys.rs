//! Keybinding definitions for the console.
//!
//! Two maps: [`map_key`] for browsing lists, [`map_text_key`] while a form,
//! the login screen, or an inline editor has focus.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    SwitchView(usize),
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    NewItem,
    EditItem,
    DeleteItem,
    /// Open the selected registry's entries.
    ManageEntries,
    /// Leave the entries view for the registries list.
    Back,
    /// Cycle the sort column.
    Sort,
    /// Flip the sort direction of the current column.
    ToggleSortOrder,
    /// Cycle the page size.
    PageSize,
    OpenFilter,
    OpenHelp,
    Refresh,
    Logout,
    Confirm,
    Cancel,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('l') => Some(Action::Logout),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('/') => Some(Action::OpenFilter),
        KeyCode::Char('n') => Some(Action::NewItem),
        KeyCode::Char('e') => Some(Action::EditItem),
        KeyCode::Char('d') => Some(Action::DeleteItem),
        KeyCode::Char('m') => Some(Action::ManageEntries),
        KeyCode::Char('b') | KeyCode::Backspace => Some(Action::Back),
        KeyCode::Char('s') => Some(Action::Sort),
        KeyCode::Char('o') => Some(Action::ToggleSortOrder),
        KeyCode::Char('z') => Some(Action::PageSize),
        KeyCode::Char('y') => Some(Action::Confirm),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => Some(Action::NextPage),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => Some(Action::PrevPage),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let idx = match c {
                '1' => 0,
                '2' => 1,
                '3' => 2,
                _ => return None,
            };
            Some(Action::SwitchView(idx))
        }
        _ => None,
    }
}

/// Actions while text input has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAction {
    Input(char),
    Backspace,
    NextField,
    PrevField,
    /// Cycle a choice or toggle field.
    Cycle,
    /// Upload the file named in the photo field.
    Upload,
    Submit,
    Cancel,
}

pub fn map_text_key(event: KeyEvent) -> Option<TextAction> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('u') => Some(TextAction::Upload),
            KeyCode::Char('s') => Some(TextAction::Submit),
            KeyCode::Char('c') => Some(TextAction::Cancel),
            _ => None,
        };
    }

    match code {
        KeyCode::Enter => Some(TextAction::Submit),
        KeyCode::Esc => Some(TextAction::Cancel),
        KeyCode::Tab | KeyCode::Down => Some(TextAction::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(TextAction::PrevField),
        KeyCode::Left | KeyCode::Right => Some(TextAction::Cycle),
        KeyCode::Backspace => Some(TextAction::Backspace),
        KeyCode::Char(c) => Some(TextAction::Input(c)),
        _ => None,
    }
}
