//! Entries of the open registry, with the add-entry input and inline editing.

use super::helpers::{render_list, TableSpec};
use crate::state::entries::EntryFocus;
use crate::state::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row},
    Frame,
};
use roster_core::RegistryEntry;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let view = &app.entries;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let input_style = if view.focus == EntryFocus::NewEntry {
        Style::default().fg(app.theme.primary)
    } else {
        Style::default().fg(app.theme.border)
    };
    let placeholder = view.new_value.is_empty() && view.focus != EntryFocus::NewEntry;
    let text = if placeholder {
        "New entry value (n to type, Enter to add)".to_string()
    } else if view.is_creating() {
        format!("{} (adding...)", view.new_value)
    } else {
        format!("{}▏", view.new_value)
    };
    let input = Paragraph::new(text)
        .style(if placeholder {
            Style::default().fg(app.theme.text_dim)
        } else {
            Style::default().fg(app.theme.text)
        })
        .block(
            Block::default()
                .title("Add Entry")
                .borders(Borders::ALL)
                .border_style(input_style),
        );
    f.render_widget(input, chunks[0]);

    let title = match &view.registry {
        Some(registry) => format!("{} Entries [b back • e edit • d delete]", registry.name),
        None => "Entries".to_string(),
    };
    let editing = view.editing.clone();
    let edit_style = Style::default()
        .fg(app.theme.tertiary)
        .add_modifier(Modifier::BOLD);
    let row = move |entry: &RegistryEntry| match &editing {
        Some(edit) if edit.entry_id == entry.id => {
            let text = if edit.is_updating() {
                format!("{} (saving...)", edit.value)
            } else {
                format!("{}▏ (Enter save • Esc cancel)", edit.value)
            };
            Row::new(vec![Cell::from(text).style(edit_style)])
        }
        _ => Row::new(vec![Cell::from(entry.value.clone())]),
    };
    render_list(
        f,
        app,
        chunks[1],
        &view.list,
        TableSpec {
            title: &title,
            header: &["Value"],
            widths: &[Constraint::Percentage(100)],
            row: &row,
        },
        false,
    );
}
