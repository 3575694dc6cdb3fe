//! View rendering dispatch.

pub mod entries;
pub mod fields;
pub mod form;
pub mod helpers;
pub mod login;
pub mod registries;
pub mod team_members;

use crate::nav::{Route, View};
use crate::state::{App, Modal};
use crate::theme::notification_color;
use helpers::centered_rect;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

const HELP: &[(&str, &str)] = &[
    ("Tab / Shift+Tab, 1-3", "switch view"),
    ("j/k or ↑/↓", "move selection"),
    ("h/l or ←/→", "previous / next page"),
    ("z", "cycle page size"),
    ("s / o", "sort column / flip order"),
    ("/", "filter"),
    ("n / e / d", "new / edit / delete"),
    ("m or Enter", "manage registry entries"),
    ("b", "back to registries"),
    ("Ctrl+U", "upload photo (team member form)"),
    ("Ctrl+R", "refresh"),
    ("Ctrl+L", "sign out"),
    ("q", "quit"),
];

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let screen = f.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(screen);

    render_header(f, app, layout[0]);

    match app.route() {
        Route::Login => login::render(f, app, layout[1]),
        Route::View(View::TeamMembers) => team_members::render(f, app, layout[1]),
        Route::View(View::Fields) => fields::render(f, app, layout[1]),
        Route::View(View::Registries) => registries::render(f, app, layout[1]),
        Route::View(View::RegistryEntries) => entries::render(f, app, layout[1]),
    }

    render_footer(f, app, layout[2]);

    if app.route() == Route::Login {
        return;
    }
    render_form(f, app, layout[1]);
    if let Some(filter) = &app.filter_input {
        render_filter_prompt(f, app, filter, layout[1]);
    }
    if let Some(modal) = &app.modal {
        render_modal(f, app, modal, screen);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let auth = if app.shell.is_authenticated() {
        "Signed in"
    } else {
        "Signed out"
    };
    let titles: Vec<Line> = View::tabs().iter().map(|v| Line::from(v.title())).collect();
    let tabs = Tabs::new(titles)
        .select(app.active_view.index())
        .style(Style::default().fg(app.theme.text_dim))
        .highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border))
                .title(Span::styled(
                    format!("ROSTER | {auth}"),
                    Style::default().fg(app.theme.primary),
                )),
        );
    f.render_widget(tabs, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, style) = match app.notifications.latest() {
        Some(note) => (
            format!(
                "{} {}: {}",
                note.created_at.format("%H:%M:%S"),
                note.level.label(),
                note.message
            ),
            Style::default().fg(notification_color(note.level, &app.theme)),
        ),
        None => (
            "? help • Tab switch view • n new • e edit • d delete • q quit".to_string(),
            Style::default().fg(app.theme.text_dim),
        ),
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}

fn render_form(f: &mut Frame<'_>, app: &App, area: Rect) {
    match app.active_view {
        View::TeamMembers => {
            if let Some(form) = &app.team_members.form {
                form::render(f, &app.theme, area, form, form.photo_preview());
            }
        }
        View::Fields => {
            if let Some(form) = &app.fields.form {
                form::render(f, &app.theme, area, form, None);
            }
        }
        View::Registries => {
            if let Some(form) = &app.registries.form {
                form::render(f, &app.theme, area, form, None);
            }
        }
        View::RegistryEntries => {}
    }
}

fn render_filter_prompt(f: &mut Frame<'_>, app: &App, filter: &str, area: Rect) {
    let area = Rect {
        height: 3.min(area.height),
        ..centered_rect(50, 20, area)
    };
    f.render_widget(Clear, area);
    let prompt = Paragraph::new(format!("{filter}▏")).block(
        Block::default()
            .title("Filter [Enter apply • Esc cancel]")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border_focus)),
    );
    f.render_widget(prompt, area);
}

fn render_modal(f: &mut Frame<'_>, app: &App, modal: &Modal, area: Rect) {
    let (title, lines, border) = match modal {
        Modal::Help => (
            "Keybindings [Esc close]",
            HELP.iter()
                .map(|(keys, action)| {
                    Line::from(vec![
                        Span::styled(format!("{keys:<22}"), Style::default().fg(app.theme.primary)),
                        Span::raw(*action),
                    ])
                })
                .collect::<Vec<_>>(),
            app.theme.border_focus,
        ),
        Modal::ConfirmDelete { message } => (
            "Confirm",
            vec![
                Line::from(message.clone()),
                Line::default(),
                Line::from(Span::styled(
                    "y/Enter delete • Esc cancel",
                    Style::default().fg(app.theme.text_dim),
                )),
            ],
            app.theme.error,
        ),
    };
    let area = centered_rect(60, 60, area);
    f.render_widget(Clear, area);
    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(widget, area);
}
