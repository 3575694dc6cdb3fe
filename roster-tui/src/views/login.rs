//! Login view.

use super::helpers::centered_rect;
use crate::state::shell::LoginFocus;
use crate::state::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let form = &app.shell.login;
    let area = centered_rect(50, 60, area);
    f.render_widget(Clear, area);

    let outer = Block::default()
        .title(Span::styled(
            " Sign in ",
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_focus));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

    let input = |title: &'static str, value: String, focused: bool| {
        let border = if focused {
            app.theme.border_focus
        } else {
            app.theme.border
        };
        let value = if focused { format!("{value}▏") } else { value };
        Paragraph::new(value).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
    };
    f.render_widget(
        input(
            "Username",
            form.username.clone(),
            form.focus == LoginFocus::Username,
        ),
        chunks[0],
    );
    f.render_widget(
        input(
            "Password",
            form.masked_password(),
            form.focus == LoginFocus::Password,
        ),
        chunks[1],
    );

    let status = match (&form.error, form.is_submitting()) {
        (_, true) => Line::from(Span::styled(
            "Signing in...",
            Style::default().fg(app.theme.info),
        )),
        (Some(error), false) => Line::from(Span::styled(
            error.clone(),
            Style::default().fg(app.theme.error),
        )),
        (None, false) => Line::from(Span::styled(
            "Tab switch field • Enter sign in • Esc quit",
            Style::default().fg(app.theme.text_dim),
        )),
    };
    f.render_widget(Paragraph::new(status), chunks[2]);
}
