//! Create/edit form overlay.

use super::helpers::centered_rect;
use crate::state::form::{DraftFields, FormResource, FormState, InputKind};
use crate::theme::SynthBruteTheme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Draw `form` over `area`. `extra` lines go under the fields.
pub fn render<R: FormResource>(
    f: &mut Frame<'_>,
    theme: &SynthBruteTheme,
    area: Rect,
    form: &FormState<R>,
    extra: Option<String>,
) {
    let area = centered_rect(60, 70, area);
    f.render_widget(Clear, area);

    let mut lines = Vec::new();
    for (index, field) in <R::Draft as DraftFields>::FIELDS.iter().enumerate() {
        let focused = index == form.focus;
        let value = form.draft.display(index);
        let value = match field.kind {
            InputKind::Text if focused => format!("{value}▏"),
            InputKind::Text => value,
            InputKind::Choice => format!("‹ {value} ›"),
            InputKind::Toggle => format!("[{}]", if value == "yes" { "x" } else { " " }),
        };
        let label_style = if focused {
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_dim)
        };
        let marker = if focused { "▶ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<14}", field.label), label_style),
            Span::styled(value, Style::default().fg(theme.text)),
        ]));
        if let Some(message) = form.errors().message_for(field.key) {
            lines.push(Line::from(Span::styled(
                format!("                {message}"),
                Style::default().fg(theme.error),
            )));
        }
    }

    lines.push(Line::default());
    if let Some(extra) = extra {
        lines.push(Line::from(Span::styled(
            extra,
            Style::default().fg(theme.secondary),
        )));
    }
    let hint = if form.is_submitting() {
        Span::styled("Saving...", Style::default().fg(theme.info))
    } else {
        Span::styled(
            "Tab next • ←/→ or space change • Enter save • Esc cancel",
            Style::default().fg(theme.text_dim),
        )
    };
    lines.push(Line::from(hint));

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(form.title())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_focus)),
        );
    f.render_widget(widget, area);
}
