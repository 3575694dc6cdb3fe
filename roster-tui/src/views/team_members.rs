//! Team members view.

use super::helpers::{render_list, TableSpec};
use crate::state::App;
use crate::theme::role_color;
use crate::widgets::DetailPanel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Cell, Row},
    Frame,
};
use roster_core::TeamMember;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let theme = app.theme.clone();
    let row = move |member: &TeamMember| {
        let color = role_color(member.role, &theme);
        Row::new(vec![
            Cell::from(member.name.clone()),
            Cell::from(member.role.label()).style(Style::default().fg(color)),
            Cell::from(member.age.to_string()),
        ])
    };
    render_list(
        f,
        app,
        chunks[0],
        &app.team_members,
        TableSpec {
            title: "Team Members",
            header: &["Name", "Role", "Age"],
            widths: &[
                Constraint::Percentage(50),
                Constraint::Percentage(30),
                Constraint::Percentage(20),
            ],
            row: &row,
        },
        true,
    );

    let rows = match app.team_members.selected_row() {
        Some(member) => vec![
            ("ID", member.id.to_string()),
            ("Name", member.name.clone()),
            ("Role", member.role.label().to_string()),
            ("Age", member.age.to_string()),
            ("Photo", member.photo.clone().unwrap_or_default()),
        ],
        None => Vec::new(),
    };
    DetailPanel {
        title: "Details",
        rows,
        label_style: Style::default().fg(app.theme.secondary),
        border_style: Style::default().fg(app.theme.border),
    }
    .render(f, chunks[1]);
}
