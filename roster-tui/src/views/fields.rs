//! Field definitions view.

use super::helpers::{render_list, TableSpec};
use crate::state::App;
use crate::theme::field_type_color;
use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Cell, Row},
    Frame,
};
use roster_core::FieldDefinition;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let theme = app.theme.clone();
    let row = move |field: &FieldDefinition| {
        let color = field_type_color(field.field_type, &theme);
        Row::new(vec![
            Cell::from(field.name.clone()),
            Cell::from(field.label.clone()),
            Cell::from(field.field_type.as_str()).style(Style::default().fg(color)),
            Cell::from(if field.required { "Yes" } else { "No" }),
            Cell::from(field.default_value.clone().unwrap_or_default()),
        ])
    };
    render_list(
        f,
        app,
        area,
        &app.fields,
        TableSpec {
            title: "Fields",
            header: &["Name", "Label", "Type", "Required", "Default"],
            widths: &[
                Constraint::Percentage(22),
                Constraint::Percentage(28),
                Constraint::Percentage(14),
                Constraint::Percentage(12),
                Constraint::Percentage(24),
            ],
            row: &row,
        },
        true,
    );
}
