//! Registries view.

use super::helpers::{render_list, TableSpec};
use crate::state::App;
use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Cell, Row},
    Frame,
};
use roster_core::Registry;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let row = |registry: &Registry| {
        Row::new(vec![
            Cell::from(registry.name.clone()),
            Cell::from(registry.entries_count.to_string()),
        ])
    };
    render_list(
        f,
        app,
        area,
        &app.registries,
        TableSpec {
            title: "Registries [m/Enter manage entries]",
            header: &["Name", "Entries"],
            widths: &[Constraint::Percentage(70), Constraint::Percentage(30)],
            row: &row,
        },
        true,
    );
}
