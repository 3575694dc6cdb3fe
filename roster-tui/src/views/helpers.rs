//! Common view rendering helpers.

use crate::state::form::FormResource;
use crate::state::list::{ListView, LoadState};
use crate::state::App;
use crate::widgets::{FilterBar, QueryChip, StatusIndicator};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState},
    Frame,
};

/// A rectangle of the given percentages, centered in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub fn pagination_line<R: FormResource>(list: &ListView<R>) -> String {
    let loading = if list.state == LoadState::Loading {
        " • loading"
    } else {
        ""
    };
    format!(
        "Page {} of {}{loading}   ←/h prev • →/l next • z page size",
        list.params.page, list.total_pages
    )
}

/// Columns of one resource table.
pub struct TableSpec<'a, R> {
    pub title: &'a str,
    pub header: &'a [&'a str],
    pub widths: &'a [Constraint],
    pub row: &'a dyn Fn(&R) -> Row<'static>,
}

/// Query bar, table (or its load status) and pagination line.
pub fn render_list<R: FormResource>(
    f: &mut Frame<'_>,
    app: &App,
    area: Rect,
    list: &ListView<R>,
    spec: TableSpec<'_, R>,
    show_query: bool,
) {
    let constraints = if show_query {
        vec![
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ]
    } else {
        vec![Constraint::Length(0), Constraint::Min(3), Constraint::Length(1)]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    if show_query {
        let chips = QueryChip::for_params(&list.params);
        FilterBar::themed("Query [s sort • o order • / filter]", &chips, &app.theme)
            .render(f, chunks[0]);
    }

    let status =
        StatusIndicator::for_load_state(spec.title, &list.state, list.rows.is_empty(), &app.theme);
    match status {
        Some(status) => status.render(f, chunks[1]),
        None => {
            let header = Row::new(spec.header.to_vec()).style(
                Style::default()
                    .fg(app.theme.primary)
                    .add_modifier(Modifier::BOLD),
            );
            let rows: Vec<Row> = list.rows.iter().map(|r| (spec.row)(r)).collect();
            let table = Table::new(rows, spec.widths.to_vec())
                .header(header)
                .block(
                    Block::default()
                        .title(spec.title)
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(app.theme.border)),
                )
                .highlight_style(Style::default().bg(app.theme.bg_highlight))
                .highlight_symbol("▶ ");
            let mut state = TableState::default();
            state.select(list.selected);
            f.render_stateful_widget(table, chunks[1], &mut state);
        }
    }

    let footer = Paragraph::new(pagination_line(list))
        .style(Style::default().fg(app.theme.text_dim));
    f.render_widget(footer, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::TeamMember;

    #[test]
    fn centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(60, 50, area);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 20);
        assert_eq!(inner.y, 10);
    }

    #[test]
    fn pagination_shows_position() {
        let mut list = ListView::<TeamMember>::new(10, &[]);
        list.total_pages = 4;
        list.params.page = 2;
        assert!(pagination_line(&list).starts_with("Page 2 of 4"));
        list.begin_load();
        assert!(pagination_line(&list).contains("loading"));
    }
}
