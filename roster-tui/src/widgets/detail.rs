//! Detail panel widget for the highlighted row.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct DetailPanel<'a> {
    pub title: &'a str,
    /// Label/value rows; empty when nothing is selected.
    pub rows: Vec<(&'a str, String)>,
    pub label_style: Style,
    pub border_style: Style,
}

impl<'a> DetailPanel<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let lines: Vec<Line> = if self.rows.is_empty() {
            vec![Line::from(Span::styled("Nothing selected", self.label_style))]
        } else {
            let width = self.rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
            self.rows
                .iter()
                .map(|(label, value)| {
                    Line::from(vec![
                        Span::styled(format!("{label:<width$}  "), self.label_style),
                        Span::raw(if value.is_empty() {
                            "-".to_string()
                        } else {
                            value.clone()
                        }),
                    ])
                })
                .collect()
        };

        let widget = Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .title(self.title)
                    .borders(Borders::ALL)
                    .border_style(self.border_style),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(widget, area);
    }
}
