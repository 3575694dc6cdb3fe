//! Query bar showing a list's sort, filter and page size.

use crate::theme::SynthBruteTheme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use roster_core::ListParams;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryChip {
    pub label: String,
    /// Set chips differ from the defaults.
    pub active: bool,
}

impl QueryChip {
    /// Chips for the parameters of one list.
    pub fn for_params(params: &ListParams) -> Vec<QueryChip> {
        let sort = match &params.sort_by {
            Some(field) => QueryChip {
                label: format!("sort: {field} {}", params.sort_order),
                active: true,
            },
            None => QueryChip {
                label: "sort: none".to_string(),
                active: false,
            },
        };
        let filter = match &params.filter {
            Some(text) => QueryChip {
                label: format!("filter: \"{text}\""),
                active: true,
            },
            None => QueryChip {
                label: "filter: none".to_string(),
                active: false,
            },
        };
        vec![
            sort,
            filter,
            QueryChip {
                label: format!("{} per page", params.limit),
                active: false,
            },
        ]
    }
}

pub struct FilterBar<'a> {
    pub title: &'a str,
    pub chips: &'a [QueryChip],
    pub active_style: Style,
    pub inactive_style: Style,
}

impl<'a> FilterBar<'a> {
    pub fn themed(title: &'a str, chips: &'a [QueryChip], theme: &SynthBruteTheme) -> Self {
        Self {
            title,
            chips,
            active_style: Style::default()
                .fg(theme.tertiary)
                .add_modifier(Modifier::BOLD),
            inactive_style: Style::default().fg(theme.text_dim),
        }
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let spans: Vec<Span> = self
            .chips
            .iter()
            .map(|chip| {
                let style = if chip.active {
                    self.active_style
                } else {
                    self.inactive_style
                };
                Span::styled(format!(" [{}] ", chip.label), style)
            })
            .collect();

        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().title(self.title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}
