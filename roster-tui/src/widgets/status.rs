//! Status indicator shown in place of a table that has no rows to show.

use crate::state::list::LoadState;
use crate::theme::SynthBruteTheme;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct StatusIndicator {
    pub title: String,
    pub status: String,
    pub style: Style,
}

impl StatusIndicator {
    /// `None` when the table itself should be drawn.
    pub fn for_load_state(
        title: &str,
        state: &LoadState,
        empty: bool,
        theme: &SynthBruteTheme,
    ) -> Option<Self> {
        let (status, color) = match state {
            LoadState::Idle | LoadState::Loading if empty => {
                ("Loading...".to_string(), theme.info)
            }
            LoadState::Failed(message) => (format!("Error: {message}"), theme.error),
            LoadState::Ready if empty => ("No records found".to_string(), theme.text_dim),
            _ => return None,
        };
        Some(Self {
            title: title.to_string(),
            status,
            style: Style::default().fg(color),
        })
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(self.status.clone())
            .style(self.style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(self.title.as_str())
                    .borders(Borders::ALL),
            );
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_reads_replace_the_table() {
        let theme = SynthBruteTheme::synthbrute();
        let failed = LoadState::Failed("No response from server".into());
        let status = StatusIndicator::for_load_state("Fields", &failed, true, &theme).unwrap();
        assert_eq!(status.status, "Error: No response from server");
        let ready = StatusIndicator::for_load_state("Fields", &LoadState::Ready, false, &theme);
        assert!(ready.is_none());
        let loading = LoadState::Loading;
        assert!(StatusIndicator::for_load_state("Fields", &loading, false, &theme).is_none());
    }
}
