//! Roll history widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use swordsaga_core::RollLedger;

use crate::ui::theme::GameTheme;

/// Widget listing recent rolls, newest first
pub struct HistoryWidget<'a> {
    ledger: &'a RollLedger,
    scroll: usize,
    theme: &'a GameTheme,
}

impl<'a> HistoryWidget<'a> {
    pub fn new(ledger: &'a RollLedger, theme: &'a GameTheme) -> Self {
        Self {
            ledger,
            scroll: 0,
            theme,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }
}

impl Widget for HistoryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(
                " History ({}/{}) ",
                self.ledger.len(),
                self.ledger.capacity()
            ))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        if self.ledger.is_empty() {
            lines.push(Line::from(Span::styled("No rolls yet", self.theme.dim_style())));
        }

        for (i, summary) in self.ledger.iter().enumerate().skip(self.scroll) {
            let mut spans = vec![
                Span::styled(format!("{:>2}. ", i + 1), self.theme.dim_style()),
                Span::styled(
                    format!("{:>6}", summary.final_total),
                    self.theme.total_style(summary.crit_count() > 0),
                ),
                Span::raw("  "),
                Span::styled(
                    summary.label.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ];
            if !summary.tension_dice.is_empty() {
                spans.push(Span::styled(
                    format!("  +{} tension", summary.tension_dice.len()),
                    self.theme.tension_style(),
                ));
            }
            lines.push(Line::from(spans));
            lines.push(Line::from(Span::styled(
                format!("      {}", summary.breakdown()),
                self.theme.dim_style(),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "j/k scroll, Esc to close",
            self.theme.dim_style(),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}
