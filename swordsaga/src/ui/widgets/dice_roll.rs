//! Roll result display widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use swordsaga_core::{ArmorOutcome, ContestOutcome, DieResult, EvadeOutcome, RollSummary};

use crate::ui::theme::GameTheme;

/// Resolution shown under a roll's total
#[derive(Debug, Clone)]
pub enum ResolutionLine {
    Contest(ContestOutcome),
    Armor(ArmorOutcome),
    Evade { outcome: EvadeOutcome, aim: u64 },
}

/// Widget for displaying a roll with its per-die breakdown
pub struct DiceRollWidget<'a> {
    result: Option<&'a RollSummary>,
    title: &'a str,
    resolution: Option<ResolutionLine>,
    focused: bool,
    theme: &'a GameTheme,
}

impl<'a> DiceRollWidget<'a> {
    pub fn new(theme: &'a GameTheme) -> Self {
        Self {
            result: None,
            title: " Result ",
            resolution: None,
            focused: false,
            theme,
        }
    }

    pub fn result(mut self, result: Option<&'a RollSummary>) -> Self {
        self.result = result;
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn resolution(mut self, resolution: Option<ResolutionLine>) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn die_line(&self, die: &DieResult) -> Line<'static> {
        let style = self.theme.die_style(die.is_critical, die.was_rerolled);
        let mut spans = vec![
            Span::styled(format!("{:>4} ", die.die_type.to_string()), self.theme.dim_style()),
            Span::styled(format!("{:>2}", die.value), style),
        ];
        if die.is_critical {
            spans.push(Span::styled(format!("  CRIT x{}", die.multiplier), style));
        }
        if let Some(original) = die.original_value {
            spans.push(Span::styled(
                format!("  (rerolled {original})"),
                Style::default().fg(self.theme.rerolled),
            ));
        }
        Line::from(spans)
    }

    fn resolution_line(&self, resolution: &ResolutionLine) -> Line<'static> {
        match resolution {
            ResolutionLine::Contest(outcome) => Line::from(vec![
                Span::raw("vs Master - "),
                Span::styled(outcome.to_string(), self.theme.contest_style(*outcome)),
            ]),
            ResolutionLine::Armor(outcome) => Line::from(vec![
                Span::raw(format!("{} damage / {} = ", outcome.incoming_damage, outcome.divisor)),
                Span::styled(
                    format!("{} taken", outcome.final_damage),
                    self.theme.outcome_style(outcome.final_damage == 0),
                ),
            ]),
            ResolutionLine::Evade { outcome, aim } => Line::from(vec![
                Span::raw(format!("vs Aim {aim} - ")),
                Span::styled(outcome.to_string(), self.theme.evade_style(*outcome)),
            ]),
        }
    }
}

impl Widget for DiceRollWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(result) = self.result else {
            let hint = Line::from(Span::styled("No roll yet", self.theme.dim_style()));
            Paragraph::new(hint)
                .alignment(Alignment::Center)
                .render(inner, buf);
            return;
        };

        let mut lines: Vec<Line> = Vec::new();

        lines.push(Line::from(vec![
            Span::styled(result.label.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(result.mode.to_string(), self.theme.mode_style(result.mode)),
        ]));
        lines.push(Line::from(""));

        for die in &result.dice {
            lines.push(self.die_line(die));
        }
        for die in &result.tension_dice {
            lines.push(Line::from(vec![
                Span::styled(" TEN ", self.theme.dim_style()),
                Span::styled(format!("{:>2}", die.value), self.theme.tension_style()),
                Span::styled(
                    format!("  x{}", swordsaga_core::tension_multiplier(die.value)),
                    self.theme.tension_style(),
                ),
            ]));
        }
        lines.push(Line::from(""));

        // Armor headlines the damage that gets through rather than the roll.
        let headline = match &self.resolution {
            Some(ResolutionLine::Armor(outcome)) => outcome.final_damage,
            _ => result.final_total,
        };
        lines.push(Line::from(Span::styled(
            result.source.result_caption(),
            self.theme.dim_style(),
        )));
        lines.push(Line::from(Span::styled(
            format!("[ {headline} ]"),
            self.theme.total_style(result.crit_count() > 0),
        )));
        lines.push(Line::from(Span::styled(
            result.breakdown(),
            self.theme.dim_style(),
        )));

        if let Some(resolution) = &self.resolution {
            lines.push(Line::from(""));
            lines.push(self.resolution_line(resolution));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        paragraph.render(inner, buf);
    }
}
