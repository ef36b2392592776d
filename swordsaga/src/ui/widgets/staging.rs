//! Staged dice panel, one layout per tab

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use swordsaga_core::{DicePool, DieType, DifficultyLevel, FaceSource, RollSession, Stat};

use crate::app::{App, HeroField, Tab};
use crate::ui::theme::GameTheme;

/// Widget showing what the current tab will roll
pub struct StagingWidget<'a, F> {
    app: &'a App<F>,
}

impl<'a, F: FaceSource> StagingWidget<'a, F> {
    pub fn new(app: &'a App<F>) -> Self {
        Self { app }
    }

    fn theme(&self) -> &GameTheme {
        &self.app.theme
    }

    fn session(&self) -> &RollSession<F> {
        &self.app.session
    }

    fn hero_lines(&self) -> Vec<Line<'static>> {
        let hero = &self.session().hero;
        let field = self.app.hero_field;
        let bonus = hero
            .bonus_die
            .map(|d| d.to_string())
            .unwrap_or_else(|| "none".to_string());
        let dirty = if self.session().is_dirty() { " *" } else { "" };

        let mut lines = vec![
            self.field_line("Base die", hero.base_die.to_string(), field == HeroField::Base),
            self.field_line("Bonus die", bonus, field == HeroField::Bonus),
            self.field_line(
                "Proficiency",
                if hero.proficiency { "yes (+d6)" } else { "no" }.to_string(),
                field == HeroField::Proficiency,
            ),
            Line::from(""),
            Line::from(Span::styled(
                format!("Stats{dirty}"),
                Style::default().add_modifier(Modifier::UNDERLINED),
            )),
        ];

        let active = self.session().active_stat();
        for (i, stat) in Stat::ALL.iter().enumerate() {
            let preset = self.session().presets().get(*stat).map(|p| {
                let bonus = p
                    .bonus_die
                    .map(|d| format!(" + {d}"))
                    .unwrap_or_default();
                format!("{}{bonus}", p.base_die)
            });
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {} {} ", i + 1, stat.id()),
                    self.theme().selection_style(active == Some(*stat)),
                ),
                Span::styled(
                    format!(" {}", preset.unwrap_or_else(|| "-".to_string())),
                    self.theme().dim_style(),
                ),
            ]));
        }
        lines
    }

    fn master_lines(&self) -> Vec<Line<'static>> {
        let current = self.session().difficulty;
        DifficultyLevel::ALL
            .iter()
            .map(|level| {
                Line::from(vec![
                    Span::styled(
                        format!(" {:<20}", level.name()),
                        self.theme().selection_style(*level == current),
                    ),
                    Span::styled(format!(" {}", level.notation()), self.theme().dim_style()),
                ])
            })
            .collect()
    }

    fn pool_lines(&self, pool: &DicePool) -> Vec<Line<'static>> {
        let cursor = self.app.die_cursor;
        let mut lines: Vec<Line> = DieType::ALL
            .iter()
            .map(|die| {
                let count = pool.count(*die);
                let count_style = if count > 0 {
                    self.theme().text_style().add_modifier(Modifier::BOLD)
                } else {
                    self.theme().dim_style()
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {:>4} ", die.to_string()),
                        self.theme().selection_style(*die == cursor),
                    ),
                    Span::styled(format!("  x{count}"), count_style),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} dice staged", pool.total()),
            self.theme().dim_style(),
        )));
        lines
    }

    fn armor_lines(&self) -> Vec<Line<'static>> {
        let armor = &self.session().armor;
        vec![
            self.field_line("Armor die", armor.die.to_string(), true),
            self.field_line("Charges", armor.charges().to_string(), false),
            self.field_line("Incoming damage", armor.incoming_damage.to_string(), false),
        ]
    }

    fn field_line(&self, name: &str, value: String, selected: bool) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{name:<16}"), self.theme().dim_style()),
            Span::styled(format!(" {value} "), self.theme().selection_style(selected)),
        ])
    }

    fn hint(&self) -> &'static str {
        match self.app.tab {
            Tab::Hero => "←/→ field, ↑/↓ change, 1-7 stat, w save",
            Tab::Master => "↑/↓ difficulty",
            Tab::Combat | Tab::Aim => "←/→ die, ↑/↓ count",
            Tab::Armor => "←/→ die, ↑/↓ charges, digits damage",
            Tab::Evade => "←/→ die, ↑/↓ count, digits aim",
        }
    }
}

impl<F: FaceSource> Widget for StagingWidget<'_, F> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.app.tab.title()))
            .borders(Borders::ALL)
            .border_style(self.theme().border_style(true));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = match self.app.tab {
            Tab::Hero => self.hero_lines(),
            Tab::Master => self.master_lines(),
            Tab::Combat => self.pool_lines(&self.session().combat_pool),
            Tab::Aim => self.pool_lines(&self.session().aim_pool),
            Tab::Armor => self.armor_lines(),
            Tab::Evade => {
                let mut lines = vec![
                    self.field_line("Aim to beat", self.session().aim_to_beat.to_string(), false),
                    Line::from(""),
                ];
                lines.extend(self.pool_lines(&self.session().evade_pool));
                lines
            }
        };

        // Surge dice ride along on every roll except the master's.
        let surge = self.session().surge();
        if surge > 0 && self.app.tab != Tab::Master {
            lines.push(Line::from(Span::styled(
                format!("+{surge} surge d6"),
                self.theme().tension_style(),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(self.hint(), self.theme().dim_style())));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
