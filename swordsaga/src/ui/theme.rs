//! Color theme and styling for the Sword Saga TUI

use ratatui::style::{Color, Modifier, Style};

use swordsaga_core::{ContestOutcome, EvadeOutcome, RollMode};

/// Roller UI color theme
#[derive(Debug, Clone)]
pub struct GameTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub dim_text: Color,

    // Die colors
    pub crit: Color,
    pub rerolled: Color,
    pub tension: Color,

    // Outcome colors
    pub success: Color,
    pub failure: Color,

    // Mode colors
    pub advantage: Color,
    pub disadvantage: Color,
}

impl Default for GameTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            dim_text: Color::DarkGray,

            crit: Color::Yellow,
            rerolled: Color::LightBlue,
            tension: Color::LightRed,

            success: Color::Green,
            failure: Color::Red,

            advantage: Color::LightGreen,
            disadvantage: Color::LightMagenta,
        }
    }
}

impl GameTheme {
    /// Get style for normal text
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    /// Get style for hints and secondary text
    pub fn dim_style(&self) -> Style {
        Style::default()
            .fg(self.dim_text)
            .add_modifier(Modifier::DIM)
    }

    /// Get style for a single die in a breakdown
    pub fn die_style(&self, is_critical: bool, was_rerolled: bool) -> Style {
        if is_critical {
            Style::default().fg(self.crit).add_modifier(Modifier::BOLD)
        } else if was_rerolled {
            Style::default().fg(self.rerolled)
        } else {
            self.text_style()
        }
    }

    pub fn tension_style(&self) -> Style {
        Style::default()
            .fg(self.tension)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for the big final total
    pub fn total_style(&self, has_crit: bool) -> Style {
        let style = Style::default().add_modifier(Modifier::BOLD);
        if has_crit {
            style.fg(self.crit)
        } else {
            style.fg(self.foreground)
        }
    }

    pub fn outcome_style(&self, success: bool) -> Style {
        Style::default()
            .fg(if success { self.success } else { self.failure })
            .add_modifier(Modifier::BOLD)
    }

    pub fn contest_style(&self, outcome: ContestOutcome) -> Style {
        self.outcome_style(outcome == ContestOutcome::Win)
    }

    pub fn evade_style(&self, outcome: EvadeOutcome) -> Style {
        self.outcome_style(outcome == EvadeOutcome::Dodged)
    }

    pub fn mode_style(&self, mode: RollMode) -> Style {
        match mode {
            RollMode::Normal => self.text_style(),
            RollMode::Advantage => Style::default().fg(self.advantage),
            RollMode::Disadvantage => Style::default().fg(self.disadvantage),
        }
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Get style for a selectable item
    pub fn selection_style(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(self.border_focused)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            self.text_style()
        }
    }
}
