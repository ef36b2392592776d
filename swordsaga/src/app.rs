//! Main application state and logic

use rand::rngs::StdRng;

use swordsaga_core::{DieType, FaceSource, RollSession, RollSource, RollSummary, Side, Stat};

use crate::ui::theme::GameTheme;

/// Largest value accepted by the numeric fields.
const MAX_NUMBER: u64 = 999_999;

/// Tabs across the top of the screen, one per kind of roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Hero,
    Master,
    Combat,
    Aim,
    Armor,
    Evade,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Hero,
        Tab::Master,
        Tab::Combat,
        Tab::Aim,
        Tab::Armor,
        Tab::Evade,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Hero => "Hero",
            Tab::Master => "Master",
            Tab::Combat => "Combat",
            Tab::Aim => "Aim",
            Tab::Armor => "Armor",
            Tab::Evade => "Evade",
        }
    }

    /// The roll made from this tab.
    pub fn source(&self) -> RollSource {
        match self {
            Tab::Hero => RollSource::Hero,
            Tab::Master => RollSource::Master,
            Tab::Combat => RollSource::Combat,
            Tab::Aim => RollSource::Aim,
            Tab::Armor => RollSource::Armor,
            Tab::Evade => RollSource::Evade,
        }
    }

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Field selected on the hero tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeroField {
    #[default]
    Base,
    Bonus,
    Proficiency,
}

impl HeroField {
    fn next(self) -> HeroField {
        match self {
            HeroField::Base => HeroField::Bonus,
            HeroField::Bonus => HeroField::Proficiency,
            HeroField::Proficiency => HeroField::Base,
        }
    }

    fn prev(self) -> HeroField {
        match self {
            HeroField::Base => HeroField::Proficiency,
            HeroField::Bonus => HeroField::Base,
            HeroField::Proficiency => HeroField::Bonus,
        }
    }
}

/// Overlay types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Help,
    History,
    ConfirmReset,
}

/// Main application state
pub struct App<F = StdRng> {
    pub session: RollSession<F>,

    // UI state
    pub theme: GameTheme,
    pub tab: Tab,
    overlay: Option<Overlay>,
    pub hero_field: HeroField,
    pub die_cursor: DieType,
    pub history_scroll: usize,

    // Status
    status_message: Option<String>,

    // Async work picked up by the main loop
    pub pending_save: bool,
    pub pending_reset: bool,
}

impl<F: FaceSource> App<F> {
    pub fn new(session: RollSession<F>) -> Self {
        Self {
            session,
            theme: GameTheme::default(),
            tab: Tab::default(),
            overlay: None,
            hero_field: HeroField::default(),
            die_cursor: DieType::D6,
            history_scroll: 0,
            status_message: Some("Press Enter to roll, ? for help".to_string()),
            pending_save: false,
            pending_reset: false,
        }
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn prev_tab(&mut self) {
        self.tab = self.tab.prev();
    }

    /// Roll whatever the current tab has staged.
    pub fn roll_current(&mut self) -> Option<RollSummary> {
        let source = self.tab.source();
        let summary = self.session.roll(source);
        match &summary {
            Some(summary) => {
                self.set_status(format!("{}: {}", summary.label, summary.final_total))
            }
            None => self.set_status(format!("No dice staged for {source}")),
        }
        summary
    }

    /// Add a tension die to the player or master result.
    pub fn add_tension(&mut self, side: Side) {
        match self.session.add_tension(side) {
            Some(summary) => {
                let face = summary.tension_dice.last().map(|d| d.value).unwrap_or_default();
                self.set_status(format!(
                    "Tension d6={face}: {} is now {}",
                    summary.label, summary.final_total
                ));
            }
            None => self.set_status("No roll to add tension to"),
        }
    }

    pub fn cycle_mode(&mut self) {
        self.session.mode = self.session.mode.cycle();
        self.set_status(format!("Mode: {}", self.session.mode));
    }

    pub fn add_surge(&mut self) {
        self.session.add_surge();
    }

    pub fn remove_surge(&mut self) {
        self.session.remove_surge();
    }

    /// Move the selection left within the current tab.
    pub fn select_prev(&mut self) {
        match self.tab {
            Tab::Hero => self.hero_field = self.hero_field.prev(),
            Tab::Armor => self.session.armor.die = self.session.armor.die.prev(),
            Tab::Combat | Tab::Aim | Tab::Evade => self.die_cursor = self.die_cursor.prev(),
            Tab::Master => {}
        }
    }

    /// Move the selection right within the current tab.
    pub fn select_next(&mut self) {
        match self.tab {
            Tab::Hero => self.hero_field = self.hero_field.next(),
            Tab::Armor => self.session.armor.die = self.session.armor.die.next(),
            Tab::Combat | Tab::Aim | Tab::Evade => self.die_cursor = self.die_cursor.next(),
            Tab::Master => {}
        }
    }

    /// Raise the selected value: a bigger die, a harder tier, one more die.
    pub fn increment(&mut self) {
        match self.tab {
            Tab::Hero => self.step_hero_field(true),
            Tab::Master => self.session.difficulty = self.session.difficulty.harder(),
            Tab::Armor => self.session.armor.add_charge(),
            Tab::Combat | Tab::Aim | Tab::Evade => {
                let die = self.die_cursor;
                if let Some(pool) = self.current_pool_mut() {
                    pool.increment(die);
                }
            }
        }
    }

    pub fn decrement(&mut self) {
        match self.tab {
            Tab::Hero => self.step_hero_field(false),
            Tab::Master => self.session.difficulty = self.session.difficulty.easier(),
            Tab::Armor => self.session.armor.remove_charge(),
            Tab::Combat | Tab::Aim | Tab::Evade => {
                let die = self.die_cursor;
                if let Some(pool) = self.current_pool_mut() {
                    pool.decrement(die);
                }
            }
        }
    }

    fn step_hero_field(&mut self, up: bool) {
        let hero = &mut self.session.hero;
        match self.hero_field {
            HeroField::Base => {
                hero.base_die = if up { hero.base_die.next() } else { hero.base_die.prev() };
            }
            // The bonus die cycles through "none" below d4 and above d20.
            HeroField::Bonus => {
                hero.bonus_die = match (hero.bonus_die, up) {
                    (None, true) => Some(DieType::D4),
                    (None, false) => Some(DieType::D20),
                    (Some(DieType::D20), true) | (Some(DieType::D4), false) => None,
                    (Some(die), true) => Some(die.next()),
                    (Some(die), false) => Some(die.prev()),
                };
            }
            HeroField::Proficiency => hero.proficiency = !hero.proficiency,
        }
    }

    fn current_pool_mut(&mut self) -> Option<&mut swordsaga_core::DicePool> {
        match self.tab {
            Tab::Combat => Some(&mut self.session.combat_pool),
            Tab::Aim => Some(&mut self.session.aim_pool),
            Tab::Evade => Some(&mut self.session.evade_pool),
            _ => None,
        }
    }

    /// The number edited by digit keys on this tab, if any.
    pub fn number_field(&self) -> Option<u64> {
        match self.tab {
            Tab::Armor => Some(self.session.armor.incoming_damage),
            Tab::Evade => Some(self.session.aim_to_beat),
            _ => None,
        }
    }

    fn set_number_field(&mut self, value: u64) {
        match self.tab {
            Tab::Armor => self.session.armor.incoming_damage = value,
            Tab::Evade => self.session.aim_to_beat = value,
            _ => {}
        }
    }

    /// Append a digit to the tab's number field.
    pub fn type_digit(&mut self, digit: u32) {
        if let Some(value) = self.number_field() {
            let next = value.saturating_mul(10).saturating_add(u64::from(digit));
            if next <= MAX_NUMBER {
                self.set_number_field(next);
            }
        }
    }

    pub fn backspace_number(&mut self) {
        if let Some(value) = self.number_field() {
            self.set_number_field(value / 10);
        }
    }

    /// Add `delta` to the tab's number field, clamped at zero.
    pub fn adjust_number(&mut self, delta: i64) {
        if let Some(value) = self.number_field() {
            let next = if delta < 0 {
                value.saturating_sub(delta.unsigned_abs())
            } else {
                value.saturating_add(delta as u64)
            };
            self.set_number_field(next.min(MAX_NUMBER));
        }
    }

    /// Toggle the stat at `index` in [`Stat::ALL`].
    pub fn select_stat(&mut self, index: usize) {
        let Some(&stat) = Stat::ALL.get(index) else {
            return;
        };
        self.session.select_stat(stat);
        match self.session.active_stat() {
            Some(active) => self.set_status(format!("{} selected", active.label())),
            None => self.set_status(format!("{} deselected", stat.label())),
        }
    }

    /// Ask the main loop to save the active stat's preset.
    pub fn request_save(&mut self) {
        if self.session.active_stat().is_some() {
            self.pending_save = true;
            self.set_status("Saving preset...");
        } else {
            self.set_status("Select a stat (1-7) before saving");
        }
    }

    pub fn clear_staged(&mut self) {
        self.session.clear_staged();
        self.set_status("Cleared staged dice");
    }

    pub fn request_reset(&mut self) {
        self.overlay = Some(Overlay::ConfirmReset);
    }

    pub fn confirm_reset(&mut self) {
        self.overlay = None;
        self.pending_reset = true;
        self.set_status("Resetting...");
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.toggle_overlay(Overlay::Help);
    }

    pub fn toggle_history(&mut self) {
        self.history_scroll = 0;
        self.toggle_overlay(Overlay::History);
    }

    fn toggle_overlay(&mut self, overlay: Overlay) {
        if self.overlay == Some(overlay) {
            self.overlay = None;
        } else {
            self.overlay = Some(overlay);
        }
    }

    pub fn scroll_history_down(&mut self) {
        let max = self.session.ledger().len().saturating_sub(1);
        self.history_scroll = (self.history_scroll + 1).min(max);
    }

    pub fn scroll_history_up(&mut self) {
        self.history_scroll = self.history_scroll.saturating_sub(1);
    }

    /// Close any open overlay
    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    /// Set status message (always overwrites)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// The result shown in the main result panel for the current tab.
    pub fn displayed_result(&self) -> Option<&RollSummary> {
        match self.tab {
            Tab::Master => self.session.last_master_roll(),
            _ => self.session.last_roll(),
        }
    }
}
