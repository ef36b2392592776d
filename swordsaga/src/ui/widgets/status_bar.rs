//! Status bar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use swordsaga_core::{RollMode, Stat};

use crate::app::Tab;
use crate::ui::theme::GameTheme;

/// Status bar widget showing the roll settings
pub struct StatusBarWidget<'a> {
    mode: RollMode,
    surge: u32,
    stat: Option<Stat>,
    dirty: bool,
    theme: &'a GameTheme,
    message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(mode: RollMode, surge: u32, theme: &'a GameTheme) -> Self {
        Self {
            mode,
            surge,
            stat: None,
            dirty: false,
            theme,
            message: None,
        }
    }

    pub fn stat(mut self, stat: Option<Stat>, dirty: bool) -> Self {
        self.stat = stat;
        self.dirty = dirty;
        self
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let stat_text = match self.stat {
            Some(stat) if self.dirty => format!("{} (unsaved)", stat.id()),
            Some(stat) => stat.id().to_string(),
            None => "-".to_string(),
        };

        let mut spans = vec![
            Span::styled(
                format!("-- {} --", self.mode.to_string().to_uppercase()),
                self.theme.mode_style(self.mode).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            Span::styled(format!("Surge: {}", self.surge), Style::default()),
            Span::raw(" | "),
            Span::styled(format!("Stat: {stat_text}"), Style::default()),
        ];

        // Add message if present
        if let Some(msg) = self.message {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(msg, Style::default().add_modifier(Modifier::DIM)));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

/// Hotkey bar widget
pub struct HotkeyBarWidget {
    tab: Tab,
}

impl HotkeyBarWidget {
    pub fn new(tab: Tab) -> Self {
        Self { tab }
    }
}

impl Widget for HotkeyBarWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut hotkeys = vec![
            ("Enter:roll", true),
            ("Tab:next", true),
            ("t:tension", true),
            ("m:mode", true),
            ("s/S:surge", true),
        ];
        if matches!(self.tab, Tab::Hero | Tab::Master) {
            hotkeys.push(("T:master tension", true));
        }
        hotkeys.extend([
            ("H:history", false),
            ("c:clear", false),
            ("R:reset", false),
            ("?:help", false),
            ("q:quit", false),
        ]);

        let spans: Vec<Span> = hotkeys
            .iter()
            .flat_map(|(text, primary)| {
                let style = if *primary {
                    Style::default()
                } else {
                    Style::default().add_modifier(Modifier::DIM)
                };
                vec![Span::styled(*text, style), Span::raw("  ")]
            })
            .collect();

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
