//! Render orchestration for the Sword Saga TUI

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use swordsaga_core::FaceSource;

use crate::app::{App, Overlay, Tab};
use crate::ui::layout::{centered_rect_fixed, split_results, AppLayout};
use crate::ui::widgets::{
    DiceRollWidget, HistoryWidget, HotkeyBarWidget, ResolutionLine, StagingWidget,
    StatusBarWidget,
};

/// Main render function
pub fn render<F: FaceSource>(frame: &mut Frame, app: &App<F>) {
    let area = frame.area();
    let layout = AppLayout::calculate(area);

    render_title_bar(frame, layout.title_area);
    render_tabs(frame, app, layout.tabs_area);
    frame.render_widget(StagingWidget::new(app), layout.staging_area);
    render_results(frame, app, layout.result_area);

    let status = StatusBarWidget::new(app.session.mode, app.session.surge(), &app.theme)
        .stat(app.session.active_stat(), app.session.is_dirty())
        .message(app.status_message());
    frame.render_widget(status, layout.status_bar);
    frame.render_widget(HotkeyBarWidget::new(app.tab), layout.hotkey_bar);

    // Render overlay if present
    if let Some(overlay) = app.overlay() {
        render_overlay(frame, app, overlay, area);
    }
}

/// Render the title bar
fn render_title_bar(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        " ⚔ Sword Saga Dice ⚔ ",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_tabs<F: FaceSource>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border_style(false)),
        )
        .highlight_style(app.theme.selection_style(true));
    frame.render_widget(tabs, area);
}

/// Render the player result, and the master result beside it on the contest tabs
fn render_results<F: FaceSource>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let session = &app.session;

    // Each outcome is only present for the matching kind of player roll.
    let player_resolution = session
        .contest()
        .map(ResolutionLine::Contest)
        .or_else(|| session.armor_outcome().map(ResolutionLine::Armor))
        .or_else(|| {
            session.evade_outcome().map(|outcome| ResolutionLine::Evade {
                outcome,
                aim: session.aim_to_beat,
            })
        });

    if !matches!(app.tab, Tab::Hero | Tab::Master) {
        let widget = DiceRollWidget::new(&app.theme)
            .title(" Result ")
            .result(app.displayed_result())
            .resolution(player_resolution)
            .focused(true);
        frame.render_widget(widget, area);
        return;
    }

    let (player_area, master_area) = split_results(area);
    let player = DiceRollWidget::new(&app.theme)
        .title(" Player ")
        .result(session.last_roll())
        .resolution(player_resolution)
        .focused(app.tab == Tab::Hero);
    let master = DiceRollWidget::new(&app.theme)
        .title(" Master ")
        .result(session.last_master_roll())
        .focused(app.tab == Tab::Master);
    frame.render_widget(player, player_area);
    frame.render_widget(master, master_area);
}

/// Render overlay
fn render_overlay<F: FaceSource>(frame: &mut Frame, app: &App<F>, overlay: Overlay, area: Rect) {
    match overlay {
        Overlay::Help => render_help_overlay(frame, app, area),
        Overlay::History => {
            let popup_area = centered_rect_fixed(60, 24, area);
            frame.render_widget(Clear, popup_area);
            let widget =
                HistoryWidget::new(app.session.ledger(), &app.theme).scroll(app.history_scroll);
            frame.render_widget(widget, popup_area);
        }
        Overlay::ConfirmReset => render_confirm_reset(frame, app, area),
    }
}

/// Render help overlay
fn render_help_overlay<F: FaceSource>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let popup_area = centered_rect_fixed(52, 26, area);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::UNDERLINED),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            " Sword Saga Dice - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        heading("Rolling:"),
        Line::from("  Enter/Space   Roll the current tab"),
        Line::from("  t / T         Tension on player / master roll"),
        Line::from("  m             Cycle Normal / Advantage / Disadvantage"),
        Line::from("  s / S         Add / remove a surge d6"),
        Line::from(""),
        heading("Staging:"),
        Line::from("  Tab/Shift+Tab Switch tab"),
        Line::from("  ←/→ or h/l    Select die or field"),
        Line::from("  ↑/↓ or k/j    Change the selection"),
        Line::from("  0-9, +/-      Damage (Armor) or aim (Evade)"),
        Line::from("  1-7           Select a stat (Hero)"),
        Line::from(""),
        heading("Other:"),
        Line::from("  w             Save hero dice to the selected stat"),
        Line::from("  H             Roll history"),
        Line::from("  c             Clear staged dice"),
        Line::from("  R             Delete presets and history"),
        Line::from("  q             Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or q to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

fn render_confirm_reset<F: FaceSource>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let popup_area = centered_rect_fixed(44, 7, area);
    frame.render_widget(Clear, popup_area);

    let text = vec![
        Line::from("Delete all stat presets and roll history?"),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", app.theme.outcome_style(false)),
            Span::raw(" confirm    "),
            Span::styled("any other key", app.theme.dim_style()),
            Span::raw(" cancel"),
        ]),
    ];

    let block = Block::default()
        .title(" Reset ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.failure));

    frame.render_widget(Paragraph::new(text).block(block), popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use swordsaga_core::testing::scripted_session;

    #[test]
    fn test_render_each_tab_and_overlay() {
        let mut app = App::new(scripted_session([5, 3, 6, 9], "unused.json"));
        app.roll_current();
        let mut terminal = Terminal::new(TestBackend::new(100, 36)).expect("terminal");

        for tab in Tab::ALL {
            app.tab = tab;
            terminal.draw(|f| render(f, &app)).expect("draw");
        }
        for overlay in [Overlay::Help, Overlay::History, Overlay::ConfirmReset] {
            match overlay {
                Overlay::Help => app.toggle_help(),
                Overlay::History => app.toggle_history(),
                Overlay::ConfirmReset => app.request_reset(),
            }
            terminal.draw(|f| render(f, &app)).expect("draw");
            app.close_overlay();
        }
    }
}
