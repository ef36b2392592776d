//! Event handling for the Sword Saga TUI

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use swordsaga_core::{FaceSource, Side};

use crate::app::{App, Overlay, Tab};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event<F: FaceSource>(app: &mut App<F>, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Mouse wheel scrolls the history overlay
fn handle_mouse_event<F: FaceSource>(app: &mut App<F>, mouse: MouseEvent) -> EventResult {
    if app.overlay() != Some(Overlay::History) {
        return EventResult::Continue;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_history_up();
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.scroll_history_down();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event<F: FaceSource>(app: &mut App<F>, key: KeyEvent) -> EventResult {
    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    match app.overlay() {
        Some(overlay) => handle_overlay_key(app, overlay, key),
        None => handle_main_key(app, key),
    }
}

fn handle_overlay_key<F: FaceSource>(
    app: &mut App<F>,
    overlay: Overlay,
    key: KeyEvent,
) -> EventResult {
    match (overlay, key.code) {
        (Overlay::ConfirmReset, KeyCode::Char('y') | KeyCode::Char('Y')) => {
            app.confirm_reset();
        }
        (Overlay::ConfirmReset, _) => {
            app.close_overlay();
            app.set_status("Reset cancelled");
        }
        (Overlay::History, KeyCode::Char('j') | KeyCode::Down) => app.scroll_history_down(),
        (Overlay::History, KeyCode::Char('k') | KeyCode::Up) => app.scroll_history_up(),
        (_, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Char('H')) => {
            app.close_overlay();
        }
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

fn handle_main_key<F: FaceSource>(app: &mut App<F>, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') => return EventResult::Quit,

        // Tabs
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.prev_tab(),

        // Rolling
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.roll_current();
        }
        KeyCode::Char('t') => app.add_tension(Side::Player),
        KeyCode::Char('T') => app.add_tension(Side::Master),
        KeyCode::Char('m') => app.cycle_mode(),
        KeyCode::Char('s') => app.add_surge(),
        KeyCode::Char('S') => app.remove_surge(),

        // Staging
        KeyCode::Left | KeyCode::Char('h') => app.select_prev(),
        KeyCode::Right | KeyCode::Char('l') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.increment(),
        KeyCode::Down | KeyCode::Char('j') => app.decrement(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_number(1),
        KeyCode::Char('-') => app.adjust_number(-1),
        KeyCode::PageUp => app.adjust_number(10),
        KeyCode::PageDown => app.adjust_number(-10),
        KeyCode::Backspace => app.backspace_number(),
        KeyCode::Char(c @ '0'..='9') => handle_digit(app, c),

        // Presets and housekeeping
        KeyCode::Char('w') => app.request_save(),
        KeyCode::Char('c') => app.clear_staged(),
        KeyCode::Char('R') => app.request_reset(),

        // Overlays
        KeyCode::Char('?') | KeyCode::F(1) => app.toggle_help(),
        KeyCode::Char('H') => app.toggle_history(),
        KeyCode::Esc => app.clear_status(),

        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Digits pick a stat on the hero tab and type numbers elsewhere.
fn handle_digit<F: FaceSource>(app: &mut App<F>, c: char) {
    let Some(digit) = c.to_digit(10) else {
        return;
    };
    match app.tab {
        Tab::Hero if digit >= 1 => app.select_stat(digit as usize - 1),
        _ => app.type_digit(digit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use swordsaga_core::testing::{scripted_session, ScriptedFaces};
    use swordsaga_core::{DieType, Stat};

    fn app() -> App<ScriptedFaces> {
        App::new(scripted_session([9, 6], "unused.json"))
    }

    fn press(app: &mut App<ScriptedFaces>, code: KeyCode) -> EventResult {
        let key = KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        handle_event(app, Event::Key(key))
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), EventResult::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_event(&mut app, Event::Key(ctrl_c)), EventResult::Quit);
    }

    #[test]
    fn test_roll_and_tension_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.last_roll().map(|r| r.final_total), Some(9));
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.session.last_roll().map(|r| r.final_total), Some(27));
    }

    #[test]
    fn test_tab_and_pool_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.tab, Tab::Combat);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.session.combat_pool.count(DieType::D8), 1);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.tab, Tab::Master);
    }

    #[test]
    fn test_digits_by_tab() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.session.active_stat(), Some(Stat::Dexterity));

        app.tab = Tab::Evade;
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.session.aim_to_beat, 12);
    }

    #[test]
    fn test_reset_overlay_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('R'));
        press(&mut app, KeyCode::Char('n'));
        assert!(!app.pending_reset);
        assert!(app.overlay().is_none());

        press(&mut app, KeyCode::Char('R'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.pending_reset);
    }

    #[test]
    fn test_overlay_swallows_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.overlay(), Some(Overlay::Help));
        assert_eq!(press(&mut app, KeyCode::Enter), EventResult::Continue);
        assert!(app.session.last_roll().is_none());
        press(&mut app, KeyCode::Esc);
        assert!(app.overlay().is_none());
    }
}
