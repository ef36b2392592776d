//! Headless mode for the Sword Saga roller.
//!
//! A line-oriented protocol on stdin, for scripting and automated testing:
//! - Lines starting with `#` are commands (`#hero`, `#master`, `#tension`, ...)
//! - Any other line is a list of die tags rolled as a custom roll
//!
//! Every output line carries a `[TAG]` prefix so it can be matched by scripts.

use std::io::{self, BufRead, Write};

use swordsaga_core::dice::dice_display;
use swordsaga_core::{
    parse_dice_tags, DicePool, DieType, DifficultyLevel, FaceSource, RollMode, RollSession,
    RollSource, RollSummary, SessionConfig, SessionError, Side, Stat, MAX_DICE,
};

/// Number of ledger entries `#history` prints by default.
const DEFAULT_HISTORY: usize = 10;

/// What a single input line produced.
#[derive(Debug, Default)]
pub struct Response {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Response {
    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn error(&mut self, message: impl std::fmt::Display) {
        self.lines.push(format!("[ERROR] {message}"));
    }
}

/// Run the roller in headless mode until `#quit` or end of input.
pub async fn run_headless(config: SessionConfig) -> Result<(), SessionError> {
    let mut session = RollSession::new(config).await;

    println!("=== Sword Saga Headless Mode ===");
    println!(
        "Presets: {} ({} stored)",
        session.presets().path().display(),
        session.presets().len()
    );
    println!();
    for line in help_lines() {
        println!("{line}");
    }
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let response = execute(&mut session, &line).await;
        for out in &response.lines {
            println!("{out}");
        }
        stdout.flush().ok();

        if response.quit {
            break;
        }
    }

    Ok(())
}

/// Execute one line of the protocol against `session`.
pub async fn execute<F: FaceSource>(session: &mut RollSession<F>, line: &str) -> Response {
    let mut response = Response::default();
    let line = line.trim();
    if line.is_empty() {
        return response;
    }

    let Some(command) = line.strip_prefix('#') else {
        let tags: Vec<&str> = line.split_whitespace().collect();
        custom_roll(session, &tags, &mut response);
        return response;
    };

    let parts: Vec<&str> = command.split_whitespace().collect();
    let args = parts.get(1..).unwrap_or(&[]);
    match parts.first().copied() {
        Some("quit") | Some("exit") => {
            response.line("Goodbye!");
            response.quit = true;
        }
        Some("roll") => custom_roll(session, args, &mut response),
        Some("hero") => hero(session, args, &mut response),
        Some("master") => master(session, args, &mut response),
        Some("pool") => pool(session, args, &mut response),
        Some("armor") => armor(session, args, &mut response),
        Some("evade") => evade(session, args, &mut response),
        Some("mode") => mode(session, args, &mut response),
        Some("surge") => surge(session, args, &mut response),
        Some("tension") => tension(session, args, &mut response),
        Some("history") => history(session, args, &mut response),
        Some("stat") => stat(session, args, &mut response),
        Some("save") => match session.save_current_preset().await {
            Ok(true) => response.line(format!(
                "[SAVED] Preset saved to {}",
                session.presets().path().display()
            )),
            Ok(false) => response.error("Select a stat with #stat before saving"),
            Err(e) => response.error(format!("Save failed: {e}")),
        },
        Some("clear") => {
            session.clear_staged();
            response.line("[CLEARED] Staged dice and results cleared");
        }
        Some("reset") => match session.hard_reset().await {
            Ok(()) => response.line("[RESET] Presets, history and staged dice cleared"),
            Err(e) => response.error(format!("Reset failed: {e}")),
        },
        Some("help") => {
            response.line("[HELP]");
            response.lines.extend(help_lines().iter().map(|l| l.to_string()));
        }
        _ => response.error("Unknown command. Type #help for help."),
    }

    response
}

fn help_lines() -> &'static [&'static str] {
    &[
        "Commands:",
        "  #hero [base] [bonus|none] [prof]  - Roll the hero dice",
        "  #master [difficulty]              - Roll the master's difficulty dice",
        "  #pool <combat|aim> [d6=2 ...]     - Set and roll an attack pool",
        "  #armor <charges> <damage> [die]   - Roll armor against incoming damage",
        "  #evade <aim> [d6=2 ...]           - Roll to evade an attack",
        "  #roll <dice...>                   - Roll arbitrary dice (also: plain line)",
        "  #mode <normal|adv|dis>            - Set the roll mode",
        "  #surge <n>                        - Set surge dice",
        "  #tension [master]                 - Add a tension die to the last roll",
        "  #history [n]                      - Show recent rolls",
        "  #stat <id>                        - Select a stat and load its preset",
        "  #save                             - Save the hero dice to the selected stat",
        "  #clear                            - Clear staged dice and results",
        "  #reset                            - Delete presets and history",
        "  #help                             - Show this help",
        "  #quit                             - Exit",
    ]
}

fn custom_roll<F: FaceSource>(
    session: &mut RollSession<F>,
    tags: &[&str],
    response: &mut Response,
) {
    if tags.is_empty() {
        response.error("Usage: #roll <dice...>, e.g. #roll d20 d6");
        return;
    }
    if tags.len() > MAX_DICE as usize {
        response.error(format!("At most {MAX_DICE} dice per roll"));
        return;
    }
    match parse_dice_tags(tags) {
        Ok(dice) => {
            session.custom_dice = dice;
            roll_and_report(session, RollSource::Custom, response);
        }
        Err(e) => response.error(e),
    }
}

fn hero<F: FaceSource>(session: &mut RollSession<F>, args: &[&str], response: &mut Response) {
    let mut proficiency = false;
    let mut dice = Vec::new();
    for arg in args {
        if arg.eq_ignore_ascii_case("prof") {
            proficiency = true;
        } else if arg.eq_ignore_ascii_case("none") {
            dice.push(None);
        } else {
            match arg.parse::<DieType>() {
                Ok(die) => dice.push(Some(die)),
                Err(e) => return response.error(e),
            }
        }
    }

    match dice.as_slice() {
        [] => {}
        [Some(base), rest @ ..] if rest.len() <= 1 => {
            session.hero.base_die = *base;
            if let Some(bonus) = rest.first() {
                session.hero.bonus_die = *bonus;
            }
        }
        _ => return response.error("Usage: #hero [base] [bonus|none] [prof]"),
    }
    if !args.is_empty() {
        session.hero.proficiency = proficiency;
    }

    roll_and_report(session, RollSource::Hero, response);
}

fn master<F: FaceSource>(session: &mut RollSession<F>, args: &[&str], response: &mut Response) {
    if !args.is_empty() {
        match args.join(" ").parse::<DifficultyLevel>() {
            Ok(level) => session.difficulty = level,
            Err(e) => return response.error(e),
        }
    }
    roll_and_report(session, RollSource::Master, response);
}

fn pool<F: FaceSource>(session: &mut RollSession<F>, args: &[&str], response: &mut Response) {
    let (source, counts) = match args.split_first() {
        Some((&"combat", counts)) => (RollSource::Combat, counts),
        Some((&"aim", counts)) => (RollSource::Aim, counts),
        _ => return response.error("Usage: #pool <combat|aim> [d6=2 ...]"),
    };
    let target = match source {
        RollSource::Aim => &mut session.aim_pool,
        _ => &mut session.combat_pool,
    };
    if let Err(e) = apply_counts(target, counts) {
        return response.error(e);
    }
    roll_and_report(session, source, response);
}

fn armor<F: FaceSource>(session: &mut RollSession<F>, args: &[&str], response: &mut Response) {
    let (Some(charges), Some(damage)) = (
        args.first().and_then(|s| s.parse::<u32>().ok()),
        args.get(1).and_then(|s| s.parse::<u64>().ok()),
    ) else {
        return response.error("Usage: #armor <charges> <damage> [die]");
    };
    if charges > MAX_DICE {
        return response.error(format!("At most {MAX_DICE} armor charges"));
    }
    if let Some(tag) = args.get(2) {
        match tag.parse::<DieType>() {
            Ok(die) => session.armor.die = die,
            Err(e) => return response.error(e),
        }
    }
    session.armor.set_charges(charges);
    session.armor.incoming_damage = damage;

    roll_and_report(session, RollSource::Armor, response);
    if let Some(outcome) = session.armor_outcome() {
        response.line(format!(
            "[ARMOR] {} damage / {} = {} damage taken",
            outcome.incoming_damage, outcome.divisor, outcome.final_damage
        ));
    }
}

fn evade<F: FaceSource>(session: &mut RollSession<F>, args: &[&str], response: &mut Response) {
    let Some(aim) = args.first().and_then(|s| s.parse::<u64>().ok()) else {
        return response.error("Usage: #evade <aim> [d6=2 ...]");
    };
    if let Err(e) = apply_counts(&mut session.evade_pool, &args[1..]) {
        return response.error(e);
    }
    session.aim_to_beat = aim;

    roll_and_report(session, RollSource::Evade, response);
    if let Some(outcome) = session.evade_outcome() {
        response.line(format!("[EVADE] {outcome} (aim {aim})"));
    }
}

fn mode<F: FaceSource>(session: &mut RollSession<F>, args: &[&str], response: &mut Response) {
    match args.first().map(|s| s.parse::<RollMode>()) {
        Some(Ok(mode)) => {
            session.mode = mode;
            response.line(format!("[MODE] {mode}"));
        }
        Some(Err(e)) => response.error(e),
        None => response.line(format!("[MODE] {}", session.mode)),
    }
}

fn surge<F: FaceSource>(session: &mut RollSession<F>, args: &[&str], response: &mut Response) {
    match args.first().map(|s| s.parse::<u32>()) {
        Some(Ok(n)) if n > MAX_DICE => {
            return response.error(format!("At most {MAX_DICE} surge dice"))
        }
        Some(Ok(n)) => session.set_surge(n),
        Some(Err(_)) => return response.error("Usage: #surge <n>"),
        None => {}
    }
    response.line(format!("[SURGE] {} surge dice", session.surge()));
}

fn tension<F: FaceSource>(session: &mut RollSession<F>, args: &[&str], response: &mut Response) {
    let side = match args.first().copied() {
        Some("master") => Side::Master,
        _ => Side::Player,
    };
    match session.add_tension(side) {
        Some(escalated) => {
            let face = escalated.tension_dice.last().map(|d| d.value).unwrap_or_default();
            response.line(format!(
                "[TENSION] d6={face} => {} = {}",
                escalated.label, escalated.final_total
            ));
            report_contest(session, response);
        }
        None => response.error("No roll to add tension to"),
    }
}

fn history<F: FaceSource>(session: &mut RollSession<F>, args: &[&str], response: &mut Response) {
    let limit = args
        .first()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_HISTORY);
    if session.ledger().is_empty() {
        response.line("[HISTORY] No rolls yet");
        return;
    }
    response.line(format!("[HISTORY] {} rolls", session.ledger().len()));
    for summary in session.ledger().iter().take(limit) {
        response.line(format!("  {summary}"));
    }
}

fn stat<F: FaceSource>(session: &mut RollSession<F>, args: &[&str], response: &mut Response) {
    let Some(arg) = args.first() else {
        let active = session
            .active_stat()
            .map(|s| s.id().to_string())
            .unwrap_or_else(|| "none".to_string());
        response.line(format!("[STAT] {active}"));
        return;
    };
    match arg.parse::<Stat>() {
        Ok(stat) => {
            session.select_stat(stat);
            let bonus = session
                .hero
                .bonus_die
                .map(|d| d.to_string())
                .unwrap_or_else(|| "none".to_string());
            match session.active_stat() {
                Some(active) => response.line(format!(
                    "[STAT] {} selected: {} + {bonus}",
                    active.label(),
                    session.hero.base_die
                )),
                None => response.line(format!("[STAT] {} deselected", stat.label())),
            }
        }
        Err(e) => response.error(e),
    }
}

/// Parse `d6=2` style counts (a bare `d6` adds one) into `pool`.
fn apply_counts(pool: &mut DicePool, counts: &[&str]) -> Result<(), String> {
    for entry in counts {
        let (tag, count) = match entry.split_once('=') {
            Some((tag, count)) => {
                let count = count
                    .parse::<u32>()
                    .map_err(|_| format!("Invalid count in {entry}"))?;
                if count > MAX_DICE {
                    return Err(format!("At most {MAX_DICE} dice of each kind: {entry}"));
                }
                (tag, Some(count))
            }
            None => (*entry, None),
        };
        let die = tag.parse::<DieType>().map_err(|e| e.to_string())?;
        match count {
            Some(count) => pool.set(die, count),
            None => pool.increment(die),
        }
    }
    Ok(())
}

fn roll_and_report<F: FaceSource>(
    session: &mut RollSession<F>,
    source: RollSource,
    response: &mut Response,
) {
    match session.roll(source) {
        Some(summary) => {
            report_roll(&summary, response);
            if matches!(source, RollSource::Hero | RollSource::Master) {
                report_contest(session, response);
            }
        }
        None => response.error(format!("No dice staged for {source}")),
    }
}

fn report_roll(summary: &RollSummary, response: &mut Response) {
    response.line(format!("[ROLL] {} ({})", summary.label, summary.mode));
    response.line(format!("[DICE] {}", dice_display(&summary.dice)));
    response.line(format!(
        "[TOTAL] {}: {}",
        summary.source.result_caption(),
        summary.breakdown()
    ));
}

fn report_contest<F: FaceSource>(session: &RollSession<F>, response: &mut Response) {
    if let (Some(outcome), Some(hero), Some(master)) = (
        session.contest(),
        session.last_roll(),
        session.last_master_roll(),
    ) {
        response.line(format!(
            "[CONTEST] {outcome} ({} vs {})",
            hero.final_total, master.final_total
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swordsaga_core::testing::scripted_session;
    use tempfile::TempDir;

    fn has_line(response: &Response, prefix: &str) -> bool {
        response.lines.iter().any(|l| l.starts_with(prefix))
    }

    #[tokio::test]
    async fn test_hero_roll_reports_breakdown() {
        let mut session = scripted_session([5, 3, 6], "unused.json");
        let response = execute(&mut session, "#hero d20 d4 prof").await;

        assert!(response.lines.contains(&"[ROLL] Heroic Resolve (Normal)".to_string()));
        assert!(response.lines.contains(&"[DICE] [d20=5] [d4=3] [d6=6!]".to_string()));
        assert!(response.lines.contains(&"[TOTAL] Hero Result: 14 x3 = 42".to_string()));
        assert!(!response.quit);
    }

    #[tokio::test]
    async fn test_contest_after_master() {
        let mut session = scripted_session([15, 10], "unused.json");
        execute(&mut session, "#hero").await;
        let response = execute(&mut session, "#master normal").await;

        assert!(response.lines.contains(&"[CONTEST] WIN (15 vs 10)".to_string()));
    }

    #[tokio::test]
    async fn test_no_contest_after_armor() {
        let mut session = scripted_session([3, 10], "unused.json");
        execute(&mut session, "#armor 1 5").await;
        let response = execute(&mut session, "#master normal").await;

        assert!(response.lines.contains(&"[TOTAL] Master Result: 10 = 10".to_string()));
        assert!(!has_line(&response, "[CONTEST]"));
    }

    #[tokio::test]
    async fn test_over_cap_counts_are_rejected() {
        let mut session = scripted_session([], "unused.json");

        let response = execute(&mut session, "#surge 4294967295").await;
        assert!(has_line(&response, "[ERROR] At most 99 surge dice"));
        assert_eq!(session.surge(), 0);

        let response = execute(&mut session, "#armor 4294967295 1").await;
        assert!(has_line(&response, "[ERROR] At most 99 armor charges"));
        assert!(session.ledger().is_empty());

        let response = execute(&mut session, "#pool combat d20=4294967295").await;
        assert!(has_line(&response, "[ERROR] At most 99 dice of each kind"));
        assert!(session.combat_pool.is_empty());

        let line = vec!["d4"; MAX_DICE as usize + 1].join(" ");
        let response = execute(&mut session, &line).await;
        assert!(has_line(&response, "[ERROR] At most 99 dice per roll"));
        assert!(session.ledger().is_empty());

        execute(&mut session, "#surge 99").await;
        assert_eq!(session.surge(), MAX_DICE);
    }

    #[tokio::test]
    async fn test_plain_line_is_custom_roll() {
        let mut session = scripted_session([2, 3], "unused.json");
        let response = execute(&mut session, "d8 d10").await;
        assert!(response.lines.contains(&"[ROLL] Custom Roll (Normal)".to_string()));

        let response = execute(&mut session, "d7").await;
        assert!(has_line(&response, "[ERROR] Invalid die type"));
    }

    #[tokio::test]
    async fn test_armor_and_evade() {
        let mut session = scripted_session([3, 3, 4, 5], "unused.json");
        let response = execute(&mut session, "#armor 2 20").await;
        assert!(response
            .lines
            .contains(&"[ARMOR] 20 damage / 6 = 3 damage taken".to_string()));

        let response = execute(&mut session, "#evade 9 d6=2").await;
        assert!(response.lines.contains(&"[EVADE] DODGED (aim 9)".to_string()));
        assert_eq!(session.evade_pool.count(DieType::D6), 2);
    }

    #[tokio::test]
    async fn test_empty_pool_is_error() {
        let mut session = scripted_session([], "unused.json");
        let response = execute(&mut session, "#pool combat").await;
        assert!(has_line(&response, "[ERROR] No dice staged"));
        assert!(session.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_tension_and_history() {
        let mut session = scripted_session([8, 6], "unused.json");
        let response = execute(&mut session, "#tension").await;
        assert!(has_line(&response, "[ERROR] No roll"));

        execute(&mut session, "#roll d20").await;
        let response = execute(&mut session, "#tension").await;
        assert!(response
            .lines
            .contains(&"[TENSION] d6=6 => Custom Roll = 24".to_string()));

        let response = execute(&mut session, "#history").await;
        assert_eq!(response.lines[0], "[HISTORY] 1 rolls");
    }

    #[tokio::test]
    async fn test_mode_and_surge() {
        let mut session = scripted_session([], "unused.json");
        let response = execute(&mut session, "#mode adv").await;
        assert_eq!(response.lines, vec!["[MODE] Advantage".to_string()]);
        assert_eq!(session.mode, RollMode::Advantage);

        execute(&mut session, "#surge 2").await;
        assert_eq!(session.surge(), 2);
        assert!(has_line(&execute(&mut session, "#surge x").await, "[ERROR]"));
    }

    #[tokio::test]
    async fn test_stat_save_and_reset() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("presets.json");
        let mut session = scripted_session([], &path);

        let response = execute(&mut session, "#save").await;
        assert!(has_line(&response, "[ERROR] Select a stat"));

        execute(&mut session, "#stat str").await;
        session.hero.base_die = DieType::D10;
        let response = execute(&mut session, "#save").await;
        assert!(has_line(&response, "[SAVED]"));
        assert!(path.exists());

        let response = execute(&mut session, "#reset").await;
        assert!(has_line(&response, "[RESET]"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_quit_and_unknown() {
        let mut session = scripted_session([], "unused.json");
        assert!(has_line(&execute(&mut session, "#dance").await, "[ERROR] Unknown command"));
        assert!(execute(&mut session, "#quit").await.quit);
        assert!(execute(&mut session, "   ").await.lines.is_empty());
    }
}
