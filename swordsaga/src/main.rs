//! Sword Saga dice roller TUI.
//!
//! A keyboard-driven terminal interface for resolving Sword Saga rolls:
//! hero and master checks, attack pools, armor and evasion.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for scripting:
//!
//! ```bash
//! echo "#hero d20 d4 prof" | cargo run -p swordsaga -- --headless --seed 7
//! ```

mod app;
mod events;
mod headless;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;
use swordsaga_core::{RollSession, SessionConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

/// Log file written while the TUI owns the terminal.
const LOG_FILE: &str = "swordsaga.log";

/// Command line options. Flags override the environment.
#[derive(Debug, Default)]
struct CliArgs {
    headless: bool,
    help: bool,
    seed: Option<u64>,
    presets: Option<PathBuf>,
}

impl CliArgs {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut parsed = CliArgs::default();
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--headless" => parsed.headless = true,
                "-h" | "--help" => parsed.help = true,
                "--seed" => {
                    let value = iter.next().ok_or("--seed requires a value")?;
                    parsed.seed = Some(
                        value
                            .parse()
                            .map_err(|_| format!("Invalid seed: {value}"))?,
                    );
                }
                "--presets" => {
                    let value = iter.next().ok_or("--presets requires a path")?;
                    parsed.presets = Some(PathBuf::from(value));
                }
                other => return Err(format!("Unknown argument: {other}")),
            }
        }
        Ok(parsed)
    }

    fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::from_env();
        if let Some(path) = &self.presets {
            config = config.with_presets_path(path);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let cli = match CliArgs::parse(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };

    if cli.help {
        print_help();
        return Ok(());
    }

    if cli.headless {
        setup_stderr_logging();
        return headless::run_headless(cli.session_config())
            .await
            .map_err(|e| e.into());
    }

    if let Err(e) = setup_file_logging() {
        eprintln!("Warning: file logging disabled: {e}");
    }
    let session = RollSession::new(cli.session_config()).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, App::new(session)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

/// Headless output owns stdout, so logs go to stderr.
fn setup_stderr_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// The TUI owns the terminal, so logs go to a file under `SWORDSAGA_LOG_DIR`.
fn setup_file_logging() -> io::Result<()> {
    let log_dir = std::env::var_os("SWORDSAGA_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("logs"));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // Keep the writer alive for the rest of the process
    std::mem::forget(guard);

    tracing::info!(log_dir = %log_dir.display(), "logging initialized");
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        // Render
        terminal.draw(|f| render(f, &app))?;

        // Process any pending save operation
        if app.pending_save {
            app.pending_save = false;
            match app.session.save_current_preset().await {
                Ok(true) => {
                    let path = app.session.presets().path().display().to_string();
                    app.set_status(format!("Preset saved to {path}"));
                }
                Ok(false) => app.set_status("Select a stat (1-7) before saving"),
                Err(e) => {
                    tracing::error!(error = %e, "preset save failed");
                    app.set_status(format!("Save failed: {e}"));
                }
            }
            continue;
        }

        // Process any pending reset
        if app.pending_reset {
            app.pending_reset = false;
            match app.session.hard_reset().await {
                Ok(()) => app.set_status("Presets and history cleared"),
                Err(e) => {
                    tracing::error!(error = %e, "reset failed");
                    app.set_status(format!("Reset failed: {e}"));
                }
            }
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            match handle_event(&mut app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        }
    }
}

fn print_help() {
    println!("Sword Saga Dice - dice resolution for Sword Saga");
    println!();
    println!("USAGE:");
    println!("  swordsaga [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help          Show this help message");
    println!("  --headless          Run in headless mode (line protocol on stdin)");
    println!("  --seed <N>          Seed the dice for a reproducible session");
    println!("  --presets <PATH>    Stat preset file (default: swordsaga_presets.json)");
    println!();
    println!("ENVIRONMENT:");
    println!("  SWORDSAGA_PRESETS   Stat preset file");
    println!("  SWORDSAGA_SEED      Dice seed");
    println!("  SWORDSAGA_LOG_DIR   Log directory for the TUI (default: logs)");
    println!("  RUST_LOG            Log filter");
    println!();
    println!("EXAMPLES:");
    println!("  swordsaga                                  # Interactive TUI mode");
    println!("  swordsaga --headless --seed 7              # Reproducible headless session");
    println!("  swordsaga --presets ~/.swordsaga.json");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("swordsaga")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_flags() {
        let cli = CliArgs::parse(&args(&["--headless", "--seed", "42", "--presets", "p.json"]))
            .expect("valid args");
        assert!(cli.headless);
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.presets, Some(PathBuf::from("p.json")));

        let config = cli.session_config();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.presets_path, PathBuf::from("p.json"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(CliArgs::parse(&args(&["--seed"])).is_err());
        assert!(CliArgs::parse(&args(&["--seed", "many"])).is_err());
        assert!(CliArgs::parse(&args(&["--wat"])).is_err());
        assert!(CliArgs::parse(&args(&["-h"])).expect("valid args").help);
    }
}
