use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use killfeed_core::config::{self, default_config_path, load_config, resolve_log_path};
use killfeed_core::{FeedHandle, ParseOptions, SourceStatus, SystemClock, parse_line, spawn_feed};
use killfeed_overlay::{KillRow, MonospaceMetrics};
use killfeed_types::FeedConfig;
use killfeed_types::formatting::{format_alpha_pct, format_millis_as_secs};

use crate::spawn_line_reader;
use crate::terminal::TerminalPainter;

/// Command-line overrides layered on top of the config file
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Log file, or the game directory containing Game.log
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
    /// Start from the beginning of the log instead of the end
    #[arg(long, global = true)]
    pub replay: bool,
    /// Also show NPC and environment actors
    #[arg(long, global = true)]
    pub include_non_qualifying: bool,
    /// Keep the `_<13 digits>` suffix on actor names
    #[arg(long, global = true)]
    pub keep_suffix: bool,
    #[arg(long, global = true)]
    pub base_alpha: Option<u8>,
    #[arg(long, global = true)]
    pub max_visible: Option<usize>,
    /// No bell on new kills
    #[arg(long, global = true)]
    pub no_sound: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut FeedConfig) {
        if let Some(path) = &self.log_file {
            config.log_file_path = path.clone();
        }
        if self.replay {
            config.replay_from_file_start = true;
        }
        if self.include_non_qualifying {
            config.include_non_qualifying_actors = true;
        }
        if self.keep_suffix {
            config.strip_actor_numeric_suffix = false;
        }
        if let Some(alpha) = self.base_alpha {
            config.base_alpha = alpha;
        }
        if let Some(max) = self.max_visible {
            config.max_visible_entries = max;
        }
        if self.no_sound {
            config.sound_on_kill = false;
        }
    }
}

/// Load the config file (or the per-user one) and apply overrides.
pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<FeedConfig, String> {
    let mut config = load_config(path).map_err(|e| e.to_string())?;
    overrides.apply(&mut config);
    Ok(config)
}

// ─────────────────────────────────────────────────────────────────────────────
// run
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(about = "feed commands")]
struct Repl {
    #[command(subcommand)]
    command: Option<ReplCommand>,
}

#[derive(Subcommand)]
enum ReplCommand {
    /// Show or hide the feed
    Toggle,
    AlphaUp,
    AlphaDown,
    Status,
    Exit,
}

/// Tail the log and paint the feed until `exit` or Ctrl-C.
pub async fn run(config: FeedConfig) -> Result<(), String> {
    config::validate(&config).map_err(|e| e.to_string())?;
    let path = resolve_log_path(&config);

    let mut feed = spawn_feed(&config, Arc::new(SystemClock));
    feed.attach_source(path.clone());
    println!("Tailing {}", path.display());

    let mut snapshots = feed.subscribe();
    let mut status = feed.status();
    let mut painter = TerminalPainter::new(config.layout, config.labels.clone())
        .with_bell(config.sound_on_kill);
    let mut lines = spawn_line_reader();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if let Some(frame) = painter.paint(&snapshot) {
                    print!("{frame}");
                    std::io::stdout().flush().map_err(|e| e.to_string())?;
                }
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = status.borrow_and_update().clone();
                if let SourceStatus::Failed { reason } = current {
                    println!("Log source failed: {reason}");
                }
            }
            line = lines.recv(), if stdin_open => {
                let Some(line) = line else {
                    stdin_open = false;
                    continue;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match respond(line, &feed).await {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(err) => println!("{err}"),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    feed.shutdown().await;
    Ok(())
}

/// Handle one REPL line. Returns `true` when the user asked to quit.
async fn respond(line: &str, feed: &FeedHandle) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "killfeed".to_string());
    let repl = Repl::try_parse_from(args).map_err(|e| e.to_string())?;

    let closed = |e: killfeed_core::FeedClosed| e.to_string();
    match repl.command {
        Some(ReplCommand::Toggle) => feed.toggle_visibility().await.map_err(closed)?,
        Some(ReplCommand::AlphaUp) => feed.increase_alpha().await.map_err(closed)?,
        Some(ReplCommand::AlphaDown) => feed.decrease_alpha().await.map_err(closed)?,
        Some(ReplCommand::Status) => show_status(feed).await?,
        Some(ReplCommand::Exit) => return Ok(true),
        None => {}
    }
    Ok(false)
}

async fn show_status(feed: &FeedHandle) -> Result<(), String> {
    let snapshot = feed.snapshot().await.map_err(|e| e.to_string())?;
    let source = match &*feed.status().borrow() {
        SourceStatus::Idle => "idle".to_string(),
        SourceStatus::Tailing { path } => format!("tailing {}", path.display()),
        SourceStatus::Failed { reason } => format!("failed: {reason}"),
        SourceStatus::Stopped => "stopped".to_string(),
    };
    println!("source:  {source}");
    println!("shown:   {}", snapshot.shown);
    println!(
        "alpha:   {} ({})",
        snapshot.base_alpha,
        format_alpha_pct(snapshot.base_alpha)
    );
    println!("entries: {}", snapshot.entries.len());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// check / config
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a whole log once and print the kills the filters accept.
pub fn check(config: &FeedConfig, path: &Path) -> Result<(), String> {
    let rows = check_lines(config, path)?;
    for row in &rows {
        println!("{row}");
    }
    println!("{} kills accepted", rows.len());
    Ok(())
}

fn check_lines(config: &FeedConfig, path: &Path) -> Result<Vec<String>, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let options = ParseOptions::from(config);
    let metrics = MonospaceMetrics::default();

    Ok(text
        .lines()
        .filter_map(|line| parse_line(line, &options))
        .map(|event| KillRow::build(&event, &config.labels, &config.layout, &metrics).plain_text())
        .collect())
}

pub fn show_config(config: &FeedConfig, path: Option<&Path>) -> Result<(), String> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path().map_err(|e| e.to_string())?,
    };
    println!("config file: {}", path.display());
    println!("log file:    {}", resolve_log_path(config).display());
    println!("visible:     {}", config.max_visible_entries);
    println!("show:        {}", format_millis_as_secs(config.show_duration_ms));
    println!("fade:        {}", format_millis_as_secs(config.fade_duration_ms));
    println!("tick:        {}ms", config.tick_interval_ms);
    println!("alpha:       {}", format_alpha_pct(config.base_alpha));
    println!("replay:      {}", config.replay_from_file_start);
    println!("npcs:        {}", config.include_non_qualifying_actors);
    println!("strip ids:   {}", config.strip_actor_numeric_suffix);
    Ok(())
}
