//! Terminal grid shooter (default binary).
//!
//! Resolves the configuration, builds the world, puts the terminal in raw mode
//! and hands over to the engine. The terminal is always restored on the way out.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridshot::core::{ConfigOverrides, GameConfig, World};
use gridshot::engine;
use gridshot::input::TerminalKeys;
use gridshot::term::TerminalRenderer;
use gridshot::types::Coord;

/// Log file path; logging is off when unset because stdout belongs to the game.
const LOG_ENV: &str = "GRIDSHOT_LOG";

#[derive(Debug, Parser)]
#[command(name = "gridshot", version, about = "Dodge the walls and enemies, shoot for points")]
struct Cli {
    /// JSON config file (keys: width, height, frameRate, cursorPos, startNumEnemies)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Grid width in columns, walls included
    #[arg(long)]
    width: Option<i32>,
    /// Grid height in rows, walls included
    #[arg(long)]
    height: Option<i32>,
    /// Simulation tick interval in milliseconds
    #[arg(long = "frame-rate-ms")]
    frame_rate_ms: Option<u64>,
    /// Starting cursor column
    #[arg(long, requires = "cursor_y")]
    cursor_x: Option<i32>,
    /// Starting cursor row
    #[arg(long, requires = "cursor_x")]
    cursor_y: Option<i32>,
    /// Number of enemies at the start
    #[arg(long)]
    enemies: Option<u32>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            width: self.width,
            height: self.height,
            frame_rate: self.frame_rate_ms,
            cursor_pos: self.cursor_x.zip(self.cursor_y).map(|(x, y)| Coord::new(x, y)),
            start_num_enemies: self.enemies,
        }
    }

    fn resolve_config(&self) -> Result<GameConfig> {
        let mut config = GameConfig::default();
        if let Some(path) = &self.config {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            let file = ConfigOverrides::from_json(&text)
                .with_context(|| format!("failed to parse config file {}", path.display()))?;
            config = config.with_overrides(&file);
        }
        Ok(config.with_overrides(&self.overrides()))
    }
}

fn init_tracing() -> Result<()> {
    let Some(path) = std::env::var_os(LOG_ENV) else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("failed to open log file {}", PathBuf::from(&path).display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let config = cli.resolve_config()?;
    let world = World::new(config).context("invalid game configuration")?;

    let mut term = TerminalRenderer::new();
    if let Err(err) = term.enter() {
        let _ = term.exit();
        return Err(err.context("failed to configure terminal"));
    }

    let result = engine::run(world, TerminalKeys, &mut term);

    // Always try to restore terminal state.
    let _ = term.exit();

    let report = result?;
    info!(score = report.score, game_over = report.game_over, "exit");
    println!("Final score: {}", report.score);
    Ok(())
}
