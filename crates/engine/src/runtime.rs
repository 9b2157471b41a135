//! Activity wiring: simulation, input and the render/control loop.
//!
//! - The simulation runs on a tokio task at a fixed tick interval and is the
//!   only code that moves entities.
//! - Input runs on a blocking thread, polling the key source with a short
//!   timeout so it notices shutdown.
//! - The control loop owns the terminal and redraws whenever the simulation
//!   reports a change, until shutdown.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::core::{GameSnapshot, Simulation, TickOutcome, World};
use crate::input::{Flow, InputError, InputHandler, KeySource};
use crate::shutdown::Shutdown;
use crate::term::{GameView, TerminalRenderer};
use crate::types::{EXIT_GRACE_MS, GAME_OVER_GRACE_MS};

pub const EXIT_MESSAGE: &str = "Exiting...";

/// Pending render requests. The renderer always draws a fresh snapshot, so a
/// short queue is enough.
const RENDER_QUEUE: usize = 4;
const INPUT_POLL_MS: u64 = 50;

/// Pauses used around shutdown.
#[derive(Debug, Clone, Copy)]
pub struct EngineTiming {
    /// How long the final game-over frame stays up before shutdown.
    pub game_over_grace: Duration,
    /// Pause after printing the exit message.
    pub exit_grace: Duration,
    /// Upper bound on how long input blocks before rechecking shutdown.
    pub input_poll: Duration,
}

impl Default for EngineTiming {
    fn default() -> Self {
        Self {
            game_over_grace: Duration::from_millis(GAME_OVER_GRACE_MS),
            exit_grace: Duration::from_millis(EXIT_GRACE_MS),
            input_poll: Duration::from_millis(INPUT_POLL_MS),
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineReport {
    pub score: u32,
    pub game_over: bool,
}

/// Run a full session on a fresh multi-threaded runtime.
pub fn run<K, W>(world: World, keys: K, term: &mut TerminalRenderer<W>) -> Result<EngineReport>
where
    K: KeySource + Send + 'static,
    W: Write,
{
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    rt.block_on(run_async(world, keys, term, EngineTiming::default()))
}

/// Run a session on the current runtime.
pub async fn run_async<K, W>(
    world: World,
    keys: K,
    term: &mut TerminalRenderer<W>,
    timing: EngineTiming,
) -> Result<EngineReport>
where
    K: KeySource + Send + 'static,
    W: Write,
{
    let shutdown = Shutdown::new();
    let view = GameView::default();
    let (render_tx, render_rx) = mpsc::channel::<TickOutcome>(RENDER_QUEUE);

    let initial = TickOutcome {
        dirty: true,
        game_over: false,
        score: 0,
    };
    draw(&view, &world, term, &initial)?;

    let sim = tokio::spawn(simulation_activity(
        world.simulation(),
        render_tx,
        shutdown.clone(),
        timing.game_over_grace,
    ));

    let input = {
        let handler = InputHandler::new(&world);
        let shutdown = shutdown.clone();
        tokio::task::spawn_blocking(move || input_activity(keys, handler, shutdown, timing.input_poll))
    };

    info!("session started");
    let control = control_loop(&view, &world, term, render_rx, &shutdown, timing).await;
    if control.is_err() {
        shutdown.trigger();
    }

    let outcome = sim.await.context("simulation task failed")?;
    input.await.context("input task failed")??;
    control?;

    info!(score = outcome.score, game_over = outcome.game_over, "session ended");
    Ok(EngineReport {
        score: outcome.score,
        game_over: outcome.game_over,
    })
}

async fn control_loop<W: Write>(
    view: &GameView,
    world: &World,
    term: &mut TerminalRenderer<W>,
    mut render_rx: mpsc::Receiver<TickOutcome>,
    shutdown: &Shutdown,
    timing: EngineTiming,
) -> Result<()> {
    loop {
        tokio::select! {
            biased;
            Some(outcome) = render_rx.recv() => draw(view, world, term, &outcome)?,
            _ = shutdown.wait() => break,
        }
    }
    term.print_below(EXIT_MESSAGE)?;
    tokio::time::sleep(timing.exit_grace).await;
    Ok(())
}

fn draw<W: Write>(
    view: &GameView,
    world: &World,
    term: &mut TerminalRenderer<W>,
    outcome: &TickOutcome,
) -> Result<()> {
    let snap = GameSnapshot::capture(world.store(), world.config(), outcome.score, outcome.game_over);
    let mut fb = view.render(&snap, view.frame_size(&snap));
    term.draw_swap(&mut fb).context("failed to draw frame")
}

async fn simulation_activity(
    mut sim: Simulation,
    render_tx: mpsc::Sender<TickOutcome>,
    shutdown: Shutdown,
    game_over_grace: Duration,
) -> TickOutcome {
    let mut ticker = tokio::time::interval(sim.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            _ = ticker.tick() => {}
        }

        let outcome = sim.tick();
        if outcome.game_over {
            request_render(&render_tx, outcome, &shutdown).await;
            tokio::select! {
                _ = shutdown.wait() => {}
                _ = tokio::time::sleep(game_over_grace) => {}
            }
            if shutdown.trigger() {
                info!(score = outcome.score, "game over");
            }
            return outcome;
        }
        if outcome.dirty {
            request_render(&render_tx, outcome, &shutdown).await;
        }
    }

    debug!(now_ms = sim.now().as_millis() as u64, "simulation stopped");
    TickOutcome {
        dirty: false,
        game_over: sim.game_over(),
        score: sim.score(),
    }
}

async fn request_render(tx: &mpsc::Sender<TickOutcome>, outcome: TickOutcome, shutdown: &Shutdown) {
    tokio::select! {
        _ = tx.send(outcome) => {}
        _ = shutdown.wait() => {}
    }
}

fn input_activity<K: KeySource>(
    mut keys: K,
    handler: InputHandler,
    shutdown: Shutdown,
    poll: Duration,
) -> Result<(), InputError> {
    let result = pump_keys(&mut keys, &handler, &shutdown, poll);
    if let Err(err) = &result {
        error!(%err, "input failed");
    }
    shutdown.trigger();
    result
}

fn pump_keys<K: KeySource>(
    keys: &mut K,
    handler: &InputHandler,
    shutdown: &Shutdown,
    poll: Duration,
) -> Result<(), InputError> {
    while !shutdown.is_triggered() {
        let Some(key) = keys.next_key(poll)? else {
            continue;
        };
        if handler.handle_key(key)? == Flow::Quit {
            info!("quit requested");
            break;
        }
    }
    Ok(())
}
