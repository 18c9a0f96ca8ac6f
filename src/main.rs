use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use snake_engine::config::{GameConfig, StartMode, THEME_CLASSIC};
use snake_engine::error::{ConfigError, Error};
use snake_engine::game::{GameState, Phase, TickOutcome};
use snake_engine::input::{GameInput, InputHandler};
use snake_engine::logging;
use snake_engine::renderer;
use snake_engine::scheduler::TickScheduler;
use snake_engine::score::{JsonLineSink, NullSink, ScoreSink};
use snake_engine::terminal_runtime::TerminalSession;
use snake_engine::ui::hud::HudInfo;
use tracing::info;

/// Input poll timeout while no tick is scheduled.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file. Defaults to the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board edge length in cells.
    #[arg(long = "grid-size")]
    grid_size: Option<u16>,

    /// Whether a new game waits for Enter/Space or starts right away.
    #[arg(long, value_enum)]
    start: Option<StartArg>,

    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,

    /// Append each final score as a JSON line to this file.
    #[arg(long = "score-report")]
    score_report: Option<PathBuf>,

    /// Write tracing output to this file (filter with RUST_LOG).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StartArg {
    Gated,
    Immediate,
}

impl From<StartArg> for StartMode {
    fn from(value: StartArg) -> Self {
        match value {
            StartArg::Gated => Self::Gated,
            StartArg::Immediate => Self::Immediate,
        }
    }
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        logging::init_file_logging(path)?;
    }

    let config = apply_overrides(GameConfig::load(cli.config.as_deref())?, &cli)?;
    let state = match cli.seed {
        Some(seed) => GameState::new_with_seed(config, seed)?,
        None => GameState::new(config)?,
    };
    let sink: Box<dyn ScoreSink> = match &cli.score_report {
        Some(path) => Box::new(JsonLineSink::append_to(path)?),
        None => Box::new(NullSink),
    };

    info!(?config, "starting snake");
    run(state, sink)
}

fn apply_overrides(mut config: GameConfig, cli: &Cli) -> Result<GameConfig, ConfigError> {
    if let Some(grid_size) = cli.grid_size {
        config.grid_size = grid_size;
    }
    if let Some(start) = cli.start {
        config.start_mode = start.into();
    }

    config.validate()?;
    Ok(config)
}

fn run(mut state: GameState, mut sink: Box<dyn ScoreSink>) -> Result<(), Error> {
    let mut session = TerminalSession::enter()?;
    let mut input = InputHandler::new();
    let mut scheduler = TickScheduler::new();
    let mut best_score = 0;

    if state.phase() == Phase::Running {
        scheduler.start(state.tick_interval_ms(), Instant::now());
    }

    loop {
        session.terminal_mut().draw(|frame| {
            renderer::render(
                frame,
                &state,
                &HudInfo {
                    best_score,
                    theme: &THEME_CLASSIC,
                },
            )
        })?;

        let timeout = scheduler
            .time_until_due(Instant::now())
            .unwrap_or(IDLE_POLL_INTERVAL);
        if let Some(game_input) = input.poll_input(timeout)? {
            if matches!(game_input, GameInput::Quit) {
                break;
            }

            handle_input(&mut state, &mut scheduler, game_input);
        }

        let now = Instant::now();
        if scheduler.fire(now) && advance(&mut state, &mut scheduler, now) {
            best_score = best_score.max(state.score());
            sink.report(state.score());
        }
    }

    info!(best_score, "quit");
    Ok(())
}

fn handle_input(state: &mut GameState, scheduler: &mut TickScheduler, input: GameInput) {
    match input {
        GameInput::Direction(direction) => {
            state.request_direction_change(direction);
        }
        GameInput::Confirm => {
            if state.start() {
                scheduler.start(state.tick_interval_ms(), Instant::now());
            }
        }
        GameInput::Restart => {
            if !state.reset() {
                return;
            }
            if state.phase() == Phase::Running {
                scheduler.start(state.tick_interval_ms(), Instant::now());
            } else {
                scheduler.cancel();
            }
        }
        GameInput::Quit => {}
    }
}

/// Runs one tick and keeps the scheduler in step with it. Returns true when
/// the game just ended.
fn advance(state: &mut GameState, scheduler: &mut TickScheduler, now: Instant) -> bool {
    if let TickOutcome::Ate { tick_interval_ms } = state.tick() {
        scheduler.reschedule(tick_interval_ms, now);
    }

    if state.phase() == Phase::Ended {
        scheduler.cancel();
        return true;
    }

    false
}
