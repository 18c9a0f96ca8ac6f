use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::{GameConfig, StartMode};
use crate::error::{ConfigError, PlacementError};
use crate::food::spawn_position;
use crate::input::{Direction, direction_change_is_valid};
use crate::snake::{Cell, Snake};

/// Heading the snake takes when a game starts running.
pub const INITIAL_HEADING: Direction = Direction::Right;

/// Coarse lifecycle of one game session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    Idle,
    Running,
    Ended,
}

/// What the new head ran into.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Collision {
    Wall,
    Body,
}

/// Why a session reached `Phase::Ended`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EndReason {
    Collision(Collision),
    /// The snake covers every cell, so no food can be placed.
    BoardFilled,
}

/// Result of one call to [`GameState::tick`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// The game is not running; nothing changed.
    Idle,
    Continued,
    /// Food was eaten. Carries the new tick interval so the caller can
    /// reschedule its timer.
    Ate { tick_interval_ms: u64 },
    Collided(Collision),
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    snake: Snake,
    food: Option<Cell>,
    heading: Option<Direction>,
    pending_heading: Option<Direction>,
    heading_latched: bool,
    score: u32,
    tick_interval_ms: u64,
    tick_count: u64,
    phase: Phase,
    end_reason: Option<EndReason>,
    rng: StdRng,
}

impl GameState {
    /// Creates a freshly reset game seeded from OS entropy.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::new_with_seed(config, rand::random())
    }

    /// Creates a deterministic state for tests and reproducible sessions.
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut state = Self {
            config,
            snake: Snake::new(start_cell(config.grid_size)),
            food: None,
            heading: None,
            pending_heading: None,
            heading_latched: false,
            score: 0,
            tick_interval_ms: config.initial_tick_interval_ms,
            tick_count: 0,
            phase: Phase::Idle,
            end_reason: None,
            rng: StdRng::seed_from_u64(seed),
        };
        state.reset();

        Ok(state)
    }

    /// Puts a one-cell snake in the centre, clears score and speed, and
    /// places food. The phase follows the configured start mode.
    ///
    /// Returns `false` without touching the state while a game is running.
    pub fn reset(&mut self) -> bool {
        if self.phase == Phase::Running {
            return false;
        }

        self.snake = Snake::new(start_cell(self.config.grid_size));
        self.pending_heading = None;
        self.heading_latched = false;
        self.score = 0;
        self.tick_interval_ms = self.config.initial_tick_interval_ms;
        self.tick_count = 0;
        self.end_reason = None;
        self.food = spawn_position(&mut self.rng, self.config.grid_size, &self.snake);

        match self.config.start_mode {
            StartMode::Gated => {
                self.phase = Phase::Idle;
                self.heading = None;
            }
            StartMode::Immediate => {
                self.phase = Phase::Running;
                self.heading = Some(INITIAL_HEADING);
            }
        }

        debug!(phase = ?self.phase, food = ?self.food, "game reset");
        true
    }

    /// Start/restart trigger. Resets the board and enters `Running`.
    ///
    /// Returns `false` without touching the state when already running.
    pub fn start(&mut self) -> bool {
        if self.phase == Phase::Running {
            return false;
        }

        self.reset();
        self.phase = Phase::Running;
        self.heading = Some(INITIAL_HEADING);
        info!(grid_size = self.config.grid_size, "game started");
        true
    }

    /// Buffers a heading change for the next tick.
    ///
    /// Rejected unless running, unless no change was accepted yet this tick,
    /// and unless `direction` differs from the reverse of the current heading.
    pub fn request_direction_change(&mut self, direction: Direction) -> bool {
        if self.phase != Phase::Running || self.heading_latched {
            return false;
        }
        if !direction_change_is_valid(self.heading, direction) {
            return false;
        }

        self.pending_heading = Some(direction);
        self.heading_latched = true;
        true
    }

    /// Advances the simulation by one cell.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Idle;
        }

        if let Some(next) = self.pending_heading.take() {
            self.heading = Some(next);
        }
        self.heading_latched = false;

        let Some(direction) = self.heading else {
            return TickOutcome::Idle;
        };

        self.tick_count += 1;
        let new_head = self.snake.head().step(direction);

        if !new_head.is_within_bounds(self.config.grid_size) {
            return self.collide(Collision::Wall);
        }
        // The tail has not moved yet, so it still counts as body.
        if self.snake.occupies(new_head) {
            return self.collide(Collision::Body);
        }

        let ate = self.food == Some(new_head);
        self.snake.advance(new_head, ate);
        if !ate {
            return TickOutcome::Continued;
        }

        self.score += 1;
        self.tick_interval_ms = self
            .tick_interval_ms
            .saturating_sub(self.config.tick_interval_step_ms)
            .max(self.config.min_tick_interval_ms);
        self.food = spawn_position(&mut self.rng, self.config.grid_size, &self.snake);
        debug!(
            score = self.score,
            tick_interval_ms = self.tick_interval_ms,
            food = ?self.food,
            "food eaten"
        );

        if self.food.is_none() {
            self.end_reason = Some(EndReason::BoardFilled);
            self.end_game();
        }

        TickOutcome::Ate {
            tick_interval_ms: self.tick_interval_ms,
        }
    }

    /// Moves a running session to `Ended`, keeping the final score.
    pub fn end_game(&mut self) {
        if self.phase != Phase::Running {
            return;
        }

        self.phase = Phase::Ended;
        self.pending_heading = None;
        self.heading_latched = false;
        info!(score = self.score, reason = ?self.end_reason, "game over");
    }

    /// Replaces the snake body (front is head) and heading.
    ///
    /// Food sitting under the new body is moved to a free cell.
    pub fn set_snake(
        &mut self,
        segments: Vec<Cell>,
        heading: Direction,
    ) -> Result<(), PlacementError> {
        if let Some(outside) = segments
            .iter()
            .find(|cell| !cell.is_within_bounds(self.config.grid_size))
        {
            return Err(PlacementError::OutOfBounds(*outside));
        }

        self.snake = Snake::from_segments(segments)?;
        self.heading = Some(heading);
        self.pending_heading = None;
        self.heading_latched = false;

        if self.food.is_none_or(|food| self.snake.occupies(food)) {
            self.food = spawn_position(&mut self.rng, self.config.grid_size, &self.snake);
        }

        Ok(())
    }

    /// Places the food on a specific free cell.
    pub fn set_food(&mut self, cell: Cell) -> Result<(), PlacementError> {
        if !cell.is_within_bounds(self.config.grid_size) {
            return Err(PlacementError::OutOfBounds(cell));
        }
        if self.snake.occupies(cell) {
            return Err(PlacementError::FoodOnSnake(cell));
        }

        self.food = Some(cell);
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn grid_size(&self) -> u16 {
        self.config.grid_size
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    /// Current food cell; `None` only once the board is full.
    #[must_use]
    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    #[must_use]
    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    #[must_use]
    pub fn pending_heading(&self) -> Option<Direction> {
        self.pending_heading
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    fn collide(&mut self, collision: Collision) -> TickOutcome {
        debug!(?collision, head = ?self.snake.head(), "collision");
        self.end_reason = Some(EndReason::Collision(collision));
        self.end_game();
        TickOutcome::Collided(collision)
    }
}

fn start_cell(grid_size: u16) -> Cell {
    let centre = i32::from(grid_size / 2);
    Cell::new(centre, centre)
}

#[cfg(test)]
mod tests {
    use crate::config::{GameConfig, StartMode};
    use crate::error::PlacementError;
    use crate::input::Direction;
    use crate::snake::Cell;

    use super::{Collision, EndReason, GameState, Phase, TickOutcome};

    fn running_state(grid_size: u16, seed: u64) -> GameState {
        let mut state = GameState::new_with_seed(GameConfig::with_grid_size(grid_size), seed)
            .expect("valid config");
        assert!(state.start());
        state
    }

    #[test]
    fn gated_reset_waits_in_idle_without_heading() {
        let state = GameState::new_with_seed(GameConfig::default(), 1).expect("valid config");

        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.heading(), None);
        assert_eq!(state.snake().len(), 1);
        assert_eq!(state.snake().head(), Cell::new(10, 10));
        assert_eq!(state.tick_interval_ms(), 150);
        assert!(state.food().is_some_and(|food| !state.snake().occupies(food)));
    }

    #[test]
    fn immediate_reset_is_running_to_the_right() {
        let config = GameConfig {
            start_mode: StartMode::Immediate,
            ..GameConfig::default()
        };
        let state = GameState::new_with_seed(config, 1).expect("valid config");

        assert_eq!(state.phase(), Phase::Running);
        assert_eq!(state.heading(), Some(Direction::Right));
    }

    #[test]
    fn idle_game_ignores_ticks_and_input() {
        let mut state = GameState::new_with_seed(GameConfig::default(), 2).expect("valid config");

        assert!(!state.request_direction_change(Direction::Up));
        assert_eq!(state.tick(), TickOutcome::Idle);
        assert_eq!(state.snake().head(), Cell::new(10, 10));
        assert_eq!(state.tick_count(), 0);
    }

    #[test]
    fn start_is_a_no_op_while_running() {
        let mut state = running_state(10, 3);
        state.tick();
        let head = state.snake().head();

        assert!(!state.start());
        assert_eq!(state.snake().head(), head);
        assert_eq!(state.tick_count(), 1);
    }

    #[test]
    fn reset_is_a_no_op_while_running() {
        let mut state = running_state(10, 13);
        state
            .set_snake(vec![Cell::new(1, 1)], Direction::Right)
            .expect("valid snake");
        state.set_food(Cell::new(2, 1)).expect("free cell");
        state.tick();

        assert!(!state.reset());
        assert_eq!(state.phase(), Phase::Running);
        assert_eq!(state.score(), 1);
        assert_eq!(state.snake().head(), Cell::new(2, 1));
    }

    #[test]
    fn end_game_ignores_idle_sessions() {
        let mut state = GameState::new_with_seed(GameConfig::default(), 14).expect("valid config");

        state.end_game();

        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.start());
    }

    #[test]
    fn only_one_direction_change_is_accepted_per_tick() {
        let mut state = running_state(10, 4);

        assert!(state.request_direction_change(Direction::Up));
        assert!(!state.request_direction_change(Direction::Down));
        assert!(!state.request_direction_change(Direction::Left));
        assert_eq!(state.pending_heading(), Some(Direction::Up));

        state.tick();
        assert_eq!(state.heading(), Some(Direction::Up));
        assert_eq!(state.pending_heading(), None);
        assert!(state.request_direction_change(Direction::Left));
    }

    #[test]
    fn rejected_reversal_does_not_take_the_latch() {
        let mut state = running_state(10, 5);

        assert!(!state.request_direction_change(Direction::Left));
        assert!(state.request_direction_change(Direction::Down));
    }

    #[test]
    fn snake_grows_after_eating_food() {
        let mut state = running_state(10, 6);
        state
            .set_snake(vec![Cell::new(1, 1)], Direction::Right)
            .expect("valid snake");
        state.set_food(Cell::new(2, 1)).expect("free cell");

        assert!(matches!(state.tick(), TickOutcome::Ate { .. }));
        assert_eq!(state.snake().len(), 2);
        assert_eq!(state.snake().tail(), Cell::new(1, 1));

        if state.food() != Some(Cell::new(3, 1)) {
            assert_eq!(state.tick(), TickOutcome::Continued);
            assert_eq!(state.snake().len(), 2);
        }
    }

    #[test]
    fn wall_collision_ends_the_game() {
        let mut state = running_state(4, 7);
        state
            .set_snake(vec![Cell::new(3, 1)], Direction::Right)
            .expect("valid snake");

        assert_eq!(state.tick(), TickOutcome::Collided(Collision::Wall));
        assert_eq!(state.phase(), Phase::Ended);
        assert_eq!(
            state.end_reason(),
            Some(EndReason::Collision(Collision::Wall))
        );
        assert_eq!(state.tick(), TickOutcome::Idle);
    }

    #[test]
    fn moving_into_the_tail_is_a_collision() {
        let mut state = running_state(6, 8);
        state
            .set_snake(
                vec![
                    Cell::new(2, 2),
                    Cell::new(3, 2),
                    Cell::new(3, 3),
                    Cell::new(2, 3),
                ],
                Direction::Left,
            )
            .expect("valid snake");
        assert!(state.request_direction_change(Direction::Down));

        assert_eq!(state.tick(), TickOutcome::Collided(Collision::Body));
        assert_eq!(state.snake().len(), 4);
    }

    #[test]
    fn end_game_keeps_score_and_rejects_input() {
        let mut state = running_state(10, 9);
        state
            .set_snake(vec![Cell::new(1, 1)], Direction::Right)
            .expect("valid snake");
        state.set_food(Cell::new(2, 1)).expect("free cell");
        state.tick();

        state.end_game();
        state.end_game();

        assert_eq!(state.phase(), Phase::Ended);
        assert_eq!(state.score(), 1);
        assert!(!state.request_direction_change(Direction::Up));
    }

    #[test]
    fn start_after_game_over_resets_everything() {
        let mut state = running_state(4, 10);
        state
            .set_snake(vec![Cell::new(3, 1)], Direction::Right)
            .expect("valid snake");
        state.tick();
        assert_eq!(state.phase(), Phase::Ended);

        assert!(state.start());
        assert_eq!(state.phase(), Phase::Running);
        assert_eq!(state.score(), 0);
        assert_eq!(state.snake().head(), Cell::new(2, 2));
        assert_eq!(state.end_reason(), None);
        assert_eq!(state.tick_interval_ms(), 150);
    }

    #[test]
    fn placement_errors_are_reported() {
        let mut state = running_state(5, 11);

        assert_eq!(
            state.set_snake(vec![Cell::new(5, 0)], Direction::Up),
            Err(PlacementError::OutOfBounds(Cell::new(5, 0)))
        );
        assert_eq!(
            state.set_food(state.snake().head()),
            Err(PlacementError::FoodOnSnake(Cell::new(2, 2)))
        );
    }

    #[test]
    fn filling_the_board_ends_the_game() {
        let mut state = running_state(2, 12);
        state
            .set_snake(
                vec![Cell::new(0, 1), Cell::new(0, 0), Cell::new(1, 0)],
                Direction::Down,
            )
            .expect("valid snake");
        assert_eq!(state.food(), Some(Cell::new(1, 1)));
        assert!(state.request_direction_change(Direction::Right));

        assert!(matches!(state.tick(), TickOutcome::Ate { .. }));
        assert_eq!(state.phase(), Phase::Ended);
        assert_eq!(state.food(), None);
        assert_eq!(state.end_reason(), Some(EndReason::BoardFilled));
    }
}
