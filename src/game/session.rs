use std::time::Duration;

use log::{debug, info};

use super::grid::{Cell, Grid};
use super::movement::{Direction, MoveOutcome};
use super::piece::ActivePiece;
use super::playfield::{Playfield, SpawnResult};
use super::randomizer::{PieceSource, Randomizer};
use super::shapes::TetrominoKind;
use crate::config::{SessionConfig, DIFFICULTY_RAMP_SECS, TICK_FLOOR_MS, TICK_STEP_MS};
use crate::scores::ScoreRecord;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionState {
    Setup,
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    Started,
    PieceLocked(TetrominoKind),
    RowsCleared(u32),
    DifficultyIncreased(Duration),
    Paused,
    Resumed,
    /// Final, consistent values for the score sink.
    GameOver(ScoreRecord),
}

// ============================================================================
// Session
// ============================================================================

/// One game from `start()` to game over. Owns the playfield, the piece
/// source and all counters; every operation goes through `&mut self`.
pub struct Session {
    playfield: Playfield,
    state: SessionState,
    config: SessionConfig,
    source: Box<dyn PieceSource>,
    next_kind: Option<TetrominoKind>,
    spawn_pending: bool,
    score: u32,
    elapsed: Duration,
    next_ramp_at: Duration,
    tick_interval: Duration,
    fast_drop: bool,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let source = Box::new(Randomizer::new(config.seed));
        Self::with_source(config, source)
    }

    /// A session in `Setup` drawing pieces from `source`.
    pub fn with_source(config: SessionConfig, source: Box<dyn PieceSource>) -> Self {
        Self {
            playfield: Playfield::new(),
            state: SessionState::Setup,
            tick_interval: config.tick_interval(),
            config,
            source,
            next_kind: None,
            spawn_pending: false,
            score: 0,
            elapsed: Duration::ZERO,
            next_ramp_at: Duration::from_secs(DIFFICULTY_RAMP_SECS),
            fast_drop: false,
            events: Vec::new(),
        }
    }

    /// A running session over a prepared playfield. Without a piece in play,
    /// the next `advance()` spawns one.
    pub fn with_playfield(
        config: SessionConfig,
        source: Box<dyn PieceSource>,
        playfield: Playfield,
    ) -> Self {
        let mut session = Self::with_source(config, source);
        session.spawn_pending = !playfield.has_active();
        session.playfield = playfield;
        session.next_kind = Some(session.source.next_kind());
        session.state = SessionState::Running;
        session
    }

    /// Begins a new game from any state.
    pub fn start(&mut self) {
        self.playfield.reset();
        self.source.reseed(self.config.seed);
        self.score = 0;
        self.elapsed = Duration::ZERO;
        self.next_ramp_at = Duration::from_secs(DIFFICULTY_RAMP_SECS);
        self.tick_interval = self.config.tick_interval();
        self.fast_drop = false;
        self.events.clear();
        self.next_kind = Some(self.source.next_kind());
        self.spawn_pending = true;
        self.state = SessionState::Running;
        info!(
            "game started for {} ({}, tick {:?})",
            self.config.player_name,
            self.config.difficulty.as_str(),
            self.tick_interval
        );
        self.events.push(GameEvent::Started);
    }

    /// One gravity tick.
    pub fn advance(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        if self.spawn_pending && !self.spawn_next() {
            return;
        }
        self.move_block(Direction::Down);
    }

    /// Accounts for wall-clock play time and steps the difficulty every
    /// [`DIFFICULTY_RAMP_SECS`] seconds.
    pub fn advance_clock(&mut self, dt: Duration) {
        if self.state != SessionState::Running {
            return;
        }
        self.elapsed += dt;
        while self.elapsed >= self.next_ramp_at {
            self.next_ramp_at += Duration::from_secs(DIFFICULTY_RAMP_SECS);
            self.ramp_difficulty();
        }
    }

    fn ramp_difficulty(&mut self) {
        let floor = Duration::from_millis(TICK_FLOOR_MS);
        if self.tick_interval <= floor {
            return;
        }
        self.tick_interval = self
            .tick_interval
            .saturating_sub(Duration::from_millis(TICK_STEP_MS))
            .max(floor);
        info!("tick interval now {:?}", self.tick_interval);
        self.events.push(GameEvent::DifficultyIncreased(self.tick_interval));
    }

    // ------------------------------------------------------------------------
    // Player input
    // ------------------------------------------------------------------------

    pub fn move_block(&mut self, direction: Direction) -> MoveOutcome {
        if self.state != SessionState::Running {
            return MoveOutcome::Ignored;
        }
        let outcome = self.playfield.move_block(direction, self.fast_drop);
        if outcome == MoveOutcome::Landed {
            self.finish_tetromino();
        }
        outcome
    }

    /// Drops the piece onto the stack without locking it; the next downward
    /// step locks it.
    pub fn hard_drop(&mut self) -> i32 {
        if self.state != SessionState::Running {
            return 0;
        }
        self.playfield.move_to_bottom()
    }

    pub fn rotate(&mut self) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        self.playfield.rotate()
    }

    pub fn set_fast_drop(&mut self, engaged: bool) {
        self.fast_drop = engaged;
    }

    pub fn pause_game(&mut self) {
        match self.state {
            SessionState::Running => {
                self.state = SessionState::Paused;
                self.events.push(GameEvent::Paused);
            }
            SessionState::Paused => {
                self.state = SessionState::Running;
                self.events.push(GameEvent::Resumed);
            }
            SessionState::Setup | SessionState::GameOver => {}
        }
    }

    // ------------------------------------------------------------------------
    // Lock and spawn
    // ------------------------------------------------------------------------

    /// Locks the active piece, clears full rows, scores them and brings in
    /// the next piece. Ignored unless the session is running.
    pub fn finish_tetromino(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        let Some(kind) = self.playfield.lock_active() else {
            return;
        };
        self.events.push(GameEvent::PieceLocked(kind));

        let rows = self.playfield.clear_full_rows();
        if rows > 0 {
            self.score = self
                .score
                .saturating_add(rows.saturating_mul(self.config.row_reward));
            debug!("score {} after {} row(s)", self.score, rows);
            self.events.push(GameEvent::RowsCleared(rows));
        }

        self.spawn_next();
    }

    /// Brings the lookahead into play. Returns false when the spawn zone is
    /// taken, which ends the game.
    fn spawn_next(&mut self) -> bool {
        let kind = match self.next_kind.take() {
            Some(kind) => kind,
            None => self.source.next_kind(),
        };
        if self.playfield.spawn_zone_blocked()
            || self.playfield.spawn(kind) == SpawnResult::Blocked
        {
            self.game_over();
            return false;
        }
        self.spawn_pending = false;
        self.next_kind = Some(self.source.next_kind());
        true
    }

    fn game_over(&mut self) {
        self.state = SessionState::GameOver;
        self.spawn_pending = false;
        self.fast_drop = false;
        let record = self.score_record();
        info!(
            "game over for {}: {} points in {}m {}s",
            record.name, record.score, record.minutes, record.seconds
        );
        self.events.push(GameEvent::GameOver(record));
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == SessionState::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed play time as `(minutes, seconds)`.
    pub fn clock(&self) -> (u64, u64) {
        let secs = self.elapsed.as_secs();
        (secs / 60, secs % 60)
    }

    /// Current gravity interval. Tick sources read this before scheduling.
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn fast_drop(&self) -> bool {
        self.fast_drop
    }

    pub fn next_kind(&self) -> Option<TetrominoKind> {
        self.next_kind
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn grid(&self) -> &Grid {
        self.playfield.grid()
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.playfield.active()
    }

    pub fn score_record(&self) -> ScoreRecord {
        let (minutes, seconds) = self.clock();
        ScoreRecord {
            name: self.config.player_name.clone(),
            minutes,
            seconds,
            score: self.score,
        }
    }

    /// Every non-empty cell with the kind it should be drawn as.
    pub fn visible_cells(&self) -> impl Iterator<Item = (usize, usize, TetrominoKind)> + '_ {
        let current = self.playfield.active().map(|p| p.kind());
        self.grid().rows().enumerate().flat_map(move |(y, row)| {
            row.iter().enumerate().filter_map(move |(x, cell)| match *cell {
                Cell::Empty => None,
                Cell::Active => current.map(|kind| (x, y, kind)),
                Cell::Locked(kind) => Some((x, y, kind)),
            })
        })
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
