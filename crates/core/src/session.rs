//! Session module - one game from start to game over
//!
//! The session is the only type a presentation layer talks to. It owns the
//! playfield, the running score and the gravity timer, and gates every
//! command on the lifecycle:
//!
//! - before [`Session::start`] and after game over, piece commands and
//!   [`Session::advance`] do nothing;
//! - while paused, the same holds until [`Session::resume`];
//! - after game over, pausing is ignored as well;
//! - [`Session::start`] always begins a fresh game, including after game over.

use tracing::{debug, info, trace};

use crate::config::EngineConfig;
use crate::matrix::Matrix;
use crate::playfield::{ActivePiece, DropStep, Landing, Playfield};
use crate::rng::{PieceSource, UniformSource};
use crate::scoring::Progression;
use crate::snapshot::SessionSnapshot;
use crate::types::{EngineError, GameAction, Shift, Spin};

/// Complete game session
#[derive(Debug, Clone)]
pub struct Session<S: PieceSource = UniformSource> {
    playfield: Playfield<S>,
    /// Layout the field is reset to by `start()`
    starting_field: Matrix,
    progression: Progression,
    lines: u32,
    drop_timer_ms: u32,
    started: bool,
    paused: bool,
}

impl Session<UniformSource> {
    /// Create a session from configuration
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let source = match config.seed {
            Some(seed) => UniformSource::new(seed),
            None => UniformSource::from_entropy(),
        };
        info!(
            seed = source.seed(),
            width = config.field_width,
            height = config.field_height,
            "created session"
        );
        Ok(Self::new(config.field_width, config.field_height, source))
    }

    /// Seed of the piece sequence
    pub fn seed(&self) -> u64 {
        self.playfield.source().seed()
    }
}

impl<S: PieceSource> Session<S> {
    /// Create a session with an empty field of the given size
    pub fn new(width: usize, height: usize, source: S) -> Self {
        Self {
            playfield: Playfield::new(width, height, source),
            starting_field: Matrix::new(width, height),
            progression: Progression::default(),
            lines: 0,
            drop_timer_ms: 0,
            started: false,
            paused: false,
        }
    }

    /// Use `field` as the layout every `start()` resets to
    pub fn with_starting_field(mut self, field: Matrix) -> Result<Self, EngineError> {
        let expected = (self.starting_field.width(), self.starting_field.height());
        if (field.width(), field.height()) != expected {
            return Err(EngineError::InvalidConfig(format!(
                "starting field is {}x{}, expected {}x{}",
                field.width(),
                field.height(),
                expected.0,
                expected.1
            )));
        }
        self.starting_field = field;
        Ok(self)
    }

    /// Reset everything and spawn the first piece
    pub fn start(&mut self) {
        self.playfield.reset_to(&self.starting_field);
        self.progression = Progression::default();
        self.lines = 0;
        self.drop_timer_ms = 0;
        self.paused = false;
        self.started = true;

        info!("session started");
        if !self.playfield.spawn() {
            info!(score = 0, "game over on first spawn");
        }
    }

    /// Pause the game; ignored after game over
    pub fn pause(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.paused = true;
        true
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flip the paused flag; ignored after game over
    pub fn toggle_pause(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.paused = !self.paused;
        true
    }

    /// Whether commands and time currently have an effect
    pub fn playable(&self) -> bool {
        self.started && !self.paused && !self.playfield.is_game_over()
    }

    /// Advance the gravity timer by `delta_ms`
    ///
    /// Once the accumulated time exceeds the drop interval the piece drops
    /// one row and the timer restarts from zero. At most one row is dropped
    /// per call, whatever the delta. Returns the drop result if a drop happened.
    pub fn advance(&mut self, delta_ms: u32) -> Option<DropStep> {
        if !self.playable() {
            return None;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(delta_ms);
        if self.drop_timer_ms <= self.progression.drop_interval_ms {
            return None;
        }

        Some(self.soft_drop())
    }

    pub fn move_left(&mut self) -> bool {
        self.playable() && self.playfield.move_horizontal(Shift::Left)
    }

    pub fn move_right(&mut self) -> bool {
        self.playable() && self.playfield.move_horizontal(Shift::Right)
    }

    pub fn rotate_cw(&mut self) -> bool {
        self.playable() && self.playfield.rotate(Spin::Clockwise)
    }

    pub fn rotate_ccw(&mut self) -> bool {
        self.playable() && self.playfield.rotate(Spin::CounterClockwise)
    }

    /// Drop one row now; restarts the gravity timer
    pub fn soft_drop(&mut self) -> DropStep {
        if !self.playable() {
            return DropStep::Idle;
        }

        self.drop_timer_ms = 0;
        let step = self.playfield.soft_drop_one_step();
        if let DropStep::Landed(landing) = step {
            self.record_landing(landing);
        }
        step
    }

    /// Drop to the bottom and land; restarts the gravity timer
    pub fn hard_drop(&mut self) -> Option<Landing> {
        if !self.playable() {
            return None;
        }

        self.drop_timer_ms = 0;
        let landing = self.playfield.hard_drop()?;
        self.record_landing(landing);
        Some(landing)
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if action.is_piece_command() && !self.playable() {
            trace!(action = action.as_str(), "ignored while not playable");
            return false;
        }

        match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::SoftDrop => self.soft_drop() != DropStep::Idle,
            GameAction::HardDrop => self.hard_drop().is_some(),
            GameAction::RotateCw => self.rotate_cw(),
            GameAction::RotateCcw => self.rotate_ccw(),
            GameAction::Pause => self.pause(),
            GameAction::Resume => {
                self.resume();
                true
            }
            GameAction::TogglePause => self.toggle_pause(),
            GameAction::Start => {
                self.start();
                true
            }
        }
    }

    fn record_landing(&mut self, landing: Landing) {
        let previous_level = self.progression.level;
        self.lines = self.lines.saturating_add(landing.lines_cleared as u32);
        self.progression = self.progression.after_clear(landing.lines_cleared);

        if landing.lines_cleared > 0 {
            debug!(
                lines = landing.lines_cleared,
                score = self.progression.score,
                "cleared lines"
            );
        }
        if self.progression.level != previous_level {
            debug!(
                level = self.progression.level,
                drop_interval_ms = self.progression.drop_interval_ms,
                "level up"
            );
        }
        if landing.game_over {
            info!(
                score = self.progression.score,
                level = self.progression.level,
                lines = self.lines,
                "game over"
            );
        }
    }

    pub fn field(&self) -> &Matrix {
        self.playfield.field()
    }

    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.playfield.active()
    }

    pub fn playfield(&self) -> &Playfield<S> {
        &self.playfield
    }

    pub fn score(&self) -> u32 {
        self.progression.score
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.progression.drop_interval_ms
    }

    pub fn progression(&self) -> Progression {
        self.progression
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.playfield.is_game_over()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            field: self.field().clone(),
            active: self.active_piece().cloned(),
            progression: self.progression,
            lines: self.lines,
            started: self.started,
            paused: self.paused,
            game_over: self.is_game_over(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;
    use crate::rng::ScriptedSource;
    use crate::types::PieceType;

    fn session(kinds: &[PieceType]) -> Session<ScriptedSource> {
        Session::new(10, 20, ScriptedSource::new(kinds.to_vec()).unwrap())
    }

    #[test]
    fn test_new_session() {
        let s = session(&[PieceType::T]);

        assert!(!s.is_started());
        assert!(!s.is_game_over());
        assert!(!s.is_paused());
        assert_eq!(s.score(), 0);
        assert_eq!(s.level(), 1);
        assert_eq!(s.drop_interval_ms(), 900);
        assert!(s.active_piece().is_none());
    }

    #[test]
    fn test_commands_ignored_before_start() {
        let mut s = session(&[PieceType::T]);

        assert!(!s.move_left());
        assert!(!s.rotate_cw());
        assert_eq!(s.soft_drop(), DropStep::Idle);
        assert_eq!(s.hard_drop(), None);
        assert_eq!(s.advance(5000), None);
    }

    #[test]
    fn test_start_spawns_piece() {
        let mut s = session(&[PieceType::T]);
        s.start();

        assert!(s.is_started());
        let piece = s.active_piece().unwrap();
        assert_eq!(piece.kind(), PieceType::T);
        assert_eq!(piece.position(), Position::new(4, 0));
    }

    #[test]
    fn test_advance_drops_after_interval() {
        let mut s = session(&[PieceType::T]);
        s.start();

        // timer must exceed the interval, not just reach it
        assert_eq!(s.advance(900), None);
        assert_eq!(s.active_piece().unwrap().position().y, 0);

        assert_eq!(s.advance(1), Some(DropStep::Fell));
        assert_eq!(s.active_piece().unwrap().position().y, 1);

        // timer restarted from zero
        assert_eq!(s.advance(450), None);
    }

    #[test]
    fn test_advance_drops_at_most_one_row() {
        let mut s = session(&[PieceType::T]);
        s.start();

        assert_eq!(s.advance(1_000_000), Some(DropStep::Fell));
        assert_eq!(s.active_piece().unwrap().position().y, 1);
    }

    #[test]
    fn test_pause_freezes_time_and_commands() {
        let mut s = session(&[PieceType::T]);
        s.start();
        s.pause();
        let before = s.snapshot();

        assert_eq!(s.advance(5000), None);
        assert!(!s.move_left());
        assert!(!s.rotate_ccw());
        assert_eq!(s.hard_drop(), None);
        assert_eq!(s.snapshot(), before);

        s.resume();
        assert!(s.move_left());
    }

    #[test]
    fn test_toggle_pause_action() {
        let mut s = session(&[PieceType::T]);
        s.start();

        assert!(s.apply_action(GameAction::TogglePause));
        assert!(s.is_paused());
        assert!(s.apply_action(GameAction::TogglePause));
        assert!(!s.is_paused());
    }

    #[test]
    fn test_soft_drop_resets_timer() {
        let mut s = session(&[PieceType::T]);
        s.start();

        assert_eq!(s.advance(800), None);
        assert_eq!(s.soft_drop(), DropStep::Fell);
        // 800ms accumulated before the manual drop no longer count
        assert_eq!(s.advance(800), None);
        assert_eq!(s.active_piece().unwrap().position().y, 1);
    }

    #[test]
    fn test_hard_drop_scores_cleared_lines() {
        let mut field = Matrix::new(10, 20);
        for y in 16..20 {
            for x in 0..10 {
                if x != 3 {
                    field.set(x, y, 2).unwrap();
                }
            }
        }
        let mut s = session(&[PieceType::I]).with_starting_field(field).unwrap();
        s.start();
        assert!(s.rotate_cw());

        let landing = s.hard_drop().unwrap();
        assert_eq!(landing.lines_cleared, 4);
        assert_eq!(s.score(), 800);
        assert_eq!(s.lines(), 4);
        assert_eq!(s.field().occupied_count(), 0);
    }

    #[test]
    fn test_level_up_shortens_interval() {
        // eight-row well with a hole in column 3: two vertical I pieces clear it
        let mut field = Matrix::new(10, 20);
        for y in 12..20 {
            for x in 0..10 {
                if x != 3 {
                    field.set(x, y, 2).unwrap();
                }
            }
        }
        let mut s = session(&[PieceType::I]).with_starting_field(field).unwrap();
        s.start();

        assert!(s.rotate_cw());
        assert_eq!(s.hard_drop().unwrap().lines_cleared, 4);
        assert_eq!(s.level(), 1);

        assert!(s.rotate_cw());
        assert_eq!(s.hard_drop().unwrap().lines_cleared, 4);
        assert_eq!(s.score(), 1600);
        assert_eq!(s.lines(), 8);
        assert_eq!(s.level(), 2);
        assert_eq!(s.drop_interval_ms(), 800);
    }

    #[test]
    fn test_starting_field_size_mismatch() {
        let result = session(&[PieceType::O]).with_starting_field(Matrix::new(8, 20));
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_game_over_freezes_session() {
        let mut field = Matrix::new(10, 20);
        for x in 0..10 {
            field.set(x, 1, 1).unwrap();
        }
        let mut s = session(&[PieceType::O])
            .with_starting_field(field.clone())
            .unwrap();
        s.start();

        assert!(s.is_game_over());
        assert!(s.active_piece().is_none());
        assert_eq!(s.field(), &field);
        assert_eq!(s.advance(10_000), None);
        assert!(!s.apply_action(GameAction::HardDrop));

        // the paused flag is frozen too
        assert!(!s.pause());
        assert!(!s.apply_action(GameAction::TogglePause));
        assert!(!s.is_paused());
        assert!(!s.snapshot().paused);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut s = session(&[PieceType::O]);
        s.start();
        while !s.is_game_over() {
            s.hard_drop();
        }
        assert!(s.field().occupied_count() > 0);

        assert!(s.apply_action(GameAction::Start));
        assert!(!s.is_game_over());
        assert_eq!(s.score(), 0);
        assert_eq!(s.field().occupied_count(), 0);
        assert!(s.active_piece().is_some());
    }

    #[test]
    fn test_from_config_uses_seed() {
        let config = EngineConfig::default().with_seed(77);
        let s = Session::from_config(&config).unwrap();
        assert_eq!(s.seed(), 77);

        let bad = EngineConfig {
            field_height: 2,
            ..EngineConfig::default()
        };
        assert!(Session::from_config(&bad).is_err());
    }
}
