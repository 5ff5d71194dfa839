mod grid;
mod lines;
mod movement;
mod piece;
mod playfield;
mod randomizer;
mod session;
mod shapes;

pub use grid::{Cell, Grid, COLUMNS, ROWS};
pub use movement::{check_space_for, Direction, MoveOutcome, Obstacle, FAST_DROP_MAGNITUDE};
pub use piece::{ActivePiece, Position, SPAWN_COLUMN, SPAWN_ROW};
pub use playfield::{Playfield, SpawnResult, SPAWN_ZONE_ROWS};
pub use randomizer::{PieceSource, Randomizer, SequenceSource};
pub use session::{GameEvent, Session, SessionState};
pub use shapes::{Mask, TetrominoKind, MASK_SIZE, NUMBER_OF_TETROMINOS};

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;
    use crate::config::{Difficulty, SessionConfig};

    pub fn empty_grid() -> Grid {
        Grid::new()
    }

    pub fn fill_row(grid: &mut Grid, y: usize) {
        for x in 0..COLUMNS {
            grid.set_cell(x as i32, y as i32, Cell::Locked(TetrominoKind::Pyramid));
        }
    }

    pub fn fill_row_with_gap(grid: &mut Grid, y: usize, gap_x: usize) {
        for x in 0..COLUMNS {
            if x != gap_x {
                grid.set_cell(x as i32, y as i32, Cell::Locked(TetrominoKind::Pyramid));
            }
        }
    }

    pub fn test_config() -> SessionConfig {
        SessionConfig::for_difficulty("tester", Difficulty::Normal).with_seed(7)
    }

    pub fn playfield_with(grid: Grid, piece: ActivePiece) -> Playfield {
        let mut playfield = Playfield::with_grid(grid);
        playfield.place(piece);
        playfield
    }

    /// Running session with `piece` in play over `grid`. Later pieces come
    /// from `next`, in order, cycling.
    pub fn session_with(grid: Grid, piece: ActivePiece, next: Vec<TetrominoKind>) -> Session {
        Session::with_playfield(
            test_config(),
            Box::new(SequenceSource::new(next)),
            playfield_with(grid, piece),
        )
    }

    /// Started session whose pieces come from `kinds`, cycling.
    pub fn started_session(kinds: Vec<TetrominoKind>) -> Session {
        let mut session = Session::with_source(test_config(), Box::new(SequenceSource::new(kinds)));
        session.start();
        session
    }
}
