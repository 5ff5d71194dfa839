use log::trace;

use super::grid::{Cell, Grid};
use super::piece::{ActivePiece, SPAWN_COLUMN};
use super::shapes::{TetrominoKind, MASK_SIZE};

/// Rows at the top checked for locked cells before every spawn.
pub const SPAWN_ZONE_ROWS: usize = 2;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpawnResult {
    Spawned,
    /// A locked cell sits where the piece would appear. The grid is untouched.
    Blocked,
}

/// Grid plus the piece currently falling through it. Every mutation keeps
/// the grid's `Active` cells equal to the piece's occupied cells.
#[derive(Clone, Debug, Default)]
pub struct Playfield {
    pub(crate) grid: Grid,
    pub(crate) active: Option<ActivePiece>,
}

impl Playfield {
    pub fn new() -> Self {
        Self::default()
    }

    /// Playfield over an existing grid with no piece in play. Stray active
    /// markers are dropped.
    pub fn with_grid(mut grid: Grid) -> Self {
        grid.clear_active();
        Self { grid, active: None }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn reset(&mut self) {
        self.grid.reset();
        self.active = None;
    }

    /// True when a locked cell occupies the spawn band under the spawn box.
    pub fn spawn_zone_blocked(&self) -> bool {
        (0..SPAWN_ZONE_ROWS as i32).any(|y| {
            (SPAWN_COLUMN..SPAWN_COLUMN + MASK_SIZE as i32).any(|x| self.grid.is_locked(x, y))
        })
    }

    /// Places `kind` at the spawn anchor.
    pub fn spawn(&mut self, kind: TetrominoKind) -> SpawnResult {
        debug_assert!(self.active.is_none(), "spawn while a piece is in play");
        let piece = ActivePiece::spawn(kind);
        if piece.cells().any(|pos| self.grid.is_locked(pos.x, pos.y)) {
            return SpawnResult::Blocked;
        }
        trace!("spawned {} at {:?}", kind.name(), piece.anchor());
        self.place(piece);
        SpawnResult::Spawned
    }

    /// Puts `piece` in play as is, replacing any current piece.
    pub fn place(&mut self, piece: ActivePiece) {
        self.active = Some(piece);
        self.redraw();
    }

    /// Two-phase refresh of the active markers: clear them all, then mark
    /// the piece's occupied cells. Cells above row 0 are not drawn.
    pub(crate) fn redraw(&mut self) {
        self.grid.clear_active();
        if let Some(piece) = &self.active {
            for pos in piece.cells() {
                if pos.y < 0 {
                    continue;
                }
                self.grid.set_cell(pos.x, pos.y, Cell::Active);
            }
        }
    }

    pub fn active_cell_count(&self) -> usize {
        self.grid.count(|c| c == Cell::Active)
    }
}
