use log::debug;

use super::grid::{Cell, ROWS};
use super::playfield::Playfield;
use super::shapes::TetrominoKind;

impl Playfield {
    /// Converts the active piece's cells into locked cells of its kind and
    /// takes it out of play. Returns the kind that was locked.
    pub fn lock_active(&mut self) -> Option<TetrominoKind> {
        let piece = self.active.take()?;
        let kind = piece.kind();
        for pos in piece.cells() {
            if self.grid.get(pos.x, pos.y) == Some(Cell::Active) {
                self.grid.set_cell(pos.x, pos.y, Cell::Locked(kind));
            }
        }
        debug!("locked {} at {:?}", kind.name(), piece.anchor());
        Some(kind)
    }

    /// A row is full when every cell is locked; the falling piece never
    /// completes a row.
    pub fn check_row(&self, row: usize) -> bool {
        self.grid.row(row).iter().all(|cell| cell.is_locked())
    }

    /// Empties `row` and shifts everything above it down by one. A piece still
    /// in play keeps its place.
    pub fn clear_row(&mut self, row: usize) {
        self.grid.remove_row(row);
        self.redraw();
    }

    /// Clears every full row in one bottom-to-top pass. A row is checked
    /// again after a clear, since the row above has moved into it.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut cleared = 0;
        let mut row = ROWS;
        while row > 0 {
            if self.check_row(row - 1) {
                self.clear_row(row - 1);
                cleared += 1;
            } else {
                row -= 1;
            }
        }
        if cleared > 0 {
            debug!("cleared {} row(s)", cleared);
        }
        cleared
    }
}
