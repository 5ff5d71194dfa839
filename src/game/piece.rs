use super::grid::COLUMNS;
use super::shapes::{Mask, TetrominoKind, MASK_SIZE};

/// Column of the spawn box's left edge.
pub const SPAWN_COLUMN: i32 = COLUMNS as i32 / 2 - 2;
pub const SPAWN_ROW: i32 = 0;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The falling piece: its kind, its own (possibly rotated) mask, and the
/// absolute coordinate of every one of the 16 mask cells.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ActivePiece {
    kind: TetrominoKind,
    mask: Mask,
    positions: [[Position; MASK_SIZE]; MASK_SIZE],
}

impl ActivePiece {
    pub fn spawn(kind: TetrominoKind) -> Self {
        Self::new_at(kind, SPAWN_COLUMN, SPAWN_ROW)
    }

    /// Canonical orientation with the mask's top-left corner at `(x, y)`.
    pub fn new_at(kind: TetrominoKind, x: i32, y: i32) -> Self {
        Self::with_mask(kind, kind.mask(), Position::new(x, y))
    }

    pub fn with_mask(kind: TetrominoKind, mask: Mask, anchor: Position) -> Self {
        let mut positions = [[Position::default(); MASK_SIZE]; MASK_SIZE];
        for (row, line) in positions.iter_mut().enumerate() {
            for (col, pos) in line.iter_mut().enumerate() {
                *pos = anchor.offset(col as i32, row as i32);
            }
        }
        Self {
            kind,
            mask,
            positions,
        }
    }

    pub fn kind(&self) -> TetrominoKind {
        self.kind
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Absolute position of the mask's top-left cell.
    pub fn anchor(&self) -> Position {
        self.positions[0][0]
    }

    /// Absolute coordinates of the occupied cells, in raster order.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.mask.cells().map(move |(row, col)| self.positions[row][col])
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        for pos in self.positions.iter_mut().flatten() {
            *pos = pos.offset(dx, dy);
        }
    }

    /// Moves the whole piece so its anchor lands on `anchor`.
    pub fn set_absolute_position(&mut self, anchor: Position) {
        let current = self.anchor();
        self.translate(anchor.x - current.x, anchor.y - current.y);
    }

    /// Same anchor, next clockwise orientation.
    pub fn rotated(&self) -> Self {
        Self::with_mask(self.kind, self.mask.rotated(), self.anchor())
    }

    /// Columns holding at least one occupied cell, each with its lowest row.
    pub fn column_bottoms(&self) -> Vec<(i32, i32)> {
        let mut bottoms: Vec<(i32, i32)> = Vec::with_capacity(MASK_SIZE);
        for pos in self.cells() {
            match bottoms.iter_mut().find(|(x, _)| *x == pos.x) {
                Some((_, bottom)) => *bottom = (*bottom).max(pos.y),
                None => bottoms.push((pos.x, pos.y)),
            }
        }
        bottoms
    }
}
