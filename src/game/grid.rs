use super::shapes::TetrominoKind;

pub const COLUMNS: usize = 12;
pub const ROWS: usize = 24;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Occupied by the falling piece.
    Active,
    Locked(TetrominoKind),
}

impl Cell {
    /// Integer cell state: 0 empty, 1 active, `2 + K` locked kind `K`.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Active => 1,
            Cell::Locked(kind) => 2 + kind.index() as u8,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Active),
            n => TetrominoKind::from_index(n as usize - 2).map(Cell::Locked),
        }
    }

    pub fn is_locked(self) -> bool {
        matches!(self, Cell::Locked(_))
    }
}

/// The `COLUMNS × ROWS` playing field, row 0 at the top.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    cells: [[Cell; COLUMNS]; ROWS],
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLUMNS]; ROWS],
        }
    }

    pub fn in_bounds(x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < COLUMNS && y >= 0 && (y as usize) < ROWS
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if Self::in_bounds(x, y) {
            Some(self.cells[y as usize][x as usize])
        } else {
            None
        }
    }

    /// Panics when `(x, y)` is off the grid: callers are expected to have
    /// filtered candidate coordinates already.
    pub fn cell_at(&self, x: i32, y: i32) -> Cell {
        match self.get(x, y) {
            Some(cell) => cell,
            None => panic!("grid read out of bounds at ({}, {})", x, y),
        }
    }

    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) {
        assert!(
            Self::in_bounds(x, y),
            "grid write out of bounds at ({}, {})",
            x,
            y
        );
        self.cells[y as usize][x as usize] = cell;
    }

    pub fn is_locked(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(Cell::is_locked)
    }

    pub fn row(&self, y: usize) -> &[Cell; COLUMNS] {
        &self.cells[y]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell; COLUMNS]> {
        self.cells.iter()
    }

    /// First phase of a redraw: forget every active marker.
    pub fn clear_active(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            if *cell == Cell::Active {
                *cell = Cell::Empty;
            }
        }
    }

    pub fn count(&self, pred: impl Fn(Cell) -> bool) -> usize {
        self.cells.iter().flatten().filter(|c| pred(**c)).count()
    }

    /// Empties row `y` and moves every row above it down by one.
    pub fn remove_row(&mut self, y: usize) {
        self.cells.copy_within(0..y, 1);
        self.cells[0] = [Cell::Empty; COLUMNS];
    }

    pub fn reset(&mut self) {
        self.cells = [[Cell::Empty; COLUMNS]; ROWS];
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
