pub const NUMBER_OF_TETROMINOS: usize = 7;

/// Side length of a shape mask.
pub const MASK_SIZE: usize = 4;

// ============================================================================
// Kinds
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TetrominoKind {
    Horizontal,
    LeftCorner,
    RightCorner,
    Square,
    StepUpRight,
    Pyramid,
    StepUpLeft,
}

impl TetrominoKind {
    pub const ALL: [TetrominoKind; NUMBER_OF_TETROMINOS] = [
        TetrominoKind::Horizontal,
        TetrominoKind::LeftCorner,
        TetrominoKind::RightCorner,
        TetrominoKind::Square,
        TetrominoKind::StepUpRight,
        TetrominoKind::Pyramid,
        TetrominoKind::StepUpLeft,
    ];

    /// Catalog position of the kind, `K` in the locked cell code `2 + K`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Canonical spawn orientation.
    pub fn mask(self) -> Mask {
        CATALOG[self.index()]
    }

    pub fn is_rotation_invariant(self) -> bool {
        self == TetrominoKind::Square
    }

    pub fn name(self) -> &'static str {
        match self {
            TetrominoKind::Horizontal => "I",
            TetrominoKind::LeftCorner => "J",
            TetrominoKind::RightCorner => "L",
            TetrominoKind::Square => "O",
            TetrominoKind::StepUpRight => "S",
            TetrominoKind::Pyramid => "T",
            TetrominoKind::StepUpLeft => "Z",
        }
    }
}

// ============================================================================
// Masks
// ============================================================================

/// 4×4 occupancy pattern, indexed `[row][col]`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Mask([[bool; MASK_SIZE]; MASK_SIZE]);

impl Mask {
    pub const fn from_rows(rows: [[u8; MASK_SIZE]; MASK_SIZE]) -> Self {
        let mut cells = [[false; MASK_SIZE]; MASK_SIZE];
        let mut row = 0;
        while row < MASK_SIZE {
            let mut col = 0;
            while col < MASK_SIZE {
                cells[row][col] = rows[row][col] != 0;
                col += 1;
            }
            row += 1;
        }
        Mask(cells)
    }

    pub fn is_set(&self, row: usize, col: usize) -> bool {
        self.0[row][col]
    }

    /// Quarter turn clockwise: `new[row][3 - col] = old[col][row]`.
    pub fn rotated(&self) -> Mask {
        let mut next = [[false; MASK_SIZE]; MASK_SIZE];
        for (row, line) in next.iter_mut().enumerate() {
            for col in 0..MASK_SIZE {
                line[MASK_SIZE - 1 - col] = self.0[col][row];
            }
        }
        Mask(next)
    }

    /// Set cells as `(row, col)`, in raster order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..MASK_SIZE)
            .flat_map(|row| (0..MASK_SIZE).map(move |col| (row, col)))
            .filter(|&(row, col)| self.0[row][col])
    }

    pub fn count(&self) -> usize {
        self.cells().count()
    }
}

const CATALOG: [Mask; NUMBER_OF_TETROMINOS] = [
    // ####
    Mask::from_rows([[1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    // #
    // ###
    Mask::from_rows([[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    //   #
    // ###
    Mask::from_rows([[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    // ##
    // ##
    Mask::from_rows([[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    //  ##
    // ##
    Mask::from_rows([[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    //  #
    // ###
    Mask::from_rows([[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    // ##
    //  ##
    Mask::from_rows([[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
];
