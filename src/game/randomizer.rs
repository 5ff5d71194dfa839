use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::shapes::{TetrominoKind, NUMBER_OF_TETROMINOS};

// ============================================================================
// Piece Source Trait
// ============================================================================

pub trait PieceSource {
    fn next_kind(&mut self) -> TetrominoKind;

    /// Restart the draw sequence. Sources without randomness ignore this.
    fn reseed(&mut self, _seed: Option<u64>) {}
}

/// Uniform, memoryless draws over the shape catalog. Back-to-back repeats
/// are allowed.
pub struct Randomizer {
    rng: StdRng,
}

impl Randomizer {
    pub fn new(seed: Option<u64>) -> Self {
        Self { rng: make_rng(seed) }
    }
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl PieceSource for Randomizer {
    fn next_kind(&mut self) -> TetrominoKind {
        let index = self.rng.gen_range(0..NUMBER_OF_TETROMINOS);
        TetrominoKind::ALL[index]
    }

    fn reseed(&mut self, seed: Option<u64>) {
        self.rng = make_rng(seed);
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Cycles through a fixed list of kinds. Reseeding rewinds to the start.
pub struct SequenceSource {
    kinds: Vec<TetrominoKind>,
    index: usize,
}

impl SequenceSource {
    /// An empty list cycles through the whole catalog instead.
    pub fn new(kinds: Vec<TetrominoKind>) -> Self {
        let kinds = if kinds.is_empty() {
            TetrominoKind::ALL.to_vec()
        } else {
            kinds
        };
        Self { kinds, index: 0 }
    }
}

impl PieceSource for SequenceSource {
    fn next_kind(&mut self) -> TetrominoKind {
        let kind = self.kinds[self.index % self.kinds.len()];
        self.index += 1;
        kind
    }

    fn reseed(&mut self, _seed: Option<u64>) {
        self.index = 0;
    }
}
