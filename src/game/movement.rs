use super::grid::{Grid, COLUMNS, ROWS};
use super::piece::ActivePiece;
use super::playfield::Playfield;

/// Rows per gravity step while fast-drop is engaged.
pub const FAST_DROP_MAGNITUDE: i32 = 2;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}

/// What a candidate move runs into.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Obstacle {
    Free,
    Wall,
    Floor,
    /// A locked cell.
    Blocked,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    /// No piece in play, or the session is not running.
    Ignored,
    Moved,
    Rejected(Obstacle),
    /// A downward move hit the floor or the stack; the piece must lock.
    Landed,
}

// ============================================================================
// Collision
// ============================================================================

fn obstacle_at(grid: &Grid, x: i32, y: i32) -> Obstacle {
    if x < 0 || x >= COLUMNS as i32 {
        Obstacle::Wall
    } else if y >= ROWS as i32 {
        Obstacle::Floor
    } else if y >= 0 && grid.cell_at(x, y).is_locked() {
        Obstacle::Blocked
    } else {
        Obstacle::Free
    }
}

/// Checks `piece` shifted by every step in `1..=magnitude`, so a long step
/// cannot tunnel through a thin obstruction. Within a step a wall outranks
/// the floor, which outranks the stack, whichever cell meets it.
pub fn check_space_for(
    grid: &Grid,
    piece: &ActivePiece,
    direction: Direction,
    magnitude: i32,
) -> Obstacle {
    let (dx, dy) = direction.delta();
    for step in 1..=magnitude {
        let hits: Vec<Obstacle> = piece
            .cells()
            .map(|pos| obstacle_at(grid, pos.x + dx * step, pos.y + dy * step))
            .collect();
        for obstacle in [Obstacle::Wall, Obstacle::Floor, Obstacle::Blocked] {
            if hits.contains(&obstacle) {
                return obstacle;
            }
        }
    }
    Obstacle::Free
}

impl Playfield {
    /// Obstacle the active piece would meet moving `magnitude` cells towards
    /// `direction`. Pure: the grid and piece are not touched.
    pub fn check_space(&self, direction: Direction, magnitude: i32) -> Obstacle {
        match &self.active {
            Some(piece) => check_space_for(&self.grid, piece, direction, magnitude),
            None => Obstacle::Free,
        }
    }

    /// Applies one movement step. Downward steps cover
    /// [`FAST_DROP_MAGNITUDE`] rows with `fast_drop`; on landing, a fast-drop
    /// first settles the piece with [`Playfield::move_to_bottom`].
    pub fn move_block(&mut self, direction: Direction, fast_drop: bool) -> MoveOutcome {
        if self.active.is_none() {
            return MoveOutcome::Ignored;
        }
        let magnitude = if direction == Direction::Down && fast_drop {
            FAST_DROP_MAGNITUDE
        } else {
            1
        };

        match self.check_space(direction, magnitude) {
            Obstacle::Free => {
                let (dx, dy) = direction.delta();
                if let Some(piece) = self.active.as_mut() {
                    piece.translate(dx * magnitude, dy * magnitude);
                }
                self.redraw();
                MoveOutcome::Moved
            }
            Obstacle::Floor | Obstacle::Blocked if direction == Direction::Down => {
                if fast_drop {
                    self.move_to_bottom();
                }
                MoveOutcome::Landed
            }
            obstacle => MoveOutcome::Rejected(obstacle),
        }
    }

    /// Rows the active piece can fall before touching the floor or the
    /// stack, governed by its most restrictive column.
    pub fn drop_distance(&self) -> i32 {
        let Some(piece) = &self.active else {
            return 0;
        };
        piece
            .column_bottoms()
            .into_iter()
            .map(|(x, bottom)| {
                let mut y = bottom + 1;
                while y < ROWS as i32 && !self.grid.is_locked(x, y) {
                    y += 1;
                }
                y - 1 - bottom
            })
            .min()
            .unwrap_or(0)
    }

    /// Drops the active piece straight onto whatever is beneath it, in one
    /// assignment. Does not lock. Returns the rows travelled.
    pub fn move_to_bottom(&mut self) -> i32 {
        let distance = self.drop_distance();
        if distance > 0 {
            if let Some(piece) = self.active.as_mut() {
                let target = piece.anchor().offset(0, distance);
                piece.set_absolute_position(target);
            }
            self.redraw();
        }
        distance
    }

    /// Turns the active piece a quarter clockwise. A piece poking out of a
    /// side wall is pushed back inside one column at a time; overlapping the
    /// stack or the floor rejects the turn. Returns whether it turned.
    pub fn rotate(&mut self) -> bool {
        let Some(piece) = &self.active else {
            return false;
        };
        if piece.kind().is_rotation_invariant() {
            return false;
        }

        let candidate = piece.rotated();
        let mut push_right = 0;
        let mut push_left = 0;
        for pos in candidate.cells() {
            if pos.x < 0 {
                push_right = push_right.max(-pos.x);
            } else if pos.x >= COLUMNS as i32 {
                push_left = push_left.max(pos.x - (COLUMNS as i32 - 1));
            } else if pos.y >= ROWS as i32 || self.grid.is_locked(pos.x, pos.y) {
                return false;
            }
        }

        let Some(kicked) = self.kick(candidate, push_right - push_left) else {
            return false;
        };
        self.active = Some(kicked);
        self.redraw();
        true
    }

    /// Walks `candidate` sideways by `shift` columns one step at a time. Each
    /// step may not cover a locked cell, and the final spot must be fully
    /// inside the grid.
    fn kick(&self, mut candidate: ActivePiece, shift: i32) -> Option<ActivePiece> {
        let step = shift.signum();
        for _ in 0..shift.abs() {
            candidate.translate(step, 0);
            if candidate.cells().any(|pos| self.grid.is_locked(pos.x, pos.y)) {
                return None;
            }
        }
        let fits = candidate
            .cells()
            .all(|pos| obstacle_at(&self.grid, pos.x, pos.y) == Obstacle::Free);
        fits.then_some(candidate)
    }
}
