//! Four-in-a-row detection around a freshly placed disc

use crate::board::{Board, Cell, Player, Position};

/// The number of same-player discs in a line that wins the game
pub const CONNECT: usize = 4;

/// The lines along which a run is looked for, in evaluation order
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Axis {
    /// `|`
    Vertical,
    /// `-`
    Horizontal,
    /// `/`, x grows as y shrinks
    AntiDiagonal,
    /// `\`, x grows as y grows
    Diagonal,
}

impl Axis {
    pub const ALL: [Axis; 4] = [
        Axis::Vertical,
        Axis::Horizontal,
        Axis::AntiDiagonal,
        Axis::Diagonal,
    ];

    /// One step along the axis, the opposite direction is the negation
    fn step(self) -> (isize, isize) {
        match self {
            Axis::Vertical => (0, 1),
            Axis::Horizontal => (1, 0),
            Axis::AntiDiagonal => (1, -1),
            Axis::Diagonal => (1, 1),
        }
    }
}

/// A winning run: the disc that completed it plus its same-player neighbours
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct WinningLine {
    pub axis: Axis,
    pub origin: Position,
    /// Contiguous same-player cells on the axis, origin excluded
    pub matched: Vec<Position>,
}

impl WinningLine {
    /// Every disc in the run, origin first
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        std::iter::once(self.origin).chain(self.matched.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.matched.len() + 1
    }

    pub fn contains(&self, position: Position) -> bool {
        self.origin == position || self.matched.contains(&position)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct WinDetector {
    run_length: usize,
}

impl WinDetector {
    pub fn new() -> Self {
        Self {
            run_length: CONNECT,
        }
    }

    /// Looks for a run through `origin` belonging to `player`
    ///
    /// Each axis is walked in both directions from `origin`, collecting at
    /// most `CONNECT - 1` cells per direction. A walk stops at the first cell
    /// that is off the board, empty or the opponent's, so runs never bridge a
    /// gap. The first axis whose two walks together match `CONNECT - 1` cells
    /// wins; the remaining axes are not checked.
    ///
    /// `origin` itself is assumed to hold `player`'s disc.
    pub fn check_four_in_row(
        &self,
        board: &Board,
        origin: Position,
        player: Player,
    ) -> Option<WinningLine> {
        let needed = self.run_length - 1;

        for axis in Axis::ALL.iter().copied() {
            let (dx, dy) = axis.step();
            let mut matched = self.walk(board, origin, player, (dx, dy));
            matched.extend(self.walk(board, origin, player, (-dx, -dy)));

            if matched.len() >= needed {
                return Some(WinningLine {
                    axis,
                    origin,
                    matched,
                });
            }
        }
        None
    }

    fn walk(
        &self,
        board: &Board,
        origin: Position,
        player: Player,
        (dx, dy): (isize, isize),
    ) -> Vec<Position> {
        let mut matched = Vec::with_capacity(self.run_length - 1);
        let mut current = origin;

        while matched.len() < self.run_length - 1 {
            match current.offset(dx, dy) {
                Some(next) if board.cell_at(next.x, next.y) == Some(Cell::Occupied(player)) => {
                    matched.push(next);
                    current = next;
                }
                _ => break,
            }
        }
        matched
    }
}

impl Default for WinDetector {
    fn default() -> Self {
        Self::new()
    }
}
