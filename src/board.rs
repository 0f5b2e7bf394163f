use std::fmt;

use crate::{error::MoveError, HEIGHT, WIDTH};

/// One of the two players, Player 1 always moves first
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The opponent of this player
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// The player's number, 1 or 2
    pub fn id(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.id())
    }
}

/// The occupancy of a single grid position
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    Empty,
    Occupied(Player),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn player(&self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(*player),
        }
    }
}

/// A grid position, one-indexed
///
/// `x` runs left to right over `1..=WIDTH`, `y` runs top to bottom over
/// `1..=HEIGHT`, so discs land on `y == HEIGHT` first.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn on_board(&self) -> bool {
        (1..=WIDTH).contains(&self.x) && (1..=HEIGHT).contains(&self.y)
    }

    /// The neighbouring position `(dx, dy)` away, or `None` if it falls off the board
    pub fn offset(&self, dx: isize, dy: isize) -> Option<Position> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        let position = Position::new(x, y);
        if position.on_board() {
            Some(position)
        } else {
            None
        }
    }

    // cells are stored top-to-bottom, left-to-right
    fn index(&self) -> usize {
        (self.y - 1) * WIDTH + (self.x - 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The game grid
///
/// Discs can only enter through [`Board::place`], which always fills the
/// lowest open row of a column, so no disc ever floats above an empty cell
/// and no occupied cell is ever overwritten.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Board {
    cells: [Cell; WIDTH * HEIGHT],
    num_discs: usize,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; WIDTH * HEIGHT],
            num_discs: 0,
        }
    }

    /// Builds a board from a string of one-indexed column digits, players
    /// alternating from Player 1
    ///
    /// Positions that contain a four-in-a-row are accepted; this only
    /// enforces the placement rule.
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self, MoveError> {
        let mut board = Self::new();
        let mut player = Player::One;

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10) {
                Some(column) => {
                    board.place(column as usize, player)?;
                    player = player.other();
                }
                None => return Err(MoveError::UnknownMove(column_char)),
            }
        }
        Ok(board)
    }

    /// The occupancy at `(x, y)`, or `None` off the board
    pub fn cell_at(&self, x: usize, y: usize) -> Option<Cell> {
        let position = Position::new(x, y);
        if position.on_board() {
            Some(self.cells[position.index()])
        } else {
            None
        }
    }

    /// The row a disc dropped into column `x` would land on
    ///
    /// Scans from the bottom row upward and returns the first empty row, or
    /// `None` if the column is full or does not exist.
    pub fn column_topmost_available_row(&self, x: usize) -> Option<usize> {
        if !(1..=WIDTH).contains(&x) {
            return None;
        }
        (1..=HEIGHT)
            .rev()
            .find(|&y| self.cells[Position::new(x, y).index()].is_empty())
    }

    /// Drops a disc for `player` into column `x`
    ///
    /// Returns where the disc landed. The board is left untouched on error.
    pub fn place(&mut self, x: usize, player: Player) -> Result<Position, MoveError> {
        if !(1..=WIDTH).contains(&x) {
            return Err(MoveError::InvalidColumn(x));
        }
        let y = self
            .column_topmost_available_row(x)
            .ok_or(MoveError::ColumnFull(x))?;

        let position = Position::new(x, y);
        self.cells[position.index()] = Cell::Occupied(player);
        self.num_discs += 1;
        Ok(position)
    }

    pub fn is_full(&self) -> bool {
        self.num_discs == WIDTH * HEIGHT
    }

    pub fn is_empty(&self) -> bool {
        self.num_discs == 0
    }

    pub fn num_discs(&self) -> usize {
        self.num_discs
    }

    pub fn clear(&mut self) {
        self.cells = [Cell::Empty; WIDTH * HEIGHT];
        self.num_discs = 0;
    }

    /// The rows of the board, top row first
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(WIDTH)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                let c = match cell {
                    Cell::Empty => '.',
                    Cell::Occupied(Player::One) => 'X',
                    Cell::Occupied(Player::Two) => 'O',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for x in 1..=WIDTH {
            for y in 1..=HEIGHT {
                assert_eq!(board.cell_at(x, y), Some(Cell::Empty));
            }
        }
        assert!(board.is_empty());
        assert!(!board.is_full());
    }

    #[test]
    fn test_discs_stack_from_the_bottom() {
        let mut board = Board::new();

        assert_eq!(board.place(3, Player::One), Ok(Position::new(3, HEIGHT)));
        assert_eq!(board.place(3, Player::Two), Ok(Position::new(3, HEIGHT - 1)));
        assert_eq!(board.cell_at(3, HEIGHT), Some(Cell::Occupied(Player::One)));
        assert_eq!(
            board.cell_at(3, HEIGHT - 1),
            Some(Cell::Occupied(Player::Two))
        );
        assert_eq!(board.column_topmost_available_row(3), Some(HEIGHT - 2));
        assert_eq!(board.num_discs(), 2);
    }

    #[test]
    fn test_column_full() {
        let mut board = Board::new();
        for n in 1..=HEIGHT {
            let position = board.place(1, Player::One).unwrap();
            assert_eq!(position.y, HEIGHT - n + 1);
        }

        assert_eq!(board.column_topmost_available_row(1), None);
        let before = board;
        assert_eq!(board.place(1, Player::Two), Err(MoveError::ColumnFull(1)));
        assert_eq!(board, before);
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::new();
        assert_eq!(board.place(0, Player::One), Err(MoveError::InvalidColumn(0)));
        assert_eq!(
            board.place(WIDTH + 1, Player::One),
            Err(MoveError::InvalidColumn(WIDTH + 1))
        );
        assert_eq!(board.column_topmost_available_row(0), None);
        assert!(board.is_empty());
    }

    #[test]
    fn test_cell_at_off_board() {
        let board = Board::new();
        assert_eq!(board.cell_at(0, 1), None);
        assert_eq!(board.cell_at(1, 0), None);
        assert_eq!(board.cell_at(WIDTH + 1, 1), None);
        assert_eq!(board.cell_at(1, HEIGHT + 1), None);
    }

    #[test]
    fn test_full_board_and_clear() {
        let mut board = Board::new();
        for x in 1..=WIDTH {
            for _ in 0..HEIGHT {
                board.place(x, Player::Two).unwrap();
            }
        }
        assert!(board.is_full());

        board.clear();
        assert!(board.is_empty());
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_from_moves_alternates_players() {
        let board = Board::from_moves("445").unwrap();
        assert_eq!(board.cell_at(4, 6), Some(Cell::Occupied(Player::One)));
        assert_eq!(board.cell_at(4, 5), Some(Cell::Occupied(Player::Two)));
        assert_eq!(board.cell_at(5, 6), Some(Cell::Occupied(Player::One)));

        assert_eq!(Board::from_moves("12a"), Err(MoveError::UnknownMove('a')));
        assert_eq!(Board::from_moves("8"), Err(MoveError::InvalidColumn(8)));
        assert_eq!(
            Board::from_moves("1111111"),
            Err(MoveError::ColumnFull(1))
        );
    }

    #[test]
    fn test_position_offset_stays_on_board() {
        let corner = Position::new(1, HEIGHT);
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(0, 1), None);
        assert_eq!(corner.offset(1, -1), Some(Position::new(2, HEIGHT - 1)));
    }

    #[test]
    fn test_display() {
        let board = Board::from_moves("12").unwrap();
        let text = board.to_string();
        let last_row = text.lines().last().unwrap();
        assert_eq!(last_row, "XO.....");
        assert_eq!(text.lines().count(), HEIGHT);
    }
}
