use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::types::{Cell, Position, Score, Side};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Squares visited when walking outward from each square, per direction, nearest first.
static RAYS: Lazy<Vec<[Vec<u8>; 8]>> = Lazy::new(|| {
    (0..NUM_SQUARES)
        .map(|pos| {
            let (row, col) = pos_to_row_col(pos);
            DIRECTIONS.map(|(dr, dc)| {
                let mut ray = Vec::with_capacity(BOARD_SIZE - 1);
                let mut r = row + dr;
                let mut c = col + dc;
                while in_bounds(r, c) {
                    ray.push((r as usize * BOARD_SIZE + c as usize) as u8);
                    r += dr;
                    c += dc;
                }
                ray
            })
        })
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardParseError {
    #[error("expected 8 rows, got {0}")]
    WrongRowCount(usize),

    #[error("row {row} has {len} cells, expected 8")]
    WrongRowLength { row: usize, len: usize },

    #[error("invalid cell character: '{0}'")]
    InvalidCell(char),
}

/// Othello board state represented by two bitboards.
///
/// Bit `row * 8 + col` is set in `black` or `white` when that side occupies
/// the square; never in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the initial board:
    /// (3,3)=white, (3,4)=black, (4,3)=black, (4,4)=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    /// Builds a board from raw bitboards. Squares set in both masks are
    /// treated as black.
    pub fn from_bitboards(black: u64, white: u64) -> Self {
        Self {
            black,
            white: white & !black,
        }
    }

    pub fn from_grid(grid: [[Cell; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        let mut board = Self::from_bitboards(0, 0);
        for (row, cells) in grid.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let square = bit(row * BOARD_SIZE + col);
                match cell {
                    Cell::Black => board.black |= square,
                    Cell::White => board.white |= square,
                    Cell::Empty => {}
                }
            }
        }
        board
    }

    pub fn grid(&self) -> [[Cell; BOARD_SIZE]; BOARD_SIZE] {
        let mut grid = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (row, cells) in grid.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = self.cell_at(row * BOARD_SIZE + col);
            }
        }
        grid
    }

    /// Returns the contents of `pos`; out-of-range coordinates read as empty.
    pub fn cell(&self, pos: Position) -> Cell {
        square_index(pos).map_or(Cell::Empty, |idx| self.cell_at(idx))
    }

    /// True when `side` may play at `pos`: the square is empty and at least one
    /// direction holds a run of opposing discs closed by a `side` disc.
    pub fn is_legal_move(&self, pos: Position, side: Side) -> bool {
        let Some(idx) = square_index(pos) else {
            return false;
        };
        if self.occupied() & bit(idx) != 0 {
            return false;
        }

        let (me, opp) = self.split(side);
        capture_runs(idx, me, opp).next().is_some()
    }

    /// Returns every legal move for `side` in row-major order.
    pub fn legal_moves(&self, side: Side) -> Vec<Position> {
        (0..NUM_SQUARES)
            .map(idx_to_position)
            .filter(|&pos| self.is_legal_move(pos, side))
            .collect()
    }

    pub fn has_legal_move(&self, side: Side) -> bool {
        (0..NUM_SQUARES).any(|idx| self.is_legal_move(idx_to_position(idx), side))
    }

    /// Places a `side` disc on `pos` and flips every closed run of opposing
    /// discs. Returns the flipped squares in walk order.
    ///
    /// Caller contract: `pos` must be legal for `side`. No legality check is
    /// made; directions that do not close on a `side` disc are left alone.
    pub fn apply_move(&mut self, pos: Position, side: Side) -> Vec<Position> {
        let Some(idx) = square_index(pos) else {
            return Vec::new();
        };

        let (me, opp) = self.split(side);
        let flipped: Vec<u8> = capture_runs(idx, me, opp).flatten().copied().collect();
        let flips = flipped.iter().fold(0u64, |mask, &sq| mask | bit(sq as usize));

        let next_me = me | bit(idx) | flips;
        let next_opp = opp & !next_me;
        match side {
            Side::Black => {
                self.black = next_me;
                self.white = next_opp;
            }
            Side::White => {
                self.white = next_me;
                self.black = next_opp;
            }
        }

        flipped
            .into_iter()
            .map(|sq| idx_to_position(sq as usize))
            .collect()
    }

    /// Number of discs [`Board::apply_move`] would flip. Does not mutate.
    pub fn count_flips(&self, pos: Position, side: Side) -> u8 {
        let Some(idx) = square_index(pos) else {
            return 0;
        };

        let (me, opp) = self.split(side);
        capture_runs(idx, me, opp).map(|run| run.len() as u8).sum()
    }

    pub fn score(&self) -> Score {
        Score {
            black: self.black.count_ones() as u8,
            white: self.white.count_ones() as u8,
        }
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        NUM_SQUARES as u8 - self.score().total()
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (pos, cell) in board.iter_mut().enumerate() {
            *cell = self.cell_at(pos).code();
        }
        board
    }

    fn occupied(&self) -> u64 {
        self.black | self.white
    }

    fn split(&self, side: Side) -> (u64, u64) {
        match side {
            Side::Black => (self.black, self.white),
            Side::White => (self.white, self.black),
        }
    }

    fn cell_at(&self, idx: usize) -> Cell {
        let square = bit(idx);
        if (self.black & square) != 0 {
            Cell::Black
        } else if (self.white & square) != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders 8 lines of `B`, `W` and `.`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let ch = match self.cell_at(row * BOARD_SIZE + col) {
                    Cell::Black => 'B',
                    Cell::White => 'W',
                    Cell::Empty => '.',
                };
                write!(f, "{ch}")?;
            }
            if row + 1 < BOARD_SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Parses the [`Display`](fmt::Display) format. Blank lines and spaces are
/// ignored; `X`/`O` are accepted as aliases for `B`/`W`.
impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<Vec<char>> = s
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        if rows.len() != BOARD_SIZE {
            return Err(BoardParseError::WrongRowCount(rows.len()));
        }

        let mut grid = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (row, chars) in rows.iter().enumerate() {
            if chars.len() != BOARD_SIZE {
                return Err(BoardParseError::WrongRowLength {
                    row,
                    len: chars.len(),
                });
            }
            for (col, &ch) in chars.iter().enumerate() {
                grid[row][col] = match ch {
                    'B' | 'X' => Cell::Black,
                    'W' | 'O' => Cell::White,
                    '.' | '-' => Cell::Empty,
                    other => return Err(BoardParseError::InvalidCell(other)),
                };
            }
        }

        Ok(Self::from_grid(grid))
    }
}

/// Yields each run of opposing discs, starting next to `idx`, that is closed
/// by a `me` disc. Runs interrupted by an empty square or the edge are skipped.
fn capture_runs(idx: usize, me: u64, opp: u64) -> impl Iterator<Item = &'static [u8]> {
    let rays: &'static [[Vec<u8>; 8]] = &RAYS;
    rays[idx].iter().filter_map(move |ray| {
        let run = ray
            .iter()
            .take_while(|&&sq| (opp & bit(sq as usize)) != 0)
            .count();
        match ray.get(run) {
            Some(&end) if run > 0 && (me & bit(end as usize)) != 0 => Some(&ray[..run]),
            _ => None,
        }
    })
}

fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

fn square_index(pos: Position) -> Option<usize> {
    let (row, col) = (pos.row as usize, pos.col as usize);
    (row < BOARD_SIZE && col < BOARD_SIZE).then_some(row * BOARD_SIZE + col)
}

fn idx_to_position(idx: usize) -> Position {
    Position::new((idx / BOARD_SIZE) as u8, (idx % BOARD_SIZE) as u8)
}

fn pos_to_row_col(pos: usize) -> (i32, i32) {
    ((pos / BOARD_SIZE) as i32, (pos % BOARD_SIZE) as i32)
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}
