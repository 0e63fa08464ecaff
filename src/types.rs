use serde::Serialize;

/// One of the two players, distinguished by disc color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Black,
    White,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }
}

/// Contents of one board square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    /// Wire code used in `GameState::board`: 0=empty, 1=black, 2=white.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Black => 1,
            Cell::White => 2,
        }
    }
}

impl From<Side> for Cell {
    fn from(side: Side) -> Self {
        match side {
            Side::Black => Cell::Black,
            Side::White => Cell::White,
        }
    }
}

/// A board coordinate, 0-indexed. Also used as the move type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn is_corner(self) -> bool {
        (self.row == 0 || self.row == 7) && (self.col == 0 || self.col == 7)
    }

    pub fn is_edge(self) -> bool {
        self.row == 0 || self.row == 7 || self.col == 0 || self.col == 7
    }
}

/// Occupied-cell count per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Score {
    pub black: u8,
    pub white: u8,
}

impl Score {
    pub fn total(&self) -> u8 {
        self.black + self.white
    }
}

/// Turn state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    WhiteTurn,
    BlackTurn,
    Finished,
}

impl Phase {
    pub fn side_to_move(self) -> Option<Side> {
        match self {
            Phase::WhiteTurn => Some(Side::White),
            Phase::BlackTurn => Some(Side::Black),
            Phase::Finished => None,
        }
    }

    pub(crate) fn of(side: Side) -> Self {
        match side {
            Side::White => Phase::WhiteTurn,
            Side::Black => Phase::BlackTurn,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Black,
    White,
    Draw,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub winner: Winner,
    pub black_count: u8,
    pub white_count: u8,
}

impl GameResult {
    pub fn from_score(score: Score) -> Self {
        let winner = if score.black > score.white {
            Winner::Black
        } else if score.white > score.black {
            Winner::White
        } else {
            Winner::Draw
        };
        Self {
            winner,
            black_count: score.black,
            white_count: score.white,
        }
    }
}

/// Public game state handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Row-major cell codes, see [`Cell::code`].
    pub board: Vec<u8>,
    pub phase: Phase,
    pub current_player: Option<Side>,
    pub black_count: u8,
    pub white_count: u8,
    pub consecutive_passes: u8,
    pub is_game_over: bool,
    /// Contract:
    /// - `true` when the side to move got the turn because the other side passed.
    /// - `false` when the previous action was a normal move.
    pub is_pass: bool,
    /// Square of the most recently placed disc, `None` before the first move.
    pub last_move: Option<Position>,
    /// Contract:
    /// - Discs flipped by `last_move`, nearest first per direction.
    /// - Empty before the first move.
    pub flipped: Vec<Position>,
    /// CRC32 of `board`, for cheap redraw checks.
    pub board_fingerprint: u32,
}
