pub mod selector;

use crate::board::Board;
use crate::config::Difficulty;
use crate::types::{Position, Side};

pub use selector::{FirstLegalMoveSelector, HeuristicSelector};

pub trait MoveSelector: Send {
    /// Picks one of `moves` for `side`.
    ///
    /// Caller contract: `moves` is the non-empty, row-major legal-move list of
    /// `side` on `board`. Returns `None` only when `moves` is empty.
    fn select_move(&mut self, board: &Board, side: Side, moves: &[Position]) -> Option<Position>;

    /// Selectors without tiers ignore this.
    fn set_difficulty(&mut self, _difficulty: Difficulty) {}
}
