use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use web_time::{SystemTime, UNIX_EPOCH};

use crate::ai::MoveSelector;
use crate::board::Board;
use crate::config::Difficulty;
use crate::types::{Position, Side};

/// Always plays the first legal move in row-major order.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalMoveSelector;

impl MoveSelector for FirstLegalMoveSelector {
    fn select_move(&mut self, _board: &Board, _side: Side, moves: &[Position]) -> Option<Position> {
        moves.first().copied()
    }
}

/// One-ply greedy computer player with three strength tiers.
#[derive(Debug, Clone)]
pub struct HeuristicSelector {
    difficulty: Difficulty,
    rng: SmallRng,
}

impl HeuristicSelector {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeds from the wall clock; `web-time` keeps this working under wasm32.
    pub fn from_clock(difficulty: Difficulty) -> Self {
        Self::new(difficulty, clock_seed())
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

impl MoveSelector for HeuristicSelector {
    fn select_move(&mut self, board: &Board, side: Side, moves: &[Position]) -> Option<Position> {
        match self.difficulty {
            Difficulty::Easy => select_random(moves, &mut self.rng),
            Difficulty::Normal => select_normal(board, side, moves, &mut self.rng),
            Difficulty::Hard => select_hard(board, side, moves, &mut self.rng),
        }
    }

    fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }
}

/// Corner (uniform random) > edge with most flips > any move with most flips.
/// Flip-count ties keep the first move in `moves` order.
pub fn select_hard<R: Rng>(
    board: &Board,
    side: Side,
    moves: &[Position],
    rng: &mut R,
) -> Option<Position> {
    if let Some(corner) = random_corner(moves, rng) {
        return Some(corner);
    }

    let edges: Vec<Position> = moves.iter().copied().filter(|mv| mv.is_edge()).collect();
    max_flips_first_wins(board, side, &edges).or_else(|| max_flips_first_wins(board, side, moves))
}

/// Corner (uniform random) > edge (uniform random) > any move with most flips.
pub fn select_normal<R: Rng>(
    board: &Board,
    side: Side,
    moves: &[Position],
    rng: &mut R,
) -> Option<Position> {
    if let Some(corner) = random_corner(moves, rng) {
        return Some(corner);
    }

    let edges: Vec<Position> = moves.iter().copied().filter(|mv| mv.is_edge()).collect();
    select_random(&edges, rng).or_else(|| max_flips_first_wins(board, side, moves))
}

pub fn select_random<R: Rng>(moves: &[Position], rng: &mut R) -> Option<Position> {
    if moves.is_empty() {
        return None;
    }
    Some(moves[rng.gen_range(0..moves.len())])
}

/// Move with the strictly greatest flip count; the earliest one wins ties.
pub fn max_flips_first_wins(board: &Board, side: Side, moves: &[Position]) -> Option<Position> {
    let mut best: Option<(Position, u8)> = None;
    for &mv in moves {
        let flips = board.count_flips(mv, side);
        if best.is_none_or(|(_, best_flips)| flips > best_flips) {
            best = Some((mv, flips));
        }
    }
    best.map(|(mv, _)| mv)
}

fn random_corner<R: Rng>(moves: &[Position], rng: &mut R) -> Option<Position> {
    let corners: Vec<Position> = moves.iter().copied().filter(|mv| mv.is_corner()).collect();
    select_random(&corners, rng)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
