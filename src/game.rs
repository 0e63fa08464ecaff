use tracing::{debug, info};

use crate::ai::{FirstLegalMoveSelector, HeuristicSelector, MoveSelector};
use crate::board::{BOARD_SIZE, Board};
use crate::config::{Difficulty, GameConfig};
use crate::types::{GameResult, GameState, Phase, Position, Score, Side};

/// Side played through `submit_move`.
pub const HUMAN_SIDE: Side = Side::White;
/// Side played by the move selector.
pub const COMPUTER_SIDE: Side = Side::Black;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("game is already over")]
    GameOver,

    #[error("it is not {0:?}'s turn")]
    NotYourTurn(Side),

    #[error("row/col out of range: ({row}, {col})")]
    OutOfRange { row: u8, col: u8 },

    #[error("illegal move at ({row}, {col})")]
    IllegalMove { row: u8, col: u8 },

    #[error("move selector returned no move")]
    SelectorFailed,
}

/// What a computer turn did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Moved(Position),
    Passed,
    Finished,
}

/// Turn order, passes and scoring for one game. Owns the board.
pub struct GameController {
    board: Board,
    phase: Phase,
    consecutive_passes: u8,
    is_pass: bool,
    last_move: Option<Position>,
    flipped: Vec<Position>,
    selector: Box<dyn MoveSelector>,
}

impl GameController {
    pub fn new(selector: Box<dyn MoveSelector>) -> Self {
        Self::from_board(Board::new(), HUMAN_SIDE, selector)
    }

    pub fn with_config(config: GameConfig) -> Self {
        let selector = match config.seed {
            Some(seed) => HeuristicSelector::new(config.difficulty, seed),
            None => HeuristicSelector::from_clock(config.difficulty),
        };
        Self::new(Box::new(selector))
    }

    pub fn new_with_default_selector() -> Self {
        Self::new(Box::new(FirstLegalMoveSelector))
    }

    /// Starts from an arbitrary position with `to_move` acting next.
    ///
    /// A human turn without legal moves is passed immediately, and a position
    /// where neither side can move is finished immediately.
    pub fn from_board(board: Board, to_move: Side, selector: Box<dyn MoveSelector>) -> Self {
        let mut game = Self {
            board,
            phase: Phase::of(to_move),
            consecutive_passes: 0,
            is_pass: false,
            last_move: None,
            flipped: Vec::new(),
            selector,
        };
        game.settle();
        game
    }

    /// Starts a new game from the initial position, keeping the selector.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.phase = Phase::WhiteTurn;
        self.consecutive_passes = 0;
        self.is_pass = false;
        self.last_move = None;
        self.flipped.clear();
        debug!("new game");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn consecutive_passes(&self) -> u8 {
        self.consecutive_passes
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn is_computer_turn(&self) -> bool {
        self.phase == Phase::of(COMPUTER_SIDE)
    }

    /// Clickable squares for the human; empty outside the human's turn.
    pub fn legal_moves(&self) -> Vec<Position> {
        if self.phase == Phase::of(HUMAN_SIDE) {
            self.board.legal_moves(HUMAN_SIDE)
        } else {
            Vec::new()
        }
    }

    /// First legal human move in row-major order.
    pub fn hint(&self) -> Option<Position> {
        self.legal_moves().first().copied()
    }

    /// Plays a human move. Returns `false`, with no state change, when the
    /// move is rejected.
    pub fn submit_move(&mut self, row: u8, col: u8) -> bool {
        match self.place(row, col) {
            Ok(()) => true,
            Err(err) => {
                debug!(row, col, %err, "move rejected");
                false
            }
        }
    }

    pub fn place(&mut self, row: u8, col: u8) -> Result<(), MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        if self.phase != Phase::of(HUMAN_SIDE) {
            return Err(MoveError::NotYourTurn(HUMAN_SIDE));
        }

        let pos = to_position(row, col)?;
        if !self.board.is_legal_move(pos, HUMAN_SIDE) {
            return Err(MoveError::IllegalMove { row, col });
        }

        self.apply_move(pos, HUMAN_SIDE);
        Ok(())
    }

    /// Runs the computer's turn: a move, a pass, or the end of the game.
    pub fn play_computer_turn(&mut self) -> Result<TurnOutcome, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        if !self.is_computer_turn() {
            return Err(MoveError::NotYourTurn(COMPUTER_SIDE));
        }

        let moves = self.board.legal_moves(COMPUTER_SIDE);
        if moves.is_empty() {
            if !self.board.has_legal_move(HUMAN_SIDE) {
                self.finish();
                return Ok(TurnOutcome::Finished);
            }
            self.pass(COMPUTER_SIDE);
            return Ok(TurnOutcome::Passed);
        }

        let selected = self
            .selector
            .select_move(&self.board, COMPUTER_SIDE, &moves)
            .ok_or(MoveError::SelectorFailed)?;
        if !moves.contains(&selected) {
            return Err(MoveError::IllegalMove {
                row: selected.row,
                col: selected.col,
            });
        }

        self.apply_move(selected, COMPUTER_SIDE);
        Ok(TurnOutcome::Moved(selected))
    }

    /// Changes computer strength. Only allowed on the human's turn.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.phase != Phase::of(HUMAN_SIDE) {
            return false;
        }
        self.selector.set_difficulty(difficulty);
        true
    }

    pub fn score(&self) -> Score {
        self.board.score()
    }

    /// Final result, once the game is over.
    pub fn result(&self) -> Option<GameResult> {
        self.is_game_over()
            .then(|| GameResult::from_score(self.board.score()))
    }

    pub fn to_game_state(&self) -> GameState {
        let board = self.board.to_array();
        let score = self.board.score();
        GameState {
            board: board.to_vec(),
            phase: self.phase,
            current_player: self.phase.side_to_move(),
            black_count: score.black,
            white_count: score.white,
            consecutive_passes: self.consecutive_passes,
            is_game_over: self.is_game_over(),
            is_pass: self.is_pass,
            last_move: self.last_move,
            flipped: self.flipped.clone(),
            board_fingerprint: crc32fast::hash(&board),
        }
    }

    fn apply_move(&mut self, pos: Position, side: Side) {
        self.flipped = self.board.apply_move(pos, side);
        self.last_move = Some(pos);
        self.is_pass = false;
        self.consecutive_passes = 0;
        self.phase = Phase::of(side.opponent());
        debug!(?side, row = pos.row, col = pos.col, flips = self.flipped.len(), "move applied");

        self.settle();
    }

    /// Resolves turns that need no input: a human with no legal move passes,
    /// and a position where neither side can move ends the game.
    fn settle(&mut self) {
        let Some(side) = self.phase.side_to_move() else {
            return;
        };

        if self.board.has_legal_move(side) {
            return;
        }
        if !self.board.has_legal_move(side.opponent()) {
            self.finish();
        } else if side == HUMAN_SIDE {
            self.pass(side);
        }
    }

    fn pass(&mut self, side: Side) {
        self.consecutive_passes += 1;
        self.is_pass = true;
        self.phase = Phase::of(side.opponent());
        debug!(?side, passes = self.consecutive_passes, "pass");
    }

    fn finish(&mut self) {
        self.consecutive_passes = 2;
        self.phase = Phase::Finished;
        let score = self.board.score();
        info!(black = score.black, white = score.white, "game finished");
    }
}

fn to_position(row: u8, col: u8) -> Result<Position, MoveError> {
    if row as usize >= BOARD_SIZE || col as usize >= BOARD_SIZE {
        return Err(MoveError::OutOfRange { row, col });
    }
    Ok(Position::new(row, col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Winner;

    const FULL_BOARD: u64 = u64::MAX;

    struct FixedMoveSelector {
        mv: Position,
    }

    impl MoveSelector for FixedMoveSelector {
        fn select_move(&mut self, _board: &Board, _side: Side, _moves: &[Position]) -> Option<Position> {
            Some(self.mv)
        }
    }

    fn bit(row: usize, col: usize) -> u64 {
        1u64 << (row * BOARD_SIZE + col)
    }

    /// Only (0,0) empty; (0,1) holds `lone`, everything else the other color.
    fn one_hole(lone: Side) -> Board {
        let single = bit(0, 1);
        let rest = FULL_BOARD ^ bit(0, 0) ^ single;
        match lone {
            Side::Black => Board::from_bitboards(single, rest),
            Side::White => Board::from_bitboards(rest, single),
        }
    }

    #[test]
    fn initial_state_is_correct() {
        let game = GameController::new_with_default_selector();
        let state = game.to_game_state();

        assert_eq!(state.phase, Phase::WhiteTurn);
        assert_eq!(state.current_player, Some(Side::White));
        assert_eq!(state.black_count, 2);
        assert_eq!(state.white_count, 2);
        assert_eq!(state.consecutive_passes, 0);
        assert!(!state.is_game_over);
        assert!(!state.is_pass);
        assert!(state.flipped.is_empty());
        assert_eq!(state.last_move, None);
        assert_eq!(game.legal_moves().len(), 4);
        assert_eq!(game.result(), None);
    }

    #[test]
    fn human_move_flips_and_hands_turn_to_computer() {
        let mut game = GameController::new_with_default_selector();

        assert!(game.submit_move(2, 4));

        let state = game.to_game_state();
        assert_eq!(state.phase, Phase::BlackTurn);
        assert_eq!(state.white_count, 4);
        assert_eq!(state.black_count, 1);
        assert_eq!(state.last_move, Some(Position::new(2, 4)));
        assert_eq!(state.flipped, vec![Position::new(3, 4)]);
        assert!(game.is_computer_turn());
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn illegal_human_move_is_rejected_without_change() {
        let mut game = GameController::new_with_default_selector();
        let before = game.to_game_state();

        assert!(!game.submit_move(0, 0));
        assert!(!game.submit_move(3, 3));
        assert!(!game.submit_move(8, 2));
        assert_eq!(game.place(0, 0), Err(MoveError::IllegalMove { row: 0, col: 0 }));
        assert_eq!(game.place(9, 0), Err(MoveError::OutOfRange { row: 9, col: 0 }));
        assert_eq!(game.to_game_state(), before);
    }

    #[test]
    fn moves_out_of_turn_are_rejected() {
        let mut game = GameController::new_with_default_selector();

        assert_eq!(
            game.play_computer_turn(),
            Err(MoveError::NotYourTurn(Side::Black))
        );

        assert!(game.submit_move(2, 4));
        let before = game.to_game_state();
        assert!(!game.submit_move(2, 2));
        assert_eq!(game.place(2, 2), Err(MoveError::NotYourTurn(Side::White)));
        assert_eq!(game.to_game_state(), before);
    }

    #[test]
    fn computer_reply_returns_turn_to_human() {
        let mut game = GameController::new_with_default_selector();
        assert!(game.submit_move(2, 4));

        let outcome = game.play_computer_turn().unwrap();

        assert_eq!(outcome, TurnOutcome::Moved(Position::new(2, 3)));
        assert_eq!(game.phase(), Phase::WhiteTurn);
        assert_eq!(game.consecutive_passes(), 0);
        assert!(!game.legal_moves().is_empty());
    }

    #[test]
    fn human_without_moves_passes_automatically() {
        let game = GameController::from_board(
            one_hole(Side::White),
            Side::White,
            Box::new(FirstLegalMoveSelector),
        );

        let state = game.to_game_state();
        assert_eq!(state.phase, Phase::BlackTurn);
        assert_eq!(state.consecutive_passes, 1);
        assert!(state.is_pass);
        assert!(!state.is_game_over);
    }

    #[test]
    fn computer_move_after_human_pass_can_end_the_game() {
        let mut game = GameController::from_board(
            one_hole(Side::White),
            Side::White,
            Box::new(FirstLegalMoveSelector),
        );

        let outcome = game.play_computer_turn().unwrap();

        assert_eq!(outcome, TurnOutcome::Moved(Position::new(0, 0)));
        assert!(game.is_game_over());
        assert_eq!(game.consecutive_passes(), 2);
        assert_eq!(
            game.result(),
            Some(GameResult {
                winner: Winner::Black,
                black_count: 64,
                white_count: 0,
            })
        );
    }

    #[test]
    fn computer_without_moves_passes_back_to_human() {
        let mut game = GameController::from_board(
            one_hole(Side::Black),
            Side::Black,
            Box::new(FirstLegalMoveSelector),
        );

        let outcome = game.play_computer_turn().unwrap();

        assert_eq!(outcome, TurnOutcome::Passed);
        assert_eq!(game.phase(), Phase::WhiteTurn);
        assert_eq!(game.consecutive_passes(), 1);
        assert_eq!(game.legal_moves(), vec![Position::new(0, 0)]);

        assert!(game.submit_move(0, 0));
        assert!(game.is_game_over());
        assert_eq!(game.result().map(|r| r.winner), Some(Winner::White));
    }

    #[test]
    fn position_with_no_moves_for_either_side_finishes_immediately() {
        let board = Board::from_bitboards(FULL_BOARD ^ bit(0, 0) ^ bit(7, 7), 0);

        for to_move in [Side::White, Side::Black] {
            let game = GameController::from_board(board, to_move, Box::new(FirstLegalMoveSelector));

            assert_eq!(game.phase(), Phase::Finished);
            assert_eq!(game.consecutive_passes(), 2);
            assert_eq!(game.to_game_state().current_player, None);
            assert_eq!(game.result().map(|r| r.winner), Some(Winner::Black));
        }
    }

    #[test]
    fn finished_game_rejects_everything() {
        let board = Board::from_bitboards(FULL_BOARD ^ bit(0, 0), 0);
        let mut game = GameController::from_board(board, Side::White, Box::new(FirstLegalMoveSelector));

        assert!(!game.submit_move(0, 0));
        assert_eq!(game.place(0, 0), Err(MoveError::GameOver));
        assert_eq!(game.play_computer_turn(), Err(MoveError::GameOver));
        assert!(!game.set_difficulty(Difficulty::Easy));
        assert_eq!(game.hint(), None);
    }

    #[test]
    fn drawn_game_reports_draw() {
        let board = Board::from_bitboards(0x0000_0000_FFFF_FFFF, 0xFFFF_FFFF_0000_0000);
        let game = GameController::from_board(board, Side::White, Box::new(FirstLegalMoveSelector));

        assert_eq!(
            game.result(),
            Some(GameResult {
                winner: Winner::Draw,
                black_count: 32,
                white_count: 32,
            })
        );
    }

    #[test]
    fn selector_returning_illegal_move_is_rejected() {
        let mut game = GameController::new(Box::new(FixedMoveSelector {
            mv: Position::new(0, 0),
        }));
        assert!(game.submit_move(2, 4));
        let before = game.to_game_state();

        assert_eq!(
            game.play_computer_turn(),
            Err(MoveError::IllegalMove { row: 0, col: 0 })
        );
        assert_eq!(game.to_game_state(), before);
    }

    #[test]
    fn first_move_game_terminates_within_sixty_plies() {
        let mut game = GameController::new_with_default_selector();
        let mut plies = 0;
        let mut occupied = game.score().total();

        while !game.is_game_over() {
            if game.is_computer_turn() {
                if let TurnOutcome::Moved(_) = game.play_computer_turn().unwrap() {
                    plies += 1;
                }
            } else {
                let mv = game.hint().expect("human turn must have a move");
                assert!(game.submit_move(mv.row, mv.col));
                plies += 1;
            }

            let now = game.score().total();
            assert!(now >= occupied);
            occupied = now;
            assert!(plies <= 60);
        }

        let state = game.to_game_state();
        let non_empty = state.board.iter().filter(|&&c| c != 0).count();
        assert_eq!((state.black_count + state.white_count) as usize, non_empty);
        assert!(non_empty <= 64);
        assert_eq!(game.score(), game.score());
    }

    #[test]
    fn difficulty_changes_only_on_human_turn() {
        let mut game = GameController::with_config(GameConfig {
            difficulty: Difficulty::Easy,
            seed: Some(3),
        });

        assert!(game.set_difficulty(Difficulty::Normal));
        assert!(game.submit_move(2, 4));
        assert!(!game.set_difficulty(Difficulty::Hard));
    }

    #[test]
    fn hint_is_first_legal_move() {
        let game = GameController::new_with_default_selector();

        assert_eq!(game.hint(), Some(Position::new(2, 4)));
    }

    #[test]
    fn reset_restores_initial_position() {
        let mut game = GameController::new_with_default_selector();
        let initial = game.to_game_state();
        assert!(game.submit_move(2, 4));
        game.play_computer_turn().unwrap();

        game.reset();

        assert_eq!(game.to_game_state(), initial);
    }

    #[test]
    fn fingerprint_tracks_board_changes() {
        let mut game = GameController::new_with_default_selector();
        let before = game.to_game_state().board_fingerprint;

        assert!(!game.submit_move(0, 0));
        assert_eq!(game.to_game_state().board_fingerprint, before);

        assert!(game.submit_move(2, 4));
        assert_ne!(game.to_game_state().board_fingerprint, before);
    }
}
