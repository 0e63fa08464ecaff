use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod config;
pub mod game;
pub mod types;
pub mod wasm;

pub use board::Board;
pub use config::{Difficulty, GameConfig};
pub use game::{GameController, MoveError, TurnOutcome};
pub use types::{Cell, GameResult, GameState, Phase, Position, Score, Side, Winner};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
