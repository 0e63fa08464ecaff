use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::{Difficulty, GameConfig};
use crate::game::GameController;

/// One game as seen from the page: the human plays white, the CPU black.
#[wasm_bindgen]
pub struct OthelloSession {
    game: GameController,
}

#[wasm_bindgen]
impl OthelloSession {
    /// `config` is `{ difficulty?: "easy" | "normal" | "hard", seed?: number }`
    /// or `undefined`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<OthelloSession, JsError> {
        let config: GameConfig = if config.is_undefined() || config.is_null() {
            GameConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|err| JsError::new(&err.to_string()))?
        };

        Ok(Self {
            game: GameController::with_config(config),
        })
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(&self.game.to_game_state())
    }

    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> Result<JsValue, JsError> {
        to_js(&self.game.legal_moves())
    }

    #[wasm_bindgen(js_name = submitMove)]
    pub fn submit_move(&mut self, row: u8, col: u8) -> bool {
        self.game.submit_move(row, col)
    }

    #[wasm_bindgen(js_name = isComputerTurn)]
    pub fn is_computer_turn(&self) -> bool {
        self.game.is_computer_turn()
    }

    /// Returns `false` when it is not the computer's turn.
    #[wasm_bindgen(js_name = playComputerTurn)]
    pub fn play_computer_turn(&mut self) -> bool {
        self.game.play_computer_turn().is_ok()
    }

    /// `{ winner, blackCount, whiteCount }` once the game is over, else `undefined`.
    pub fn result(&self) -> Result<JsValue, JsError> {
        to_js(&self.game.result())
    }

    pub fn hint(&self) -> Result<JsValue, JsError> {
        to_js(&self.game.hint())
    }

    #[wasm_bindgen(js_name = setDifficulty)]
    pub fn set_difficulty(&mut self, name: &str) -> bool {
        Difficulty::from_name(name).is_some_and(|difficulty| self.game.set_difficulty(difficulty))
    }

    pub fn reset(&mut self) {
        self.game.reset();
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsError::new(&err.to_string()))
}
