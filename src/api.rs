use std::sync::{Mutex, MutexGuard, PoisonError};

use log::info;
use once_cell::sync::Lazy;
use wasm_bindgen::prelude::*;

use crate::error::GameError;
use crate::game::GameInstance;
use crate::types::{AdvanceReport, Difficulty, Player};

/// The one game per page load. `epoch` counts new-game calls so that
/// timer callbacks armed against an earlier game identify themselves as
/// stale instead of mutating the successor.
struct GameSlot {
    epoch: u32,
    game: Option<GameInstance>,
}

static GAME: Lazy<Mutex<GameSlot>> = Lazy::new(|| {
    Mutex::new(GameSlot {
        epoch: 0,
        game: None,
    })
});

fn slot() -> MutexGuard<'static, GameSlot> {
    GAME.lock().unwrap_or_else(PoisonError::into_inner)
}

fn to_js(err: GameError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn serialize<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Starts a fresh game, superseding any game in progress. Returns the new
/// epoch; the page must pass it back to `advance_computer`.
#[wasm_bindgen]
pub fn new_game(difficulty: &str) -> Result<u32, JsValue> {
    let difficulty: Difficulty = difficulty.parse().map_err(to_js)?;

    let mut slot = slot();
    slot.epoch = slot.epoch.wrapping_add(1);
    slot.game = Some(GameInstance::new(difficulty));
    info!("new game: difficulty {difficulty:?}, epoch {}", slot.epoch);

    Ok(slot.epoch)
}

/// Plays the human move at `(x, y)` and returns the updated state.
#[wasm_bindgen]
pub fn player_move(x: u8, y: u8) -> Result<JsValue, JsValue> {
    let mut slot = slot();
    let game = slot
        .game
        .as_mut()
        .ok_or_else(|| to_js(GameError::NoActiveGame))?;

    game.place(x, y).map_err(to_js)?;
    serialize(&game.to_game_state())
}

/// Executes the computer's whole turn chain. `epoch` is the stale-timer
/// guard: a `setTimeout` callback armed before a new game started is
/// rejected here instead of touching the board it no longer belongs to.
#[wasm_bindgen]
pub fn advance_computer(epoch: u32) -> Result<JsValue, JsValue> {
    let mut slot = slot();
    if slot.epoch != epoch {
        return Err(to_js(GameError::StaleEpoch {
            current: slot.epoch,
            got: epoch,
        }));
    }

    let game = slot
        .game
        .as_mut()
        .ok_or_else(|| to_js(GameError::NoActiveGame))?;

    let plies = game.advance_computer().map_err(to_js)?;
    serialize(&AdvanceReport {
        plies,
        state: game.to_game_state(),
    })
}

/// Current state snapshot.
#[wasm_bindgen]
pub fn game_state() -> Result<JsValue, JsValue> {
    let slot = slot();
    let game = slot
        .game
        .as_ref()
        .ok_or_else(|| to_js(GameError::NoActiveGame))?;

    serialize(&game.to_game_state())
}

/// The human's current legal moves, for the valid-move hints on the board.
#[wasm_bindgen]
pub fn legal_moves() -> Result<JsValue, JsValue> {
    let slot = slot();
    let game = slot
        .game
        .as_ref()
        .ok_or_else(|| to_js(GameError::NoActiveGame))?;

    serialize(&game.legal_positions(Player::Black))
}

/// Final result. Rejected while the game is still in progress.
#[wasm_bindgen]
pub fn game_result() -> Result<JsValue, JsValue> {
    let slot = slot();
    let game = slot
        .game
        .as_ref()
        .ok_or_else(|| to_js(GameError::NoActiveGame))?;

    let result = game.to_game_result().map_err(to_js)?;
    serialize(&result)
}
