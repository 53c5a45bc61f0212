use wasm_bindgen::prelude::*;

pub mod ai;
pub mod api;
pub mod board;
pub mod error;
pub mod game;
pub mod types;

/// Wires the browser console up for panics and `log` output. Runs once
/// per module instantiation.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Debug);
    }
}

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
