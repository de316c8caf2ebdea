//! Gene Jumper core crate.
//!
//! A side-scrolling platformer rendered to a 2D canvas: jump across DNA strands,
//! stand in gene platforms to open a base-pairing puzzle, and earn jump / speed /
//! shield buffs for solving it. Everything except `web` is plain Rust and runs
//! under `cargo test` on the host.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod puzzle;
pub mod session;
pub mod web;

pub use config::{GameConfig, PlatformSpec};
pub use error::GameError;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

/// Mount the canvas and overlays with the default tuning and show the menu.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::launch(GameConfig::default()).map_err(Into::into)
}

/// Same as [`start_game`], with a partial JSON override of [`GameConfig`].
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json)?;
    web::launch(config).map_err(Into::into)
}
