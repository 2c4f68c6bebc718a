//! Gift Day core crate.
//!
//! A single-page celebratory experience compiled to WebAssembly: a countdown
//! to the big day, a gift gate, a scratch-card image reveal, a balloon-pop
//! arcade and assorted confetti. The scratch-card engine (`scratch`) carries
//! the actual state machine and sampling logic; the remaining modules are DOM
//! wiring around it and degrade to no-ops when their markup is absent.

use wasm_bindgen::prelude::*;

pub mod balloons;
pub mod confetti;
pub mod countdown;
pub mod effects;
pub mod gate;
pub mod page;
pub mod rand;
pub mod scratch;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Celebration date & reveal image pool
// -----------------------------------------------------------------------------

/// Celebration month, 1-12.
pub const CELEBRATION_MONTH: u32 = 1;
/// Celebration day of month.
pub const CELEBRATION_DAY: u32 = 31;

/// Candidate images hidden behind the scratch card: (src, caption).
/// Which one shows is picked by the page wiring at mount and on each reset;
/// the scratch engine itself never reads this table.
pub const REVEAL_IMAGES: &[(&str, &str)] = &[
    ("assets/reveal/golden-hour-lake.jpg", "That golden evening at the lake"),
    ("assets/reveal/first-trip.jpg", "Our very first trip together"),
    ("assets/reveal/cake-round-one.jpg", "Last year's cake, round two soon"),
    ("assets/reveal/silly-faces.jpg", "The out-take we promised to delete"),
    ("assets/reveal/confetti-kiss.jpg", "Confetti everywhere, worth it"),
];

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_experience() -> Result<(), JsValue> {
    start_with_config(scratch::ScratchConfig::default())
}

/// Entrypoint variant letting the host page tune the scratch engine with a
/// JSON object (e.g. `{"reveal_threshold": 50.0}`).
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_experience_with_config(config_json: &str) -> Result<(), JsValue> {
    let config = scratch::ScratchConfig::from_json(config_json)
        .map_err(|e| JsValue::from_str(&format!("bad scratch config: {e}")))?;
    start_with_config(config)
}

fn start_with_config(config: scratch::ScratchConfig) -> Result<(), JsValue> {
    gate::mount_gift_gate()?;
    page::mount_page()?;
    countdown::mount_countdown()?;
    scratch::canvas::mount_scratch_card(config)?;
    balloons::mount_balloon_game()?;
    effects::mount_pointer_trails()?;
    confetti::mount_hover_burst()?;
    Ok(())
}

pub(crate) fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
