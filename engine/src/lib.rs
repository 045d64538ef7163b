//! Client-side logic core for the amp preset editor, compiled to WebAssembly.
//!
//! The UI layer stays thin: it forwards pointer/form events here and renders
//! whatever comes back.  All knob geometry, form reconciliation, and list
//! filtering lives on this side of the boundary so it can be tested natively.

#[macro_use]
extern crate log;

use wasm_bindgen::prelude::*;

pub mod filter;
pub mod knob;
pub mod preset_form;

static mut IS_INITIALIZED: bool = false;

/// Entrypoint called from the JS side as soon as the Wasm blob is loaded.
/// Sets up panic reporting and logging; subsequent calls are no-ops.
#[wasm_bindgen]
pub fn init() {
  if unsafe { IS_INITIALIZED } {
    return;
  }
  unsafe { IS_INITIALIZED = true };

  console_error_panic_hook::set_once();

  let log_level = if cfg!(debug_assertions) {
    log::Level::Trace
  } else {
    log::Level::Info
  };
  wasm_logger::init(wasm_logger::Config::new(log_level));
}
