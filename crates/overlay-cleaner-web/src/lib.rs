#![forbid(unsafe_code)]

//! WASM content script for overlay-cleaner.
//!
//! This crate is host-specific (web/WASM). It binds the deterministic
//! [`overlay_cleaner_core::Session`] to the page:
//! - `web-sys` implementations of the page and canvas capabilities,
//! - `gloo` intervals, timeouts, animation frames and event listeners,
//! - the "Scroll to unlock" prompt and the celebration overlay,
//! - console-backed `tracing` output.
//!
//! The script starts itself through `#[wasm_bindgen(start)]`; the only other
//! export is `overlayCleanerStatus()` for in-page debugging.

pub mod markup;

#[cfg(target_arch = "wasm32")]
mod celebration;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod prompt_overlay;
#[cfg(target_arch = "wasm32")]
mod runtime;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{start, status};

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
pub fn status() -> Option<String> {
    None
}
