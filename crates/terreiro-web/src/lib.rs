#![forbid(unsafe_code)]

//! WASM front end for the Terreiro page.
//!
//! On `wasm32` this crate exports a `wasm-bindgen` API:
//! - `TerreiroPage.mount()` wires the current document and returns a handle
//!   with `copyPixKey`, `showSpiritualMessage`, `openFeedback`, `destroy`,
//! - free helpers `log`, `validateForm`, `formatPhone`.
//!
//! Config, timestamp, and console formatting live in target-independent
//! modules so they test natively.

pub mod bridge;
pub mod console;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{TerreiroPage, format_phone, log, validate_form};

pub use bridge::WebError;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct TerreiroPage;

#[cfg(not(target_arch = "wasm32"))]
impl TerreiroPage {
    /// There is no document to mount on outside the browser.
    pub fn mount() -> Result<Self, WebError> {
        Err(WebError::NoWindow)
    }
}

/// Same as the exported `formatPhone`.
#[cfg(not(target_arch = "wasm32"))]
#[must_use]
pub fn format_phone(phone: &str) -> String {
    terreiro_core::utils::format_phone(phone)
}
