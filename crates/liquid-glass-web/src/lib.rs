#![forbid(unsafe_code)]

//! Browser host for the liquid glass editor.
//!
//! Wires DOM listeners to the deterministic controllers in `liquid-glass-core`:
//! pointer input to the drag controller, form controls to the parameter
//! bindings, the export button to the packager. DOM access lives in the
//! `wasm32`-only `wasm` module; [`plan`] is shared and testable natively.

pub mod plan;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::GlassEditor;

pub use plan::{DomTarget, DomWrite, plan_effect};
