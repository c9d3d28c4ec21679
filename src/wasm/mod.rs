//! WASM bindings for SyncKit OT
//!
//! This module provides JavaScript-friendly bindings for the OT core.

#[cfg(feature = "wasm")]
pub mod bindings;

// Re-export main types
#[cfg(feature = "wasm")]
pub use bindings::{
    apply_operation, init_panic_hook, state_of, transform_operations, WasmOperation,
};
