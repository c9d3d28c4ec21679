//! SyncKit OT - Operational transformation core
//!
//! The conflict-resolution core of an OT engine for plain-text
//! collaborative editing, compiled to both native and WASM.
//! It implements:
//! - Insert/delete operations with deterministic identities
//! - `apply`: edit a text buffer by one operation with strict bounds
//! - `transform`: rebase two concurrent operations so every participant
//!   converges on the same document
//! - JSON wire format compatible with existing peers
//!
//! # Examples
//!
//! ```rust
//! use synckit_ot::{apply, transform, Operation, StateId};
//!
//! let base = "xy";
//! let state = StateId::of(base);
//! let client = Operation::insert(2, "A", state.clone());
//! let server = Operation::insert(2, "B", state);
//!
//! let (client2, server2) = transform(&client, &server);
//!
//! let on_client = apply(&apply(base, &client)?, &server2)?;
//! let on_server = apply(&apply(base, &server)?, &client2)?;
//! assert_eq!(on_client, "xyBA");
//! assert_eq!(on_client, on_server);
//! # Ok::<(), synckit_ot::OtError>(())
//! ```

pub mod error;
pub mod ot;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use error::{OtError, Result};
pub use ot::{
    apply, buffer_len, conflict, transform, Blake3Hasher, Conflict, ContentHasher, Operation,
    OperationId, OperationKind, StateId,
};

#[cfg(feature = "rope")]
pub use ot::apply_to_rope;
