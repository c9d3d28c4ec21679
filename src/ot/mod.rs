//! Operational transformation for plain text
//!
//! This module contains the three pieces every OT exchange is built from:
//!
//! - **Operations:** single-range inserts and deletes, tagged with the state
//!   they were authored against and a deterministic identity
//! - **Apply:** edit a buffer by one operation, rejecting anything out of bounds
//! - **Transform:** rebase two concurrent operations so both application
//!   orders reach the same text
//!
//! Deciding *when* to transform (acknowledgments, buffering, history) is the
//! job of the sync layer that calls into this module.
//!
//! # References
//!
//! - "Concurrency Control in Groupware Systems" by Ellis and Gibbs (dOPT, TP1)
//! - "Operational Transformation in Real-Time Group Editors" by Sun and Ellis

pub mod apply;
pub mod fingerprint;
pub mod operation;
pub mod transform;

#[cfg(feature = "rope")]
pub use apply::apply_to_rope;
pub use apply::{apply, buffer_len};
pub use fingerprint::{Blake3Hasher, ContentHasher};
pub use operation::{
    DeleteOperation, InsertOperation, Operation, OperationId, OperationKind, StateId,
};
pub use transform::{conflict, transform, Conflict};
