//! Operation model: single-range inserts and deletes
//!
//! Every operation records the state it was authored against and an identity
//! derived from its kind, parameters and that state. The identity strings use
//! the same layout existing peers produce:
//!
//! ```text
//! del:<position>,<num>@<state>
//! ins:<position>,<fingerprint(text)>@<state>
//! ```
//!
//! Positions and lengths count UTF-16 code units, matching JavaScript peers.
//! They are signed so a rebased operation that slid below zero is still
//! representable; `apply` rejects it instead of clamping.
//!
//! # Example
//!
//! ```rust
//! use synckit_ot::{Operation, StateId};
//!
//! let state = StateId::of("hello");
//! let op = Operation::delete(1, 3, state.clone());
//!
//! assert_eq!(op.identity().as_str(), format!("del:1,3@{}", state));
//! assert_eq!(op.adjustment(), -3);
//! ```

use super::fingerprint::{Blake3Hasher, ContentHasher};
use crate::error::{OtError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of the document version an operation was authored against
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(String);

impl StateId {
    /// Wrap an externally produced causal token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// State token for a buffer: the blake3 fingerprint of its contents
    pub fn of(text: &str) -> Self {
        Self(Blake3Hasher.fingerprint(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateId {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for StateId {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Deterministic identity of an operation (serialized as `hash`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(String);

impl OperationId {
    fn for_insert(position: i64, fingerprint: &str, state: &StateId) -> Self {
        Self(format!("ins:{},{}@{}", position, fingerprint, state))
    }

    fn for_delete(position: i64, num: usize, state: &StateId) -> Self {
        Self(format!("del:{},{}@{}", position, num, state))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminant of an [`Operation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Insert,
    Delete,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Insert => f.write_str("InsertOperation"),
            OperationKind::Delete => f.write_str("DeleteOperation"),
        }
    }
}

/// Splice `text` into the buffer at `position`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InsertOperation {
    position: i64,
    text: String,
    state: StateId,
    #[serde(rename = "hash")]
    identity: OperationId,
}

impl InsertOperation {
    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the payload in UTF-16 code units
    pub fn utf16_len(&self) -> usize {
        self.text.encode_utf16().count()
    }
}

/// Remove `num` code units starting at `position`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeleteOperation {
    position: i64,
    num: usize,
    state: StateId,
    #[serde(rename = "hash")]
    identity: OperationId,
}

impl DeleteOperation {
    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn num(&self) -> usize {
        self.num
    }
}

/// A single text edit
///
/// Immutable once constructed: fields are only reachable through accessors,
/// and rebasing produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Operation {
    #[serde(rename = "InsertOperation")]
    Insert(InsertOperation),
    #[serde(rename = "DeleteOperation")]
    Delete(DeleteOperation),
}

impl Operation {
    /// Create an insert, fingerprinting `text` with the default blake3 hasher
    ///
    /// # Example
    ///
    /// ```rust
    /// use synckit_ot::{apply, Operation, StateId};
    ///
    /// let op = Operation::insert(0, "X", StateId::of("hello"));
    /// assert_eq!(apply("hello", &op).unwrap(), "Xhello");
    /// ```
    pub fn insert(position: i64, text: impl Into<String>, state: StateId) -> Self {
        Self::insert_with(&Blake3Hasher, position, text, state)
    }

    /// Create an insert using a caller-supplied content hasher
    pub fn insert_with<H: ContentHasher + ?Sized>(
        hasher: &H,
        position: i64,
        text: impl Into<String>,
        state: StateId,
    ) -> Self {
        let text = text.into();
        let identity = OperationId::for_insert(position, &hasher.fingerprint(&text), &state);
        Operation::Insert(InsertOperation {
            position,
            text,
            state,
            identity,
        })
    }

    /// Create a delete of `num` UTF-16 code units starting at `position`
    pub fn delete(position: i64, num: usize, state: StateId) -> Self {
        let identity = OperationId::for_delete(position, num, &state);
        Operation::Delete(DeleteOperation {
            position,
            num,
            state,
            identity,
        })
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Insert(_) => OperationKind::Insert,
            Operation::Delete(_) => OperationKind::Delete,
        }
    }

    pub fn position(&self) -> i64 {
        match self {
            Operation::Insert(op) => op.position,
            Operation::Delete(op) => op.position,
        }
    }

    /// State this operation was authored against
    pub fn state(&self) -> &StateId {
        match self {
            Operation::Insert(op) => &op.state,
            Operation::Delete(op) => &op.state,
        }
    }

    pub fn identity(&self) -> &OperationId {
        match self {
            Operation::Insert(op) => &op.identity,
            Operation::Delete(op) => &op.identity,
        }
    }

    pub fn as_insert(&self) -> Option<&InsertOperation> {
        match self {
            Operation::Insert(op) => Some(op),
            Operation::Delete(_) => None,
        }
    }

    pub fn as_delete(&self) -> Option<&DeleteOperation> {
        match self {
            Operation::Delete(op) => Some(op),
            Operation::Insert(_) => None,
        }
    }

    /// Net change in buffer length this operation produces
    pub fn adjustment(&self) -> i64 {
        match self {
            Operation::Insert(op) => to_offset(op.utf16_len()),
            Operation::Delete(op) => -to_offset(op.num),
        }
    }

    /// Copy with `position` moved by `delta`; state and identity are kept as-is.
    ///
    /// Saturates at the `i64` limits, which no buffer can reach, so a
    /// saturated position is still rejected by `apply`.
    pub(crate) fn shifted(&self, delta: i64) -> Self {
        let mut shifted = self.clone();
        match &mut shifted {
            Operation::Insert(op) => op.position = op.position.saturating_add(delta),
            Operation::Delete(op) => op.position = op.position.saturating_add(delta),
        }
        shifted
    }

    /// Recompute the identity and compare it with the stored one.
    ///
    /// Catches operations corrupted in transit or replayed against the wrong
    /// base. Rebased operations keep their original identity, so only call
    /// this on operations as their author created them.
    pub fn verify_identity<H: ContentHasher + ?Sized>(&self, hasher: &H) -> Result<()> {
        let expected = match self {
            Operation::Insert(op) => {
                OperationId::for_insert(op.position, &hasher.fingerprint(&op.text), &op.state)
            }
            Operation::Delete(op) => OperationId::for_delete(op.position, op.num, &op.state),
        };

        if &expected != self.identity() {
            return Err(OtError::InvariantViolation(format!(
                "identity mismatch: expected {}, found {}",
                expected,
                self.identity()
            )));
        }
        Ok(())
    }

    /// Encode in the JSON wire format
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| OtError::InvariantViolation(format!("unencodable operation: {}", e)))
    }

    /// Decode from the JSON wire format
    ///
    /// Unknown kinds and missing fields are malformed operations and map to
    /// [`OtError::InvariantViolation`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| OtError::InvariantViolation(format!("malformed operation: {}", e)))
    }
}

/// Convert a code-unit count to a signed offset
pub(crate) fn to_offset(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}
