//! Transform: rebase two concurrent operations against each other
//!
//! Given a client operation and a server operation authored against the same
//! state, [`transform`] returns `(client', server')` such that
//!
//! ```text
//! apply(apply(b, client), server') == apply(apply(b, server), client')
//! ```
//!
//! The rebase is purely positional. The operation at the lower position is
//! left alone and the other one slides by the first one's length change. At
//! equal positions the server operation wins and the client one slides.
//!
//! Ranges are never clipped or merged. Pairs where a delete swallows the
//! other operation's position fall outside the convergent domain; use
//! [`conflict`] to detect them.
//!
//! # Example
//!
//! ```rust
//! use synckit_ot::{apply, transform, Operation, StateId};
//!
//! let base = "hello";
//! let state = StateId::of(base);
//! let client = Operation::insert(5, "!", state.clone());
//! let server = Operation::delete(0, 1, state);
//!
//! let (client2, server2) = transform(&client, &server);
//!
//! let left = apply(&apply(base, &client).unwrap(), &server2).unwrap();
//! let right = apply(&apply(base, &server).unwrap(), &client2).unwrap();
//! assert_eq!(left, "ello!");
//! assert_eq!(left, right);
//! ```

use super::operation::{to_offset, Operation};
use std::cmp::Ordering;

/// Why a pair of operations cannot be rebased positionally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conflict {
    /// The client deletes a range that starts before the server position and
    /// reaches past it
    ClientDeleteOverlaps,

    /// The server deletes a non-empty range that starts at or before the
    /// client position and reaches past it
    ServerDeleteOverlaps,
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Conflict::ClientDeleteOverlaps => {
                write!(f, "client delete overlaps server operation")
            }
            Conflict::ServerDeleteOverlaps => {
                write!(f, "server delete overlaps client operation")
            }
        }
    }
}

/// True if `position` lies strictly inside the range deleted by `op`, or at
/// its start when `inclusive_start` is set
fn deletes_across(op: &Operation, position: i64, inclusive_start: bool) -> bool {
    let Some(delete) = op.as_delete() else {
        return false;
    };
    if delete.num() == 0 {
        return false;
    }

    let start = delete.position();
    let end = start.saturating_add(to_offset(delete.num()));
    let after_start = if inclusive_start {
        position >= start
    } else {
        position > start
    };
    after_start && position < end
}

/// Detect pairs whose positional rebase would not converge
///
/// Returns `None` when [`transform`] is guaranteed to produce a convergent,
/// in-bounds pair for any buffer both inputs are valid on.
pub fn conflict(client: &Operation, server: &Operation) -> Option<Conflict> {
    let (c, s) = (client.position(), server.position());

    match c.cmp(&s) {
        Ordering::Equal if deletes_across(server, c, true) => {
            Some(Conflict::ServerDeleteOverlaps)
        }
        Ordering::Less if deletes_across(client, s, false) => {
            Some(Conflict::ClientDeleteOverlaps)
        }
        Ordering::Greater if deletes_across(server, c, false) => {
            Some(Conflict::ServerDeleteOverlaps)
        }
        _ => None,
    }
}

/// Rebase a pair of concurrent operations
///
/// Both inputs must be authored against the same state; this is not checked.
/// Inputs are borrowed and never modified. Rebased operations keep their
/// original state and identity.
pub fn transform(client: &Operation, server: &Operation) -> (Operation, Operation) {
    if let Some(conflict) = conflict(client, server) {
        tracing::warn!(
            client = %client.identity(),
            server = %server.identity(),
            %conflict,
            "rebasing overlapping operations; result may not converge"
        );
    }

    // Equality first: ties always go to the server
    match client.position().cmp(&server.position()) {
        Ordering::Equal => {
            tracing::trace!(position = client.position(), "tie, server keeps position");
            (client.shifted(server.adjustment()), server.clone())
        }
        Ordering::Less => {
            tracing::trace!(
                client = client.position(),
                server = server.position(),
                "client first, shifting server"
            );
            (client.clone(), server.shifted(client.adjustment()))
        }
        Ordering::Greater => {
            tracing::trace!(
                client = client.position(),
                server = server.position(),
                "server first, shifting client"
            );
            (client.shifted(server.adjustment()), server.clone())
        }
    }
}
