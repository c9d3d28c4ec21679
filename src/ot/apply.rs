//! Apply: mutate a text buffer by one operation
//!
//! Positions count UTF-16 code units, the unit JavaScript peers index strings
//! by. An offset that falls between the two halves of a surrogate pair is out
//! of bounds. Bounds are checked before anything is built, so a rejected
//! operation never produces a partially edited buffer.

use super::operation::Operation;
use crate::error::{OtError, Result};

#[cfg(feature = "rope")]
use ropey::Rope;

fn out_of_bounds(op: &Operation, length: usize) -> OtError {
    let (position, num) = match op {
        Operation::Insert(insert) => (insert.position(), 0),
        Operation::Delete(delete) => (delete.position(), delete.num()),
    };
    tracing::debug!(
        kind = %op.kind(),
        position,
        num,
        length,
        "rejecting out-of-bounds operation"
    );
    OtError::OutOfBounds {
        position,
        num,
        length,
    }
}

/// Code-unit range an operation touches, validated against a buffer of
/// `length` units
fn checked_range(op: &Operation, length: usize) -> Result<(usize, usize)> {
    let (position, num) = match op {
        Operation::Insert(insert) => (insert.position(), 0),
        Operation::Delete(delete) => (delete.position(), delete.num()),
    };

    let start = usize::try_from(position).map_err(|_| out_of_bounds(op, length))?;
    let end = start
        .checked_add(num)
        .ok_or_else(|| out_of_bounds(op, length))?;
    if end > length {
        return Err(out_of_bounds(op, length));
    }
    Ok((start, end))
}

/// Byte offset of UTF-16 offset `unit_pos`, or `None` inside a surrogate pair
fn byte_offset(buffer: &str, unit_pos: usize) -> Option<usize> {
    let mut units = 0;
    for (idx, ch) in buffer.char_indices() {
        if units == unit_pos {
            return Some(idx);
        }
        units += ch.len_utf16();
        if units > unit_pos {
            return None;
        }
    }
    (units == unit_pos).then_some(buffer.len())
}

/// Length of `buffer` in UTF-16 code units, the unit positions use
pub fn buffer_len(buffer: &str) -> usize {
    buffer.encode_utf16().count()
}

/// Apply `op` to `buffer`, returning the edited text
///
/// # Errors
///
/// Returns [`OtError::OutOfBounds`] if an insert position lies outside
/// `[0, len]`, a delete range `[position, position + num)` does not fit, or
/// either end splits a surrogate pair.
///
/// # Example
///
/// ```rust
/// use synckit_ot::{apply, Operation, StateId};
///
/// let state = StateId::of("hello");
/// assert_eq!(apply("hello", &Operation::insert(5, "!", state.clone())).unwrap(), "hello!");
/// assert_eq!(apply("hello", &Operation::delete(1, 3, state.clone())).unwrap(), "ho");
/// assert!(apply("hello", &Operation::delete(4, 2, state)).is_err());
/// ```
pub fn apply(buffer: &str, op: &Operation) -> Result<String> {
    let length = buffer_len(buffer);
    let (start, end) = checked_range(op, length)?;
    let start_byte = byte_offset(buffer, start).ok_or_else(|| out_of_bounds(op, length))?;

    match op {
        Operation::Insert(insert) => {
            let mut out = String::with_capacity(buffer.len() + insert.text().len());
            out.push_str(&buffer[..start_byte]);
            out.push_str(insert.text());
            out.push_str(&buffer[start_byte..]);
            Ok(out)
        }
        Operation::Delete(_) => {
            let end_byte = byte_offset(buffer, end).ok_or_else(|| out_of_bounds(op, length))?;
            let mut out = String::with_capacity(buffer.len() - (end_byte - start_byte));
            out.push_str(&buffer[..start_byte]);
            out.push_str(&buffer[end_byte..]);
            Ok(out)
        }
    }
}

/// Apply `op` to a rope in place
///
/// Same bounds as [`apply`]; a rejected operation leaves the rope untouched.
#[cfg(feature = "rope")]
pub fn apply_to_rope(rope: &mut Rope, op: &Operation) -> Result<()> {
    let length = rope.len_utf16_cu();
    let (start, end) = checked_range(op, length)?;

    let to_char = |unit: usize| {
        let ch = rope.utf16_cu_to_char(unit);
        if rope.char_to_utf16_cu(ch) == unit {
            Ok(ch)
        } else {
            Err(out_of_bounds(op, length))
        }
    };
    let start_char = to_char(start)?;
    let end_char = to_char(end)?;

    match op {
        Operation::Insert(insert) => rope.insert(start_char, insert.text()),
        Operation::Delete(_) => rope.remove(start_char..end_char),
    }
    Ok(())
}
