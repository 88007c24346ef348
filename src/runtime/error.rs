//! Error types for the heap core.

use std::fmt;

/// Index or range outside an array's bounds.
///
/// Raised by every boxed-array entry point. An invalid index indicates a
/// code-generation bug upstream, so it is reported immediately — never
/// clamped or wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfBounds {
    /// A single-slot access outside `[0, len)`.
    Index { index: usize, len: usize },
    /// A region `[offset, offset + count)` extending past `len`.
    Range {
        offset: usize,
        count: usize,
        len: usize,
    },
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutOfBounds::Index { index, len } => {
                write!(f, "array index out of bounds: index {}, length {}", index, len)
            }
            OutOfBounds::Range { offset, count, len } => {
                write!(
                    f,
                    "array range out of bounds: offset {}, count {}, length {}",
                    offset, count, len
                )
            }
        }
    }
}

impl std::error::Error for OutOfBounds {}

/// Unrecoverable runtime-invariant violation.
///
/// Nothing in this crate recovers from a `Fatal`; the evaluation engine is
/// expected to abort the current execution path and report the message. It
/// is a distinct type from [`OutOfBounds`] so the two classes cannot be
/// confused at a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fatal {
    /// The entry protocol was invoked on an array object.
    ArrayEntered { len: usize },
}

impl fmt::Display for Fatal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fatal::ArrayEntered { len } => {
                write!(f, "array object entered (length {})", len)
            }
        }
    }
}

impl std::error::Error for Fatal {}
