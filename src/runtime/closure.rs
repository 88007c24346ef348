//! Uniform heap values.

use crate::runtime::{array::BoxedArray, heap::ClosureRef};

/// Identifier of a compiled code block.
///
/// Code blocks are owned by the evaluation engine; the heap stores and
/// compares these but never interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeId(pub u32);

/// A heap-resident value of the reduction machine.
///
/// Every value the machine manipulates — evaluated data, suspended
/// computations, functions, arrays — is one closed set of variants, so
/// every dispatch site handles every kind exhaustively. References between
/// closures are [`ClosureRef`] handles into the owning heap.
#[derive(Debug, Clone, PartialEq)]
pub enum Closure {
    /// Saturated data-constructor application.
    Data { tag: u32, fields: Vec<ClosureRef> },
    /// Machine integer lifted onto the heap.
    Int(i64),
    /// Suspended computation awaiting its first entry.
    Thunk { code: CodeId, env: Vec<ClosureRef> },
    /// Function value, possibly with some arguments already applied.
    Function {
        code: CodeId,
        arity: u8,
        applied: Vec<ClosureRef>,
    },
    /// Forwarding reference left behind when a thunk is overwritten with
    /// its result.
    Indirection(ClosureRef),
    /// Fixed-length mutable array of closure references.
    Array(BoxedArray),
}

impl Closure {
    /// Returns the stable kind label used in messages and heap dumps.
    pub fn kind(&self) -> &'static str {
        match self {
            Closure::Data { .. } => "Data",
            Closure::Int(_) => "Int",
            Closure::Thunk { .. } => "Thunk",
            Closure::Function { .. } => "Function",
            Closure::Indirection(_) => "Indirection",
            Closure::Array(_) => "Array",
        }
    }

    /// Returns whether this closure is already in weak-head-normal form.
    ///
    /// Indirections answer `false` even when their target is a value; the
    /// caller resolves the chain first.
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            Closure::Data { .. } | Closure::Int(_) | Closure::Function { .. } | Closure::Array(_)
        )
    }
}

/// Outcome of entering a closure.
#[derive(Debug, Clone, PartialEq)]
pub enum Entered {
    /// The closure is already a value; control returns to the continuation
    /// with this reference.
    Value(ClosureRef),
    /// The closure suspends code the evaluation engine must now run with
    /// the captured environment.
    Run { code: CodeId, env: Vec<ClosureRef> },
}
