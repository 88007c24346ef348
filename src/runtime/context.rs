//! Per-thread execution context.

use crate::runtime::heap::ClosureRef;

/// Execution context threaded through every closure entry.
///
/// The evaluation engine owns one context per machine thread. The heap core
/// only records the node register (the closure currently being entered) and
/// an entry count; scheduling, stacks, and registers beyond that belong to
/// the engine.
#[derive(Debug, Default)]
pub struct ExecContext {
    node: Option<ClosureRef>,
    entries: u64,
}

impl ExecContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the closure most recently entered on this context, if any.
    pub fn node(&self) -> Option<ClosureRef> {
        self.node
    }

    /// Returns the number of entries performed on this context.
    pub fn entry_count(&self) -> u64 {
        self.entries
    }

    pub(crate) fn record_entry(&mut self, target: ClosureRef) {
        self.node = Some(target);
        self.entries += 1;
    }
}
