//! Heap telemetry.
//!
//! Gated behind `#[cfg(feature = "heap-telemetry")]`. When the feature is
//! disabled this module is not compiled and all instrumentation compiles
//! to nothing.

use std::fmt;
use std::time::Duration;

use crate::runtime::closure::Closure;

/// Classification of closure variants for telemetry bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClosureKind {
    Data = 0,
    Int = 1,
    Thunk = 2,
    Function = 3,
    Indirection = 4,
    Array = 5,
}

impl ClosureKind {
    pub fn of(closure: &Closure) -> Self {
        match closure {
            Closure::Data { .. } => ClosureKind::Data,
            Closure::Int(_) => ClosureKind::Int,
            Closure::Thunk { .. } => ClosureKind::Thunk,
            Closure::Function { .. } => ClosureKind::Function,
            Closure::Indirection(_) => ClosureKind::Indirection,
            Closure::Array(_) => ClosureKind::Array,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ClosureKind::Data => "Data",
            ClosureKind::Int => "Int",
            ClosureKind::Thunk => "Thunk",
            ClosureKind::Function => "Function",
            ClosureKind::Indirection => "Indirection",
            ClosureKind::Array => "Array",
        }
    }

    /// All variants for iteration.
    pub const ALL: [ClosureKind; 6] = [
        ClosureKind::Data,
        ClosureKind::Int,
        ClosureKind::Thunk,
        ClosureKind::Function,
        ClosureKind::Indirection,
        ClosureKind::Array,
    ];
}

impl fmt::Display for ClosureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metrics captured for a single collection cycle.
#[derive(Debug, Clone)]
pub struct CycleMetrics {
    pub cycle_index: usize,
    pub duration: Duration,
    pub live_before: usize,
    pub live_after: usize,
    pub collected: usize,
}

/// Cumulative heap telemetry: per-kind allocation counts and the history
/// of collection cycles.
#[derive(Debug, Default)]
pub struct Telemetry {
    alloc_counts: [usize; ClosureKind::ALL.len()],
    cycles: Vec<CycleMetrics>,
}

impl Telemetry {
    pub fn record_alloc(&mut self, kind: ClosureKind) {
        self.alloc_counts[kind as usize] += 1;
    }

    pub fn record_cycle(&mut self, metrics: CycleMetrics) {
        self.cycles.push(metrics);
    }

    pub fn alloc_count(&self, kind: ClosureKind) -> usize {
        self.alloc_counts[kind as usize]
    }

    pub fn cycles(&self) -> &[CycleMetrics] {
        &self.cycles
    }

    /// Renders a human-readable report.
    pub fn report(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "heap telemetry")?;
        writeln!(f, "  allocations by kind:")?;
        for kind in ClosureKind::ALL {
            writeln!(f, "    {:<12} {}", kind.label(), self.alloc_count(kind))?;
        }
        writeln!(f, "  collection cycles: {}", self.cycles.len())?;
        for cycle in &self.cycles {
            writeln!(
                f,
                "    #{}: live {} -> {}, collected {}, took {:?}",
                cycle.cycle_index,
                cycle.live_before,
                cycle.live_after,
                cycle.collected,
                cycle.duration
            )?;
        }
        Ok(())
    }
}
