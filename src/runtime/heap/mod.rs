pub mod arena;
pub mod dump;
pub mod entry;
pub mod handle;
#[cfg(feature = "heap-telemetry")]
pub mod telemetry;

pub use arena::Heap;
pub use dump::HeapDump;
pub use handle::ClosureRef;
