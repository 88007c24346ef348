//! Heap core of the graph-reduction machine.
//!
//! # Total-Initialization Invariant
//! Every slot of a boxed array holds a valid closure reference at every
//! observable point after construction. There is no hole state:
//! construction fills all slots with one shared reference, `set` replaces a
//! slot in a single store, and region copies never leave a destination slot
//! between its old and new value.
//!
//! The invariant carries two consequences for the rest of the runtime:
//! - The collector may trace any live array at any time and find only valid
//!   references.
//! - Array length is fixed at construction; resizing is always allocate,
//!   then copy.
//!
//! Closure references are arena handles, not owning pointers. The heap owns
//! every closure; arrays, registers, and the engine's root set only borrow
//! reachability. This core provides no internal synchronization — callers
//! keep a single-writer discipline per heap (unsynchronized concurrent
//! mutation is undefined by contract).

pub mod array;
pub mod closure;
pub mod context;
pub mod error;
pub mod heap;
