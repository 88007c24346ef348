use crate::runtime::{
    array::BoxedArray,
    closure::{Closure, Entered},
    context::ExecContext,
    error::{Fatal, OutOfBounds},
    heap::{entry::HeapEntry, handle::ClosureRef},
};

#[cfg(feature = "heap-telemetry")]
use crate::runtime::heap::telemetry::{ClosureKind, CycleMetrics, Telemetry};

const DEFAULT_GC_THRESHOLD: usize = 10_000;
const MIN_GC_THRESHOLD: usize = 1024;

/// Collector arena owning every closure of the machine.
///
/// Closures live in slots addressed by [`ClosureRef`] handles; freed slots
/// are recycled through a free list. Collection is stop-the-world
/// mark-and-sweep from a caller-supplied root set: the engine passes its
/// registers, stacks, and globals, and marking traces every reference a
/// closure holds — constructor fields, thunk environments, applied
/// arguments, indirection targets, and every slot of a boxed array.
pub struct Heap {
    entries: Vec<Option<HeapEntry>>,
    free_list: Vec<u32>,
    allocation_count: usize,
    gc_threshold: usize,
    gc_enabled: bool,
    total_collections: usize,
    total_allocations: usize,
    #[cfg(feature = "heap-telemetry")]
    telemetry: Telemetry,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    /// Creates a new heap with default collection settings.
    ///
    /// Defaults:
    /// - threshold: `10_000` allocations
    /// - GC enabled: `true`
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_list: Vec::new(),
            allocation_count: 0,
            gc_threshold: DEFAULT_GC_THRESHOLD,
            gc_enabled: true,
            total_collections: 0,
            total_allocations: 0,
            #[cfg(feature = "heap-telemetry")]
            telemetry: Telemetry::default(),
        }
    }

    /// Creates a new heap with a custom collection threshold.
    ///
    /// Unlike [`Self::set_threshold`], this does not clamp to the minimum.
    pub fn with_threshold(threshold: usize) -> Self {
        let mut heap = Self::new();
        heap.gc_threshold = threshold;
        heap
    }

    /// Enables or disables automatic collection checks.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.gc_enabled = enabled
    }

    /// Sets the allocation threshold that triggers collection.
    ///
    /// Values below the internal minimum are clamped upward.
    pub fn set_threshold(&mut self, threshold: usize) {
        self.gc_threshold = threshold.max(MIN_GC_THRESHOLD)
    }

    /// Returns `true` when GC is enabled and the threshold was reached.
    pub fn should_collect(&self) -> bool {
        self.gc_enabled && self.allocation_count >= self.gc_threshold
    }

    /// Allocates a closure and returns a stable handle to it.
    ///
    /// Freed slots are reused through the free list before growing the
    /// slot vector.
    pub fn alloc(&mut self, closure: Closure) -> ClosureRef {
        #[cfg(feature = "heap-telemetry")]
        self.telemetry.record_alloc(ClosureKind::of(&closure));

        self.allocation_count += 1;
        self.total_allocations += 1;

        let entry = HeapEntry {
            closure,
            marked: false,
        };

        if let Some(idx) = self.free_list.pop() {
            self.entries[idx as usize] = Some(entry);
            ClosureRef(idx)
        } else {
            let idx = self.entries.len() as u32;
            self.entries.push(Some(entry));
            ClosureRef(idx)
        }
    }

    /// Returns an immutable reference to a live closure by handle.
    ///
    /// Panics if the handle points to a free slot or is out of range;
    /// handle validity is the collector's invariant, not a recoverable
    /// condition.
    pub fn get(&self, handle: ClosureRef) -> &Closure {
        &self.entries[handle.0 as usize]
            .as_ref()
            .expect("Heap::get: invalid or free handle")
            .closure
    }

    /// Returns a mutable reference to a live closure by handle.
    ///
    /// Panics under the same conditions as [`Self::get`].
    pub fn get_mut(&mut self, handle: ClosureRef) -> &mut Closure {
        &mut self.entries[handle.0 as usize]
            .as_mut()
            .expect("Heap::get_mut: invalid or free handle")
            .closure
    }

    /// Follows indirection chains to the closure they forward to.
    pub fn resolve(&self, target: ClosureRef) -> ClosureRef {
        let mut current = target;
        while let Closure::Indirection(next) = self.get(current) {
            current = *next;
        }
        current
    }

    /// Overwrites `target` with a forwarding reference to `result`.
    ///
    /// This is the update step of thunk evaluation: after the engine runs a
    /// thunk's code, the thunk is replaced so every later entry sees the
    /// result directly.
    pub fn update(&mut self, target: ClosureRef, result: ClosureRef) {
        *self.get_mut(target) = Closure::Indirection(result);
    }

    /// Enters the closure behind `target`, dispatching on its kind.
    ///
    /// Value closures return their own (indirection-resolved) handle;
    /// thunks hand their code and environment back to the engine.
    /// Entering an array is a runtime-invariant violation — something
    /// tried to evaluate a data structure — and fails with a [`Fatal`]
    /// the engine must not recover from.
    pub fn enter(&self, target: ClosureRef, ctx: &mut ExecContext) -> Result<Entered, Fatal> {
        let mut current = target;
        loop {
            match self.get(current) {
                Closure::Indirection(next) => current = *next,
                Closure::Array(arr) => return Err(Fatal::ArrayEntered { len: arr.len() }),
                Closure::Thunk { code, env } => {
                    ctx.record_entry(current);
                    return Ok(Entered::Run {
                        code: *code,
                        env: env.clone(),
                    });
                }
                Closure::Data { .. } | Closure::Int(_) | Closure::Function { .. } => {
                    ctx.record_entry(current);
                    return Ok(Entered::Value(current));
                }
            }
        }
    }

    /// Allocates a boxed array of `len` slots, every slot holding `init`.
    pub fn alloc_array(&mut self, len: usize, init: ClosureRef) -> ClosureRef {
        self.alloc(Closure::Array(BoxedArray::new(len, init)))
    }

    /// Returns the length of the array behind `arr`.
    pub fn array_len(&self, arr: ClosureRef) -> usize {
        self.array(arr).len()
    }

    /// Reads slot `index` of the array behind `arr`.
    pub fn array_get(&self, arr: ClosureRef, index: usize) -> Result<ClosureRef, OutOfBounds> {
        self.array(arr).get(index)
    }

    /// Writes slot `index` of the array behind `arr`.
    pub fn array_set(
        &mut self,
        arr: ClosureRef,
        index: usize,
        value: ClosureRef,
    ) -> Result<(), OutOfBounds> {
        self.array_mut(arr).set(index, value)
    }

    /// Copies `count` slots from `src` starting at `src_offset` into
    /// `dest` starting at `dest_offset`.
    ///
    /// `src` and `dest` may name the same array with overlapping regions;
    /// the result is always that of reading the whole source region before
    /// writing. `src` is otherwise unchanged.
    pub fn copy_array(
        &mut self,
        src: ClosureRef,
        src_offset: usize,
        dest: ClosureRef,
        dest_offset: usize,
        count: usize,
    ) -> Result<(), OutOfBounds> {
        let src = self.resolve(src);
        let dest = self.resolve(dest);
        if src == dest {
            return self.array_mut(dest).copy_within(src_offset, dest_offset, count);
        }
        // Distinct arrays: stage the source region so the shared borrow of
        // src ends before dest is borrowed mutably. Staging first also
        // reports a bad source range before dest is touched.
        let staged = self.array(src).clone_region(src_offset, count)?;
        self.array_mut(dest).copy_from(&staged, 0, dest_offset, count)
    }

    /// Allocates a new array holding the `count` references of `src`
    /// starting at `offset`. The clone is shallow: the new array shares
    /// the referenced closures, never copies them.
    pub fn clone_array(
        &mut self,
        src: ClosureRef,
        offset: usize,
        count: usize,
    ) -> Result<ClosureRef, OutOfBounds> {
        let cloned = self.array(src).clone_region(offset, count)?;
        Ok(self.alloc(Closure::Array(cloned)))
    }

    fn array(&self, handle: ClosureRef) -> &BoxedArray {
        match self.get(self.resolve(handle)) {
            Closure::Array(arr) => arr,
            other => panic!("Heap::array: expected array closure, got {}", other.kind()),
        }
    }

    fn array_mut(&mut self, handle: ClosureRef) -> &mut BoxedArray {
        let resolved = self.resolve(handle);
        match self.get_mut(resolved) {
            Closure::Array(arr) => arr,
            other => panic!(
                "Heap::array_mut: expected array closure, got {}",
                other.kind()
            ),
        }
    }

    /// Returns the number of currently live heap entries.
    pub fn live_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    /// Returns the total number of allocations performed by this heap.
    pub fn total_allocations(&self) -> usize {
        self.total_allocations
    }

    /// Returns the total number of completed collection cycles.
    pub fn total_collections(&self) -> usize {
        self.total_collections
    }

    #[cfg(feature = "heap-telemetry")]
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Runs a full stop-the-world mark-and-sweep collection.
    ///
    /// `roots` is the external reachability set: every register, stack
    /// slot, and global the engine still holds. Everything reachable from
    /// it — through constructor fields, thunk environments, indirections,
    /// and array slots — survives; everything else is swept.
    pub fn collect(&mut self, roots: &[ClosureRef]) {
        #[cfg(feature = "heap-telemetry")]
        let started = std::time::Instant::now();

        for &root in roots {
            self.mark(root);
        }

        let live_before = self.live_count();
        self.sweep();
        let live_after = self.live_count();
        let collected = live_before.saturating_sub(live_after);

        self.total_collections += 1;
        self.allocation_count = 0;

        self.adapt_threshold(collected, live_before);

        #[cfg(feature = "heap-telemetry")]
        self.telemetry.record_cycle(CycleMetrics {
            cycle_index: self.total_collections,
            duration: started.elapsed(),
            live_before,
            live_after,
            collected,
        });
    }

    fn mark(&mut self, root: ClosureRef) {
        let mut worklist: Vec<ClosureRef> = Vec::with_capacity(16);
        worklist.push(root);

        while let Some(handle) = worklist.pop() {
            let idx = handle.index() as usize;
            if idx >= self.entries.len() {
                continue;
            }

            // Mark first so cycles and shared closures are visited once.
            match self.entries[idx].as_mut() {
                Some(entry) => {
                    if entry.marked {
                        continue;
                    }
                    entry.marked = true;
                }
                None => continue,
            }

            // Then enqueue children after the mutable mark borrow ends.
            let closure = match self.entries[idx].as_ref() {
                Some(entry) => &entry.closure,
                None => continue,
            };

            match closure {
                Closure::Data { fields, .. } => worklist.extend(fields.iter().copied()),
                Closure::Thunk { env, .. } => worklist.extend(env.iter().copied()),
                Closure::Function { applied, .. } => worklist.extend(applied.iter().copied()),
                Closure::Indirection(next) => worklist.push(*next),
                Closure::Array(arr) => worklist.extend(arr.iter()),
                Closure::Int(_) => {}
            }
        }
    }

    fn sweep(&mut self) {
        for (idx, slot) in self.entries.iter_mut().enumerate() {
            if let Some(entry) = slot {
                if entry.marked {
                    entry.marked = false;
                } else {
                    *slot = None;
                    self.free_list.push(idx as u32);
                }
            }
        }
    }

    fn adapt_threshold(&mut self, collected: usize, total_before: usize) {
        if total_before == 0 {
            return;
        }

        let ratio = collected as f64 / total_before as f64;
        if ratio < 0.25 {
            self.gc_threshold = (self.gc_threshold * 2).min(1_000_000);
        } else if ratio > 0.75 {
            self.gc_threshold = (self.gc_threshold / 2).max(MIN_GC_THRESHOLD)
        }
    }

    pub(super) fn live_entries(&self) -> impl Iterator<Item = (u32, &Closure)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|entry| (idx as u32, &entry.closure)))
    }

    #[cfg(test)]
    fn free_slots(&self) -> usize {
        self.free_list.len()
    }
}
