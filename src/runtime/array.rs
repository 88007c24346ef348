//! Boxed arrays of closure references.

use crate::runtime::{error::OutOfBounds, heap::ClosureRef};

/// Fixed-length mutable sequence of closure references.
///
/// The array owns its slots, never the closures they reference; slots hold
/// copyable heap handles, and several arrays (or the same array in several
/// slots) may reference one closure simultaneously.
///
/// Construction fills every slot with one shared reference and the length
/// never changes afterwards, so every slot holds a valid reference at all
/// observable times. Mutation is a single-slot store (`set`) or an
/// overlap-safe region copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxedArray {
    slots: Vec<ClosureRef>,
}

impl BoxedArray {
    /// Creates an array of `len` slots, each holding `init`.
    ///
    /// All slots alias the same reference; no closures are duplicated.
    pub fn new(len: usize, init: ClosureRef) -> Self {
        Self {
            slots: vec![init; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the reference stored at `index`.
    pub fn get(&self, index: usize) -> Result<ClosureRef, OutOfBounds> {
        self.slots.get(index).copied().ok_or(OutOfBounds::Index {
            index,
            len: self.slots.len(),
        })
    }

    /// Replaces the reference stored at `index` in a single store.
    pub fn set(&mut self, index: usize, value: ClosureRef) -> Result<(), OutOfBounds> {
        let len = self.slots.len();
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(OutOfBounds::Index { index, len }),
        }
    }

    /// Copies `count` slots from `src` starting at `src_offset` into this
    /// array starting at `dest_offset`. `src` must be a different array;
    /// same-array copies go through [`BoxedArray::copy_within`].
    pub fn copy_from(
        &mut self,
        src: &BoxedArray,
        src_offset: usize,
        dest_offset: usize,
        count: usize,
    ) -> Result<(), OutOfBounds> {
        src.check_range(src_offset, count)?;
        self.check_range(dest_offset, count)?;
        self.slots[dest_offset..dest_offset + count]
            .copy_from_slice(&src.slots[src_offset..src_offset + count]);
        Ok(())
    }

    /// Copies `count` slots from `src_offset` to `dest_offset` within this
    /// array.
    ///
    /// The regions may overlap in either direction: every destination slot
    /// ends up holding the value the corresponding source slot held before
    /// the call, as if the whole source region were read first and written
    /// afterwards.
    pub fn copy_within(
        &mut self,
        src_offset: usize,
        dest_offset: usize,
        count: usize,
    ) -> Result<(), OutOfBounds> {
        self.check_range(src_offset, count)?;
        self.check_range(dest_offset, count)?;
        self.slots
            .copy_within(src_offset..src_offset + count, dest_offset);
        Ok(())
    }

    /// Returns a new array holding the `count` references starting at
    /// `offset`. The closures themselves are shared, not duplicated, and
    /// this array is unchanged.
    pub fn clone_region(&self, offset: usize, count: usize) -> Result<BoxedArray, OutOfBounds> {
        self.check_range(offset, count)?;
        Ok(BoxedArray {
            slots: self.slots[offset..offset + count].to_vec(),
        })
    }

    /// Exposes the slot buffer, so the collector can enumerate every
    /// reference this array keeps alive.
    pub fn slots(&self) -> &[ClosureRef] {
        &self.slots
    }

    /// Iterates over the stored references.
    pub fn iter(&self) -> impl Iterator<Item = ClosureRef> + '_ {
        self.slots.iter().copied()
    }

    fn check_range(&self, offset: usize, count: usize) -> Result<(), OutOfBounds> {
        // checked_add keeps a huge offset from wrapping past the bound.
        match offset.checked_add(count) {
            Some(end) if end <= self.slots.len() => Ok(()),
            _ => Err(OutOfBounds::Range {
                offset,
                count,
                len: self.slots.len(),
            }),
        }
    }
}
