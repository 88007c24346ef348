/// Handle into the runtime heap.
///
/// A `ClosureRef` is a lightweight, copyable slot index referring to a
/// heap-allocated closure owned by the collector arena. Every
/// closure-to-closure reference in the runtime — array slots, constructor
/// fields, thunk environments, machine registers — is one of these; holding
/// a `ClosureRef` never confers ownership of the closure behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClosureRef(pub(crate) u32);

impl ClosureRef {
    /// Returns the raw heap slot index backing this handle.
    pub fn index(self) -> u32 {
        self.0
    }

    #[cfg(test)]
    pub fn new_for_test(index: u32) -> Self {
        Self(index)
    }
}
