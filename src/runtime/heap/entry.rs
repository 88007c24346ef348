use crate::runtime::closure::Closure;

pub(super) struct HeapEntry {
    pub(super) closure: Closure,
    pub(super) marked: bool,
}
