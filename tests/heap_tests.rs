use reduct::runtime::{closure::Closure, heap::Heap};

#[test]
fn collection_keeps_everything_an_array_root_references() {
    let mut heap = Heap::new();
    let a = heap.alloc(Closure::Int(1));
    let b = heap.alloc(Closure::Int(2));
    let arr = heap.alloc_array(3, a);
    heap.array_set(arr, 2, b).unwrap();

    for i in 0..20 {
        heap.alloc(Closure::Int(100 + i)); // garbage
    }

    heap.collect(&[arr]);
    assert_eq!(heap.live_count(), 3);
    assert_eq!(heap.array_get(arr, 0).unwrap(), a);
    assert_eq!(heap.array_get(arr, 2).unwrap(), b);
    assert_eq!(*heap.get(a), Closure::Int(1));
    assert_eq!(*heap.get(b), Closure::Int(2));
}

#[test]
fn a_clone_keeps_its_contents_alive_without_the_source() {
    let mut heap = Heap::new();
    let a = heap.alloc(Closure::Int(1));
    let b = heap.alloc(Closure::Int(2));
    let src = heap.alloc_array(2, a);
    heap.array_set(src, 1, b).unwrap();

    let cloned = heap.clone_array(src, 0, 2).unwrap();

    // Drop the source from the root set; the clone's slots stay live.
    heap.collect(&[cloned]);
    assert_eq!(heap.live_count(), 3); // clone + both ints
    assert_eq!(*heap.get(heap.array_get(cloned, 0).unwrap()), Closure::Int(1));
    assert_eq!(*heap.get(heap.array_get(cloned, 1).unwrap()), Closure::Int(2));
}

#[test]
fn copied_references_are_reachable_through_the_destination() {
    let mut heap = Heap::new();
    let zero = heap.alloc(Closure::Int(0));
    let seven = heap.alloc(Closure::Int(7));
    let src = heap.alloc_array(1, seven);
    let dest = heap.alloc_array(1, zero);

    heap.copy_array(src, 0, dest, 0, 1).unwrap();

    // Only dest is rooted; the copied reference keeps `seven` alive even
    // though src (its original holder) is swept.
    heap.collect(&[dest]);
    assert_eq!(*heap.get(heap.array_get(dest, 0).unwrap()), Closure::Int(7));
}

#[test]
fn swept_array_slots_free_their_closures() {
    let mut heap = Heap::new();
    let init = heap.alloc(Closure::Int(1));
    heap.alloc_array(4, init);
    assert_eq!(heap.live_count(), 2);

    heap.collect(&[]);
    assert_eq!(heap.live_count(), 0);
}

#[test]
fn arrays_allocated_after_a_collection_reuse_freed_slots() {
    let mut heap = Heap::new();
    let init = heap.alloc(Closure::Int(1));
    heap.alloc_array(2, init);
    heap.collect(&[]);
    assert_eq!(heap.live_count(), 0);

    let init = heap.alloc(Closure::Int(2));
    let arr = heap.alloc_array(2, init);
    assert_eq!(heap.live_count(), 2);
    assert_eq!(heap.array_get(arr, 0).unwrap(), init);
}
