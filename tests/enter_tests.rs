use reduct::runtime::{
    closure::{Closure, CodeId, Entered},
    context::ExecContext,
    error::Fatal,
    heap::Heap,
};

#[test]
fn entering_a_value_returns_its_own_handle() {
    let mut heap = Heap::new();
    let mut ctx = ExecContext::new();

    let int = heap.alloc(Closure::Int(5));
    let data = heap.alloc(Closure::Data {
        tag: 2,
        fields: vec![int],
    });
    let func = heap.alloc(Closure::Function {
        code: CodeId(1),
        arity: 2,
        applied: vec![int],
    });

    assert_eq!(heap.enter(int, &mut ctx), Ok(Entered::Value(int)));
    assert_eq!(heap.enter(data, &mut ctx), Ok(Entered::Value(data)));
    assert_eq!(heap.enter(func, &mut ctx), Ok(Entered::Value(func)));
    assert_eq!(ctx.entry_count(), 3);
    assert_eq!(ctx.node(), Some(func));
}

#[test]
fn entering_a_thunk_hands_its_code_to_the_engine() {
    let mut heap = Heap::new();
    let mut ctx = ExecContext::new();

    let captured = heap.alloc(Closure::Int(1));
    let thunk = heap.alloc(Closure::Thunk {
        code: CodeId(7),
        env: vec![captured],
    });

    assert_eq!(
        heap.enter(thunk, &mut ctx),
        Ok(Entered::Run {
            code: CodeId(7),
            env: vec![captured],
        })
    );
    assert_eq!(ctx.node(), Some(thunk));
}

#[test]
fn entering_follows_indirection_chains() {
    let mut heap = Heap::new();
    let mut ctx = ExecContext::new();

    let value = heap.alloc(Closure::Int(42));
    let inner = heap.alloc(Closure::Indirection(value));
    let outer = heap.alloc(Closure::Indirection(inner));

    assert_eq!(heap.enter(outer, &mut ctx), Ok(Entered::Value(value)));
    assert_eq!(ctx.node(), Some(value));
}

#[test]
fn entering_an_array_is_fatal() {
    let mut heap = Heap::new();
    let mut ctx = ExecContext::new();

    let init = heap.alloc(Closure::Int(0));
    let arr = heap.alloc_array(3, init);

    assert_eq!(
        heap.enter(arr, &mut ctx),
        Err(Fatal::ArrayEntered { len: 3 })
    );
    // The failed entry never reaches the node register.
    assert_eq!(ctx.node(), None);
    assert_eq!(ctx.entry_count(), 0);
}

#[test]
fn entering_an_empty_array_is_still_fatal() {
    let mut heap = Heap::new();
    let mut ctx = ExecContext::new();

    let init = heap.alloc(Closure::Int(0));
    let arr = heap.alloc_array(0, init);

    assert_eq!(
        heap.enter(arr, &mut ctx),
        Err(Fatal::ArrayEntered { len: 0 })
    );
}

#[test]
fn entering_an_indirection_to_an_array_is_fatal() {
    let mut heap = Heap::new();
    let mut ctx = ExecContext::new();

    let init = heap.alloc(Closure::Int(0));
    let arr = heap.alloc_array(2, init);
    let forwarded = heap.alloc(Closure::Indirection(arr));

    assert_eq!(
        heap.enter(forwarded, &mut ctx),
        Err(Fatal::ArrayEntered { len: 2 })
    );
}

#[test]
fn updated_thunk_enters_as_its_result() {
    let mut heap = Heap::new();
    let mut ctx = ExecContext::new();

    let thunk = heap.alloc(Closure::Thunk {
        code: CodeId(0),
        env: vec![],
    });
    let result = heap.alloc(Closure::Int(9));

    heap.update(thunk, result);
    assert_eq!(heap.enter(thunk, &mut ctx), Ok(Entered::Value(result)));
}
