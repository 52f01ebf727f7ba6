use semhl_core::span::{InMemorySpanStore, Position, SpanStore};

#[test]
fn add_then_count() {
    let mut store = InMemorySpanStore::new();
    store.add_span(1, Position::new(0, 0), Position::new(0, 3), "sfg_ff0000");
    assert_eq!(store.count_spans(1), 1);
}

#[test]
fn delete_in_range_removes_overlapping_only() {
    let mut store = InMemorySpanStore::new();
    store.add_span(1, Position::new(0, 0), Position::new(0, 3), "sfg_a");
    store.add_span(1, Position::new(1, 0), Position::new(1, 3), "sfg_b");

    store.delete_spans_in(1, Position::new(0, 0), Position::new(0, 5));

    assert_eq!(store.count_spans(1), 1);
    assert_eq!(store.spans(1)[0].color_key, "sfg_b");
}

#[test]
fn clear_all_spans_empties_buffer() {
    let mut store = InMemorySpanStore::new();
    store.add_span(1, Position::new(0, 0), Position::new(0, 3), "sfg_a");
    store.clear_all_spans(1);
    assert_eq!(store.count_spans(1), 0);
}

#[test]
fn buffers_are_independent() {
    let mut store = InMemorySpanStore::new();
    store.add_span(1, Position::new(0, 0), Position::new(0, 3), "sfg_a");
    store.add_span(2, Position::new(0, 0), Position::new(0, 3), "sfg_b");
    store.clear_all_spans(1);
    assert_eq!(store.count_spans(1), 0);
    assert_eq!(store.count_spans(2), 1);
}

#[test]
fn no_two_spans_overlap_after_delete_then_reinsert() {
    let mut store = InMemorySpanStore::new();
    store.add_span(1, Position::new(0, 0), Position::new(0, 3), "sfg_a");
    store.delete_spans_in(1, Position::new(0, 0), Position::new(0, 3));
    store.add_span(1, Position::new(0, 0), Position::new(0, 3), "sfg_b");
    assert_eq!(store.count_spans(1), 1);
}
