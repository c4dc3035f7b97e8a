//! Tests for closure, stepping and splice spans.

use pathfa_core::{LabelCondition, ValueCondition};

use super::*;
use crate::error::SpliceError;

/// S0 -a-> S1 -b-> S3 -c-> S5
fn abc(arena: &mut StateArena) -> GraphChunk {
    let mut chunk = edge(arena, "a");
    for label in ["b", "c"] {
        let next = edge(arena, label);
        chunk.concat(arena, next).unwrap();
    }
    chunk
}

fn edge(arena: &mut StateArena, label: &str) -> GraphChunk {
    GraphChunk::one_edge(
        arena,
        false,
        LabelCondition::exact(label),
        false,
        ValueCondition::Any,
    )
}

#[test]
fn closure_follows_epsilon_only() {
    let mut arena = StateArena::new();
    let mut chunk = edge(&mut arena, "a");
    chunk.add_loop(&mut arena).unwrap();

    let closure = chunk.epsilon_closure([chunk.start()]);

    assert_eq!(closure.into_iter().collect::<Vec<_>>(), [0, 2]);
}

#[test]
fn closure_is_idempotent() {
    let mut arena = StateArena::new();
    let mut chunk = edge(&mut arena, "a");
    chunk.add_loop(&mut arena).unwrap();
    chunk.add_escape(&mut arena).unwrap();

    for seed in chunk.states() {
        let once = chunk.epsilon_closure([seed]);
        let twice = chunk.epsilon_closure(once.iter().copied());
        assert_eq!(once, twice);
    }
}

#[test]
fn step_consumes_one_label() {
    let mut arena = StateArena::new();
    let chunk = abc(&mut arena);

    let after_a = chunk.step(&[0].into(), "a");

    assert_eq!(after_a.iter().copied().collect::<Vec<_>>(), [1]);
    assert!(chunk.step(&after_a, "c").is_empty());
}

#[test]
fn sub_chunks_by_labels() {
    let mut arena = StateArena::new();
    let chunk = abc(&mut arena);

    assert_eq!(
        chunk.sub_chunks(&["b"]),
        [SubChunk {
            start: 1,
            end: 3,
            edges: vec![1],
        }]
    );
    assert_eq!(chunk.spans(&["a", "b"]), [(0, 3)]);
    assert!(chunk.spans(&["a", "c"]).is_empty());
}

#[test]
fn sub_chunks_take_epsilon_edges() {
    let mut arena = StateArena::new();
    let mut chunk = edge(&mut arena, "a");
    let next = GraphChunk::epsilon_bridge(&mut arena);
    chunk.concat(&mut arena, next).unwrap();

    // S0 -a-> S1 -ε-> S3
    assert_eq!(chunk.spans(&["a"]), [(0, 1), (0, 3)]);
    assert_eq!(chunk.spans::<&str>(&[]), [(1, 3)]);
}

#[test]
fn simple_path_unique() {
    let mut arena = StateArena::new();
    let chunk = abc(&mut arena);

    assert_eq!(chunk.simple_path(0, 5), Ok(vec![0, 1, 2]));
    assert_eq!(chunk.simple_path(1, 3), Ok(vec![1]));
}

#[test]
fn simple_path_errors() {
    let mut arena = StateArena::new();
    let chunk = abc(&mut arena);

    assert_eq!(
        chunk.simple_path(5, 0),
        Err(SpliceError::NoSpan { from: 5, to: 0 })
    );
    assert_eq!(chunk.simple_path(1, 1), Err(SpliceError::EmptySpan(1)));
    assert_eq!(chunk.simple_path(1, 7), Err(SpliceError::UnknownState(7)));
}

#[test]
fn simple_path_ambiguous() {
    let mut arena = StateArena::new();
    let mut chunk = edge(&mut arena, "a");
    let other = edge(&mut arena, "b");
    chunk.glue(&mut arena, other).unwrap();

    assert_eq!(
        chunk.simple_path(chunk.start(), chunk.end()),
        Err(SpliceError::AmbiguousSpan { from: 0, to: 1 })
    );
}
