//! Test helpers: structural acceptance over chunks.

use crate::chunk::GraphChunk;
use crate::roles::Role;
use crate::{Compiler, Pattern};

/// Label-only acceptance: initial closure, steps, final check.
/// Value conditions and rooted/terminal roles are ignored.
pub fn accepts(chunk: &GraphChunk, labels: &[&str]) -> bool {
    let roles = chunk.roles();
    let mut current = chunk.epsilon_closure(roles.states(Role::Initial).iter().copied());
    for label in labels {
        let next = chunk.step(&current, label);
        current = chunk.epsilon_closure(next);
    }
    current.iter().any(|&s| roles.contains(Role::Final, s))
}

/// Compile with a fresh compiler, panicking on errors.
pub fn compile(pattern: &Pattern) -> (Compiler, GraphChunk) {
    let mut compiler = Compiler::new();
    let chunk = compiler.compile(pattern).expect("pattern should compile");
    (compiler, chunk)
}

/// Start has no incoming edges, end has no outgoing edges.
pub fn has_clean_boundary(chunk: &GraphChunk) -> bool {
    chunk.incoming(chunk.start()).next().is_none() && chunk.outgoing(chunk.end()).next().is_none()
}

/// Sequence of exact-label atoms.
pub fn word(labels: &[&str]) -> Pattern {
    Pattern::sequence(labels.iter().map(|l| Pattern::exact(*l)))
}
