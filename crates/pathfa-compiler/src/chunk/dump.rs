//! Dump helpers for chunk inspection and snapshot tests.

use std::fmt::Write;

use super::GraphChunk;
use crate::roles::Role;
use crate::state::{StateArena, StateId};

/// Printer for `GraphChunk`.
///
/// One line per state in ascending ID order: value condition, roles, then
/// outgoing edges in insertion order.
pub struct ChunkPrinter<'a> {
    chunk: &'a GraphChunk,
    arena: &'a StateArena,
    show_boundary: bool,
}

impl<'a> ChunkPrinter<'a> {
    pub fn new(chunk: &'a GraphChunk, arena: &'a StateArena) -> Self {
        Self {
            chunk,
            arena,
            show_boundary: true,
        }
    }

    /// Print the `start .., end ..` header line.
    pub fn show_boundary(mut self, show: bool) -> Self {
        self.show_boundary = show;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    fn format(&self, w: &mut String) -> std::fmt::Result {
        if self.show_boundary {
            writeln!(w, "start S{}, end S{}", self.chunk.start(), self.chunk.end())?;
        }

        let mut states: Vec<StateId> = self.chunk.states().collect();
        states.sort_unstable();
        for state in states {
            write!(w, "S{}: {}", state, self.arena.value(state))?;

            let roles: Vec<Role> = self.chunk.roles().roles_of(state).collect();
            if !roles.is_empty() {
                let names: Vec<_> = roles.iter().map(Role::to_string).collect();
                write!(w, " [{}]", names.join(" "))?;
            }

            let succs: Vec<_> = self
                .chunk
                .outgoing(state)
                .map(|e| format!("{} S{}", e.label, e.child))
                .collect();
            if succs.is_empty() {
                writeln!(w, " → ∅")?;
            } else {
                writeln!(w, " → {}", succs.join(", "))?;
            }
        }
        Ok(())
    }
}

impl GraphChunk {
    pub fn dump(&self, arena: &StateArena) -> String {
        ChunkPrinter::new(self, arena).dump()
    }
}
