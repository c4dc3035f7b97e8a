//! Mutable automaton fragments with a single start and end state.
//!
//! Every pattern node compiles to a [`GraphChunk`]. Combinators in `build`
//! splice chunks together by merging boundary states; `span` answers
//! reachability questions used to locate splice points.
//!
//! Compiled chunks keep clean boundaries: the start has no incoming edges
//! and the end has no outgoing edges. Loops and parallel branches are
//! wrapped in funnel states so merging never leaks edges across a boundary.

mod build;
mod dump;
mod span;

#[cfg(test)]
mod span_tests;

use indexmap::IndexSet;
use pathfa_core::{LabelCondition, ValueCondition};

use crate::error::CompileError;
use crate::roles::{Role, Roles};
use crate::state::{StateArena, StateId};

pub use dump::ChunkPrinter;
pub use span::SubChunk;

/// Directed arc between two states of a chunk.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub parent: StateId,
    pub child: StateId,
    pub label: LabelCondition,
}

impl Edge {
    pub fn new(parent: StateId, child: StateId, label: LabelCondition) -> Self {
        Self {
            parent,
            child,
            label,
        }
    }

    pub fn epsilon(parent: StateId, child: StateId) -> Self {
        Self::new(parent, child, LabelCondition::Epsilon)
    }

    pub fn is_epsilon(&self) -> bool {
        self.label.is_epsilon()
    }
}

/// Automaton fragment under construction.
///
/// States are arena IDs. `GraphChunk` is deliberately not `Clone`: use
/// [`GraphChunk::copy_fresh`] for an independent copy or
/// [`GraphChunk::copy_shared`] for a view over the same states.
#[derive(Debug)]
pub struct GraphChunk {
    states: IndexSet<StateId>,
    edges: IndexSet<Edge>,
    start: StateId,
    end: StateId,
    roles: Roles,
}

impl GraphChunk {
    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn end(&self) -> StateId {
        self.end
    }

    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.iter().copied()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn contains(&self, state: StateId) -> bool {
        self.states.contains(&state)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get_index(index)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn roles(&self) -> &Roles {
        &self.roles
    }

    pub fn outgoing(&self, state: StateId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.parent == state)
    }

    pub fn incoming(&self, state: StateId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.child == state)
    }

    /// Assign a role to a state of this chunk.
    pub fn mark(&mut self, role: Role, state: StateId) -> Result<(), CompileError> {
        self.require(state)?;
        self.roles.insert(role, state);
        Ok(())
    }

    pub fn unmark(&mut self, role: Role, state: StateId) -> bool {
        self.roles.remove(role, state)
    }

    /// Add a fresh state to the chunk.
    pub fn add_state(&mut self, arena: &mut StateArena, value: ValueCondition) -> StateId {
        let id = arena.alloc(value);
        self.states.insert(id);
        id
    }

    /// Add an edge between two states of the chunk.
    ///
    /// Duplicate edges are ignored. An epsilon edge requires compatible value
    /// conditions on its endpoints; an epsilon self-loop is a no-op.
    pub fn add_edge(
        &mut self,
        arena: &StateArena,
        parent: StateId,
        child: StateId,
        label: LabelCondition,
    ) -> Result<(), CompileError> {
        self.require(parent)?;
        self.require(child)?;
        if label.is_epsilon() {
            if parent == child {
                return Ok(());
            }
            check_epsilon(arena, parent, child)?;
        }
        self.edges.insert(Edge::new(parent, child, label));
        Ok(())
    }

    pub fn add_epsilon(
        &mut self,
        arena: &StateArena,
        parent: StateId,
        child: StateId,
    ) -> Result<(), CompileError> {
        self.add_edge(arena, parent, child, LabelCondition::Epsilon)
    }

    fn require(&self, state: StateId) -> Result<(), CompileError> {
        if self.contains(state) {
            Ok(())
        } else {
            Err(CompileError::UnknownState(state))
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // State merging
    // ─────────────────────────────────────────────────────────────────────

    /// Merge `from` into `into`: value conditions are combined, edges are
    /// re-anchored and roles move over. `from` leaves the chunk.
    pub(crate) fn merge_state(
        &mut self,
        arena: &mut StateArena,
        from: StateId,
        into: StateId,
    ) -> Result<(), CompileError> {
        if from == into {
            return Ok(());
        }
        self.require(from)?;
        self.require(into)?;

        let (kept, dropped) = (arena.value(into), arena.value(from));
        let merged = kept
            .merge(dropped)
            .ok_or_else(|| CompileError::IncompatibleValues {
                left: kept.clone(),
                right: dropped.clone(),
            })?;
        arena.set_value(into, merged);

        let rename = |s: StateId| if s == from { into } else { s };
        let edges = std::mem::take(&mut self.edges);
        for edge in edges {
            let edge = Edge::new(rename(edge.parent), rename(edge.child), edge.label);
            if edge.is_epsilon() && edge.parent == edge.child {
                continue;
            }
            self.edges.insert(edge);
        }
        for edge in self.edges.iter().filter(|e| e.is_epsilon()) {
            if edge.parent == into || edge.child == into {
                check_epsilon(arena, edge.parent, edge.child)?;
            }
        }

        self.roles.rename(from, into);
        self.states.shift_remove(&from);
        self.start = rename(self.start);
        self.end = rename(self.end);
        Ok(())
    }

    /// Take over all states, edges and roles of `other`.
    ///
    /// Fails if the chunks share a state.
    pub(crate) fn absorb(&mut self, other: GraphChunk) -> Result<(), CompileError> {
        if let Some(&shared) = other.states.iter().find(|s| self.states.contains(*s)) {
            return Err(CompileError::AliasedStates(shared));
        }
        self.states.extend(other.states);
        self.edges.extend(other.edges);
        self.roles.absorb(other.roles);
        Ok(())
    }
}

fn check_epsilon(arena: &StateArena, parent: StateId, child: StateId) -> Result<(), CompileError> {
    let (left, right) = (arena.value(parent), arena.value(child));
    if left.is_compatible(right) {
        Ok(())
    } else {
        Err(CompileError::IncompatibleValues {
            left: left.clone(),
            right: right.clone(),
        })
    }
}
