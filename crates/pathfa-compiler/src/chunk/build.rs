//! Chunk constructors and combinators.

use std::collections::HashMap;

use indexmap::IndexSet;
use pathfa_core::{LabelCondition, ValueCondition};

use super::{Edge, GraphChunk};
use crate::error::CompileError;
use crate::roles::{Role, Roles};
use crate::state::{StateArena, StateId};

impl GraphChunk {
    fn from_parts(states: IndexSet<StateId>, start: StateId, end: StateId) -> Self {
        Self {
            states,
            edges: IndexSet::new(),
            start,
            end,
            roles: Roles::new(),
        }
    }

    /// Single state chunk, start == end.
    pub fn one_state(
        arena: &mut StateArena,
        rooted: bool,
        terminal: bool,
        value: ValueCondition,
    ) -> Self {
        let state = arena.alloc(value);
        let mut chunk = Self::from_parts(IndexSet::from([state]), state, state);
        if rooted {
            chunk.roles.insert(Role::Rooted, state);
        }
        if terminal {
            chunk.roles.insert(Role::Terminal, state);
        }
        chunk
    }

    /// Two states joined by one edge. The value and terminal role sit on the
    /// end, the rooted role on the start.
    pub fn one_edge(
        arena: &mut StateArena,
        rooted: bool,
        label: LabelCondition,
        terminal: bool,
        value: ValueCondition,
    ) -> Self {
        let start = arena.alloc(ValueCondition::Any);
        let end = arena.alloc(value);
        let mut chunk = Self::from_parts(IndexSet::from([start, end]), start, end);
        chunk.edges.insert(Edge::new(start, end, label));
        if rooted {
            chunk.roles.insert(Role::Rooted, start);
        }
        if terminal {
            chunk.roles.insert(Role::Terminal, end);
        }
        chunk
    }

    /// Two unconstrained states joined by an epsilon edge.
    pub fn epsilon_bridge(arena: &mut StateArena) -> Self {
        Self::one_edge(
            arena,
            false,
            LabelCondition::Epsilon,
            false,
            ValueCondition::Any,
        )
    }

    /// Two unconstrained states and no edges. Matches nothing.
    pub fn disconnected(arena: &mut StateArena) -> Self {
        let start = arena.alloc(ValueCondition::Any);
        let end = arena.alloc(ValueCondition::Any);
        Self::from_parts(IndexSet::from([start, end]), start, end)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Copies
    // ─────────────────────────────────────────────────────────────────────

    /// Deep copy with fresh state identities.
    pub fn copy_fresh(&self, arena: &mut StateArena) -> GraphChunk {
        let map: HashMap<StateId, StateId> = self
            .states
            .iter()
            .map(|&old| {
                let value = arena.value(old).clone();
                (old, arena.alloc(value))
            })
            .collect();
        let fresh = |s: StateId| map[&s];

        GraphChunk {
            states: self.states.iter().map(|&s| fresh(s)).collect(),
            edges: self
                .edges
                .iter()
                .map(|e| Edge::new(fresh(e.parent), fresh(e.child), e.label.clone()))
                .collect(),
            start: fresh(self.start),
            end: fresh(self.end),
            roles: self.roles.map(fresh),
        }
    }

    /// Copy referring to the same states. Mutating the copy's containers
    /// leaves `self` untouched, but value conditions live in the shared arena.
    pub fn copy_shared(&self) -> GraphChunk {
        GraphChunk {
            states: self.states.clone(),
            edges: self.edges.clone(),
            start: self.start,
            end: self.end,
            roles: self.roles.clone(),
        }
    }

    /// Drop all states, edges and roles, leaving a fresh start and end.
    pub fn clean_graph(&mut self, arena: &mut StateArena) {
        let start = arena.alloc(ValueCondition::Any);
        let end = arena.alloc(ValueCondition::Any);
        *self = Self::from_parts(IndexSet::from([start, end]), start, end);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Composition
    // ─────────────────────────────────────────────────────────────────────

    /// Sequential composition: `other.start` is merged into `self.end`.
    ///
    /// The old end loses its terminal role, and so does every state that
    /// reaches it through epsilon edges alone: more labels follow them.
    pub fn concat(&mut self, arena: &mut StateArena, other: GraphChunk) -> Result<(), CompileError> {
        let old_end = self.end;
        let other_start = other.start;
        for state in self.epsilon_ancestors(old_end) {
            self.roles.remove(Role::Terminal, state);
        }
        self.end = other.end;
        self.absorb(other)?;
        self.merge_state(arena, other_start, old_end)
    }

    /// `state` and every state with an epsilon-only path to it.
    fn epsilon_ancestors(&self, state: StateId) -> IndexSet<StateId> {
        let mut found = IndexSet::from([state]);
        let mut next = 0;
        while let Some(&current) = found.get_index(next) {
            next += 1;
            let parents: Vec<StateId> = self
                .incoming(current)
                .filter(|e| e.is_epsilon())
                .map(|e| e.parent)
                .collect();
            found.extend(parents);
        }
        found
    }

    /// Append `n` fresh copies of the chunk as it is now.
    pub fn concat_copies(&mut self, arena: &mut StateArena, n: u32) -> Result<(), CompileError> {
        if n == 0 {
            return Ok(());
        }
        let template = self.copy_fresh(arena);
        for _ in 1..n {
            let copy = template.copy_fresh(arena);
            self.concat(arena, copy)?;
        }
        self.concat(arena, template)
    }

    /// Parallel composition: starts and ends are identified.
    ///
    /// Either side is funneled first when its boundary is not clean.
    pub fn glue(&mut self, arena: &mut StateArena, mut other: GraphChunk) -> Result<(), CompileError> {
        self.funnel_if_needed(arena);
        other.funnel_if_needed(arena);
        let (other_start, other_end) = (other.start, other.end);
        self.absorb(other)?;
        self.merge_state(arena, other_start, self.start)?;
        self.merge_state(arena, other_end, self.end)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Funnels, loops, escapes
    // ─────────────────────────────────────────────────────────────────────

    /// Whether the boundary states could leak edges, values or roles when
    /// merged with another chunk's boundary.
    pub fn needs_funnel(&self, arena: &StateArena) -> bool {
        let (start, end) = (self.start, self.end);
        start == end
            || self.incoming(start).next().is_some()
            || self.outgoing(end).next().is_some()
            || self.roles.has_any(start)
            || self.roles.has_any(end)
            || !arena.value(start).is_any()
            || !arena.value(end).is_any()
    }

    /// Wrap the chunk between a fresh start and end joined to it by epsilon
    /// edges. Initial and final roles move to the new boundary.
    pub fn funnel(&mut self, arena: &mut StateArena) {
        let start = self.add_state(arena, ValueCondition::Any);
        let end = self.add_state(arena, ValueCondition::Any);
        self.edges.insert(Edge::epsilon(start, self.start));
        self.edges.insert(Edge::epsilon(self.end, end));
        if self.roles.remove(Role::Initial, self.start) {
            self.roles.insert(Role::Initial, start);
        }
        if self.roles.remove(Role::Final, self.end) {
            self.roles.insert(Role::Final, end);
        }
        self.start = start;
        self.end = end;
    }

    pub fn funnel_if_needed(&mut self, arena: &mut StateArena) {
        if self.needs_funnel(arena) {
            self.funnel(arena);
        }
    }

    /// Kleene loop: epsilon back-edge end→start, then funnel so the loop
    /// stays inside the chunk.
    pub fn add_loop(&mut self, arena: &mut StateArena) -> Result<(), CompileError> {
        if !arena.value(self.start).is_compatible(arena.value(self.end)) {
            self.funnel(arena);
        }
        self.add_epsilon(arena, self.end, self.start)?;
        self.funnel(arena);
        Ok(())
    }

    /// Make the chunk optional with an epsilon start→end escape.
    pub fn add_escape(&mut self, arena: &mut StateArena) -> Result<(), CompileError> {
        self.funnel_if_needed(arena);
        self.add_epsilon(arena, self.start, self.end)
    }
}
