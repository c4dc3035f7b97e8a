//! Finalized path automata.
//!
//! A [`PathAutomaton`] is immutable: dense states with value conditions,
//! labeled transitions with per-state adjacency, and role sets. It is built
//! from a compiled chunk ([`PathAutomaton::from_chunk`]) or assembled by hand
//! with [`AutomatonBuilder`].
//!
//! # Filtering
//!
//! Role and value checks happen along epsilon paths, never after the fact:
//! - entry filter: an unrooted subject may not enter a rooted state
//! - exit filter: a state must accept the subject's leaf value, and a
//!   terminal state requires a terminal subject

mod builder;
mod dump;
mod sync;

#[cfg(test)]
mod automaton_tests;
#[cfg(test)]
mod sync_tests;

use std::collections::{HashMap, VecDeque};

use pathfa_compiler::{GraphChunk, Role, Roles, StateArena, StateId};
use pathfa_core::{LabelCondition, Value, ValueCondition};

use crate::error::BuildError;
use crate::{StateIx, StateSet};

pub use builder::{AutomatonBuilder, Imported};

/// Labeled arc between two automaton states.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Transition {
    pub parent: StateIx,
    pub child: StateIx,
    pub label: LabelCondition,
}

impl Transition {
    pub fn is_epsilon(&self) -> bool {
        self.label.is_epsilon()
    }
}

#[derive(Clone, Debug)]
pub struct PathAutomaton {
    values: Vec<ValueCondition>,
    transitions: Vec<Transition>,
    /// Transition indices per parent state.
    outgoing: Vec<Vec<u32>>,
    roles: Roles,
    synchronous: bool,
}

impl PathAutomaton {
    /// Finalize a compiled chunk.
    ///
    /// States are renumbered densely in chunk order. The chunk must carry at
    /// least one initial and one final state.
    pub fn from_chunk(chunk: &GraphChunk, arena: &StateArena) -> Result<Self, BuildError> {
        let mut builder = AutomatonBuilder::new();
        let mut index: HashMap<StateId, StateIx> = HashMap::new();
        for state in chunk.states() {
            let value = arena
                .get(state)
                .ok_or(BuildError::UnknownState(state))?
                .clone();
            index.insert(state, builder.add_state(value));
        }

        for edge in chunk.edges() {
            let (Some(&parent), Some(&child)) = (index.get(&edge.parent), index.get(&edge.child))
            else {
                return Err(BuildError::DanglingEdge {
                    parent: edge.parent,
                    child: edge.child,
                });
            };
            builder.add_transition(parent, child, edge.label.clone());
        }

        for role in Role::ALL {
            for state in chunk.roles().states(role) {
                let ix = index.get(state).ok_or(BuildError::UnknownState(*state))?;
                builder.mark(role, *ix);
            }
        }
        builder.build()
    }

    /// Assemble without validation. Callers guarantee index ranges.
    pub(crate) fn assemble(
        values: Vec<ValueCondition>,
        transitions: Vec<Transition>,
        roles: Roles,
    ) -> Self {
        let mut outgoing = vec![Vec::new(); values.len()];
        for (ix, t) in transitions.iter().enumerate() {
            outgoing[t.parent as usize].push(ix as u32);
        }
        let synchronous = !transitions.iter().any(Transition::is_epsilon);
        Self {
            values,
            transitions,
            outgoing,
            roles,
            synchronous,
        }
    }

    pub fn state_count(&self) -> usize {
        self.values.len()
    }

    pub fn value(&self, state: StateIx) -> &ValueCondition {
        &self.values[state as usize]
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn outgoing(&self, state: StateIx) -> impl Iterator<Item = &Transition> {
        self.outgoing[state as usize]
            .iter()
            .map(|&ix| &self.transitions[ix as usize])
    }

    pub fn roles(&self) -> &Roles {
        &self.roles
    }

    pub fn initial(&self) -> &StateSet {
        self.roles.states(Role::Initial)
    }

    pub fn final_states(&self) -> &StateSet {
        self.roles.states(Role::Final)
    }

    pub fn is_final(&self, state: StateIx) -> bool {
        self.roles.contains(Role::Final, state)
    }

    /// True when the automaton has no epsilon transitions and runs with the
    /// synchronous strategy.
    pub fn is_synchronous(&self) -> bool {
        self.synchronous
    }

    /// `a` projects onto `b` iff `a` accepts any value or both states require
    /// the same value.
    pub fn projects_onto(&self, a: StateIx, b: StateIx) -> bool {
        self.value(a).projects_onto(self.value(b))
    }

    /// Same automaton with every transition flipped and the initial and final
    /// sets swapped. Rooted and terminal roles stay on their states.
    pub fn reversed(&self) -> PathAutomaton {
        let transitions = self
            .transitions
            .iter()
            .map(|t| Transition {
                parent: t.child,
                child: t.parent,
                label: t.label.clone(),
            })
            .collect();
        let mut roles = self.roles.clone();
        roles.swap_ends();
        Self::assemble(self.values.clone(), transitions, roles)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Closure and stepping
    // ─────────────────────────────────────────────────────────────────────

    /// States reachable from `seeds` through epsilon transitions, seeds
    /// included. Breadth-first, each state enqueued once.
    pub fn epsilon_closure(&self, seeds: impl IntoIterator<Item = StateIx>) -> StateSet {
        self.closure_where(seeds, |_| true)
    }

    /// Epsilon closure that never enters a state failing `keep`.
    /// Seeds failing `keep` are dropped.
    pub fn closure_where(
        &self,
        seeds: impl IntoIterator<Item = StateIx>,
        keep: impl Fn(StateIx) -> bool,
    ) -> StateSet {
        let mut closure = StateSet::new();
        let mut queue = VecDeque::new();
        for seed in seeds {
            if keep(seed) && closure.insert(seed) {
                queue.push_back(seed);
            }
        }
        while let Some(state) = queue.pop_front() {
            for t in self.outgoing(state).filter(|t| t.is_epsilon()) {
                if keep(t.child) && closure.insert(t.child) {
                    queue.push_back(t.child);
                }
            }
        }
        closure
    }

    /// Children of non-epsilon transitions leaving `states` that accept
    /// `label`.
    pub fn step(&self, states: &StateSet, label: &str) -> StateSet {
        states
            .iter()
            .flat_map(|&s| self.outgoing(s))
            .filter(|t| t.label.accepts(label))
            .map(|t| t.child)
            .collect()
    }

    pub fn passes_entry(&self, state: StateIx, rooted: bool) -> bool {
        rooted || !self.roles.contains(Role::Rooted, state)
    }

    pub fn passes_exit(&self, state: StateIx, value: Option<&Value>, terminal: bool) -> bool {
        self.value(state).test(value) && (terminal || !self.roles.contains(Role::Terminal, state))
    }

    /// Closure under the entry filter.
    pub fn entry_closure(&self, seeds: impl IntoIterator<Item = StateIx>, rooted: bool) -> StateSet {
        self.closure_where(seeds, |s| self.passes_entry(s, rooted))
    }

    /// Closure under the exit filter.
    pub fn exit_closure(
        &self,
        seeds: impl IntoIterator<Item = StateIx>,
        value: Option<&Value>,
        terminal: bool,
    ) -> StateSet {
        self.closure_where(seeds, |s| self.passes_exit(s, value, terminal))
    }
}
