//! Mutable assembly of path automata.

use indexmap::IndexSet;
use pathfa_compiler::{Role, Roles};
use pathfa_core::{LabelCondition, ValueCondition};

use super::{PathAutomaton, Transition};
use crate::error::BuildError;
use crate::{StateIx, StateSet};

/// States of an automaton copied into a builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Imported {
    /// Index of the first copied state; state `q` became `offset + q`.
    pub offset: StateIx,
    /// The copied automaton's initial states, renumbered.
    pub initial: StateSet,
    /// The copied automaton's final states, renumbered.
    pub finals: StateSet,
}

impl Imported {
    pub fn state(&self, state: StateIx) -> StateIx {
        self.offset + state
    }
}

/// Builder for `PathAutomaton`. Nothing is checked until [`build`].
///
/// [`build`]: AutomatonBuilder::build
#[derive(Debug, Default)]
pub struct AutomatonBuilder {
    pub(crate) values: Vec<ValueCondition>,
    pub(crate) transitions: IndexSet<Transition>,
    pub(crate) roles: Roles,
}

impl AutomatonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self, value: ValueCondition) -> StateIx {
        let id = self.values.len() as StateIx;
        self.values.push(value);
        id
    }

    pub fn add_transition(&mut self, parent: StateIx, child: StateIx, label: LabelCondition) {
        self.transitions.insert(Transition {
            parent,
            child,
            label,
        });
    }

    pub fn add_epsilon(&mut self, parent: StateIx, child: StateIx) {
        self.add_transition(parent, child, LabelCondition::Epsilon);
    }

    pub fn mark(&mut self, role: Role, state: StateIx) {
        self.roles.insert(role, state);
    }

    pub fn unmark(&mut self, role: Role, state: StateIx) {
        self.roles.remove(role, state);
    }

    pub fn state_count(&self) -> usize {
        self.values.len()
    }

    /// Copy every state and transition of `automaton`, keeping its rooted and
    /// terminal roles. Initial and final states are reported, not marked.
    pub fn import(&mut self, automaton: &PathAutomaton) -> Imported {
        let offset = self.values.len() as StateIx;
        self.values.extend(automaton.values.iter().cloned());
        for t in automaton.transitions() {
            self.add_transition(offset + t.parent, offset + t.child, t.label.clone());
        }
        for role in [Role::Rooted, Role::Terminal] {
            for &state in automaton.roles().states(role) {
                self.roles.insert(role, offset + state);
            }
        }
        let shift = |set: &StateSet| -> StateSet { set.iter().map(|&s| offset + s).collect() };
        Imported {
            offset,
            initial: shift(automaton.initial()),
            finals: shift(automaton.final_states()),
        }
    }

    /// Validate and finalize.
    ///
    /// Epsilon self-loops are dropped; duplicate transitions were never kept.
    pub fn build(self) -> Result<PathAutomaton, BuildError> {
        self.validate()?;
        for role in [Role::Initial, Role::Final] {
            if self.roles.states(role).is_empty() {
                return Err(BuildError::MissingBoundary { role });
            }
        }
        Ok(self.finish())
    }

    /// Index ranges, epsilon compatibility and role membership.
    pub(crate) fn validate(&self) -> Result<(), BuildError> {
        let count = self.values.len() as StateIx;
        for t in &self.transitions {
            if t.parent >= count || t.child >= count {
                return Err(BuildError::DanglingEdge {
                    parent: t.parent,
                    child: t.child,
                });
            }
            let (left, right) = (&self.values[t.parent as usize], &self.values[t.child as usize]);
            if t.is_epsilon() && !left.is_compatible(right) {
                return Err(BuildError::IncompatibleEpsilon {
                    parent: t.parent,
                    child: t.child,
                    left: left.clone(),
                    right: right.clone(),
                });
            }
        }
        for role in Role::ALL {
            if let Some(&state) = self.roles.states(role).iter().find(|&&s| s >= count) {
                return Err(BuildError::UnknownState(state));
            }
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> PathAutomaton {
        let transitions = self
            .transitions
            .into_iter()
            .filter(|t| !(t.is_epsilon() && t.parent == t.child))
            .collect();
        PathAutomaton::assemble(self.values, transitions, self.roles)
    }
}
