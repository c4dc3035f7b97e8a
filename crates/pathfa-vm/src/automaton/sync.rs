//! Epsilon elimination for the synchronous strategy.
//!
//! The general strategy closes over epsilon transitions at every step and
//! filters along epsilon paths at entry and exit. The synchronous automaton
//! bakes all of that into its structure:
//!
//! - every labeled transition reachable through a closure is lifted onto the
//!   closure's source state
//! - entry states stand for the initial closure, one per rootedness
//! - exit requirements collected along epsilon paths to a final state become
//!   accepting guard twins, one per distinct requirement
//!
//! Both strategies give the same verdict for every path.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexSet;
use pathfa_compiler::Role;
use pathfa_core::{Value, ValueCondition};

use super::{AutomatonBuilder, PathAutomaton};
use crate::{StateIx, StateSet};

/// Exit requirement accumulated along an epsilon path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Guard {
    value: Option<Value>,
    terminal: bool,
}

impl Guard {
    const TRIVIAL: Guard = Guard {
        value: None,
        terminal: false,
    };

    /// Add the requirements of `state`. `None` if its value contradicts.
    fn extend(&self, automaton: &PathAutomaton, state: StateIx) -> Option<Guard> {
        let value = match (automaton.value(state), &self.value) {
            (ValueCondition::Any, current) => current.clone(),
            (ValueCondition::Eq(v), None) => Some(v.clone()),
            (ValueCondition::Eq(v), Some(current)) if v == current => Some(v.clone()),
            (ValueCondition::Eq(_), Some(_)) => return None,
        };
        Some(Guard {
            value,
            terminal: self.terminal || automaton.roles().contains(Role::Terminal, state),
        })
    }

    /// Every subject passing `other` also passes `self`.
    fn subsumes(&self, other: &Guard) -> bool {
        (self.value.is_none() || self.value == other.value) && (!self.terminal || other.terminal)
    }

    fn condition(&self) -> ValueCondition {
        self.value
            .clone()
            .map_or(ValueCondition::Any, ValueCondition::Eq)
    }
}

impl PathAutomaton {
    /// Epsilon-free automaton with the same verdict on every path.
    pub fn to_synchronous(&self) -> PathAutomaton {
        if self.synchronous {
            return self.clone();
        }

        let mut builder = AutomatonBuilder::new();
        for _ in 0..self.state_count() {
            builder.add_state(ValueCondition::Any);
        }

        let mut sources: Vec<(StateIx, StateSet)> = (0..self.state_count() as StateIx)
            .map(|s| (s, self.epsilon_closure([s])))
            .collect();

        // Entry states. With rooted states around, an unrooted subject needs
        // its own entry whose closure avoids them.
        let initial = self.initial();
        let has_rooted = !self.roles().states(Role::Rooted).is_empty();
        let mut entries = vec![(
            has_rooted,
            self.epsilon_closure(initial.iter().copied()),
            self.guards(initial.iter().copied(), true),
        )];
        if has_rooted {
            entries.push((
                false,
                self.entry_closure(initial.iter().copied(), false),
                self.guards(initial.iter().copied(), false),
            ));
        }
        for (rooted, closure, guards) in entries {
            let entry = builder.add_state(ValueCondition::Any);
            builder.mark(Role::Initial, entry);
            if rooted {
                builder.mark(Role::Rooted, entry);
            }
            if guards.contains(&Guard::TRIVIAL) {
                builder.mark(Role::Final, entry);
            } else {
                for guard in minimal(guards) {
                    let twin = builder.add_state(guard.condition());
                    for role in [Role::Initial, Role::Final] {
                        builder.mark(role, twin);
                    }
                    if rooted {
                        builder.mark(Role::Rooted, twin);
                    }
                    if guard.terminal {
                        builder.mark(Role::Terminal, twin);
                    }
                }
            }
            sources.push((entry, closure));
        }

        for (source, closure) in &sources {
            for &reached in closure {
                for t in self.outgoing(reached).filter(|t| !t.is_epsilon()) {
                    builder.add_transition(*source, t.child, t.label.clone());
                }
            }
        }

        // Guard twins of the original states take copies of their incoming
        // transitions and have none of their own. Unreachable states get no
        // twins.
        for state in 0..self.state_count() as StateIx {
            let guards = self.guards([state], true);
            if guards.contains(&Guard::TRIVIAL) {
                builder.mark(Role::Final, state);
                continue;
            }
            let incoming: Vec<_> = builder
                .transitions
                .iter()
                .filter(|t| t.child == state)
                .map(|t| (t.parent, t.label.clone()))
                .collect();
            if incoming.is_empty() {
                continue;
            }
            for guard in minimal(guards) {
                let twin = builder.add_state(guard.condition());
                builder.mark(Role::Final, twin);
                if guard.terminal {
                    builder.mark(Role::Terminal, twin);
                }
                for (parent, label) in &incoming {
                    builder.add_transition(*parent, twin, label.clone());
                }
            }
        }

        builder.finish()
    }

    /// Exit requirements of every epsilon path from `seeds` to a final
    /// state. With `allow_rooted` off, paths through rooted states are
    /// skipped.
    fn guards(
        &self,
        seeds: impl IntoIterator<Item = StateIx>,
        allow_rooted: bool,
    ) -> IndexSet<Guard> {
        let allowed = |s: StateIx| allow_rooted || !self.roles().contains(Role::Rooted, s);
        let mut found = IndexSet::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();

        for seed in seeds.into_iter().filter(|&s| allowed(s)) {
            if let Some(guard) = Guard::TRIVIAL.extend(self, seed)
                && seen.insert((seed, guard.clone()))
            {
                queue.push_back((seed, guard));
            }
        }
        while let Some((state, guard)) = queue.pop_front() {
            if self.is_final(state) {
                found.insert(guard.clone());
            }
            for t in self.outgoing(state).filter(|t| t.is_epsilon()) {
                if !allowed(t.child) {
                    continue;
                }
                if let Some(next) = guard.extend(self, t.child)
                    && seen.insert((t.child, next.clone()))
                {
                    queue.push_back((t.child, next));
                }
            }
        }
        found
    }
}

/// Guards not subsumed by another guard of the set.
fn minimal(guards: IndexSet<Guard>) -> Vec<Guard> {
    guards
        .iter()
        .filter(|g| !guards.iter().any(|other| other != *g && other.subsumes(g)))
        .cloned()
        .collect()
}
