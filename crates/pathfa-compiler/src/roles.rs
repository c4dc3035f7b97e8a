//! Role sets: initial, final, rooted and terminal membership.
//!
//! Roles belong to the chunk or automaton, not to the state, so one state can
//! play different roles in different automata built from it.

use std::collections::BTreeSet;
use std::fmt;

use crate::StateId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Initial,
    Final,
    /// Only matches at the subject's true root.
    Rooted,
    /// Only matches at a leaf.
    Terminal,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Initial, Role::Final, Role::Rooted, Role::Terminal];

    fn index(self) -> usize {
        match self {
            Role::Initial => 0,
            Role::Final => 1,
            Role::Rooted => 2,
            Role::Terminal => 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Initial => write!(f, "initial"),
            Role::Final => write!(f, "final"),
            Role::Rooted => write!(f, "rooted"),
            Role::Terminal => write!(f, "terminal"),
        }
    }
}

/// Four possibly overlapping state sets, one per [`Role`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roles {
    sets: [BTreeSet<StateId>; 4],
}

impl Roles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the state was not already in the set.
    pub fn insert(&mut self, role: Role, state: StateId) -> bool {
        self.sets[role.index()].insert(state)
    }

    /// Returns true if the state was in the set.
    pub fn remove(&mut self, role: Role, state: StateId) -> bool {
        self.sets[role.index()].remove(&state)
    }

    pub fn contains(&self, role: Role, state: StateId) -> bool {
        self.sets[role.index()].contains(&state)
    }

    pub fn states(&self, role: Role) -> &BTreeSet<StateId> {
        &self.sets[role.index()]
    }

    /// Roles held by `state`, in `Role::ALL` order.
    pub fn roles_of(&self, state: StateId) -> impl Iterator<Item = Role> + '_ {
        Role::ALL
            .into_iter()
            .filter(move |role| self.contains(*role, state))
    }

    pub fn has_any(&self, state: StateId) -> bool {
        self.roles_of(state).next().is_some()
    }

    /// Move every role of `from` onto `to`.
    pub fn rename(&mut self, from: StateId, to: StateId) {
        for set in &mut self.sets {
            if set.remove(&from) {
                set.insert(to);
            }
        }
    }

    /// Drop `state` from every set.
    pub fn forget(&mut self, state: StateId) {
        for set in &mut self.sets {
            set.remove(&state);
        }
    }

    /// Union `other` into `self`.
    pub fn absorb(&mut self, other: Roles) {
        for (mine, theirs) in self.sets.iter_mut().zip(other.sets) {
            mine.extend(theirs);
        }
    }

    /// Roles with every state passed through `map`.
    pub fn map(&self, mut map: impl FnMut(StateId) -> StateId) -> Roles {
        let mut out = Roles::new();
        for role in Role::ALL {
            for &state in self.states(role) {
                out.insert(role, map(state));
            }
        }
        out
    }

    /// Swap the initial and final sets.
    pub fn swap_ends(&mut self) {
        self.sets.swap(Role::Initial.index(), Role::Final.index());
    }

    pub fn clear(&mut self) {
        for set in &mut self.sets {
            set.clear();
        }
    }
}
