//! Arena of builder states.
//!
//! A state's only intrinsic attribute is its value condition. Identity is the
//! arena index, so chunks can share states (`copy_shared`) or take fresh ones
//! (`copy_fresh`) explicitly.

use pathfa_core::ValueCondition;

/// Index into `StateArena`.
pub type StateId = u32;

#[derive(Debug, Default)]
pub struct StateArena {
    values: Vec<ValueCondition>,
}

impl StateArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a state, returning its ID.
    pub fn alloc(&mut self, value: ValueCondition) -> StateId {
        let id = self.values.len() as StateId;
        self.values.push(value);
        id
    }

    /// Value condition of a state allocated by this arena.
    ///
    /// # Panics
    /// Panics if `id` was not allocated here.
    pub fn value(&self, id: StateId) -> &ValueCondition {
        &self.values[id as usize]
    }

    pub fn get(&self, id: StateId) -> Option<&ValueCondition> {
        self.values.get(id as usize)
    }

    pub(crate) fn set_value(&mut self, id: StateId, value: ValueCondition) {
        self.values[id as usize] = value;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
