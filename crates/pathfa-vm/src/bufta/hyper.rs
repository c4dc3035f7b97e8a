//! Hyper-edge evaluation.
//!
//! Each child of a node offers a set of candidate states. An assignment picks
//! one entry per child; the hyper-edge fires when some assignment satisfies
//! its [`EdgeCondition`]. Assignments are enumerated with [`MixedRadix`].
//!
//! Candidate lists per child position:
//!
//! | condition  | entries                         | empty candidate set |
//! |------------|---------------------------------|---------------------|
//! | `Equality` | candidates that are parents     | edge cannot fire    |
//! | `SemiTwig` | candidates that are parents     | edge cannot fire    |
//! | `Inclusive`| candidates that are parents     | `[None]`            |
//!
//! When bindings are collected, `Inclusive` lists also offer `None` for
//! every child, so assignments that leave a child out are reported too.

use std::collections::HashMap;

use indexmap::IndexSet;
use pathfa_core::EdgeCondition;

use super::HyperEdge;
use super::run::Binding;
use crate::error::RuntimeError;
use crate::fuel::Fuel;
use crate::{StateIx, StateSet};

/// Counter over positions with individual radices, position 0 turning
/// fastest. Yields every digit vector exactly once; a zero radix yields
/// nothing and no positions yield the empty vector once.
#[derive(Clone, Debug)]
pub struct MixedRadix {
    radices: Vec<usize>,
    digits: Vec<usize>,
    exhausted: bool,
}

impl MixedRadix {
    pub fn new(radices: Vec<usize>) -> Self {
        let exhausted = radices.contains(&0);
        Self {
            digits: vec![0; radices.len()],
            radices,
            exhausted,
        }
    }

    /// Number of digit vectors in a full cycle, `None` on overflow.
    pub fn total(&self) -> Option<usize> {
        self.radices
            .iter()
            .try_fold(1usize, |acc, &radix| acc.checked_mul(radix))
    }

    /// Add one with carry. Returns false on wrap-around.
    fn increment(&mut self) -> bool {
        for (digit, &radix) in self.digits.iter_mut().zip(&self.radices) {
            *digit += 1;
            if *digit < radix {
                return true;
            }
            *digit = 0;
        }
        false
    }
}

impl Iterator for MixedRadix {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.exhausted {
            return None;
        }
        let current = self.digits.clone();
        self.exhausted = !self.increment();
        Some(current)
    }
}

/// Result of testing one hyper-edge at one node.
#[derive(Debug, Default)]
pub(crate) struct Outcome {
    pub fired: bool,
    /// Distinct satisfying assignments, empty unless collected.
    pub bindings: Vec<Binding>,
}

/// Test `edge` against per-child candidate sets. With `collect` off the
/// search stops at the first satisfying assignment. Every tested assignment
/// costs one unit of fuel.
pub(crate) fn evaluate(
    edge: &HyperEdge,
    candidates: &[StateSet],
    collect: bool,
    fuel: &mut Fuel,
) -> Result<Outcome, RuntimeError> {
    let children = candidates.len();
    let parents = edge.parents.len();
    let arity_fits = match edge.condition {
        EdgeCondition::Equality => parents == children,
        EdgeCondition::Inclusive => parents <= children,
        EdgeCondition::SemiTwig => children <= parents,
    };
    if !arity_fits {
        return Ok(Outcome::default());
    }

    let wanted: StateSet = edge.parents.iter().copied().collect();
    let mut options: Vec<Vec<Option<StateIx>>> = Vec::with_capacity(children);
    for set in candidates {
        let mut entries: Vec<Option<StateIx>> = set.intersection(&wanted).map(|&s| Some(s)).collect();
        if edge.condition.allows_excluded() {
            if collect || entries.is_empty() {
                entries.push(None);
            }
        } else if entries.is_empty() {
            return Ok(Outcome::default());
        }
        options.push(entries);
    }

    let mut outcome = Outcome::default();
    let mut found = IndexSet::new();
    for digits in MixedRadix::new(options.iter().map(Vec::len).collect()) {
        fuel.consume()?;
        let assignment: Binding = digits
            .iter()
            .zip(&options)
            .map(|(&digit, entries)| entries[digit])
            .collect();
        if !edge.condition.holds(&edge.parents, &assignment) {
            continue;
        }
        outcome.fired = true;
        if !collect {
            break;
        }
        found.insert(normalize(&edge.parents, &assignment));
    }
    outcome.bindings = found.into_iter().collect();
    Ok(outcome)
}

/// Keep the first `m` children assigned to a parent state of multiplicity
/// `m`; later ones become `None`.
pub(crate) fn normalize(parents: &[StateIx], assignment: &[Option<StateIx>]) -> Binding {
    let mut quota: HashMap<StateIx, usize> = HashMap::new();
    for &parent in parents {
        *quota.entry(parent).or_insert(0) += 1;
    }
    assignment
        .iter()
        .map(|entry| {
            let state = (*entry)?;
            let left = quota.get_mut(&state)?;
            if *left == 0 {
                return None;
            }
            *left -= 1;
            Some(state)
        })
        .collect()
}
