//! Condition algebra: predicates over leaf values and edge labels.
//!
//! All condition kinds are closed enums matched exhaustively. Value
//! conditions live on states, label conditions live on edges, edge
//! conditions live on tree-automaton hyper-edges.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use regex_automata::Input;
use regex_automata::dfa::{Automaton, dense};

use crate::Value;

/// Errors raised while building conditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    #[error("invalid label regex `{pattern}`: {message}")]
    InvalidRegex { pattern: String, message: String },
}

/// Predicate over the leaf value observed at a state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValueCondition {
    /// Accepts every value, including the absence of one.
    #[default]
    Any,
    /// Accepts exactly this value.
    Eq(Value),
}

impl ValueCondition {
    pub fn is_any(&self) -> bool {
        matches!(self, ValueCondition::Any)
    }

    /// Evaluate against an observed leaf value.
    pub fn test(&self, value: Option<&Value>) -> bool {
        match self {
            ValueCondition::Any => true,
            ValueCondition::Eq(expected) => value == Some(expected),
        }
    }

    /// Combine two conditions that must hold for the same state.
    ///
    /// Returns `None` when both are `Eq` with different values.
    pub fn merge(&self, other: &ValueCondition) -> Option<ValueCondition> {
        match (self, other) {
            (ValueCondition::Any, c) | (c, ValueCondition::Any) => Some(c.clone()),
            (ValueCondition::Eq(a), ValueCondition::Eq(b)) if a == b => Some(self.clone()),
            _ => None,
        }
    }

    /// True when `self` and `other` can both hold on one state.
    pub fn is_compatible(&self, other: &ValueCondition) -> bool {
        self.merge(other).is_some()
    }

    /// `self` projects onto `other` iff `self` is `Any` or equals `other`.
    pub fn projects_onto(&self, other: &ValueCondition) -> bool {
        self.is_any() || self == other
    }
}

impl fmt::Display for ValueCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueCondition::Any => write!(f, "_"),
            ValueCondition::Eq(v) => write!(f, "={v}"),
        }
    }
}

/// A label regex compiled once into a DFA anchored at both ends.
#[derive(Clone)]
pub struct LabelRegex {
    pattern: String,
    dfa: Arc<dense::DFA<Vec<u32>>>,
}

impl LabelRegex {
    pub fn new(pattern: &str) -> Result<Self, ConditionError> {
        let anchored = format!("^(?:{pattern})$");
        let dfa = dense::DFA::new(&anchored).map_err(|e| ConditionError::InvalidRegex {
            pattern: pattern.to_owned(),
            message: e.to_string(),
        })?;
        Ok(Self {
            pattern: pattern.to_owned(),
            dfa: Arc::new(dfa),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// True iff the whole label matches.
    pub fn is_match(&self, label: &str) -> bool {
        self.dfa
            .try_search_fwd(&Input::new(label))
            .ok()
            .flatten()
            .is_some()
    }
}

impl PartialEq for LabelRegex {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for LabelRegex {}

impl Hash for LabelRegex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
    }
}

impl fmt::Debug for LabelRegex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LabelRegex").field(&self.pattern).finish()
    }
}

/// Predicate over the label consumed by an edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LabelCondition {
    /// Consumes no label.
    Epsilon,
    /// Consumes any single label.
    Wildcard,
    /// Consumes exactly this label.
    Exact(String),
    /// Consumes a label matching the regex as a whole.
    Regex(LabelRegex),
}

impl LabelCondition {
    pub fn exact(label: impl Into<String>) -> Self {
        LabelCondition::Exact(label.into())
    }

    pub fn regex(pattern: &str) -> Result<Self, ConditionError> {
        LabelRegex::new(pattern).map(LabelCondition::Regex)
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, LabelCondition::Epsilon)
    }

    /// Evaluate against a label. Epsilon never consumes one.
    pub fn accepts(&self, label: &str) -> bool {
        match self {
            LabelCondition::Epsilon => false,
            LabelCondition::Wildcard => true,
            LabelCondition::Exact(expected) => expected == label,
            LabelCondition::Regex(re) => re.is_match(label),
        }
    }
}

impl fmt::Display for LabelCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelCondition::Epsilon => write!(f, "ε"),
            LabelCondition::Wildcard => write!(f, "*"),
            LabelCondition::Exact(label) => write!(f, "{label:?}"),
            LabelCondition::Regex(re) => write!(f, "/{}/", re.pattern()),
        }
    }
}

/// Multiset condition of a hyper-edge over the states supplied by a node's
/// children.
///
/// An assignment holds one entry per child: `Some(state)` for the state the
/// child contributes, `None` for a child left out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeCondition {
    /// Children and parents are equal as multisets.
    Equality,
    /// Every parent is covered at least as often as it occurs (`∀`).
    /// Children beyond that are ignored.
    Inclusive,
    /// Every child maps onto a distinct parent occurrence (`⧊`).
    /// Parents may stay unused.
    SemiTwig,
}

impl EdgeCondition {
    /// Whether `None` entries may appear in a satisfying assignment.
    pub fn allows_excluded(self) -> bool {
        matches!(self, EdgeCondition::Inclusive)
    }

    pub fn holds<T: Copy + Eq + Hash>(self, parents: &[T], assignment: &[Option<T>]) -> bool {
        let mut required = multiplicities(parents.iter().copied());
        match self {
            EdgeCondition::Equality => {
                assignment.len() == parents.len() && consume_all(&mut required, assignment)
            }
            EdgeCondition::SemiTwig => consume_all(&mut required, assignment),
            EdgeCondition::Inclusive => {
                let supplied = multiplicities(assignment.iter().flatten().copied());
                required
                    .iter()
                    .all(|(state, &count)| supplied.get(state).copied().unwrap_or(0) >= count)
            }
        }
    }
}

impl fmt::Display for EdgeCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeCondition::Equality => write!(f, "="),
            EdgeCondition::Inclusive => write!(f, "∀"),
            EdgeCondition::SemiTwig => write!(f, "⧊"),
        }
    }
}

fn multiplicities<T: Eq + Hash>(items: impl Iterator<Item = T>) -> HashMap<T, usize> {
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

/// Take one parent occurrence per assignment entry; fails on `None` or on
/// an exhausted parent.
fn consume_all<T: Eq + Hash>(remaining: &mut HashMap<T, usize>, assignment: &[Option<T>]) -> bool {
    assignment.iter().all(|entry| {
        let Some(state) = entry else {
            return false;
        };
        match remaining.get_mut(state) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    })
}
