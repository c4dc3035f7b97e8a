//! Pattern AST consumed by the compiler.
//!
//! The compiler never parses text: an external parser (or a test) builds
//! these nodes directly or hands them over as JSON.

use pathfa_core::{ConditionError, EdgeCondition, LabelCondition, Value};
use serde::{Deserialize, Serialize};

use crate::error::CompileError;

/// A path pattern node with its quantifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub kind: PatternKind,
    #[serde(default)]
    pub quantifier: Quantifier,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Atom(Atom),
    Sequence(Vec<Pattern>),
    Disjunction(Vec<Pattern>),
}

/// One step of a path: an optional label, an optional leaf value and the
/// rooted/terminal anchors.
///
/// An atom without a label consumes nothing; it only attaches its value and
/// anchors to the current position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    #[serde(default)]
    pub label: Option<AtomLabel>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub rooted: bool,
    #[serde(default)]
    pub terminal: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtomLabel {
    Exact(String),
    Regex(String),
    Wildcard,
}

impl AtomLabel {
    pub fn to_condition(&self) -> Result<LabelCondition, ConditionError> {
        match self {
            AtomLabel::Exact(label) => Ok(LabelCondition::exact(label.as_str())),
            AtomLabel::Regex(pattern) => LabelCondition::regex(pattern),
            AtomLabel::Wildcard => Ok(LabelCondition::Wildcard),
        }
    }
}

impl Atom {
    pub fn exact(label: impl Into<String>) -> Self {
        Self {
            label: Some(AtomLabel::Exact(label.into())),
            ..Self::default()
        }
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            label: Some(AtomLabel::Regex(pattern.into())),
            ..Self::default()
        }
    }

    pub fn wildcard() -> Self {
        Self {
            label: Some(AtomLabel::Wildcard),
            ..Self::default()
        }
    }

    /// Atom that consumes no label.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rooted(mut self) -> Self {
        self.rooted = true;
        self
    }

    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl From<Atom> for Pattern {
    fn from(atom: Atom) -> Self {
        Pattern {
            kind: PatternKind::Atom(atom),
            quantifier: Quantifier::ONE,
        }
    }
}

impl Pattern {
    /// Shorthand for an exact-label atom.
    pub fn exact(label: impl Into<String>) -> Self {
        Atom::exact(label).into()
    }

    pub fn sequence(items: impl IntoIterator<Item = Pattern>) -> Self {
        Pattern {
            kind: PatternKind::Sequence(items.into_iter().collect()),
            quantifier: Quantifier::ONE,
        }
    }

    pub fn disjunction(branches: impl IntoIterator<Item = Pattern>) -> Self {
        Pattern {
            kind: PatternKind::Disjunction(branches.into_iter().collect()),
            quantifier: Quantifier::ONE,
        }
    }

    /// Replace the quantifier.
    pub fn quantified(mut self, quantifier: Quantifier) -> Self {
        self.quantifier = quantifier;
        self
    }

    pub fn star(self) -> Self {
        self.quantified(Quantifier::STAR)
    }

    pub fn plus(self) -> Self {
        self.quantified(Quantifier::PLUS)
    }

    pub fn optional(self) -> Self {
        self.quantified(Quantifier::OPTIONAL)
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Quantifier
// ─────────────────────────────────────────────────────────────────────────

/// Repetition bounds. `sup == None` means unbounded; `sup >= inf` always
/// holds.
///
/// Serialized with the raw `{inf, sup}` encoding where `sup = -1` means
/// unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawQuantifier", into = "RawQuantifier")]
pub struct Quantifier {
    inf: u32,
    sup: Option<u32>,
}

impl Default for Quantifier {
    fn default() -> Self {
        Self::ONE
    }
}

impl Quantifier {
    pub const ONE: Quantifier = Quantifier {
        inf: 1,
        sup: Some(1),
    };
    pub const STAR: Quantifier = Quantifier { inf: 0, sup: None };
    pub const PLUS: Quantifier = Quantifier { inf: 1, sup: None };
    pub const OPTIONAL: Quantifier = Quantifier {
        inf: 0,
        sup: Some(1),
    };

    pub fn new(inf: u32, sup: Option<u32>) -> Result<Self, CompileError> {
        match sup {
            Some(sup) if sup < inf => Err(CompileError::InvalidQuantifier {
                inf: i64::from(inf),
                sup: i64::from(sup),
            }),
            _ => Ok(Self { inf, sup }),
        }
    }

    pub fn exactly(n: u32) -> Self {
        Self { inf: n, sup: Some(n) }
    }

    pub fn at_least(n: u32) -> Self {
        Self { inf: n, sup: None }
    }

    pub fn between(inf: u32, sup: u32) -> Result<Self, CompileError> {
        Self::new(inf, Some(sup))
    }

    /// Bounds in the external encoding: `sup = -1` is unbounded, every other
    /// negative bound is rejected.
    pub fn from_raw(inf: i64, sup: i64) -> Result<Self, CompileError> {
        let invalid = || CompileError::InvalidQuantifier { inf, sup };
        let lower = u32::try_from(inf).map_err(|_| invalid())?;
        let upper = match sup {
            -1 => None,
            sup => Some(u32::try_from(sup).map_err(|_| invalid())?),
        };
        Self::new(lower, upper)
    }

    pub fn inf(self) -> u32 {
        self.inf
    }

    pub fn sup(self) -> Option<u32> {
        self.sup
    }

    pub fn is_one(self) -> bool {
        self == Self::ONE
    }

    pub fn is_unbounded(self) -> bool {
        self.sup.is_none()
    }
}

#[derive(Serialize, Deserialize)]
struct RawQuantifier {
    inf: i64,
    sup: i64,
}

impl TryFrom<RawQuantifier> for Quantifier {
    type Error = CompileError;

    fn try_from(raw: RawQuantifier) -> Result<Self, Self::Error> {
        Quantifier::from_raw(raw.inf, raw.sup)
    }
}

impl From<Quantifier> for RawQuantifier {
    fn from(q: Quantifier) -> Self {
        RawQuantifier {
            inf: i64::from(q.inf),
            sup: q.sup.map_or(-1, i64::from),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Tree patterns
// ─────────────────────────────────────────────────────────────────────────

/// Pattern over a labeled tree, read top-down.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreePattern {
    /// A chain of labels from the current node down to a leaf.
    Path(Pattern),
    /// The current node's children, grouped under one edge condition.
    Branch {
        edges: Vec<TreeEdge>,
        condition: EdgeCondition,
    },
}

/// One outgoing group of a branch: the labels leading away from the
/// branching node, then the subtree found below them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEdge {
    pub path: Pattern,
    pub subtree: TreePattern,
}

impl TreePattern {
    pub fn branch(
        condition: EdgeCondition,
        edges: impl IntoIterator<Item = (Pattern, TreePattern)>,
    ) -> Self {
        TreePattern::Branch {
            edges: edges
                .into_iter()
                .map(|(path, subtree)| TreeEdge { path, subtree })
                .collect(),
            condition,
        }
    }

    /// Leaf holding `value`.
    pub fn leaf(value: impl Into<Value>) -> Self {
        TreePattern::Path(Atom::empty().terminal().with_value(value).into())
    }
}
