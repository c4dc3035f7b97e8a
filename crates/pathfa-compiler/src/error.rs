//! Construction and splice errors.

use pathfa_core::{ConditionError, ValueCondition};

use crate::StateId;

/// Error raised while compiling a pattern or composing chunks.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Quantifier bounds with `sup < inf` or a negative bound.
    /// Raw bounds are reported, `-1` meaning unbounded.
    #[error("invalid quantifier {{{inf},{sup}}}")]
    InvalidQuantifier { inf: i64, sup: i64 },

    /// Two value conditions that must hold on one state disagree, either by
    /// merging states or by joining them with an epsilon edge.
    #[error("incompatible value conditions {left} and {right}")]
    IncompatibleValues {
        left: ValueCondition,
        right: ValueCondition,
    },

    #[error(transparent)]
    InvalidRegex(#[from] ConditionError),

    /// A state id that is not part of the chunk being edited.
    #[error("state S{0} is not part of the chunk")]
    UnknownState(StateId),

    /// Two chunks being combined share a state.
    /// Happens when a `copy_shared` view is composed with its source.
    #[error("state S{0} is shared between the combined chunks")]
    AliasedStates(StateId),

    #[error(transparent)]
    Splice(#[from] SpliceError),
}

/// Error raised when a splice location is not a single simple path.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpliceError {
    #[error("splice point S{0} is not part of the chunk")]
    UnknownState(StateId),

    #[error("splice span S{0}..S{0} is empty")]
    EmptySpan(StateId),

    #[error("no path from S{from} to S{to}")]
    NoSpan { from: StateId, to: StateId },

    #[error("more than one path from S{from} to S{to}")]
    AmbiguousSpan { from: StateId, to: StateId },
}
