//! Errors raised while building automata or running them under limits.

use pathfa_compiler::{CompileError, Role};
use pathfa_core::{NodeIx, ValueCondition};

use crate::StateIx;

/// Error while assembling an automaton or a tree automaton.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// No state carries the initial or the final role.
    #[error("automaton has no {role} state")]
    MissingBoundary { role: Role },

    /// A transition refers to a state outside the automaton.
    #[error("transition {parent} -> {child} references a missing state")]
    DanglingEdge { parent: u32, child: u32 },

    #[error("epsilon transition q{parent} -> q{child} joins incompatible values {left} and {right}")]
    IncompatibleEpsilon {
        parent: StateIx,
        child: StateIx,
        left: ValueCondition,
        right: ValueCondition,
    },

    /// A path transition enters a hyper-edge child from outside the set of
    /// hyper-edge children.
    #[error("path transition q{parent} -> q{child} bypasses the hyper-edge into q{child}")]
    HyperEdgeBypass { parent: StateIx, child: StateIx },

    #[error("unknown state {0}")]
    UnknownState(u32),

    #[error("hyper-edge into q{child} has no parents")]
    EmptyHyperEdge { child: StateIx },
}

/// Error during a run with caller-imposed limits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// Execution fuel exhausted (too many steps and tested assignments).
    #[error("runtime execution limit exceeded")]
    ExecFuelExhausted,

    /// A node has more children than hyper-edge evaluation may consider.
    #[error("node {node} has {children} children, over the branching limit")]
    BranchingLimitExceeded { node: NodeIx, children: usize },
}

/// Any error surfaced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

pub type Result<T> = std::result::Result<T, Error>;
