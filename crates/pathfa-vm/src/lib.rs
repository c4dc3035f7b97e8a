#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Matching engine for pathfa.
//!
//! Compiled chunks become immutable [`PathAutomaton`]s that decide paths, and
//! tree patterns become [`Bufta`]s that decide whole trees. Runs are bounded
//! by [`FuelLimits`] and observable through a [`Tracer`].

use std::collections::BTreeSet;

pub mod automaton;
pub mod bufta;
pub mod error;
pub mod fuel;
pub mod run;
pub mod trace;

#[cfg(test)]
mod run_tests;
#[cfg(test)]
mod test_utils;

/// Index of a state in a finalized automaton.
pub type StateIx = u32;

/// Ordered state set; iteration order is deterministic.
pub type StateSet = BTreeSet<StateIx>;

pub use automaton::{AutomatonBuilder, Imported, PathAutomaton, Transition};
pub use bufta::{Binding, Bufta, BuftaBuilder, FiredEdge, HyperEdge, MixedRadix, TreeMatcher, TreeRun};
pub use error::{BuildError, Error, Result, RuntimeError};
pub use fuel::FuelLimits;
pub use run::PathMatcher;
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
