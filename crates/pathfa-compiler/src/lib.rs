#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Pattern compiler for pathfa.
//!
//! Turns pattern ASTs into [`GraphChunk`]s: mutable automaton fragments over a
//! shared [`StateArena`], with role sets marking initial, final, rooted and
//! terminal states. Finished chunks are handed to `pathfa-vm` for matching.

pub mod ast;
pub mod chunk;
pub mod compile;
pub mod error;
pub mod roles;
pub mod splice;
pub mod state;

#[cfg(test)]
mod test_utils;

pub use ast::{Atom, AtomLabel, Pattern, PatternKind, Quantifier, TreeEdge, TreePattern};
pub use chunk::{ChunkPrinter, Edge, GraphChunk, SubChunk};
pub use compile::Compiler;
pub use error::{CompileError, SpliceError};
pub use roles::{Role, Roles};
pub use splice::{RewriteHook, SpliceEnv};
pub use state::{StateArena, StateId};
