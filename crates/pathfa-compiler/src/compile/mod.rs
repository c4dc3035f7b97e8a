//! Thompson-style construction of path automata from pattern ASTs.
//!
//! # Module Organization
//!
//! - `compiler`: recursive AST compilation and the top-level entry point
//! - `quantifier`: uniform `{inf,sup}` expansion over compiled chunks

mod compiler;
mod quantifier;


pub(crate) use compiler::compile_pattern;
pub use compiler::Compiler;
pub use quantifier::apply_quantifier;
