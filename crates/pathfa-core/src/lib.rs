#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the pathfa compiler and VM.
//!
//! - **Values**: scalar leaf values of semi-structured records
//! - **Conditions**: predicates over leaf values (on states), labels (on edges)
//!   and child multisets (on hyper-edges)
//! - **Subjects**: what automata run against, linear paths and labeled trees

mod condition;
mod subject;
mod value;


pub use condition::{ConditionError, EdgeCondition, LabelCondition, LabelRegex, ValueCondition};
pub use subject::{LabeledTree, NodeIx, Path, TreeBuilder, TreeSubject};
pub use value::Value;
