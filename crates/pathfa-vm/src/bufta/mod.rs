//! Bottom-up tree automata.
//!
//! A [`Bufta`] is a path automaton oriented from leaves to the root, plus
//! hyper-edges joining the states offered by several children of one node.
//!
//! # Evaluation
//!
//! Nodes are evaluated in post-order, each exactly once:
//! - leaf: initial states closed under the exit filter
//! - one child: one path step over the child's label, plus the children of
//!   `SemiTwig` hyper-edges the child satisfies, then closure
//! - several children: every hyper-edge is tested against the post-edge
//!   candidates of all children; children of fired edges are closed
//! - root: hyper-edge candidates and the closure honor the entry filter
//!
//! A run accepts when a final state survives at the root.

mod compile;
mod dump;
mod hyper;
mod run;


use pathfa_compiler::Role;
use pathfa_core::{EdgeCondition, LabelCondition, ValueCondition};

use crate::automaton::{AutomatonBuilder, Imported, PathAutomaton};
use crate::error::BuildError;
use crate::{StateIx, StateSet};

pub use hyper::MixedRadix;
pub use run::{Binding, FiredEdge, TreeMatcher, TreeRun};

/// Transition from one parent state per child position into `child`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HyperEdge {
    pub parents: Vec<StateIx>,
    pub child: StateIx,
    pub condition: EdgeCondition,
}

#[derive(Clone, Debug)]
pub struct Bufta {
    automaton: PathAutomaton,
    hyper_edges: Vec<HyperEdge>,
    /// Children of hyper-edges with at least two parents.
    fta_children: StateSet,
    horizontally_nondeterministic: bool,
}

impl Bufta {
    pub fn builder() -> BuftaBuilder {
        BuftaBuilder::new()
    }

    pub fn automaton(&self) -> &PathAutomaton {
        &self.automaton
    }

    pub fn hyper_edges(&self) -> &[HyperEdge] {
        &self.hyper_edges
    }

    pub fn fta_children(&self) -> &StateSet {
        &self.fta_children
    }

    /// True when the child of a multi-parent hyper-edge reaches, through
    /// path transitions, a parent of a multi-parent hyper-edge. Evaluation
    /// stays correct either way; callers that need one hyper-edge layer per
    /// subtree should check this.
    pub fn is_horizontally_nondeterministic(&self) -> bool {
        self.horizontally_nondeterministic
    }
}

/// Builder for [`Bufta`]. Path automata are imported as fragments; nothing is
/// checked until [`build`].
///
/// [`build`]: BuftaBuilder::build
#[derive(Debug, Default)]
pub struct BuftaBuilder {
    paths: AutomatonBuilder,
    hyper_edges: Vec<HyperEdge>,
}

impl BuftaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self, value: ValueCondition) -> StateIx {
        self.paths.add_state(value)
    }

    pub fn add_transition(&mut self, parent: StateIx, child: StateIx, label: LabelCondition) {
        self.paths.add_transition(parent, child, label);
    }

    pub fn add_epsilon(&mut self, parent: StateIx, child: StateIx) {
        self.paths.add_epsilon(parent, child);
    }

    pub fn mark(&mut self, role: Role, state: StateIx) {
        self.paths.mark(role, state);
    }

    pub fn unmark(&mut self, role: Role, state: StateIx) {
        self.paths.unmark(role, state);
    }

    /// Copy a path automaton; see [`AutomatonBuilder::import`].
    pub fn import(&mut self, automaton: &PathAutomaton) -> Imported {
        self.paths.import(automaton)
    }

    /// Returns the hyper-edge's index.
    pub fn add_hyper_edge(
        &mut self,
        parents: impl IntoIterator<Item = StateIx>,
        child: StateIx,
        condition: EdgeCondition,
    ) -> usize {
        self.hyper_edges.push(HyperEdge {
            parents: parents.into_iter().collect(),
            child,
            condition,
        });
        self.hyper_edges.len() - 1
    }

    pub fn build(self) -> Result<Bufta, BuildError> {
        let count = self.paths.state_count() as StateIx;
        for edge in &self.hyper_edges {
            if edge.parents.is_empty() {
                return Err(BuildError::EmptyHyperEdge { child: edge.child });
            }
            if let Some(&state) = edge
                .parents
                .iter()
                .chain([&edge.child])
                .find(|&&s| s >= count)
            {
                return Err(BuildError::UnknownState(state));
            }
        }

        let automaton = self.paths.build()?;
        let fta_children: StateSet = self
            .hyper_edges
            .iter()
            .filter(|e| e.parents.len() >= 2)
            .map(|e| e.child)
            .collect();
        if let Some(t) = automaton
            .transitions()
            .iter()
            .find(|t| fta_children.contains(&t.child) && !fta_children.contains(&t.parent))
        {
            return Err(BuildError::HyperEdgeBypass {
                parent: t.parent,
                child: t.child,
            });
        }

        let horizontally_nondeterministic = feeds_hyper_edge(&automaton, &self.hyper_edges);
        Ok(Bufta {
            automaton,
            hyper_edges: self.hyper_edges,
            fta_children,
            horizontally_nondeterministic,
        })
    }
}

/// Depth-first search from every multi-parent child over path transitions,
/// one shared visited set.
fn feeds_hyper_edge(automaton: &PathAutomaton, hyper_edges: &[HyperEdge]) -> bool {
    let multi = || hyper_edges.iter().filter(|e| e.parents.len() >= 2);
    let parents: StateSet = multi().flat_map(|e| e.parents.iter().copied()).collect();
    let mut visited = StateSet::new();
    let mut stack: Vec<StateIx> = multi().map(|e| e.child).collect();
    while let Some(state) = stack.pop() {
        if !visited.insert(state) {
            continue;
        }
        if parents.contains(&state) {
            return true;
        }
        stack.extend(automaton.outgoing(state).map(|t| t.child));
    }
    false
}
