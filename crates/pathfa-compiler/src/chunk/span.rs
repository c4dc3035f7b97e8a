//! Reachability queries over a chunk: epsilon closure, label steps and
//! simple-path spans used to locate splice points.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::ops::ControlFlow;

use super::{Edge, GraphChunk};
use crate::error::SpliceError;
use crate::state::StateId;

/// A simple path between two states of a chunk.
///
/// `edges` are indices into the chunk's edge list, in path order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubChunk {
    pub start: StateId,
    pub end: StateId,
    pub edges: Vec<usize>,
}

impl GraphChunk {
    /// States reachable from `seeds` through epsilon edges, seeds included.
    pub fn epsilon_closure(&self, seeds: impl IntoIterator<Item = StateId>) -> BTreeSet<StateId> {
        let mut closure = BTreeSet::new();
        let mut queue = VecDeque::new();
        for seed in seeds {
            if closure.insert(seed) {
                queue.push_back(seed);
            }
        }
        while let Some(state) = queue.pop_front() {
            for edge in self.outgoing(state).filter(|e| e.is_epsilon()) {
                if closure.insert(edge.child) {
                    queue.push_back(edge.child);
                }
            }
        }
        closure
    }

    /// Children of non-epsilon edges leaving `states` that accept `label`.
    pub fn step(&self, states: &BTreeSet<StateId>, label: &str) -> BTreeSet<StateId> {
        self.edges
            .iter()
            .filter(|e| states.contains(&e.parent) && e.label.accepts(label))
            .map(|e| e.child)
            .collect()
    }

    /// Every simple path spelling `labels`, with epsilon edges taken freely
    /// before, between and after the labels.
    pub fn sub_chunks<S: AsRef<str>>(&self, labels: &[S]) -> Vec<SubChunk> {
        let mut found = Vec::new();
        for origin in self.states() {
            let _ = self.walk_simple_paths(
                origin,
                |edge, consumed| {
                    if edge.is_epsilon() {
                        Some(consumed)
                    } else {
                        let label = labels.get(consumed)?;
                        edge.label.accepts(label.as_ref()).then_some(consumed + 1)
                    }
                },
                |state, consumed, path| {
                    if consumed == labels.len() && state != origin {
                        found.push(SubChunk {
                            start: origin,
                            end: state,
                            edges: path.to_vec(),
                        });
                    }
                    ControlFlow::Continue(())
                },
            );
        }
        found
    }

    /// Distinct `(start, end)` pairs of [`GraphChunk::sub_chunks`].
    pub fn spans<S: AsRef<str>>(&self, labels: &[S]) -> Vec<(StateId, StateId)> {
        let mut seen = HashSet::new();
        self.sub_chunks(labels)
            .into_iter()
            .map(|sub| (sub.start, sub.end))
            .filter(|span| seen.insert(*span))
            .collect()
    }

    /// The unique simple path from `from` to `to`, as edge indices.
    pub fn simple_path(&self, from: StateId, to: StateId) -> Result<Vec<usize>, SpliceError> {
        for state in [from, to] {
            if !self.contains(state) {
                return Err(SpliceError::UnknownState(state));
            }
        }
        if from == to {
            return Err(SpliceError::EmptySpan(from));
        }

        let mut found: Option<Vec<usize>> = None;
        let flow = self.walk_simple_paths(
            from,
            |_, consumed| Some(consumed),
            |state, _, path| {
                if state != to {
                    return ControlFlow::Continue(());
                }
                if found.is_some() {
                    return ControlFlow::Break(());
                }
                found = Some(path.to_vec());
                ControlFlow::Continue(())
            },
        );
        if flow.is_break() {
            return Err(SpliceError::AmbiguousSpan { from, to });
        }
        found.ok_or(SpliceError::NoSpan { from, to })
    }

    /// Depth-first walk over simple paths from `origin`.
    ///
    /// `advance` maps an edge and the current progress to the progress after
    /// taking it, or `None` to skip the edge. `visit` sees every state on
    /// arrival together with the edge path leading to it.
    fn walk_simple_paths(
        &self,
        origin: StateId,
        mut advance: impl FnMut(&Edge, usize) -> Option<usize>,
        mut visit: impl FnMut(StateId, usize, &[usize]) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let mut outgoing: HashMap<StateId, Vec<usize>> = HashMap::new();
        for (ix, edge) in self.edges.iter().enumerate() {
            outgoing.entry(edge.parent).or_default().push(ix);
        }

        let mut path: Vec<usize> = Vec::new();
        let mut on_path = HashSet::from([origin]);
        // (state, progress, next outgoing edge to try)
        let mut stack = vec![(origin, 0usize, 0usize)];
        visit(origin, 0, &path)?;

        while let Some(top) = stack.last_mut() {
            let (state, progress) = (top.0, top.1);
            let next = outgoing.get(&state).and_then(|out| out.get(top.2)).copied();
            let Some(ix) = next else {
                stack.pop();
                on_path.remove(&state);
                path.pop();
                continue;
            };
            top.2 += 1;

            let edge = &self.edges[ix];
            let Some(progress) = advance(edge, progress) else {
                continue;
            };
            if !on_path.insert(edge.child) {
                continue;
            }
            path.push(ix);
            stack.push((edge.child, progress, 0));
            visit(edge.child, progress, &path)?;
        }
        ControlFlow::Continue(())
    }
}
