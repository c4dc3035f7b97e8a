//! Tree runs.

use pathfa_core::{EdgeCondition, NodeIx, TreeSubject};

use super::Bufta;
use super::hyper::evaluate;
use crate::error::RuntimeError;
use crate::fuel::{Fuel, FuelLimits};
use crate::trace::{NoopTracer, Tracer};
use crate::{StateIx, StateSet};

/// One entry per child of the node: the parent state it was matched to, or
/// `None` for a child the hyper-edge ignores.
pub type Binding = Vec<Option<StateIx>>;

/// A hyper-edge that fired at a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FiredEdge {
    pub node: NodeIx,
    /// Index into [`Bufta::hyper_edges`].
    pub edge: usize,
    /// Satisfying assignments, deduplicated. Empty unless bindings were
    /// requested with [`TreeMatcher::bindings`].
    pub bindings: Vec<Binding>,
}

/// Outcome of a tree run.
#[derive(Clone, Debug)]
pub struct TreeRun {
    states: Vec<StateSet>,
    fired: Vec<FiredEdge>,
    accepted: bool,
}

impl TreeRun {
    /// States reached at `node`.
    pub fn states(&self, node: NodeIx) -> &StateSet {
        &self.states[node as usize]
    }

    /// Fired hyper-edges in evaluation order.
    pub fn fired(&self) -> &[FiredEdge] {
        &self.fired
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }
}

/// Runs one tree automaton against trees under fuel limits.
#[derive(Clone, Copy, Debug)]
pub struct TreeMatcher<'a> {
    bufta: &'a Bufta,
    limits: FuelLimits,
    bindings: bool,
}

impl<'a> TreeMatcher<'a> {
    pub fn new(bufta: &'a Bufta) -> Self {
        Self {
            bufta,
            limits: FuelLimits::default(),
            bindings: false,
        }
    }

    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Collect every satisfying assignment of fired hyper-edges instead of
    /// stopping at the first one.
    pub fn bindings(mut self, collect: bool) -> Self {
        self.bindings = collect;
        self
    }

    pub fn run<S: TreeSubject + ?Sized>(&self, tree: &S) -> Result<TreeRun, RuntimeError> {
        self.run_with(tree, &mut NoopTracer)
    }

    /// Run with a tracer. Each node and each tested assignment costs one
    /// unit of fuel.
    pub fn run_with<S, T>(&self, tree: &S, tracer: &mut T) -> Result<TreeRun, RuntimeError>
    where
        S: TreeSubject + ?Sized,
        T: Tracer,
    {
        let automaton = self.bufta.automaton();
        let mut fuel = Fuel::new(&self.limits);
        let mut states = vec![StateSet::new(); tree.node_count()];
        let mut fired = Vec::new();
        let root = tree.root();
        let rooted = tree.is_rooted();

        let mut worklist = vec![(root, false)];
        while let Some((node, expanded)) = worklist.pop() {
            let children = tree.children(node);
            if !expanded {
                worklist.push((node, true));
                worklist.extend(children.iter().rev().map(|&c| (c, false)));
                continue;
            }

            fuel.consume()?;
            let at_root = node == root;
            let keep = |s: StateIx| !at_root || automaton.passes_entry(s, rooted);
            let reached = match children {
                [] => {
                    let (value, terminal) = (tree.value(node), tree.is_terminal(node));
                    automaton.closure_where(automaton.initial().iter().copied(), |s| {
                        keep(s) && automaton.passes_exit(s, value, terminal)
                    })
                }
                [child] => {
                    let stepped = self.step(tree, *child, &states);
                    let candidates = [automaton.closure_where(stepped.iter().copied(), keep)];
                    let mut seeds =
                        self.fire(node, &candidates, true, &mut fuel, tracer, &mut fired)?;
                    seeds.extend(stepped);
                    automaton.closure_where(seeds, keep)
                }
                _ => {
                    if children.len() > self.limits.branching_limit as usize {
                        return Err(RuntimeError::BranchingLimitExceeded {
                            node,
                            children: children.len(),
                        });
                    }
                    let candidates: Vec<StateSet> = children
                        .iter()
                        .map(|&c| automaton.closure_where(self.step(tree, c, &states), keep))
                        .collect();
                    let seeds = self.fire(node, &candidates, false, &mut fuel, tracer, &mut fired)?;
                    automaton.closure_where(seeds, keep)
                }
            };
            tracer.trace_node(node, &reached);
            states[node as usize] = reached;
        }

        let accepted = states[root as usize]
            .iter()
            .any(|&s| automaton.is_final(s));
        tracer.trace_accept(accepted);
        Ok(TreeRun {
            states,
            fired,
            accepted,
        })
    }

    /// Test hyper-edges against per-child candidates and collect the child
    /// states of those that fire. With `semi_twig_only` set, other conditions
    /// are skipped: a single child can only satisfy an at-most condition.
    fn fire<T: Tracer>(
        &self,
        node: NodeIx,
        candidates: &[StateSet],
        semi_twig_only: bool,
        fuel: &mut Fuel,
        tracer: &mut T,
        fired: &mut Vec<FiredEdge>,
    ) -> Result<StateSet, RuntimeError> {
        let mut seeds = StateSet::new();
        for (ix, edge) in self.bufta.hyper_edges().iter().enumerate() {
            if semi_twig_only && edge.condition != EdgeCondition::SemiTwig {
                continue;
            }
            let outcome = evaluate(edge, candidates, self.bindings, fuel)?;
            tracer.trace_hyper_edge(node, ix, outcome.fired);
            if outcome.fired {
                seeds.insert(edge.child);
                fired.push(FiredEdge {
                    node,
                    edge: ix,
                    bindings: outcome.bindings,
                });
            }
        }
        Ok(seeds)
    }

    /// Path step from `child` over the label of the edge entering it.
    fn step<S: TreeSubject + ?Sized>(
        &self,
        tree: &S,
        child: NodeIx,
        states: &[StateSet],
    ) -> StateSet {
        match tree.label(child) {
            Some(label) => self.bufta.automaton().step(&states[child as usize], label),
            None => StateSet::new(),
        }
    }
}

impl Bufta {
    /// Verdict without limits.
    pub fn matches<S: TreeSubject + ?Sized>(&self, tree: &S) -> bool {
        TreeMatcher::new(self)
            .limits(FuelLimits::unlimited())
            .run(tree)
            .is_ok_and(|run| run.is_accepted())
    }
}
