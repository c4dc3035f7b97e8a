//! Tree patterns to tree automata.
//!
//! Every path of the pattern is compiled on its own and reversed, so the
//! automaton reads labels from the leaves up. The final states of a reversed
//! path are its "tops": the states reached once the path's first label has
//! been consumed from below.
//!
//! - `Path(p)` below an edge `e`: `e` and `p` compile as one sequence
//! - a branch below an edge: the branch's tops feed the edge's path through
//!   epsilon transitions
//! - a branch with two or more edges joins the tops of its edges with one
//!   hyper-edge into a fresh state, which becomes the branch's only top

use pathfa_compiler::{Compiler, Pattern, Role, TreeEdge, TreePattern};
use pathfa_core::ValueCondition;

use super::{Bufta, BuftaBuilder};
use crate::automaton::PathAutomaton;
use crate::{StateIx, StateSet};

impl Bufta {
    /// Compile a tree pattern. The pattern's root matches the tree's root.
    pub fn compile(compiler: &mut Compiler, pattern: &TreePattern) -> crate::Result<Self> {
        let mut builder = BuftaBuilder::new();
        let tops = compile_tree(compiler, &mut builder, pattern)?;
        for top in tops {
            builder.mark(Role::Final, top);
        }
        Ok(builder.build()?)
    }
}

fn compile_tree(
    compiler: &mut Compiler,
    builder: &mut BuftaBuilder,
    pattern: &TreePattern,
) -> crate::Result<StateSet> {
    match pattern {
        TreePattern::Path(path) => import_leaf_path(compiler, builder, path),
        TreePattern::Branch { edges, condition } => match edges.as_slice() {
            [] => import_leaf_path(compiler, builder, &Pattern::sequence([])),
            [edge] => compile_edge(compiler, builder, edge),
            _ => {
                let mut parents = Vec::with_capacity(edges.len());
                for edge in edges {
                    let tops = compile_edge(compiler, builder, edge)?;
                    parents.push(join(builder, tops));
                }
                let child = builder.add_state(ValueCondition::Any);
                builder.add_hyper_edge(parents, child, *condition);
                Ok(StateSet::from([child]))
            }
        },
    }
}

fn compile_edge(
    compiler: &mut Compiler,
    builder: &mut BuftaBuilder,
    edge: &TreeEdge,
) -> crate::Result<StateSet> {
    match &edge.subtree {
        TreePattern::Path(below) => {
            let whole = Pattern::sequence([edge.path.clone(), below.clone()]);
            import_leaf_path(compiler, builder, &whole)
        }
        branch @ TreePattern::Branch { .. } => {
            let below = compile_tree(compiler, builder, branch)?;
            let imported = builder.import(&reversed_path(compiler, &edge.path)?);
            for &top in &below {
                for &entry in &imported.initial {
                    builder.add_epsilon(top, entry);
                }
            }
            Ok(imported.finals)
        }
    }
}

/// Import a path that ends at a leaf; its lower end becomes initial.
fn import_leaf_path(
    compiler: &mut Compiler,
    builder: &mut BuftaBuilder,
    path: &Pattern,
) -> crate::Result<StateSet> {
    let imported = builder.import(&reversed_path(compiler, path)?);
    for &state in &imported.initial {
        builder.mark(Role::Initial, state);
    }
    Ok(imported.finals)
}

fn reversed_path(compiler: &mut Compiler, path: &Pattern) -> crate::Result<PathAutomaton> {
    let mut chunk = compiler.compile_fragment(path)?;
    chunk.mark(Role::Initial, chunk.start())?;
    chunk.mark(Role::Final, chunk.end())?;
    Ok(PathAutomaton::from_chunk(&chunk, compiler.arena())?.reversed())
}

/// One parent state for a child position.
fn join(builder: &mut BuftaBuilder, tops: StateSet) -> StateIx {
    if let [top] = tops.iter().copied().collect::<Vec<_>>()[..] {
        return top;
    }
    let joined = builder.add_state(ValueCondition::Any);
    for top in tops {
        builder.add_epsilon(top, joined);
    }
    joined
}
