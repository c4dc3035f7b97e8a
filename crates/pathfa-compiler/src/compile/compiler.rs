//! Core compiler state and entry points.

use pathfa_core::ValueCondition;

use super::quantifier::apply_quantifier;
use crate::ast::{Atom, Pattern, PatternKind};
use crate::chunk::GraphChunk;
use crate::error::CompileError;
use crate::roles::Role;
use crate::splice::{RewriteHook, SpliceEnv};
use crate::state::StateArena;

/// Compiles pattern ASTs into chunks over one shared state arena.
#[derive(Default)]
pub struct Compiler {
    arena: StateArena,
    hook: Option<Box<dyn RewriteHook>>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a rewriting hook run by [`Compiler::compile`].
    pub fn with_hook(mut self, hook: impl RewriteHook + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn arena(&self) -> &StateArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut StateArena {
        &mut self.arena
    }

    /// Compile a top-level pattern.
    ///
    /// The start becomes initial, the end final, then the rewriting hook (if
    /// any) gets to splice the chunk.
    pub fn compile(&mut self, pattern: &Pattern) -> Result<GraphChunk, CompileError> {
        let mut chunk = compile_pattern(&mut self.arena, pattern)?;
        let (start, end) = (chunk.start(), chunk.end());
        chunk.mark(Role::Initial, start)?;
        chunk.mark(Role::Final, end)?;

        if let Some(hook) = self.hook.as_mut() {
            let mut env = SpliceEnv::new(&mut self.arena);
            hook.rewrite(&mut chunk, &mut env)?;
        }
        Ok(chunk)
    }

    /// Compile a nested pattern: no roles are assigned and no hook runs.
    pub fn compile_fragment(&mut self, pattern: &Pattern) -> Result<GraphChunk, CompileError> {
        compile_pattern(&mut self.arena, pattern)
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("states", &self.arena.len())
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

pub(crate) fn compile_pattern(
    arena: &mut StateArena,
    pattern: &Pattern,
) -> Result<GraphChunk, CompileError> {
    let chunk = match &pattern.kind {
        PatternKind::Atom(atom) => compile_atom(arena, atom)?,
        PatternKind::Sequence(items) => compile_sequence(arena, items)?,
        PatternKind::Disjunction(branches) => compile_disjunction(arena, branches)?,
    };
    apply_quantifier(arena, chunk, pattern.quantifier)
}

fn compile_atom(arena: &mut StateArena, atom: &Atom) -> Result<GraphChunk, CompileError> {
    let value = atom
        .value
        .clone()
        .map_or(ValueCondition::Any, ValueCondition::Eq);
    let chunk = match &atom.label {
        None => GraphChunk::one_state(arena, atom.rooted, atom.terminal, value),
        Some(label) => {
            GraphChunk::one_edge(arena, atom.rooted, label.to_condition()?, atom.terminal, value)
        }
    };
    Ok(chunk)
}

fn compile_sequence(arena: &mut StateArena, items: &[Pattern]) -> Result<GraphChunk, CompileError> {
    let Some((first, rest)) = items.split_first() else {
        return Ok(GraphChunk::one_state(arena, false, false, ValueCondition::Any));
    };
    let mut chunk = compile_pattern(arena, first)?;
    for item in rest {
        let next = compile_pattern(arena, item)?;
        chunk.concat(arena, next)?;
    }
    Ok(chunk)
}

fn compile_disjunction(
    arena: &mut StateArena,
    branches: &[Pattern],
) -> Result<GraphChunk, CompileError> {
    match branches {
        [] => Ok(GraphChunk::disconnected(arena)),
        [only] => compile_pattern(arena, only),
        [first, rest @ ..] => {
            let mut chunk = compile_pattern(arena, first)?;
            chunk.funnel_if_needed(arena);
            for branch in rest {
                let mut next = compile_pattern(arena, branch)?;
                next.funnel_if_needed(arena);
                chunk.glue(arena, next)?;
            }
            Ok(chunk)
        }
    }
}
