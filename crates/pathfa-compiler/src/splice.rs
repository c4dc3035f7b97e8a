//! Splice point for external rewriting.
//!
//! A [`RewriteHook`] receives the freshly compiled top-level chunk and a
//! [`SpliceEnv`] through which it can compile sub-patterns and glue them in at
//! located boundary states, without knowing how chunks are represented.

use crate::StateId;
use crate::ast::Pattern;
use crate::chunk::GraphChunk;
use crate::compile::compile_pattern;
use crate::error::{CompileError, SpliceError};
use crate::roles::Role;
use crate::state::StateArena;

/// Callback run by `Compiler::compile` after roles are assigned.
pub trait RewriteHook {
    fn rewrite(
        &mut self,
        chunk: &mut GraphChunk,
        env: &mut SpliceEnv<'_>,
    ) -> Result<(), CompileError>;
}

impl<F> RewriteHook for F
where
    F: FnMut(&mut GraphChunk, &mut SpliceEnv<'_>) -> Result<(), CompileError>,
{
    fn rewrite(
        &mut self,
        chunk: &mut GraphChunk,
        env: &mut SpliceEnv<'_>,
    ) -> Result<(), CompileError> {
        self(chunk, env)
    }
}

/// Compilation environment handed to a [`RewriteHook`].
pub struct SpliceEnv<'a> {
    arena: &'a mut StateArena,
}

impl<'a> SpliceEnv<'a> {
    pub(crate) fn new(arena: &'a mut StateArena) -> Self {
        Self { arena }
    }

    pub fn arena(&self) -> &StateArena {
        &*self.arena
    }

    /// Compile a sub-pattern as a nested fragment.
    pub fn compile(&mut self, pattern: &Pattern) -> Result<GraphChunk, CompileError> {
        compile_pattern(self.arena, pattern)
    }

    /// Glue `sub` in parallel with the span `start..end` of `chunk`.
    ///
    /// The span must be a single simple path; anything else is rejected
    /// rather than resolved by picking one of several paths.
    pub fn glue_path(
        &mut self,
        chunk: &mut GraphChunk,
        start: StateId,
        end: StateId,
        sub: &Pattern,
    ) -> Result<(), CompileError> {
        chunk.simple_path(start, end)?;
        let sub = self.compile_funneled(sub)?;
        let (sub_start, sub_end) = (sub.start(), sub.end());
        chunk.absorb(sub)?;
        chunk.merge_state(self.arena, sub_start, start)?;
        chunk.merge_state(self.arena, sub_end, end)
    }

    /// Attach `sub` at `start` with an open end: the end of `sub` becomes
    /// final, so any match of `sub` from `start` completes the pattern.
    pub fn glue_path_existential(
        &mut self,
        chunk: &mut GraphChunk,
        start: StateId,
        sub: &Pattern,
    ) -> Result<(), CompileError> {
        if !chunk.contains(start) {
            return Err(SpliceError::UnknownState(start).into());
        }
        let sub = self.compile_funneled(sub)?;
        let (sub_start, sub_end) = (sub.start(), sub.end());
        chunk.absorb(sub)?;
        chunk.merge_state(self.arena, sub_start, start)?;
        chunk.mark(Role::Final, sub_end)
    }

    fn compile_funneled(&mut self, sub: &Pattern) -> Result<GraphChunk, CompileError> {
        let mut sub = compile_pattern(self.arena, sub)?;
        sub.funnel_if_needed(self.arena);
        Ok(sub)
    }
}
