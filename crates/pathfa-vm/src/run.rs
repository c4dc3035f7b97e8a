//! Path runs.
//!
//! Two strategies share one verdict:
//! - general: epsilon closure before every step, entry filter on the initial
//!   closure, exit filter on the final closure
//! - synchronous: plain steps over an epsilon-free automaton, filters applied
//!   to the initial and final sets directly
//!
//! The strategy follows [`PathAutomaton::is_synchronous`].

use pathfa_compiler::{Compiler, Pattern};
use pathfa_core::Path;

use crate::automaton::PathAutomaton;
use crate::error::RuntimeError;
use crate::fuel::{Fuel, FuelLimits};
use crate::trace::{NoopTracer, Tracer};
use crate::StateSet;

/// Runs one automaton against paths under fuel limits.
#[derive(Clone, Copy, Debug)]
pub struct PathMatcher<'a> {
    automaton: &'a PathAutomaton,
    limits: FuelLimits,
}

impl<'a> PathMatcher<'a> {
    pub fn new(automaton: &'a PathAutomaton) -> Self {
        Self {
            automaton,
            limits: FuelLimits::default(),
        }
    }

    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Run without tracing.
    pub fn run(&self, path: &Path) -> Result<bool, RuntimeError> {
        self.run_with(path, &mut NoopTracer)
    }

    /// Run with a tracer. Each consumed label costs one unit of fuel.
    pub fn run_with<T: Tracer>(&self, path: &Path, tracer: &mut T) -> Result<bool, RuntimeError> {
        let mut fuel = Fuel::new(&self.limits);
        let accepted = if self.automaton.is_synchronous() {
            run_synchronous(self.automaton, path, &mut fuel, tracer)?
        } else {
            run_general(self.automaton, path, &mut fuel, tracer)?
        };
        tracer.trace_accept(accepted);
        Ok(accepted)
    }
}

impl PathAutomaton {
    /// Compile `pattern` and finalize the resulting chunk.
    pub fn compile(compiler: &mut Compiler, pattern: &Pattern) -> crate::Result<Self> {
        let chunk = compiler.compile(pattern)?;
        Ok(Self::from_chunk(&chunk, compiler.arena())?)
    }

    /// Verdict without limits.
    pub fn matches(&self, path: &Path) -> bool {
        matches!(
            PathMatcher::new(self).limits(FuelLimits::unlimited()).run(path),
            Ok(true)
        )
    }
}

fn run_general<T: Tracer>(
    automaton: &PathAutomaton,
    path: &Path,
    fuel: &mut Fuel,
    tracer: &mut T,
) -> Result<bool, RuntimeError> {
    let initial = automaton.initial().iter().copied();
    let value = path.value();
    let terminal = path.is_terminal();

    let Some((last, init)) = path.labels().split_last() else {
        let closure = automaton.closure_where(initial, |s| {
            automaton.passes_entry(s, path.is_rooted()) && automaton.passes_exit(s, value, terminal)
        });
        tracer.trace_start(&closure);
        return Ok(closure.iter().any(|&s| automaton.is_final(s)));
    };

    let mut current = automaton.entry_closure(initial, path.is_rooted());
    tracer.trace_start(&current);
    for label in init {
        fuel.consume()?;
        let stepped = automaton.step(&current, label);
        tracer.trace_step(label, &stepped);
        if stepped.is_empty() {
            return Ok(false);
        }
        current = automaton.epsilon_closure(stepped);
    }

    fuel.consume()?;
    let stepped = automaton.step(&current, last);
    tracer.trace_step(last, &stepped);
    let closure = automaton.exit_closure(stepped, value, terminal);
    Ok(closure.iter().any(|&s| automaton.is_final(s)))
}

fn run_synchronous<T: Tracer>(
    automaton: &PathAutomaton,
    path: &Path,
    fuel: &mut Fuel,
    tracer: &mut T,
) -> Result<bool, RuntimeError> {
    let mut current: StateSet = automaton
        .initial()
        .iter()
        .copied()
        .filter(|&s| automaton.passes_entry(s, path.is_rooted()))
        .collect();
    tracer.trace_start(&current);

    for label in path.labels() {
        if current.is_empty() {
            return Ok(false);
        }
        fuel.consume()?;
        current = automaton.step(&current, label);
        tracer.trace_step(label, &current);
    }

    Ok(current.iter().any(|&s| {
        automaton.is_final(s) && automaton.passes_exit(s, path.value(), path.is_terminal())
    }))
}
