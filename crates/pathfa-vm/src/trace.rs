//! Tracing infrastructure for debugging runs.
//!
//! `NoopTracer` methods are `#[inline(always)]` empty functions, so untraced
//! runs pay nothing. `PrintTracer` collects formatted lines for display or
//! assertions.

use pathfa_core::NodeIx;

use crate::StateSet;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Default: start sets, tree nodes and the verdict.
    #[default]
    Default,
    /// Verbose (-v): also every label step and fired hyper-edges.
    Verbose,
    /// Very verbose (-vv): also hyper-edges that did not fire.
    VeryVerbose,
}

/// Tracer trait for run instrumentation.
///
/// Each method is called at a specific point during execution:
/// - `trace_start` - with the starting state set of a path run
/// - `trace_step` - after a label is consumed
/// - `trace_node` - after a tree node's state set is computed
/// - `trace_hyper_edge` - after a hyper-edge was tested at a node
/// - `trace_accept` - with the final verdict
pub trait Tracer {
    fn trace_start(&mut self, states: &StateSet);

    fn trace_step(&mut self, label: &str, states: &StateSet);

    fn trace_node(&mut self, node: NodeIx, states: &StateSet);

    fn trace_hyper_edge(&mut self, node: NodeIx, edge: usize, fired: bool);

    fn trace_accept(&mut self, accepted: bool);
}

/// No-op tracer that gets optimized away completely.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_start(&mut self, _states: &StateSet) {}

    #[inline(always)]
    fn trace_step(&mut self, _label: &str, _states: &StateSet) {}

    #[inline(always)]
    fn trace_node(&mut self, _node: NodeIx, _states: &StateSet) {}

    #[inline(always)]
    fn trace_hyper_edge(&mut self, _node: NodeIx, _edge: usize, _fired: bool) {}

    #[inline(always)]
    fn trace_accept(&mut self, _accepted: bool) {}
}

/// Tracer collecting one line per event.
#[derive(Debug, Default)]
pub struct PrintTracer {
    verbosity: Verbosity,
    lines: Vec<String>,
}

impl PrintTracer {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Collected lines joined with newlines.
    pub fn dump(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    /// Print all buffered lines to stdout.
    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
    }
}

impl Tracer for PrintTracer {
    fn trace_start(&mut self, states: &StateSet) {
        self.lines.push(format!("start {}", format_set(states)));
    }

    fn trace_step(&mut self, label: &str, states: &StateSet) {
        if self.verbosity >= Verbosity::Verbose {
            self.lines.push(format!("step {label:?} {}", format_set(states)));
        }
    }

    fn trace_node(&mut self, node: NodeIx, states: &StateSet) {
        self.lines.push(format!("node {node} {}", format_set(states)));
    }

    fn trace_hyper_edge(&mut self, node: NodeIx, edge: usize, fired: bool) {
        let shown = if fired {
            self.verbosity >= Verbosity::Verbose
        } else {
            self.verbosity >= Verbosity::VeryVerbose
        };
        if shown {
            let outcome = if fired { "fired" } else { "idle" };
            self.lines.push(format!("hyper {edge} at node {node}: {outcome}"));
        }
    }

    fn trace_accept(&mut self, accepted: bool) {
        self.lines.push(if accepted { "accept" } else { "reject" }.to_owned());
    }
}

/// `{q0, q2}`, or `∅` for the empty set.
pub fn format_set(states: &StateSet) -> String {
    if states.is_empty() {
        return "∅".to_owned();
    }
    let items: Vec<_> = states.iter().map(|s| format!("q{s}")).collect();
    format!("{{{}}}", items.join(", "))
}
