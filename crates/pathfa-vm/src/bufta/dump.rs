//! Dump helper for tree automata.

use std::fmt::Write;

use super::Bufta;

impl Bufta {
    /// The path automaton's dump followed by one line per hyper-edge.
    pub fn dump(&self) -> String {
        let mut out = self.automaton.dump();
        for (ix, edge) in self.hyper_edges.iter().enumerate() {
            let parents: Vec<_> = edge.parents.iter().map(|p| format!("q{p}")).collect();
            writeln!(
                out,
                "h{ix}: {} [{}] → q{}",
                edge.condition,
                parents.join(", "),
                edge.child
            )
            .expect("String write never fails");
        }
        out
    }
}
