//! Dump helper for automaton inspection and snapshot tests.

use std::fmt::Write;

use super::PathAutomaton;
use crate::StateIx;

impl PathAutomaton {
    /// One line per state: value condition, roles, outgoing transitions in
    /// insertion order.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    fn format(&self, w: &mut String) -> std::fmt::Result {
        for state in 0..self.state_count() as StateIx {
            write!(w, "q{}: {}", state, self.value(state))?;

            let roles: Vec<_> = self.roles().roles_of(state).map(|r| r.to_string()).collect();
            if !roles.is_empty() {
                write!(w, " [{}]", roles.join(" "))?;
            }

            let succs: Vec<_> = self
                .outgoing(state)
                .map(|t| format!("{} q{}", t.label, t.child))
                .collect();
            if succs.is_empty() {
                writeln!(w, " → ∅")?;
            } else {
                writeln!(w, " → {}", succs.join(", "))?;
            }
        }
        Ok(())
    }
}
