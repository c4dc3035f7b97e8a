//! Test helpers: compiled automata and subject enumeration.

use pathfa_compiler::{Compiler, Pattern};
use pathfa_core::{Path, Value};

use crate::PathAutomaton;

pub fn automaton(pattern: &Pattern) -> PathAutomaton {
    PathAutomaton::compile(&mut Compiler::new(), pattern).expect("pattern should compile")
}

/// Sequence of exact-label atoms.
pub fn word(labels: &[&str]) -> Pattern {
    Pattern::sequence(labels.iter().map(|l| Pattern::exact(*l)))
}

pub fn path(labels: &[&str]) -> Path {
    Path::new(labels.iter().copied())
}

/// Every label sequence over `alphabet` up to `max_len` labels.
pub fn label_sequences(alphabet: &[&str], max_len: usize) -> Vec<Vec<String>> {
    let mut all = vec![Vec::new()];
    let mut frontier: Vec<Vec<String>> = vec![Vec::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for seq in &frontier {
            for label in alphabet {
                let mut longer = seq.clone();
                longer.push((*label).to_owned());
                next.push(longer);
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

/// Every label sequence combined with every rooted/terminal flag and leaf
/// value choice.
pub fn subjects(alphabet: &[&str], max_len: usize, values: &[Option<Value>]) -> Vec<Path> {
    let mut out = Vec::new();
    for labels in label_sequences(alphabet, max_len) {
        for rooted in [false, true] {
            for terminal in [false, true] {
                for value in values {
                    let mut p = Path::new(labels.clone()).rooted(rooted).terminal(terminal);
                    if let Some(v) = value {
                        p = p.with_value(v.clone());
                    }
                    out.push(p);
                }
            }
        }
    }
    out
}
