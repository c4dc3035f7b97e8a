//! Tests for epsilon elimination: the synchronous automaton must agree with
//! the general strategy on every subject.

use pathfa_compiler::{Atom, Pattern, Quantifier, Role};
use pathfa_core::{LabelCondition, Value, ValueCondition};

use crate::test_utils::{automaton, path, subjects, word};
use crate::{AutomatonBuilder, PathAutomaton};

fn assert_agree(general: &PathAutomaton, alphabet: &[&str], max_len: usize) {
    let synchronous = general.to_synchronous();
    assert!(synchronous.is_synchronous());

    let values = [None, Some(Value::from(1)), Some(Value::from(2))];
    for subject in subjects(alphabet, max_len, &values) {
        assert_eq!(
            general.matches(&subject),
            synchronous.matches(&subject),
            "strategies disagree on {subject:?}\n{}",
            general.dump()
        );
    }
}

#[test]
fn already_synchronous_is_unchanged() {
    let a = automaton(&word(&["a", "b"]));

    assert_eq!(a.to_synchronous().dump(), a.dump());
}

#[test]
fn lifted_edges_and_guard_twin() {
    let mut b = AutomatonBuilder::new();
    let q0 = b.add_state(ValueCondition::Any);
    let q1 = b.add_state(ValueCondition::Any);
    let q2 = b.add_state(ValueCondition::Eq(Value::from(5)));
    b.add_transition(q0, q1, LabelCondition::exact("a"));
    b.add_epsilon(q1, q2);
    b.mark(Role::Initial, q0);
    b.mark(Role::Final, q2);
    b.mark(Role::Terminal, q2);
    let general = b.build().unwrap();

    let synchronous = general.to_synchronous();

    insta::assert_snapshot!(synchronous.dump(), @r#"
    q0: _ → "a" q1, "a" q4
    q1: _ → ∅
    q2: _ → ∅
    q3: _ [initial] → "a" q1, "a" q4
    q4: =5 [final terminal] → ∅
    "#);
    let leaf = path(&["a"]).terminal(true);
    assert!(synchronous.matches(&leaf.clone().with_value(5)));
    assert!(!synchronous.matches(&leaf.with_value(6)));
    assert!(!synchronous.matches(&path(&["a"]).with_value(5)));
}

#[test]
fn subsumed_guards_get_no_twin() {
    // Two epsilon routes to the final state: one needs `=1`, the other
    // needs `=1` and a terminal subject. Only the weaker one remains.
    let mut b = AutomatonBuilder::new();
    let q0 = b.add_state(ValueCondition::Any);
    let q1 = b.add_state(ValueCondition::Any);
    let q2 = b.add_state(ValueCondition::Eq(Value::from(1)));
    let q3 = b.add_state(ValueCondition::Eq(Value::from(1)));
    let q4 = b.add_state(ValueCondition::Any);
    b.add_transition(q0, q1, LabelCondition::exact("a"));
    b.add_epsilon(q1, q2);
    b.add_epsilon(q1, q3);
    b.add_epsilon(q2, q4);
    b.add_epsilon(q3, q4);
    b.mark(Role::Initial, q0);
    b.mark(Role::Final, q4);
    b.mark(Role::Terminal, q3);
    let general = b.build().unwrap();

    let synchronous = general.to_synchronous();

    let twins_of_q1: Vec<_> = synchronous
        .transitions()
        .iter()
        .filter(|t| t.parent == 0 && t.child != q1)
        .map(|t| t.child)
        .collect();
    assert_eq!(twins_of_q1.len(), 1);
    let twin = twins_of_q1[0];
    assert_eq!(synchronous.value(twin), &ValueCondition::Eq(Value::from(1)));
    assert!(!synchronous.roles().contains(Role::Terminal, twin));
    assert_agree(&general, &["a"], 2);
}

#[test]
fn conflicting_values_on_one_route_are_dead() {
    let mut b = AutomatonBuilder::new();
    let q0 = b.add_state(ValueCondition::Any);
    let q1 = b.add_state(ValueCondition::Eq(Value::from(1)));
    let q2 = b.add_state(ValueCondition::Any);
    let q3 = b.add_state(ValueCondition::Eq(Value::from(2)));
    b.add_transition(q0, q1, LabelCondition::exact("a"));
    b.add_epsilon(q1, q2);
    b.add_epsilon(q2, q3);
    b.mark(Role::Initial, q0);
    b.mark(Role::Final, q3);
    let general = b.build().unwrap();

    let synchronous = general.to_synchronous();

    assert!(synchronous.final_states().is_empty());
    assert!(!general.matches(&path(&["a"]).with_value(1)));
    assert!(!general.matches(&path(&["a"]).with_value(2)));
    assert_agree(&general, &["a"], 2);
}

#[test]
fn rooted_entries() {
    let pattern = Pattern::sequence([
        Pattern::from(Atom::exact("a").rooted()).optional(),
        Pattern::exact("b"),
    ]);
    let general = automaton(&pattern);
    let synchronous = general.to_synchronous();

    let entries = synchronous.initial();
    let rooted_entries: Vec<_> = entries
        .iter()
        .filter(|&&s| synchronous.roles().contains(Role::Rooted, s))
        .collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(rooted_entries.len(), 1);

    assert!(synchronous.matches(&path(&["a", "b"]).rooted(true)));
    assert!(!synchronous.matches(&path(&["a", "b"])));
    assert!(synchronous.matches(&path(&["b"])));
    assert_agree(&general, &["a", "b"], 3);
}

#[test]
fn strategies_agree_on_compiled_patterns() {
    let valued = |label: &str, v: i64| Pattern::from(Atom::exact(label).with_value(v));
    let patterns = [
        word(&["a", "b", "c"]),
        Pattern::exact("a").star(),
        Pattern::exact("a").plus(),
        Pattern::exact("a").optional(),
        Pattern::exact("a").quantified(Quantifier::between(2, 3).unwrap()),
        Pattern::exact("a").quantified(Quantifier::at_least(2)),
        Pattern::exact("a").quantified(Quantifier::exactly(0)),
        Pattern::sequence([
            Pattern::disjunction([Pattern::exact("a"), Pattern::exact("b")]),
            Pattern::exact("c"),
        ]),
        Pattern::disjunction([Pattern::exact("a"), Pattern::exact("b")]).star(),
        Pattern::sequence([Pattern::exact("a").star(), Pattern::exact("b").star()]),
        word(&["a", "b"]).star(),
        Pattern::sequence([Pattern::exact("a").optional()]).star(),
        Pattern::sequence([Atom::exact("a").rooted().into(), Pattern::exact("b").star()]),
        Pattern::from(Atom::wildcard().rooted()).star(),
        Pattern::sequence([
            Pattern::exact("a"),
            Pattern::from(Atom::exact("b").terminal()).optional(),
        ]),
        Pattern::disjunction([valued("a", 1), valued("a", 2).plus()]),
        Pattern::sequence([Pattern::exact("a").star(), Atom::empty().with_value(1).into()]),
        Pattern::disjunction([
            Atom::empty().with_value(1).into(),
            Atom::empty().terminal().with_value(2).into(),
            Atom::empty().rooted().into(),
        ]),
        Pattern::sequence([
            Pattern::from(Atom::regex("a|b")).star(),
            Pattern::from(Atom::exact("c").terminal()).optional(),
        ]),
        Pattern::disjunction([]),
    ];

    for pattern in &patterns {
        assert_agree(&automaton(pattern), &["a", "b", "c"], 4);
    }
}
