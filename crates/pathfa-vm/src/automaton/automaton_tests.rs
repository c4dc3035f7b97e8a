//! Tests for automaton construction, closures and reversal.

use pathfa_compiler::{Compiler, Pattern, Role};
use pathfa_core::{LabelCondition, Value, ValueCondition};

use crate::error::BuildError;
use crate::test_utils::{automaton, path, word};
use crate::{AutomatonBuilder, PathAutomaton, StateSet};

#[test]
fn from_compiled_sequence() {
    let a = automaton(&word(&["a", "b"]));

    assert!(a.is_synchronous());
    insta::assert_snapshot!(a.dump(), @r#"
    q0: _ [initial] → "a" q1
    q1: _ → "b" q2
    q2: _ [final] → ∅
    "#);
}

#[test]
fn star_is_general() {
    let a = automaton(&Pattern::exact("a").star());

    assert!(!a.is_synchronous());
    assert_eq!(a.initial().len(), 1);
    assert_eq!(a.final_states().len(), 1);
}

#[test]
fn fragment_without_roles_is_rejected() {
    let mut compiler = Compiler::new();
    let chunk = compiler.compile_fragment(&Pattern::exact("a")).unwrap();

    let err = PathAutomaton::from_chunk(&chunk, compiler.arena()).unwrap_err();

    assert_eq!(err, BuildError::MissingBoundary { role: Role::Initial });
    assert_eq!(err.to_string(), "automaton has no initial state");
}

#[test]
fn builder_rejects_dangling_transition() {
    let mut b = AutomatonBuilder::new();
    let q0 = b.add_state(ValueCondition::Any);
    b.add_transition(q0, 7, LabelCondition::Wildcard);
    b.mark(Role::Initial, q0);
    b.mark(Role::Final, q0);

    assert_eq!(
        b.build().unwrap_err(),
        BuildError::DanglingEdge {
            parent: 0,
            child: 7
        }
    );
}

#[test]
fn builder_rejects_incompatible_epsilon() {
    let mut b = AutomatonBuilder::new();
    let q0 = b.add_state(ValueCondition::Eq(Value::from(1)));
    let q1 = b.add_state(ValueCondition::Eq(Value::from(2)));
    b.add_epsilon(q0, q1);
    b.mark(Role::Initial, q0);
    b.mark(Role::Final, q1);

    let err = b.build().unwrap_err();

    assert!(matches!(err, BuildError::IncompatibleEpsilon { parent: 0, child: 1, .. }));
    assert_eq!(
        err.to_string(),
        "epsilon transition q0 -> q1 joins incompatible values =1 and =2"
    );
}

#[test]
fn builder_rejects_role_on_missing_state() {
    let mut b = AutomatonBuilder::new();
    let q0 = b.add_state(ValueCondition::Any);
    b.mark(Role::Initial, q0);
    b.mark(Role::Final, 3);

    assert_eq!(b.build().unwrap_err(), BuildError::UnknownState(3));
}

#[test]
fn builder_drops_epsilon_self_loops() {
    let mut b = AutomatonBuilder::new();
    let q0 = b.add_state(ValueCondition::Any);
    b.add_epsilon(q0, q0);
    b.add_transition(q0, q0, LabelCondition::exact("a"));
    b.add_transition(q0, q0, LabelCondition::exact("a"));
    b.mark(Role::Initial, q0);
    b.mark(Role::Final, q0);

    let a = b.build().unwrap();

    assert!(a.is_synchronous());
    assert_eq!(a.transitions().len(), 1);
    assert!(a.matches(&path(&["a", "a"])));
}

#[test]
fn closure_is_idempotent() {
    let patterns = [
        Pattern::exact("a").star(),
        Pattern::sequence([Pattern::exact("a").optional(), Pattern::exact("b").star()]),
        Pattern::disjunction([word(&["a", "b"]).star(), Pattern::exact("c").plus()]),
    ];

    for pattern in &patterns {
        let a = automaton(pattern);
        for state in 0..a.state_count() as u32 {
            let once = a.epsilon_closure([state]);
            let twice = a.epsilon_closure(once.iter().copied());
            assert_eq!(once, twice);
            assert!(once.contains(&state));
        }
    }
}

#[test]
fn filtered_closure_stops_at_failing_states() {
    let mut b = AutomatonBuilder::new();
    let q0 = b.add_state(ValueCondition::Any);
    let q1 = b.add_state(ValueCondition::Any);
    let q2 = b.add_state(ValueCondition::Any);
    b.add_epsilon(q0, q1);
    b.add_epsilon(q1, q2);
    b.mark(Role::Initial, q0);
    b.mark(Role::Final, q2);
    b.mark(Role::Rooted, q1);
    let a = b.build().unwrap();

    assert_eq!(a.entry_closure([q0], true), StateSet::from([0, 1, 2]));
    assert_eq!(a.entry_closure([q0], false), StateSet::from([0]));
    assert_eq!(a.entry_closure([q1], false), StateSet::new());
    assert_eq!(a.epsilon_closure([q0]), StateSet::from([0, 1, 2]));
}

#[test]
fn step_follows_matching_labels_only() {
    let mut b = AutomatonBuilder::new();
    let q0 = b.add_state(ValueCondition::Any);
    let q1 = b.add_state(ValueCondition::Any);
    let q2 = b.add_state(ValueCondition::Any);
    let q3 = b.add_state(ValueCondition::Any);
    b.add_transition(q0, q1, LabelCondition::exact("a"));
    b.add_transition(q0, q2, LabelCondition::Wildcard);
    b.add_transition(q0, q3, LabelCondition::regex("a|b").unwrap());
    b.add_epsilon(q0, q1);
    b.mark(Role::Initial, q0);
    b.mark(Role::Final, q1);
    let a = b.build().unwrap();

    assert_eq!(a.step(&StateSet::from([q0]), "a"), StateSet::from([1, 2, 3]));
    assert_eq!(a.step(&StateSet::from([q0]), "b"), StateSet::from([2, 3]));
    assert_eq!(a.step(&StateSet::from([q0]), "ab"), StateSet::from([2]));
    assert_eq!(a.step(&StateSet::from([q1]), "a"), StateSet::new());
}

#[test]
fn reversal_swaps_ends() {
    let a = automaton(&word(&["a", "b"]));
    let r = a.reversed();

    insta::assert_snapshot!(r.dump(), @r#"
    q0: _ [final] → ∅
    q1: _ → "a" q0
    q2: _ [initial] → "b" q1
    "#);
    assert!(r.matches(&path(&["b", "a"])));
    assert!(!r.matches(&path(&["a", "b"])));
}

#[test]
fn reversal_keeps_anchor_roles() {
    let pattern = Pattern::from(
        pathfa_compiler::Atom::exact("a")
            .rooted()
            .terminal()
            .with_value(1),
    );
    let a = automaton(&pattern);
    let r = a.reversed();

    assert_eq!(r.roles().states(Role::Rooted), a.roles().states(Role::Rooted));
    assert_eq!(r.roles().states(Role::Terminal), a.roles().states(Role::Terminal));
    assert_eq!(r.initial(), a.final_states());
    assert_eq!(r.final_states(), a.initial());
}

#[test]
fn projection() {
    let mut b = AutomatonBuilder::new();
    let any = b.add_state(ValueCondition::Any);
    let one = b.add_state(ValueCondition::Eq(Value::from(1)));
    let also_one = b.add_state(ValueCondition::Eq(Value::from(1)));
    let two = b.add_state(ValueCondition::Eq(Value::from(2)));
    b.mark(Role::Initial, any);
    b.mark(Role::Final, two);
    let a = b.build().unwrap();

    assert!(a.projects_onto(any, two));
    assert!(a.projects_onto(one, also_one));
    assert!(!a.projects_onto(one, two));
    assert!(!a.projects_onto(one, any));
}

#[test]
fn import_shifts_states() {
    let inner = automaton(&word(&["a", "b"]));
    let mut b = AutomatonBuilder::new();
    let head = b.add_state(ValueCondition::Any);

    let imported = b.import(&inner);

    assert_eq!(imported.offset, 1);
    assert_eq!(imported.initial, StateSet::from([1]));
    assert_eq!(imported.finals, StateSet::from([3]));
    assert_eq!(imported.state(2), 3);

    b.add_transition(head, imported.state(0), LabelCondition::exact("x"));
    b.mark(Role::Initial, head);
    for &f in &imported.finals {
        b.mark(Role::Final, f);
    }
    let a = b.build().unwrap();

    assert!(a.matches(&path(&["x", "a", "b"])));
    assert!(!a.matches(&path(&["a", "b"])));
}
