//! Tests for path runs.

use indoc::indoc;
use pathfa_compiler::{Atom, Pattern, Quantifier};
use pathfa_core::Path;

use crate::error::RuntimeError;
use crate::test_utils::{automaton, path, subjects, word};
use crate::{FuelLimits, PathMatcher, PrintTracer, Verbosity};

#[test]
fn sequence() {
    let a = automaton(&word(&["a", "b", "c"]));

    assert!(a.matches(&path(&["a", "b", "c"])));
    assert!(!a.matches(&path(&["a", "b"])));
    assert!(!a.matches(&path(&["a", "c"])));
}

#[test]
fn star_and_plus() {
    let star = automaton(&Pattern::exact("a").star());
    let plus = automaton(&Pattern::exact("a").plus());

    assert!(star.matches(&path(&[])));
    assert!(star.matches(&path(&["a"])));
    assert!(star.matches(&path(&["a", "a", "a"])));
    assert!(!star.matches(&path(&["b"])));

    assert!(!plus.matches(&path(&[])));
    assert!(plus.matches(&path(&["a"])));
    assert!(plus.matches(&path(&["a", "a", "a"])));
}

#[test]
fn disjunction_then_label() {
    let a = automaton(&Pattern::sequence([
        Pattern::disjunction([Pattern::exact("a"), Pattern::exact("b")]),
        Pattern::exact("c"),
    ]));

    assert!(a.matches(&path(&["a", "c"])));
    assert!(a.matches(&path(&["b", "c"])));
    assert!(!a.matches(&path(&["c"])));
    assert!(!a.matches(&path(&["a"])));
}

#[test]
fn bounded_repetition() {
    let q = Quantifier::between(2, 3).unwrap();
    let a = automaton(&Pattern::exact("a").quantified(q));

    assert!(!a.matches(&path(&["a"])));
    assert!(a.matches(&path(&["a", "a"])));
    assert!(a.matches(&path(&["a", "a", "a"])));
    assert!(!a.matches(&path(&["a", "a", "a", "a"])));
}

#[test]
fn anchored_valued_leaf() {
    let a = automaton(&Atom::exact("a").rooted().terminal().with_value(5).into());
    let leaf = || path(&["a"]).rooted(true);

    assert!(a.matches(&leaf().terminal(true).with_value(5)));
    assert!(!a.matches(&leaf().terminal(false).with_value(5)));
    assert!(!a.matches(&leaf().terminal(true).with_value(6)));
    assert!(!a.matches(&leaf().terminal(true)));
    assert!(!a.matches(&path(&["a"]).terminal(true).with_value(5)));
}

#[test]
fn value_on_empty_path() {
    let a = automaton(&Atom::empty().with_value("x").into());

    assert!(a.matches(&Path::default().with_value("x")));
    assert!(!a.matches(&Path::default().with_value("y")));
    assert!(!a.matches(&Path::default()));
}

#[test]
fn terminal_state_behind_epsilon() {
    // The terminal requirement sits after an optional suffix.
    let pattern = Pattern::sequence([
        Pattern::exact("a"),
        Pattern::from(Atom::exact("b").terminal()).optional(),
    ]);
    let a = automaton(&pattern);

    assert!(!a.is_synchronous());
    assert!(a.matches(&path(&["a"])));
    assert!(a.matches(&path(&["a"]).terminal(true)));
    assert!(!a.matches(&path(&["a", "b"])));
    assert!(a.matches(&path(&["a", "b"]).terminal(true)));
}

#[test]
fn terminal_branch_followed_by_more_labels() {
    let plain = automaton(&Pattern::sequence([
        Atom::exact("a").terminal().into(),
        Pattern::exact("c").optional(),
    ]));
    let branched = automaton(&Pattern::sequence([
        Pattern::disjunction([Atom::exact("a").terminal().into(), Pattern::exact("b")]),
        Pattern::exact("c").optional(),
    ]));

    for subject in [path(&["a"]), path(&["a"]).terminal(true), path(&["a", "c"])] {
        assert_eq!(plain.matches(&subject), branched.matches(&subject), "{subject:?}");
    }
    assert!(branched.matches(&path(&["a"])));
}

#[test]
fn rooted_patterns_reject_unrooted_paths() {
    let patterns = [
        Pattern::sequence([Atom::exact("a").rooted().into(), Pattern::exact("b")]),
        Pattern::sequence([
            Pattern::disjunction([
                Atom::exact("a").rooted().into(),
                Atom::exact("b").rooted().into(),
            ]),
            Pattern::exact("c").star(),
        ]),
        Pattern::from(Atom::wildcard().rooted()).plus(),
    ];

    for pattern in &patterns {
        let general = automaton(pattern);
        let synchronous = general.to_synchronous();
        for subject in subjects(&["a", "b", "c"], 3, &[None]) {
            if subject.is_rooted() {
                continue;
            }
            assert!(!general.matches(&subject), "{pattern:?} on {subject:?}");
            assert!(!synchronous.matches(&subject), "{pattern:?} on {subject:?}");
        }
    }
}

#[test]
fn one_one_quantifier_is_identity() {
    let patterns = [
        Pattern::exact("a"),
        word(&["a", "b"]),
        Pattern::disjunction([Pattern::exact("a"), Pattern::exact("b").star()]),
    ];

    for pattern in patterns {
        let plain = automaton(&pattern);
        let once = automaton(&pattern.clone().quantified(Quantifier::ONE));
        for subject in subjects(&["a", "b"], 3, &[None]) {
            assert_eq!(plain.matches(&subject), once.matches(&subject));
        }
    }
}

#[test]
fn fixed_repetitions_are_within_unbounded() {
    let star = automaton(&Pattern::exact("a").star());
    for n in 1..=4 {
        let fixed = automaton(&Pattern::exact("a").quantified(Quantifier::exactly(n)));
        let at_least = automaton(&Pattern::exact("a").quantified(Quantifier::at_least(n)));
        for subject in subjects(&["a", "b"], 5, &[None]) {
            if fixed.matches(&subject) {
                assert!(star.matches(&subject), "a{{{n}}} vs a*: {subject:?}");
                assert!(at_least.matches(&subject), "a{{{n}}} vs a{{{n},}}: {subject:?}");
            }
        }
    }
}

#[test]
fn fuel_exhaustion() {
    let a = automaton(&word(&["a", "b", "c"]));
    let subject = path(&["a", "b", "c"]);

    let starved = PathMatcher::new(&a).limits(FuelLimits::new().exec_fuel(2));
    assert_eq!(starved.run(&subject), Err(RuntimeError::ExecFuelExhausted));

    let enough = PathMatcher::new(&a).limits(FuelLimits::new().exec_fuel(3));
    assert_eq!(enough.run(&subject), Ok(true));
}

#[test]
fn fuel_exhaustion_general() {
    let a = automaton(&Pattern::exact("a").star());
    let subject = path(&["a", "a", "a"]);

    let starved = PathMatcher::new(&a).limits(FuelLimits::new().exec_fuel(2));
    assert_eq!(starved.run(&subject), Err(RuntimeError::ExecFuelExhausted));
    assert!(a.matches(&subject));
}

#[test]
fn trace_accepting_run() {
    let a = automaton(&word(&["a", "b"]));
    let mut tracer = PrintTracer::new(Verbosity::Verbose);

    let accepted = PathMatcher::new(&a)
        .run_with(&path(&["a", "b"]), &mut tracer)
        .unwrap();

    assert!(accepted);
    assert_eq!(
        tracer.dump(),
        indoc! {r#"
            start {q0}
            step "a" {q1}
            step "b" {q2}
            accept
        "#}
    );
}

#[test]
fn trace_rejecting_run() {
    let a = automaton(&word(&["a", "b"]));
    let mut tracer = PrintTracer::new(Verbosity::Verbose);

    let accepted = PathMatcher::new(&a)
        .run_with(&path(&["a", "c"]), &mut tracer)
        .unwrap();

    assert!(!accepted);
    insta::assert_snapshot!(tracer.dump(), @r#"
    start {q0}
    step "a" {q1}
    step "c" ∅
    reject
    "#);
}

#[test]
fn trace_default_verbosity_hides_steps() {
    let a = automaton(&word(&["a", "b"]));
    let mut tracer = PrintTracer::new(Verbosity::Default);

    PathMatcher::new(&a)
        .run_with(&path(&["a", "b"]), &mut tracer)
        .unwrap();

    assert_eq!(tracer.lines(), ["start {q0}", "accept"]);
}
