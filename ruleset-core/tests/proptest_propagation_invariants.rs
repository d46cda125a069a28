//! Property-based invariant tests for cells, expressions and delegates.
//!
//! These tests verify invariants that must hold for any sequence of
//! assignments:
//!
//! 1. Assigning the current value changes nothing and fires nothing.
//! 2. Delegate calls equal 1 + the number of actual transitions.
//! 3. Logical expressions match their truth tables.
//! 4. Delegate tuples follow source declaration order.
//! 5. The graph is settled after every assignment.

use std::sync::Arc;

use parking_lot::Mutex;
use proptest::prelude::*;

use ruleset_core::{Ruleset, Value};

// ── Helpers ─────────────────────────────────────────────────────────────

fn small_ints() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..4, 0..40)
}

fn transitions(start: i64, seq: &[i64]) -> usize {
    let mut current = start;
    let mut count = 0;
    for &v in seq {
        if v != current {
            count += 1;
            current = v;
        }
    }
    count
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn equal_assignment_is_inert(start in 0i64..4) {
        let mut rules = Ruleset::new();
        let x = rules.cell("x", start).unwrap();
        let not_x = rules.not(x).unwrap();
        let d = rules.delegate(&[not_x, x], |_| {}).unwrap();

        let before = rules.value(not_x).unwrap().clone();
        prop_assert!(!rules.set(x, start).unwrap());
        prop_assert_eq!(rules.value(x).unwrap(), &Value::Int(start));
        prop_assert_eq!(rules.value(not_x).unwrap(), &before);
        prop_assert_eq!(rules.fire_count(d).unwrap(), 1);
    }

    #[test]
    fn delegate_calls_track_transitions(start in 0i64..4, seq in small_ints()) {
        let mut rules = Ruleset::new();
        let x = rules.cell("x", start).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let d = rules
            .delegate(&[x], move |values| sink.lock().push(values[0].as_int().unwrap()))
            .unwrap();

        for &v in &seq {
            rules.set(x, v).unwrap();
        }

        let expected = 1 + transitions(start, &seq);
        prop_assert_eq!(rules.fire_count(d).unwrap(), expected);

        let seen = seen.lock();
        prop_assert_eq!(seen.len(), expected);
        prop_assert!(seen.windows(2).all(|w| w[0] != w[1]));
        prop_assert_eq!(seen.last().copied(), Some(*seq.last().unwrap_or(&start)));
    }

    #[test]
    fn logical_truth_tables(a in 0i64..=1, b in 0i64..=1) {
        let mut rules = Ruleset::new();
        let ca = rules.cell("a", 1 - a).unwrap();
        let cb = rules.cell("b", 1 - b).unwrap();
        let and = rules.and(ca, cb).unwrap();
        let or = rules.or(ca, cb).unwrap();
        let eq = rules.equals(ca, cb).unwrap();
        let not_a = rules.not(ca).unwrap();

        rules.set(ca, a).unwrap();
        rules.set(cb, b).unwrap();

        prop_assert_eq!(rules.value(and).unwrap(), &Value::Bool(a == 1 && b == 1));
        prop_assert_eq!(rules.value(or).unwrap(), &Value::Bool(a == 1 || b == 1));
        prop_assert_eq!(rules.value(eq).unwrap(), &Value::Bool(a == b));
        prop_assert_eq!(rules.value(not_a).unwrap(), &Value::Bool(a == 0));
    }

    #[test]
    fn delegate_tuples_keep_declaration_order(
        ops in prop::collection::vec((any::<bool>(), 0i64..100), 1..30),
    ) {
        let mut rules = Ruleset::new();
        let x = rules.cell("x", -1).unwrap();
        let y = rules.cell("y", -2).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        rules
            .delegate(&[x, y], move |values| {
                sink.lock().push((values[0].as_int().unwrap(), values[1].as_int().unwrap()))
            })
            .unwrap();

        let (mut cur_x, mut cur_y) = (-1, -2);
        for (assign_x, v) in ops {
            if assign_x {
                rules.set(x, v).unwrap();
                cur_x = v;
            } else {
                rules.set(y, v).unwrap();
                cur_y = v;
            }
            prop_assert_eq!(seen.lock().last().copied(), Some((cur_x, cur_y)));
        }
    }

    #[test]
    fn graph_is_settled_after_every_assignment(seq in small_ints()) {
        let mut rules = Ruleset::new();
        let a = rules.cell("a", 0).unwrap();
        let b = rules.cell("b", 1).unwrap();
        let total = rules.sum(&[a, b]).unwrap();
        let scaled = rules.product(&[total, b]).unwrap();
        let same = rules.equals(total, scaled).unwrap();
        let either = rules.or(same, a).unwrap();
        rules.not(either).unwrap();

        for (i, &v) in seq.iter().enumerate() {
            let target = if i % 2 == 0 { a } else { b };
            rules.set(target, v).unwrap();
            prop_assert!(rules.is_settled());
        }
        prop_assert!(rules.topological_order().is_some());
    }
}
