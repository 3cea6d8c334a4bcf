// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{evaluate, RegisterExprError};
use crate::register::{Register, RegisterStore};

fn store_with(key: &str, register: Register) -> RegisterStore {
    let store = RegisterStore::new();
    store.set(key, register);
    store
}

#[test]
fn single_clause_changed_true() {
    let store = store_with(
        "k1",
        Register {
            changed: true,
            ..Default::default()
        },
    );
    assert_eq!(evaluate("k1.changed eq true", &store), Ok(true));
}

#[test]
fn single_clause_exit_code_mismatch() {
    let store = store_with(
        "k1",
        Register {
            exit_code: 1,
            ..Default::default()
        },
    );
    assert_eq!(evaluate("k1.exit_code eq 0", &store), Ok(false));
}

#[test]
fn neq_negates_eq() {
    let store = store_with(
        "k1",
        Register {
            exit_code: 1,
            ..Default::default()
        },
    );
    assert_eq!(evaluate("k1.exit_code neq 0", &store), Ok(true));
}

#[test]
fn two_clause_and_both_sides_evaluated() {
    let store = store_with(
        "k1",
        Register {
            changed: false,
            ..Default::default()
        },
    );
    // S6 from spec.md §8, literally: "a.changed eq true and a.exit_code eq 0".
    assert_eq!(
        evaluate("k1.changed eq false and k1.exit_code eq 0", &store),
        Ok(true)
    );
}

#[test]
fn scenario_s6_register_expression_law() {
    let store = store_with(
        "a",
        Register {
            changed: true,
            exit_code: 0,
            ..Default::default()
        },
    );
    assert_eq!(
        evaluate("a.changed eq true and a.exit_code eq 0", &store),
        Ok(true)
    );
    assert_eq!(evaluate("a.exit_code eq 1", &store), Ok(false));
}

#[yare::parameterized(
    // The stack-collapse reduction happens to agree with a naive
    // left-to-right boolean fold whenever every clause resolves to the
    // same truth value, which both of these fixtures deliberately do —
    // see the module doc comment for why the two readings otherwise
    // diverge on three-or-more-clause expressions.
    and_then_or_reduces_right_to_left = {
        "a.changed eq true and a.changed eq false or a.changed eq true", true
    },
    or_then_and_reduces_right_to_left = {
        "a.changed eq false or a.changed eq true and a.changed eq false", false
    },
)]
fn no_operator_precedence_preserves_the_odd_stack_collapse(expr: &str, expected: bool) {
    let store = store_with(
        "a",
        Register {
            changed: true,
            ..Default::default()
        },
    );
    assert_eq!(evaluate(expr, &store), Ok(expected));
}

#[test]
fn missing_register_is_an_error() {
    let store = RegisterStore::new();
    assert_eq!(
        evaluate("missing.changed eq true", &store),
        Err(RegisterExprError::RegisterNotFound("missing".into()))
    );
}

#[test]
fn unknown_field_is_an_error() {
    let store = store_with("k1", Register::default());
    assert_eq!(
        evaluate("k1.bogus eq true", &store),
        Err(RegisterExprError::UnknownField("bogus".into()))
    );
}

#[test]
fn empty_expression_is_an_error() {
    let store = RegisterStore::new();
    assert_eq!(evaluate("   ", &store), Err(RegisterExprError::Empty));
}

#[test]
fn bare_literal_compares_directly_no_quote_stripping() {
    let store = store_with(
        "k1",
        Register {
            stdout: "ready".into(),
            ..Default::default()
        },
    );
    assert_eq!(evaluate("k1.stdout eq ready", &store), Ok(true));
    assert_eq!(evaluate("k1.stdout eq notready", &store), Ok(false));
}

#[test]
fn dotted_token_with_more_than_one_dot_is_malformed() {
    let store = RegisterStore::new();
    assert_eq!(
        evaluate("a.b.c eq d", &store),
        Err(RegisterExprError::MalformedToken("a.b.c".into()))
    );
}

#[test]
fn single_dotted_token_alone_reads_as_an_unknown_field_once_resolved() {
    let store = store_with("a", Register::default());
    // "a.b" alone never reaches the collapse loop, but it still must
    // resolve through field lookup eagerly.
    assert_eq!(
        evaluate("a.b", &store),
        Err(RegisterExprError::UnknownField("b".into()))
    );
}

#[test]
fn never_panics_on_arbitrary_whitespace_tokenized_garbage() {
    let store = RegisterStore::new();
    let _ = evaluate("and or eq", &store);
    let _ = evaluate("a.b.c eq d and", &store);
    let _ = evaluate("eq", &store);
    let _ = evaluate("and and and", &store);
}

#[test]
fn non_boolean_final_result_is_an_error() {
    let store = RegisterStore::new();
    assert_eq!(
        evaluate("notaboolean", &store),
        Err(RegisterExprError::NonBooleanResult("notaboolean".into()))
    );
}
