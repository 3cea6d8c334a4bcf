// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use forgecfg_adapters::subprocess::{CommandOutput, FakeSubprocessRunner};
use forgecfg_core::{Register, RegisterStore, WhenGuard};

use super::*;

#[tokio::test]
async fn absent_guard_always_proceeds() {
    let store = RegisterStore::new();
    let runner = FakeSubprocessRunner::new();
    assert!(check(None, &store, &runner, Duration::from_secs(1))
        .await
        .is_ok());
}

#[tokio::test]
async fn rvar_guard_delegates_to_register_expression() {
    let store = RegisterStore::new();
    store.set(
        "a",
        Register {
            changed: true,
            ..Default::default()
        },
    );
    let runner = FakeSubprocessRunner::new();
    let guard = WhenGuard {
        rvar: Some("a.changed eq true".to_string()),
        ..Default::default()
    };
    assert!(check(Some(&guard), &store, &runner, Duration::from_secs(1))
        .await
        .is_ok());
}

#[tokio::test]
async fn rvar_guard_false_is_when_not_satisfied() {
    let store = RegisterStore::new();
    store.set("a", Register::default());
    let runner = FakeSubprocessRunner::new();
    let guard = WhenGuard {
        rvar: Some("a.changed eq true".to_string()),
        ..Default::default()
    };
    let err = check(Some(&guard), &store, &runner, Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::WhenNotSatisfied));
    assert_eq!(err.to_string(), "whenNotSatisfied");
}

#[tokio::test]
async fn cmd_guard_checks_exit_code() {
    let store = RegisterStore::new();
    let runner = FakeSubprocessRunner::new();
    runner.on_shell(
        "test -f /tmp",
        CommandOutput {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
        },
    );
    let guard = WhenGuard {
        cmd: Some("test -f /tmp".to_string()),
        exit_code: 0,
        ..Default::default()
    };
    assert!(check(Some(&guard), &store, &runner, Duration::from_secs(1))
        .await
        .is_ok());
}

#[tokio::test]
async fn cmd_guard_mismatched_exit_code_is_when_not_satisfied() {
    let store = RegisterStore::new();
    let runner = FakeSubprocessRunner::new();
    runner.on_shell(
        "false",
        CommandOutput {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 1,
        },
    );
    let guard = WhenGuard {
        cmd: Some("false".to_string()),
        exit_code: 0,
        ..Default::default()
    };
    let err = check(Some(&guard), &store, &runner, Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::WhenNotSatisfied));
}
