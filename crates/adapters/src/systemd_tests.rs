// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::fake::{FakeSystemdAdapter, SystemdCall};
use super::*;

#[tokio::test]
async fn fake_records_each_operation() {
    let adapter = FakeSystemdAdapter::new();
    adapter.reload_daemon().await.unwrap();
    adapter.start_service("nginx").await.unwrap();
    adapter.stop_service("nginx").await.unwrap();
    adapter.restart_service("nginx").await.unwrap();
    adapter.reload_service("nginx").await.unwrap();

    assert_eq!(
        adapter.calls(),
        vec![
            SystemdCall::ReloadDaemon,
            SystemdCall::Start("nginx".into()),
            SystemdCall::Stop("nginx".into()),
            SystemdCall::Restart("nginx".into()),
            SystemdCall::Reload("nginx".into()),
        ]
    );
}

#[tokio::test]
async fn fake_can_be_configured_to_fail_a_unit() {
    let adapter = FakeSystemdAdapter::new();
    adapter.fail_unit("broken");
    let err = adapter.start_service("broken").await.unwrap_err();
    assert!(matches!(err, SystemdError::CommandFailed(_, unit, _, _) if unit == "broken"));
    assert!(adapter.start_service("ok").await.is_ok());
}

#[tokio::test]
async fn real_adapter_reports_nonzero_exit_as_command_failed() {
    use crate::subprocess::{CommandOutput, FakeSubprocessRunner};
    use std::sync::Arc;

    let runner = Arc::new(FakeSubprocessRunner::new());
    runner.on_argv(
        "systemctl",
        CommandOutput {
            stdout: String::new(),
            stderr: "unit not found".into(),
            exit_code: 5,
        },
    );
    let adapter = RealSystemdAdapter::new(runner);
    let err = adapter.start_service("ghost").await.unwrap_err();
    match err {
        SystemdError::CommandFailed(verb, unit, code, stderr) => {
            assert_eq!(verb, "start");
            assert_eq!(unit, "ghost");
            assert_eq!(code, 5);
            assert_eq!(stderr, "unit not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
