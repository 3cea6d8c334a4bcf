// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box smoke tests for the `forgecfg` example binary: invoke the
//! compiled binary and assert on its stdout/stderr/exit code, the way the
//! teacher's CLI specs exercise its own binary.

use std::io::Write;

use assert_cmd::Command;
use tempfile::NamedTempFile;

fn forgecfg() -> Command {
    Command::cargo_bin("forgecfg").expect("forgecfg binary should build")
}

fn write_task_list(body: &serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tempfile should create");
    file.write_all(serde_json::to_string(body).unwrap().as_bytes())
        .expect("write should succeed");
    file
}

#[test]
fn no_args_shows_usage_and_fails() {
    forgecfg().assert().failure().stderr(predicates::str::contains("Usage"));
}

#[test]
fn help_shows_usage() {
    forgecfg()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("Usage"));
}

#[test]
fn version_flag_succeeds() {
    forgecfg().arg("--version").assert().success();
}

#[test]
fn running_a_passing_task_list_prints_success() {
    let body = serde_json::json!({
        "tasks": {
            "smoke": [
                {
                    "action": "cmd",
                    "name": "say-hello",
                    "command": ["/bin/true"],
                    "exit_code": 0,
                    "timeout": 5,
                }
            ]
        },
        "priority": ["smoke"],
    });
    let config = write_task_list(&body);

    forgecfg()
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("Performed all tasks successfully"));
}

#[test]
fn running_a_failing_task_list_exits_nonzero() {
    let body = serde_json::json!({
        "tasks": {
            "smoke": [
                {
                    "action": "cmd",
                    "name": "say-hello",
                    "command": ["/bin/false"],
                    "exit_code": 0,
                    "timeout": 5,
                }
            ]
        },
        "priority": ["smoke"],
    });
    let config = write_task_list(&body);

    forgecfg().arg(config.path()).assert().failure();
}

#[test]
fn malformed_config_path_fails_with_context() {
    forgecfg()
        .arg("/nonexistent/path/to/config.json")
        .assert()
        .failure()
        .stderr(predicates::str::contains("cannot read"));
}

#[test]
fn streaming_mode_prints_events_and_succeeds() {
    let body = serde_json::json!({
        "tasks": {
            "smoke": [
                {
                    "action": "cmd",
                    "name": "say-hello",
                    "command": ["/bin/true"],
                    "exit_code": 0,
                    "timeout": 5,
                }
            ]
        },
        "priority": ["smoke"],
    });
    let config = write_task_list(&body);

    forgecfg()
        .arg("--mode")
        .arg("streaming")
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("INFO:"));
}
