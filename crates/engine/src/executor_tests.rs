// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;
use std::sync::Arc;

use forgecfg_adapters::{EmbeddedAssetSource, FakeSubprocessRunner, FakeSystemdAdapter, LocalAssetSource};
use forgecfg_core::{Action, ActionKind, EnvSnapshot, FactTable, TaskList, WhenGuard};
use serde_json::{json, Value};
use tokio::sync::mpsc::unbounded_channel;

use super::*;

fn cmd_action(name: &str, command: &str, exit_code: i64, ignore_error: bool) -> Action {
    Action {
        kind: ActionKind::Cmd,
        name: name.to_string(),
        when: None,
        command: Some(vec![command.to_string()]),
        exit_code,
        ignore_error,
        action_var: Value::Null,
        timeout: 5,
        register: None,
        backup_src: None,
    }
}

fn deps() -> ExecutorDeps {
    deps_with_subprocess(FakeSubprocessRunner::new())
}

fn deps_with_subprocess(subprocess: FakeSubprocessRunner) -> ExecutorDeps {
    ExecutorDeps {
        store: RegisterStore::new(),
        collaborators: Collaborators {
            subprocess: Arc::new(subprocess),
            systemd: Arc::new(FakeSystemdAdapter::new()),
            assets_local: Arc::new(LocalAssetSource::new("/")),
            assets_embed: Arc::new(EmbeddedAssetSource::new()),
        },
        template_config: Value::Null,
        facts: FactTable::new(),
        env: EnvSnapshot::default(),
        enable_wizard_facts: false,
    }
}

#[tokio::test]
async fn s1_basic_ordering_emits_one_info_per_action_in_order() {
    let mut tasks = HashMap::new();
    tasks.insert(
        "hydra".to_string(),
        vec![cmd_action("a1", "/bin/true", 0, false), cmd_action("a2", "/bin/true", 0, false)],
    );
    tasks.insert("hydra2".to_string(), vec![cmd_action("a3", "/bin/true", 0, false)]);
    let task_list = TaskList {
        tasks,
        priority: vec!["hydra".to_string(), "hydra2".to_string()],
    };

    let d = deps();
    let (tx, mut rx) = unbounded_channel();
    run(&task_list, &d, &tx).await.unwrap();
    drop(tx);

    let mut events = Vec::new();
    while let Some(e) = rx.recv().await {
        events.push(e);
    }
    assert_eq!(events.len(), 3);
    for e in &events {
        assert!(matches!(e, LogEvent::Info { .. }));
    }
    assert!(events[0].message().contains("a1"));
    assert!(events[1].message().contains("a2"));
    assert!(events[2].message().contains("a3"));
}

#[tokio::test]
async fn s2_when_not_satisfied_is_non_fatal() {
    let mut action = cmd_action("a1", "/bin/true", 0, false);
    action.when = Some(WhenGuard {
        cmd: Some("/bin/false".to_string()),
        rvar: None,
        exit_code: 0,
    });
    let mut action2 = cmd_action("a2", "/bin/true", 0, false);
    action2.when = Some(WhenGuard {
        cmd: Some("/bin/false".to_string()),
        rvar: None,
        exit_code: 0,
    });

    let mut tasks = HashMap::new();
    tasks.insert("hydra".to_string(), vec![action, action2]);
    let task_list = TaskList {
        tasks,
        priority: vec!["hydra".to_string()],
    };

    let runner = FakeSubprocessRunner::new();
    runner.on_shell(
        "/bin/false",
        forgecfg_adapters::CommandOutput {
            exit_code: 1,
            ..Default::default()
        },
    );
    let d = deps_with_subprocess(runner);

    let (tx, mut rx) = unbounded_channel();
    run(&task_list, &d, &tx).await.unwrap();
    drop(tx);

    let mut warns = 0;
    while let Some(e) = rx.recv().await {
        if matches!(e, LogEvent::Warn { .. }) {
            warns += 1;
        }
    }
    assert_eq!(warns, 2);
}

#[tokio::test]
async fn s3_ignore_error_is_non_fatal() {
    let action = cmd_action("a1", "/bin/true", 1, true);
    let mut tasks = HashMap::new();
    tasks.insert("hydra".to_string(), vec![action]);
    let task_list = TaskList {
        tasks,
        priority: vec!["hydra".to_string()],
    };

    let d = deps();
    let (tx, mut rx) = unbounded_channel();
    let result = run(&task_list, &d, &tx).await;
    drop(tx);
    assert!(result.is_ok());

    let mut saw_error = false;
    while let Some(e) = rx.recv().await {
        if matches!(e, LogEvent::Error { .. }) {
            saw_error = true;
        }
    }
    assert!(saw_error);
}

#[tokio::test]
async fn s4_fatal_error_propagates_and_aborts_remaining_actions() {
    let failing = cmd_action("a1", "/bin/true", 1, false);
    let never_runs = cmd_action("a2", "/bin/true", 0, false);
    let mut tasks = HashMap::new();
    tasks.insert("hydra".to_string(), vec![failing, never_runs]);
    let task_list = TaskList {
        tasks,
        priority: vec!["hydra".to_string()],
    };

    let d = deps();
    let (tx, mut rx) = unbounded_channel();
    let result = run(&task_list, &d, &tx).await;
    drop(tx);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("a1"));

    let mut infos = 0;
    while let Some(e) = rx.recv().await {
        if matches!(e, LogEvent::Info { .. }) {
            infos += 1;
        }
    }
    assert_eq!(infos, 1, "a2 must never start after a1's fatal failure");
}

#[tokio::test]
async fn task_absent_from_tasks_map_is_a_silent_noop() {
    let task_list = TaskList {
        tasks: HashMap::new(),
        priority: vec!["ghost".to_string()],
    };
    let d = deps();
    let (tx, mut rx) = unbounded_channel();
    run(&task_list, &d, &tx).await.unwrap();
    drop(tx);
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn register_collision_lets_later_action_overwrite_earlier_result() {
    let mut first = cmd_action("dup", "/bin/true", 0, false);
    first.register = Some("shared".to_string());
    let mut second = cmd_action("dup", "/bin/true", 1, false);
    second.register = Some("shared".to_string());
    second.ignore_error = true;

    let mut tasks = HashMap::new();
    tasks.insert("hydra".to_string(), vec![first, second]);
    let task_list = TaskList {
        tasks,
        priority: vec!["hydra".to_string()],
    };

    let d = deps();
    let store = d.store.clone();
    let (tx, _rx) = unbounded_channel();
    run(&task_list, &d, &tx).await.unwrap();

    let reg = store.get("shared").unwrap();
    assert!(!reg.changed);
}
