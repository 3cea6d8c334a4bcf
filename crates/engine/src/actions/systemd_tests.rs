// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use forgecfg_adapters::{FakeSubprocessRunner, FakeSystemdAdapter, LocalAssetSource};
use forgecfg_core::RegisterStore;
use tokio::sync::mpsc::unbounded_channel;

use super::*;

fn ctx(systemd: Arc<FakeSystemdAdapter>) -> ActionCtx {
    let (tx, _rx) = unbounded_channel();
    ActionCtx {
        agent: "task1".to_string(),
        register: "reg".to_string(),
        timeout: Duration::from_secs(5),
        store: RegisterStore::new(),
        subprocess: Arc::new(FakeSubprocessRunner::new()),
        systemd,
        assets_local: Arc::new(LocalAssetSource::new("/")),
        assets_embed: Arc::new(LocalAssetSource::new("/")),
        template_config: serde_json::Value::Null,
        facts: Default::default(),
        env: Default::default(),
        enable_wizard_facts: false,
        log: tx,
    }
}

#[tokio::test]
async fn start_dispatches_start_without_reload() {
    let systemd = Arc::new(FakeSystemdAdapter::new());
    let action = SystemdAction {
        vars: SystemdVars {
            name: "nginx".to_string(),
            state: "start".to_string(),
            daemon_reload: false,
        },
    };
    let c = ctx(systemd.clone());
    action.execute(&c).await.unwrap();
    assert_eq!(
        systemd.calls(),
        vec![forgecfg_adapters::systemd::SystemdCall::Start("nginx".to_string())]
    );
    assert!(c.store.get("reg").unwrap().changed);
}

#[tokio::test]
async fn daemon_reload_runs_before_restart() {
    let systemd = Arc::new(FakeSystemdAdapter::new());
    let action = SystemdAction {
        vars: SystemdVars {
            name: "nginx".to_string(),
            state: "restart".to_string(),
            daemon_reload: true,
        },
    };
    let c = ctx(systemd.clone());
    action.execute(&c).await.unwrap();
    assert_eq!(
        systemd.calls(),
        vec![
            forgecfg_adapters::systemd::SystemdCall::ReloadDaemon,
            forgecfg_adapters::systemd::SystemdCall::Restart("nginx".to_string()),
        ]
    );
}

#[tokio::test]
async fn stop_dispatches_stop() {
    let systemd = Arc::new(FakeSystemdAdapter::new());
    let action = SystemdAction {
        vars: SystemdVars {
            name: "nginx".to_string(),
            state: "stop".to_string(),
            daemon_reload: false,
        },
    };
    let c = ctx(systemd.clone());
    action.execute(&c).await.unwrap();
    assert_eq!(
        systemd.calls(),
        vec![forgecfg_adapters::systemd::SystemdCall::Stop("nginx".to_string())]
    );
}

#[tokio::test]
async fn reload_dispatches_reload() {
    let systemd = Arc::new(FakeSystemdAdapter::new());
    let action = SystemdAction {
        vars: SystemdVars {
            name: "nginx".to_string(),
            state: "reload".to_string(),
            daemon_reload: false,
        },
    };
    let c = ctx(systemd.clone());
    action.execute(&c).await.unwrap();
    assert_eq!(
        systemd.calls(),
        vec![forgecfg_adapters::systemd::SystemdCall::Reload("nginx".to_string())]
    );
}

#[tokio::test]
async fn failing_unit_propagates_error() {
    let systemd = Arc::new(FakeSystemdAdapter::new());
    systemd.fail_unit("nginx");
    let action = SystemdAction {
        vars: SystemdVars {
            name: "nginx".to_string(),
            state: "start".to_string(),
            daemon_reload: false,
        },
    };
    let c = ctx(systemd.clone());
    assert!(action.execute(&c).await.is_err());
}

#[test]
fn validate_rejects_unknown_state() {
    let vars = SystemdVars {
        name: "nginx".to_string(),
        state: "bogus".to_string(),
        daemon_reload: false,
    };
    assert!(vars.validate().is_err());
}

#[test]
fn validate_requires_name() {
    let vars = SystemdVars {
        name: String::new(),
        state: "start".to_string(),
        daemon_reload: false,
    };
    assert!(vars.validate().is_err());
}
