// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use forgecfg_adapters::subprocess::FakeSubprocessRunner;
use forgecfg_adapters::systemd::FakeSystemdAdapter;
use forgecfg_adapters::{EmbeddedAssetSource, LocalAssetSource};
use forgecfg_core::{FactTable, RegisterStore};
use serde_json::json;
use tempfile::TempDir;

use serial_test::serial;
use tokio::sync::mpsc::unbounded_channel;

use super::*;

fn ctx(store: RegisterStore) -> ActionCtx {
    let (tx, _rx) = unbounded_channel();
    ActionCtx {
        agent: "mytask".to_string(),
        register: "reg1".to_string(),
        timeout: Duration::from_secs(5),
        store,
        subprocess: Arc::new(FakeSubprocessRunner::new()),
        systemd: Arc::new(FakeSystemdAdapter::new()),
        assets_local: Arc::new(LocalAssetSource::new("/")),
        assets_embed: Arc::new(EmbeddedAssetSource::new()),
        template_config: json!({"name": "svc"}),
        facts: FactTable::new(),
        env: Default::default(),
        enable_wizard_facts: false,
        log: tx,
    }
}

#[test]
fn validate_requires_core_fields() {
    assert!(TemplateVars::default().validate().is_err());
}

#[tokio::test]
#[serial]
async fn renders_and_writes_new_destination() {
    let staging_root = TempDir::new().unwrap();
    std::env::set_var("FORGECFG_STAGING_DIR", staging_root.path());

    let src_dir = TempDir::new().unwrap();
    let src = src_dir.path().join("nginx.conf.tmpl");
    std::fs::write(&src, "server {{name}}\n").unwrap();

    let dest_dir = TempDir::new().unwrap();
    let dest = dest_dir.path().join("nginx.conf");

    let action = TemplateAction {
        vars: TemplateVars {
            src_type: "local".to_string(),
            src: src.to_string_lossy().into_owned(),
            dest: dest.to_string_lossy().into_owned(),
            permission: "0644".to_string(),
            owner: "root".to_string(),
            ..Default::default()
        },
    };

    let store = RegisterStore::new();
    action.execute(&ctx(store.clone())).await.unwrap();

    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "server svc\n");
    assert!(store.get("reg1").unwrap().changed);

    std::env::remove_var("FORGECFG_STAGING_DIR");
}

#[tokio::test]
#[serial]
async fn second_identical_render_is_idempotent() {
    let staging_root = TempDir::new().unwrap();
    std::env::set_var("FORGECFG_STAGING_DIR", staging_root.path());

    let src_dir = TempDir::new().unwrap();
    let src = src_dir.path().join("nginx.conf.tmpl");
    std::fs::write(&src, "server {{name}}\n").unwrap();

    let dest_dir = TempDir::new().unwrap();
    let dest = dest_dir.path().join("nginx.conf");

    let action = TemplateAction {
        vars: TemplateVars {
            src_type: "local".to_string(),
            src: src.to_string_lossy().into_owned(),
            dest: dest.to_string_lossy().into_owned(),
            permission: "0644".to_string(),
            owner: "root".to_string(),
            force: false,
            ..Default::default()
        },
    };

    let store = RegisterStore::new();
    action.execute(&ctx(store.clone())).await.unwrap();
    action.execute(&ctx(store.clone())).await.unwrap();

    assert!(!store.get("reg1").unwrap().changed);

    std::env::remove_var("FORGECFG_STAGING_DIR");
}

#[tokio::test]
#[serial]
async fn staging_file_is_removed_after_render() {
    let staging_root = TempDir::new().unwrap();
    std::env::set_var("FORGECFG_STAGING_DIR", staging_root.path());

    let src_dir = TempDir::new().unwrap();
    let src = src_dir.path().join("app.conf.tmpl");
    std::fs::write(&src, "x\n").unwrap();
    let dest_dir = TempDir::new().unwrap();
    let dest = dest_dir.path().join("app.conf");

    let action = TemplateAction {
        vars: TemplateVars {
            src_type: "local".to_string(),
            src: src.to_string_lossy().into_owned(),
            dest: dest.to_string_lossy().into_owned(),
            permission: "0644".to_string(),
            owner: "root".to_string(),
            ..Default::default()
        },
    };

    let store = RegisterStore::new();
    action.execute(&ctx(store)).await.unwrap();

    assert!(!staging_root.path().join("app.conf").exists());

    std::env::remove_var("FORGECFG_STAGING_DIR");
}
