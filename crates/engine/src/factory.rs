// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The action factory (`spec.md` §4.2): maps an [`Action`]'s `kind` to an
//! instantiated [`ActionImpl`] plus the [`ActionCtx`] it executes with.
//!
//! `spec.md` §9 Open Question #1 flags the original's "unknown kind →
//! null action the executor then dereferences" as likely a bug; per
//! `DESIGN.md` this rejects unknown kinds here instead, at construction,
//! which `ActionKind` already makes unreachable for well-formed JSON (an
//! unrecognized `"action"` string fails to deserialize before the factory
//! ever runs) — the `FactoryError::UnknownKind` variant exists for the
//! theoretical completeness of the match, not a reachable wire input.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

use forgecfg_adapters::{AssetSource, SubprocessRunner, SystemdAdapter};
use forgecfg_core::{Action, ActionKind, EnvSnapshot, FactTable, LogEvent, RegisterStore};

use crate::actions::{cmd, copy, file, systemd, template, user, ActionCtx, ActionImpl};
use crate::env;
use crate::error::FactoryError;

/// The external collaborators every action's [`ActionCtx`] is built from.
/// Cloned per action (all `Arc`s, so this is cheap).
#[derive(Clone)]
pub struct Collaborators {
    pub subprocess: Arc<dyn SubprocessRunner>,
    pub systemd: Arc<dyn SystemdAdapter>,
    pub assets_local: Arc<dyn AssetSource>,
    pub assets_embed: Arc<dyn AssetSource>,
}

fn normalize_timeout(seconds: u64) -> Duration {
    if seconds == 0 {
        env::default_timeout()
    } else {
        Duration::from_secs(seconds)
    }
}

fn vars<T: serde::de::DeserializeOwned>(action: &Action, raw: &Value) -> Result<T, FactoryError> {
    serde_json::from_value(raw.clone()).map_err(|source| FactoryError::InvalidVars {
        name: action.name.clone(),
        source,
    })
}

/// Construct the concrete [`ActionImpl`] and [`ActionCtx`] for `action`,
/// validating its `action_var` payload against its kind's parameter
/// struct along the way.
#[allow(clippy::too_many_arguments)]
pub fn build(
    action: &Action,
    agent: &str,
    register: String,
    store: RegisterStore,
    collaborators: &Collaborators,
    template_config: &Value,
    facts: &FactTable,
    env_snapshot: &EnvSnapshot,
    enable_wizard_facts: bool,
    log: UnboundedSender<LogEvent>,
) -> Result<(ActionImpl, ActionCtx), FactoryError> {
    let ctx = ActionCtx {
        agent: agent.to_string(),
        register,
        timeout: normalize_timeout(action.timeout),
        store,
        subprocess: collaborators.subprocess.clone(),
        systemd: collaborators.systemd.clone(),
        assets_local: collaborators.assets_local.clone(),
        assets_embed: collaborators.assets_embed.clone(),
        template_config: template_config.clone(),
        facts: facts.clone(),
        env: env_snapshot.clone(),
        enable_wizard_facts,
        log,
    };

    // Parameter *validation* deliberately does not happen here (spec.md
    // §4.1: the only error an action produces is from `Do`, classified
    // uniformly by `ignore_error`). Each action validates its own `vars`
    // at the top of `execute`, the way the original's `newCopyVars`-style
    // constructors run inside `Do`, not in the factory switch.
    let implementation = match action.kind {
        ActionKind::Copy => {
            let v: copy::CopyVars = vars(action, &action.action_var)?;
            ActionImpl::Copy(copy::CopyAction { vars: v })
        }
        ActionKind::Template => {
            let v: template::TemplateVars = vars(action, &action.action_var)?;
            ActionImpl::Template(template::TemplateAction { vars: v })
        }
        ActionKind::File => {
            let v: file::FileVars = vars(action, &action.action_var)?;
            ActionImpl::File(file::FileAction { vars: v })
        }
        ActionKind::Cmd => ActionImpl::Cmd(cmd::CmdAction {
            command: action.command.clone().unwrap_or_default(),
            exit_code: action.exit_code,
        }),
        ActionKind::User => {
            let v: user::UserVars = vars(action, &action.action_var)?;
            ActionImpl::User(user::UserAction { vars: v })
        }
        ActionKind::Systemd => {
            let v: systemd::SystemdVars = vars(action, &action.action_var)?;
            ActionImpl::Systemd(systemd::SystemdAction { vars: v })
        }
    };

    Ok((implementation, ctx))
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
