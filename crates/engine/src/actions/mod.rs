// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The six action kinds (`spec.md` §4.5-§4.10) behind a single tagged
//! enum rather than a trait object — the `Do` capability the original
//! expresses as a one-method interface is modeled here as an inherent
//! `execute` on each concrete action struct, dispatched through
//! [`ActionImpl::execute`]'s match. `spec.md` §9 flags the original's
//! dynamic dispatch as a re-architecture point precisely because a tagged
//! enum is equivalent and avoids the indirection.

pub mod cmd;
pub mod copy;
pub mod file;
pub mod systemd;
pub mod template;
pub mod user;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

use forgecfg_adapters::{AssetSource, SubprocessRunner, SystemdAdapter};
use forgecfg_core::{EnvSnapshot, FactTable, LogEvent, Register, RegisterStore};

use crate::error::ActionError;

/// Everything an action body needs beyond its own typed `vars`: shared
/// collaborators, the register it writes to, and the task-name ("agent")
/// used to namespace backups.
pub struct ActionCtx {
    pub agent: String,
    pub register: String,
    pub timeout: Duration,
    pub store: RegisterStore,
    pub subprocess: Arc<dyn SubprocessRunner>,
    pub systemd: Arc<dyn SystemdAdapter>,
    /// Source for `src_type: "local"` — the real local filesystem, rooted at `/`.
    pub assets_local: Arc<dyn AssetSource>,
    /// Source for `src_type: "embed"` — the caller-supplied asset bundle.
    pub assets_embed: Arc<dyn AssetSource>,
    pub template_config: Value,
    pub facts: FactTable,
    pub env: EnvSnapshot,
    pub enable_wizard_facts: bool,
    /// The log channel the executor invokes this action with (`spec.md`
    /// §2): actions beyond the generic `Info("Perform: ...")` line the
    /// executor itself emits may push their own events here (the `user`
    /// action's "would change home directory" warning, for instance).
    pub log: UnboundedSender<LogEvent>,
}

impl ActionCtx {
    pub fn emit(&self, event: LogEvent) {
        let _ = self.log.send(event);
    }
}

impl ActionCtx {
    /// The asset source matching a `src_type` field (`"local"` or `"embed"`).
    pub fn source_for(&self, src_type: &str) -> &Arc<dyn AssetSource> {
        if src_type == "embed" {
            &self.assets_embed
        } else {
            &self.assets_local
        }
    }

    /// Overwrite this action's register with its result.
    pub fn record(&self, changed: bool, stdout: impl Into<String>, stderr: impl Into<String>, exit_code: i64) {
        self.store.set(
            self.register.clone(),
            Register {
                changed,
                stdout: stdout.into(),
                stderr: stderr.into(),
                exit_code,
            },
        );
    }
}

/// The constructed, ready-to-run form of one of the six action kinds.
pub enum ActionImpl {
    Copy(copy::CopyAction),
    Template(template::TemplateAction),
    File(file::FileAction),
    Cmd(cmd::CmdAction),
    User(user::UserAction),
    Systemd(systemd::SystemdAction),
}

impl ActionImpl {
    pub async fn execute(&self, ctx: &ActionCtx) -> Result<(), ActionError> {
        match self {
            ActionImpl::Copy(a) => a.execute(ctx).await,
            ActionImpl::Template(a) => a.execute(ctx).await,
            ActionImpl::File(a) => a.execute(ctx).await,
            ActionImpl::Cmd(a) => a.execute(ctx).await,
            ActionImpl::User(a) => a.execute(ctx).await,
            ActionImpl::Systemd(a) => a.execute(ctx).await,
        }
    }
}
