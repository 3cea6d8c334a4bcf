// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire data model for task lists: the JSON shape consumed by the engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default timeout (seconds) applied to an action whose `timeout` field is
/// zero or absent. Overridable via `FORGECFG_DEFAULT_TIMEOUT_SECS`.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// The engine's top-level input: a mapping from task-name to its ordered
/// action list, plus the `priority` sequence of task-names that defines
/// execution order. A task absent from `priority` never runs; a name may
/// repeat in `priority` to re-execute its actions (each pass
/// re-instantiates them from scratch).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskList {
    pub tasks: HashMap<String, Vec<Action>>,
    #[serde(default)]
    pub priority: Vec<String>,
}

/// The kind of operation an [`Action`] performs.
///
/// Deserializes from the wire field named `"action"`, not `"kind"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Copy,
    Template,
    File,
    Cmd,
    User,
    Systemd,
}

/// A guard deciding whether an [`Action`] runs. Exactly one of
/// `cmd`/`rvar` is meaningful per evaluation; `exit_code` is only
/// consulted in the `cmd` branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhenGuard {
    #[serde(default)]
    pub cmd: Option<String>,
    #[serde(default)]
    pub rvar: Option<String>,
    #[serde(default)]
    pub exit_code: i64,
}

/// A single unit of work inside a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "action")]
    pub kind: ActionKind,
    pub name: String,
    /// Guard gating whether this action runs; absent means "always run".
    #[serde(default)]
    pub when: Option<WhenGuard>,
    /// Argv for `cmd` actions (`command[0]` is the binary, the rest its
    /// arguments). Unused by the other five kinds.
    #[serde(default)]
    pub command: Option<Vec<String>>,
    /// Expected exit code for `cmd` actions; default `0`.
    #[serde(default)]
    pub exit_code: i64,
    /// If true, a failing action does not abort the executor.
    #[serde(default)]
    pub ignore_error: bool,
    /// Kind-specific parameters, validated by that action.
    #[serde(default)]
    pub action_var: Value,
    /// Timeout in seconds for actions that shell out (`cmd`, and `when`
    /// guards evaluated as shell expressions). Zero is normalized to
    /// [`DEFAULT_TIMEOUT_SECS`] by the action factory.
    #[serde(default)]
    pub timeout: u64,
    /// Explicit register key this action's result is stored under. Defaults
    /// to the SHA-1 hex digest of `name` when absent (see [`default_register_key`]).
    #[serde(default)]
    pub register: Option<String>,
    /// Transient: set by the `copy`/`template` actions when a backup copy
    /// has been taken during this run, recording where it landed. Not part
    /// of the wire format — it is write-only, populated during execution —
    /// so it is excluded from (de)serialization rather than round-tripped
    /// as an always-empty input field.
    #[serde(skip)]
    pub backup_src: Option<String>,
}

/// The SHA-1 hex digest of an action's `name`, used as its register key
/// when no explicit `register` field is set.
pub fn default_register_key(action_name: &str) -> String {
    use sha1::{Digest, Sha1};
    let mut hasher = Sha1::new();
    hasher.update(action_name.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

impl Action {
    /// The register key this action's result is (or would be) stored under.
    pub fn register_key(&self) -> String {
        self.register
            .clone()
            .unwrap_or_else(|| default_register_key(&self.name))
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
