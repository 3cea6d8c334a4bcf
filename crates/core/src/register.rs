// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-action result store shared across a task list's execution.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// The recorded outcome of a single action's execution: zero values on
/// construction, overwritten in place by the action that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    pub changed: bool,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub exit_code: i64,
}

/// Shared, process-wide store of [`Register`] results keyed by register key.
///
/// An explicitly owned, cloneable handle rather than a module-level
/// global: the engine constructs one `RegisterStore` per `Engine`
/// instance and passes clones into every action invocation.
#[derive(Debug, Clone, Default)]
pub struct RegisterStore {
    inner: Arc<Mutex<HashMap<String, Register>>>,
}

impl RegisterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (overwriting) the result for `key`.
    pub fn set(&self, key: impl Into<String>, register: Register) {
        self.inner.lock().insert(key.into(), register);
    }

    /// Look up a previously stored result by key.
    pub fn get(&self, key: &str) -> Option<Register> {
        self.inner.lock().get(key).cloned()
    }

    /// True if `key` has a recorded result.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().contains_key(key)
    }

    /// Clear every recorded result. Exposed on the public `Engine` API so
    /// a caller can reuse one engine instance across independent
    /// task-list runs.
    pub fn reset(&self) {
        self.inner.lock().clear();
    }

    /// Number of recorded results, mostly useful in tests.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "register_tests.rs"]
mod tests;
