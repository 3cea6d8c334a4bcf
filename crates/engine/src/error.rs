// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine-level error types, one per seam, following the teacher's
//! convention of a `thiserror`-derived enum per crate/module boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("unknown action kind: {0}")]
    UnknownKind(String),
    #[error("invalid action parameters for \"{name}\": {source}")]
    InvalidVars {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("{0}")]
    Other(String),
}

/// The error surface returned by an action's `Do` invocation.
///
/// `WhenNotSatisfied` is the distinguished sentinel from `spec.md` §4.1 /
/// §4.4 / §7.1: it renders to the literal text `whenNotSatisfied` so a
/// register's `stderr` field carries the exact wire-compatible string any
/// downstream register expression may already depend on, while letting
/// the executor dispatch on a real enum variant instead of a raw string
/// comparison.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("whenNotSatisfied")]
    WhenNotSatisfied,
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Subprocess(String),
    #[error("{0}")]
    Policy(String),
}

impl From<std::io::Error> for ActionError {
    fn from(e: std::io::Error) -> Self {
        ActionError::Io(e.to_string())
    }
}

impl From<forgecfg_adapters::SubprocessError> for ActionError {
    fn from(e: forgecfg_adapters::SubprocessError) -> Self {
        ActionError::Subprocess(e.to_string())
    }
}

impl From<forgecfg_adapters::SystemdError> for ActionError {
    fn from(e: forgecfg_adapters::SystemdError) -> Self {
        ActionError::Policy(e.to_string())
    }
}

impl From<forgecfg_adapters::AssetError> for ActionError {
    fn from(e: forgecfg_adapters::AssetError) -> Self {
        ActionError::Io(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid task list: {0}")]
    Model(#[from] forgecfg_core::ModelError),
    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("task \"{task}\" action \"{action}\" failed: {source}")]
    ActionFailed {
        task: String,
        action: String,
        #[source]
        source: ActionError,
    },
    #[error("task \"{task}\" action \"{action}\" could not be constructed: {source}")]
    FactoryFailed {
        task: String,
        action: String,
        #[source]
        source: FactoryError,
    },
}
