// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The log event taxonomy streamed out of `Engine::perform`.

use serde::{Deserialize, Serialize};

/// An event emitted on the engine's log channel while a task list runs.
///
/// This is the caller-visible, in-band event contract (distinct from the
/// `tracing` spans the engine also emits for the embedding application's
/// own log sink). Serializes with a `{"level": "info", "message": "..."}`
/// shape: a tagged, externally-untagged-friendly wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum LogEvent {
    Info { message: String },
    Warn { message: String },
    Error { message: String },
    Debug { message: String },
}

impl LogEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self::Info {
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::Warn {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn debug(message: impl Into<String>) -> Self {
        Self::Debug {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Info { message }
            | Self::Warn { message }
            | Self::Error { message }
            | Self::Debug { message } => message,
        }
    }
}

#[cfg(test)]
#[path = "log_event_tests.rs"]
mod tests;
