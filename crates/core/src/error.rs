// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level error type for task-list parsing, re-exported for callers who
//! only need to decode a `TaskList` without pulling in the engine crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid task list JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
