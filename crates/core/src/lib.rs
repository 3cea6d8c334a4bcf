// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! forgecfg-core: data model and register machinery for the forgecfg
//! configuration-management engine.

pub mod env_snapshot;
pub mod error;
pub mod facts;
pub mod log_event;
pub mod model;
pub mod register;
pub mod register_expr;

pub use env_snapshot::EnvSnapshot;
pub use error::ModelError;
pub use facts::FactTable;
pub use log_event::LogEvent;
pub use model::{
    default_register_key, Action, ActionKind, TaskList, WhenGuard, DEFAULT_TIMEOUT_SECS,
};
pub use register::{Register, RegisterStore};
pub use register_expr::{evaluate as evaluate_register_expr, RegisterExprError};
