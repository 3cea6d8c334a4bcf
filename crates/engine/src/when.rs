// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `when` guard (`spec.md` §4.4): gates an action on either a register
//! expression or an inline shell command's exit code.

use std::time::Duration;

use forgecfg_adapters::SubprocessRunner;
use forgecfg_core::{evaluate_register_expr, RegisterStore, WhenGuard};

use crate::error::ActionError;

/// Evaluate a guard, returning `Ok(())` to proceed or
/// `Err(ActionError::WhenNotSatisfied)` to skip — the sentinel an action's
/// `Do` returns to signal "guard failed" per `spec.md` §4.1/§4.4/§7.
pub async fn check(
    guard: Option<&WhenGuard>,
    store: &RegisterStore,
    subprocess: &dyn SubprocessRunner,
    timeout: Duration,
) -> Result<(), ActionError> {
    let Some(guard) = guard else {
        return Ok(());
    };

    let satisfied = if let Some(rvar) = guard.rvar.as_deref().filter(|s| !s.is_empty()) {
        // spec.md §4.4: "(false, error) skip-with-reason" — a malformed
        // register expression is a guard failure, not a fatal error, so it
        // collapses into the same sentinel as "guard evaluated false".
        evaluate_register_expr(rvar, store).map_err(|_| ActionError::WhenNotSatisfied)?
    } else if let Some(cmd) = guard.cmd.as_deref().filter(|s| !s.is_empty()) {
        let output = subprocess
            .run_shell("bash", cmd, timeout)
            .await
            .map_err(|_| ActionError::WhenNotSatisfied)?;
        output.exit_code == guard.exit_code
    } else {
        true
    };

    if satisfied {
        Ok(())
    } else {
        Err(ActionError::WhenNotSatisfied)
    }
}

#[cfg(test)]
#[path = "when_tests.rs"]
mod tests;
