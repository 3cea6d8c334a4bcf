// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `cmd` action (`spec.md` §4.8): run `command[0] command[1:]...`
//! bounded by the action's timeout, comparing the observed exit code
//! against `exit_code`.

use crate::error::ActionError;

use super::ActionCtx;

/// `command`/`exit_code` are top-level `Action` fields per `spec.md` §3,
/// not `action_var` entries — the factory copies them in at construction.
pub struct CmdAction {
    pub command: Vec<String>,
    pub exit_code: i64,
}

impl CmdAction {
    pub async fn execute(&self, ctx: &ActionCtx) -> Result<(), ActionError> {
        let Some(argv0) = self.command.first() else {
            return Err(ActionError::Policy("wrong command found".to_string()));
        };
        let args = &self.command[1..];

        let output = ctx
            .subprocess
            .run_argv(argv0, args, ctx.timeout)
            .await?;

        let succeeded = output.exit_code == self.exit_code;
        ctx.record(succeeded, output.stdout.clone(), output.stderr.clone(), output.exit_code);

        if succeeded {
            Ok(())
        } else {
            Err(ActionError::Policy(format!(
                "command {:?} exited {} (expected {}): {}",
                self.command, output.exit_code, self.exit_code, output.stderr
            )))
        }
    }
}

#[cfg(test)]
#[path = "cmd_tests.rs"]
mod tests;
