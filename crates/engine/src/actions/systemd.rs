// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `systemd` action (`spec.md` §4.10): reload the unit daemon when
//! asked, then dispatch a single start/stop/restart/reload on the named
//! unit.

use serde::{Deserialize, Serialize};

use crate::error::{ActionError, ValidationError};

use super::ActionCtx;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemdVars {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub daemon_reload: bool,
}

impl SystemdVars {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        match self.state.as_str() {
            "start" | "stop" | "restart" | "reload" => Ok(()),
            other => Err(ValidationError::Other(format!(
                "invalid systemd state: {other}"
            ))),
        }
    }
}

pub struct SystemdAction {
    pub vars: SystemdVars,
}

impl SystemdAction {
    pub async fn execute(&self, ctx: &ActionCtx) -> Result<(), ActionError> {
        self.vars.validate()?;
        let v = &self.vars;
        if v.daemon_reload {
            ctx.systemd.reload_daemon().await?;
        }
        match v.state.as_str() {
            "start" => ctx.systemd.start_service(&v.name).await?,
            "stop" => ctx.systemd.stop_service(&v.name).await?,
            "restart" => ctx.systemd.restart_service(&v.name).await?,
            "reload" => ctx.systemd.reload_service(&v.name).await?,
            other => return Err(ActionError::Policy(format!("invalid systemd state: {other}"))),
        }
        ctx.record(true, "", "", 0);
        Ok(())
    }
}

#[cfg(test)]
#[path = "systemd_tests.rs"]
mod tests;
