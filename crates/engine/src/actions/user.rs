// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `user` action (`spec.md` §4.9): account create/delete, probing
//! `/etc/passwd`/`/etc/group` before deciding what (if anything) to do.

use std::path::Path;

use serde::{Deserialize, Serialize};

use forgecfg_core::LogEvent;

use crate::error::{ActionError, ValidationError};
use crate::passwd;

use super::ActionCtx;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserVars {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default)]
    pub shell: Option<String>,
    #[serde(default)]
    pub uid: Option<u32>,
    #[serde(default)]
    pub gid: Option<u32>,
    #[serde(default)]
    pub force: bool,
}

impl UserVars {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        match self.state.as_str() {
            "present" => {
                if self.home.as_deref().unwrap_or("").is_empty() {
                    return Err(ValidationError::MissingField("home"));
                }
                if self.shell.as_deref().unwrap_or("").is_empty() {
                    return Err(ValidationError::MissingField("shell"));
                }
                if self.uid.is_none() {
                    return Err(ValidationError::MissingField("uid"));
                }
                if self.gid.is_none() {
                    return Err(ValidationError::MissingField("gid"));
                }
            }
            "absent" => {}
            other => {
                return Err(ValidationError::Other(format!(
                    "invalid user state: {other}"
                )))
            }
        }
        Ok(())
    }
}

pub struct UserAction {
    pub vars: UserVars,
}

impl UserAction {
    pub async fn execute(&self, ctx: &ActionCtx) -> Result<(), ActionError> {
        self.vars.validate()?;
        match self.vars.state.as_str() {
            "present" => self.ensure_present(ctx).await,
            "absent" => self.ensure_absent(ctx).await,
            other => Err(ActionError::Policy(format!("invalid user state: {other}"))),
        }
    }

    async fn which(&self, ctx: &ActionCtx, tools: &[&str]) -> Result<String, ActionError> {
        for tool in tools {
            let output = ctx
                .subprocess
                .run_argv("which", &[tool.to_string()], ctx.timeout)
                .await?;
            if output.exit_code == 0 {
                return Ok(tool.to_string());
            }
        }
        Err(ActionError::Policy(format!(
            "none of {tools:?} are available on this host"
        )))
    }

    async fn ensure_present(&self, ctx: &ActionCtx) -> Result<(), ActionError> {
        let v = &self.vars;
        let missing = || ActionError::Policy("user present requires home/shell/uid/gid".to_string());
        let uid = v.uid.ok_or_else(missing)?;
        let gid = v.gid.ok_or_else(missing)?;
        let home = v.home.as_deref().ok_or_else(missing)?;
        let shell = v.shell.as_deref().ok_or_else(missing)?;

        let probe = passwd::probe(
            Path::new(&crate::env::passwd_path()),
            Path::new(&crate::env::group_path()),
            &v.name,
            uid,
            gid,
            home,
        )
        .map_err(|e| ActionError::Io(e.to_string()))?;

        if let Some(existing) = &probe.user {
            if !v.force {
                ctx.record(false, "", "", 0);
                return Ok(());
            }
            if existing.home == home {
                ctx.record(false, "", "", 0);
                return Ok(());
            }
            if let Some(owner) = &probe.home_owner {
                return Err(ActionError::Policy(format!(
                    "HomeDirFound: {home} already assigned to user {owner}"
                )));
            }
            // spec.md §9 Open Question #3 / DESIGN.md: the original computes
            // the updated passwd line here but never writes it back. Preserved
            // bug-for-bug: log the intent, mutate nothing.
            ctx.emit(LogEvent::warn(format!(
                "user \"{}\" home would change from \"{}\" to \"{home}\", but this is not applied (preserves upstream behavior)",
                v.name, existing.home
            )));
            ctx.record(false, "", "", 0);
            return Ok(());
        }

        if !probe.group_name_exists && probe.gid_taken.is_none() {
            let group_tool = self.which(ctx, &["groupadd", "addgroup"]).await?;
            let args = vec!["-g".to_string(), gid.to_string(), v.name.clone()];
            let output = ctx.subprocess.run_argv(&group_tool, &args, ctx.timeout).await?;
            if output.exit_code != 0 {
                return Err(ActionError::Policy(format!(
                    "status code not 0 - {}",
                    output.stderr
                )));
            }
        }

        let user_tool = self.which(ctx, &["useradd", "adduser"]).await?;
        let mut args = vec!["-s".to_string(), shell.to_string()];
        if let Some(uid) = v.uid {
            args.push("-u".to_string());
            args.push(uid.to_string());
        }
        if probe.group_name_exists || probe.gid_taken.is_some() {
            args.push("-N".to_string());
        } else {
            args.push("-g".to_string());
            args.push(gid.to_string());
        }
        args.push("-d".to_string());
        args.push(home.to_string());
        args.push(v.name.clone());

        let output = ctx.subprocess.run_argv(&user_tool, &args, ctx.timeout).await?;
        if output.exit_code != 0 {
            return Err(ActionError::Policy(format!(
                "status code not 0 - {}",
                output.stderr
            )));
        }
        ctx.record(true, output.stdout, output.stderr, output.exit_code);
        Ok(())
    }

    async fn ensure_absent(&self, ctx: &ActionCtx) -> Result<(), ActionError> {
        let v = &self.vars;
        let probe = passwd::probe(
            Path::new(&crate::env::passwd_path()),
            Path::new(&crate::env::group_path()),
            &v.name,
            0,
            0,
            "",
        )
            .map_err(|e| ActionError::Io(e.to_string()))?;

        if probe.user.is_none() {
            return Err(ActionError::Policy("USERDEL: User not found".to_string()));
        }

        let tool = self.which(ctx, &["userdel", "deluser"]).await?;
        let output = ctx
            .subprocess
            .run_argv(&tool, &[v.name.clone()], ctx.timeout)
            .await?;
        if output.exit_code != 0 {
            return Err(ActionError::Policy(format!(
                "status code not 0 - {}",
                output.stderr
            )));
        }
        ctx.record(true, output.stdout, output.stderr, output.exit_code);
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;
