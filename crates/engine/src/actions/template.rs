// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `template` action (`spec.md` §4.6): render into a staging file,
//! then defer to the copy-file-to-file idempotence rule before deleting
//! the staging file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ActionError, ValidationError};
use crate::{env, fs_util, template as renderer};

use super::ActionCtx;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateVars {
    #[serde(default)]
    pub src_type: String,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub dest: String,
    #[serde(default)]
    pub permission: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub parents: bool,
}

impl TemplateVars {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.src_type.is_empty() {
            return Err(ValidationError::MissingField("src_type"));
        }
        if self.src.is_empty() {
            return Err(ValidationError::MissingField("src"));
        }
        if self.dest.is_empty() {
            return Err(ValidationError::MissingField("dest"));
        }
        if self.permission.is_empty() {
            return Err(ValidationError::MissingField("permission"));
        }
        if self.owner.is_empty() {
            return Err(ValidationError::MissingField("owner"));
        }
        Ok(())
    }
}

pub struct TemplateAction {
    pub vars: TemplateVars,
}

impl TemplateAction {
    pub async fn execute(&self, ctx: &ActionCtx) -> Result<(), ActionError> {
        self.vars.validate()?;
        let v = &self.vars;
        let source = ctx.source_for(&v.src_type);
        let template_src = source
            .read(&v.src)
            .map_err(|e| ActionError::Io(e.to_string()))?;
        let template_src = String::from_utf8_lossy(&template_src);

        let rendered = renderer::render(
            &template_src,
            &ctx.template_config,
            &ctx.facts,
            &ctx.env,
            ctx.enable_wizard_facts,
        )
        .map_err(|e| ActionError::Policy(e.to_string()))?;

        let dest = Path::new(&v.dest);
        if v.parents {
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let dest_basename = dest
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(&v.dest);
        let staging_name = renderer::staging_basename(dest_basename);
        let staging_path = Path::new(&env::staging_dir()).join(staging_name);
        fs_util::write_file(&staging_path, rendered.as_bytes())?;

        let changed = self.copy_staged(&staging_path, dest)?;
        let _ = std::fs::remove_file(&staging_path);

        if changed {
            fs_util::apply_permission(dest, &v.permission)?;
            self.apply_ownership(dest)?;
        }
        ctx.record(changed, "", "", 0);
        Ok(())
    }

    fn apply_ownership(&self, dest: &Path) -> Result<(), ActionError> {
        let v = &self.vars;
        fs_util::chown_by_name(dest, &v.owner, &v.group).map_err(|e| ActionError::Io(e.to_string()))
    }

    fn copy_staged(&self, staging: &Path, dest: &Path) -> Result<bool, ActionError> {
        let staged = std::fs::read(staging)?;
        if !dest.exists() {
            fs_util::write_file(dest, &staged)?;
            return Ok(true);
        }
        let dest_hash = fs_util::file_hash(dest).map_err(|e| ActionError::Io(e.to_string()))?;
        let staged_hash = {
            use sha2::{Digest, Sha256};
            let mut hasher = Sha256::new();
            hasher.update(&staged);
            hasher
                .finalize()
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<String>()
        };
        if dest_hash == staged_hash && !self.vars.force {
            return Ok(false);
        }
        fs_util::write_file(dest, &staged)?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
