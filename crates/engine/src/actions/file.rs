// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `file` action (`spec.md` §4.7): a declarative filesystem primitive
//! with a single-field state — `touch`, `link`, `absent` — applied over a
//! list of `{src, dest}` entries.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ActionError, ValidationError};
use crate::fs_util;

use super::ActionCtx;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileEntry {
    #[serde(default)]
    pub src: String,
    pub dest: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileVars {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub dir: bool,
    #[serde(default)]
    pub permission: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub entries: Vec<FileEntry>,
}

impl FileVars {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.state.as_str() {
            "touch" | "link" | "absent" => {}
            other => {
                return Err(ValidationError::Other(format!(
                    "invalid file state: {other}"
                )))
            }
        }
        if self.entries.is_empty() {
            return Err(ValidationError::MissingField("entries"));
        }
        if self.state == "touch" && self.permission.is_empty() {
            return Err(ValidationError::MissingField("permission"));
        }
        if self.state == "link" {
            for entry in &self.entries {
                if entry.src.is_empty() {
                    return Err(ValidationError::MissingField("src"));
                }
            }
        }
        Ok(())
    }
}

pub struct FileAction {
    pub vars: FileVars,
}

impl FileAction {
    pub async fn execute(&self, ctx: &ActionCtx) -> Result<(), ActionError> {
        self.vars.validate()?;
        let v = &self.vars;
        let mut any_changed = false;
        for entry in &v.entries {
            let changed = match v.state.as_str() {
                "touch" => self.touch(entry)?,
                "link" => self.link(entry)?,
                "absent" => self.absent(entry)?,
                other => {
                    return Err(ActionError::Policy(format!("invalid file state: {other}")))
                }
            };
            any_changed |= changed;
        }
        ctx.record(any_changed, "", "", 0);
        Ok(())
    }

    fn touch(&self, entry: &FileEntry) -> Result<bool, ActionError> {
        let v = &self.vars;
        let dest = Path::new(&entry.dest);

        if v.dir {
            let existed = dest.is_dir();
            std::fs::create_dir_all(dest)?;
            if !existed || v.force {
                fs_util::apply_permission(dest, &v.permission)?;
                self.apply_ownership(dest)?;
            }
            return Ok(true);
        }

        let existed = dest.exists();
        if !existed {
            fs_util::write_file(dest, b"")?;
            fs_util::apply_permission(dest, &v.permission)?;
            self.apply_ownership(dest)?;
        } else if v.force {
            fs_util::apply_permission(dest, &v.permission)?;
            self.apply_ownership(dest)?;
        }
        Ok(true)
    }

    fn link(&self, entry: &FileEntry) -> Result<bool, ActionError> {
        let src = Path::new(&entry.src);
        let dest = Path::new(&entry.dest);
        if dest.is_symlink() {
            std::fs::remove_file(dest)?;
        }
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::os::unix::fs::symlink(src, dest)?;
        Ok(true)
    }

    fn absent(&self, entry: &FileEntry) -> Result<bool, ActionError> {
        let dest = Path::new(&entry.dest);
        if dest.is_symlink() || dest.is_file() {
            std::fs::remove_file(dest)?;
        } else if dest.is_dir() {
            std::fs::remove_dir_all(dest)?;
        }
        Ok(true)
    }

    fn apply_ownership(&self, dest: &Path) -> Result<(), ActionError> {
        let v = &self.vars;
        if v.owner.is_empty() {
            return Ok(());
        }
        fs_util::chown_by_name(dest, &v.owner, &v.group).map_err(|e| ActionError::Io(e.to_string()))
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
