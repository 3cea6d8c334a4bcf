// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `copy` action (`spec.md` §4.5): dir→dir / dir→file / file→dir /
//! file→file, dispatched by classifying source and destination.

use std::path::Path;

use serde::{Deserialize, Serialize};

use forgecfg_adapters::AssetKind;

use crate::error::{ActionError, ValidationError};
use crate::fs_util;

use super::ActionCtx;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CopyVars {
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
    /// Accepted on the wire for compatibility but never consulted: backup
    /// before overwrite happens unconditionally, matching `copy.go`'s
    /// `BackupConfigFile` calls (the `Backup` field they'd gate on is
    /// defined but unused there too).
    #[serde(default)]
    pub backup: bool,
    #[serde(default)]
    pub parents: bool,
    #[serde(default)]
    pub recursive: bool,
}

impl CopyVars {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.src_type.is_empty() {
            return Err(ValidationError::MissingField("src_type"));
        }
        if self.src_type != "local" && self.src_type != "embed" {
            return Err(ValidationError::Other(format!(
                "invalid src_type: {}",
                self.src_type
            )));
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

pub struct CopyAction {
    pub vars: CopyVars,
}

impl CopyAction {
    pub async fn execute(&self, ctx: &ActionCtx) -> Result<(), ActionError> {
        self.vars.validate()?;
        let v = &self.vars;
        let source = ctx.source_for(&v.src_type);

        let matches = source
            .glob(&v.src)
            .map_err(|e| ActionError::Io(e.to_string()))?;
        let matches: Vec<String> = if matches.is_empty() {
            vec![v.src.clone()]
        } else {
            matches
        };

        let mut any_changed = false;
        for src_path in &matches {
            let changed = self.copy_one(ctx, source.as_ref(), src_path)?;
            any_changed |= changed;
        }
        ctx.record(any_changed, "", "", 0);
        Ok(())
    }

    fn copy_one(
        &self,
        ctx: &ActionCtx,
        source: &dyn forgecfg_adapters::AssetSource,
        src_path: &str,
    ) -> Result<bool, ActionError> {
        let v = &self.vars;
        let src_meta = source
            .stat(src_path)
            .map_err(|e| ActionError::Io(e.to_string()))?;
        let dest = Path::new(&v.dest);
        let dest_exists = dest.exists();
        let dest_is_dir = dest_exists && dest.is_dir();

        if v.parents {
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
                fs_util::apply_permission(parent, &v.permission)?;
            }
        }

        let changed = match (src_meta.kind, dest_exists, dest_is_dir) {
            (AssetKind::Dir, _, true) | (AssetKind::Dir, false, _) => {
                self.copy_dir_to_dir(ctx, source, src_path, dest)?
            }
            (AssetKind::Dir, true, false) => {
                return Err(ActionError::Policy(
                    "cannot copy a directory into a file".to_string(),
                ));
            }
            (AssetKind::File, _, true) => self.copy_file_to_dir(ctx, source, src_path, dest)?,
            (AssetKind::File, _, false) => self.copy_file_to_file(ctx, source, src_path, dest)?,
        };

        if changed {
            fs_util::apply_permission(dest, &v.permission)?;
            self.apply_ownership(dest)?;
        }
        Ok(changed)
    }

    fn copy_dir_to_dir(
        &self,
        _ctx: &ActionCtx,
        source: &dyn forgecfg_adapters::AssetSource,
        src_path: &str,
        dest: &Path,
    ) -> Result<bool, ActionError> {
        let src_hash =
            fs_util::source_dirhash(source, src_path).map_err(|e| ActionError::Io(e.to_string()))?;
        let dest_hash = fs_util::dirhash(dest).map_err(|e| ActionError::Io(e.to_string()))?;
        if Some(&src_hash) == dest_hash.as_ref() {
            return Ok(false);
        }
        fs_util::copy_source_tree(source, src_path, dest)
            .map_err(|e| ActionError::Io(e.to_string()))?;
        Ok(true)
    }

    fn copy_file_to_dir(
        &self,
        ctx: &ActionCtx,
        source: &dyn forgecfg_adapters::AssetSource,
        src_path: &str,
        dest_dir: &Path,
    ) -> Result<bool, ActionError> {
        let basename = forgecfg_adapters::asset_fs::basename(src_path);
        let dest = dest_dir.join(basename);
        let bytes = source
            .read(src_path)
            .map_err(|e| ActionError::Io(e.to_string()))?;

        if !dest.exists() {
            // Open Question #2 (DESIGN.md): this backs up the *source*, not a
            // prior destination — preserved bug-for-bug. Unconditional, like
            // every other backup-before-overwrite branch: `backup` is a wire
            // field the original defines but never consults.
            backup_bytes(&bytes, &ctx.agent, basename)?;
            fs_util::write_file(&dest, &bytes)?;
            return Ok(true);
        }

        let dest_hash = fs_util::file_hash(&dest).map_err(|e| ActionError::Io(e.to_string()))?;
        let src_hash = sha256_bytes(&bytes);
        if dest_hash == src_hash {
            if self.vars.force {
                fs_util::write_file(&dest, &bytes)?;
                return Ok(true);
            }
            return Ok(false);
        }
        fs_util::write_file(&dest, &bytes)?;
        Ok(true)
    }

    fn copy_file_to_file(
        &self,
        ctx: &ActionCtx,
        source: &dyn forgecfg_adapters::AssetSource,
        src_path: &str,
        dest: &Path,
    ) -> Result<bool, ActionError> {
        let bytes = source
            .read(src_path)
            .map_err(|e| ActionError::Io(e.to_string()))?;
        let basename = dest
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(src_path);

        if !dest.exists() {
            fs_util::write_file(dest, &bytes)?;
            return Ok(true);
        }

        // Unconditional backup-before-overwrite (spec.md §4.5); `backup` is a
        // wire field the original defines but never consults.
        fs_util::backup(dest, &crate::env::backup_dir(), &ctx.agent, basename)
            .map_err(|e| ActionError::Io(e.to_string()))?;

        let dest_hash = fs_util::file_hash(dest).map_err(|e| ActionError::Io(e.to_string()))?;
        let src_hash = sha256_bytes(&bytes);
        if dest_hash == src_hash && !self.vars.force {
            return Ok(false);
        }
        fs_util::write_file(dest, &bytes)?;
        Ok(true)
    }

    fn apply_ownership(&self, dest: &Path) -> Result<(), ActionError> {
        let v = &self.vars;
        fs_util::chown_by_name(dest, &v.owner, &v.group).map_err(|e| ActionError::Io(e.to_string()))
    }
}

fn sha256_bytes(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn backup_bytes(bytes: &[u8], agent: &str, basename: &str) -> Result<(), ActionError> {
    let dest = fs_util::backup_path(&crate::env::backup_dir(), agent, basename);
    fs_util::write_file(&dest, bytes).map_err(|e| ActionError::Io(e.to_string()))
}

#[cfg(test)]
#[path = "copy_tests.rs"]
mod tests;
