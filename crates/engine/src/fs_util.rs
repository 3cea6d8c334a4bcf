// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem primitives shared by the `copy`, `template`, and `file`
//! actions: content hashing (`spec.md` §4.5), permission/ownership
//! application, backup staging, and recursive local-disk copy.
//!
//! `forgecfg_adapters::AssetSource` covers the read side of a `src_type ∈
//! {local, embed}` source; everything here operates on the real local
//! filesystem, which is always the destination (embedded assets are never
//! a copy/template destination).

use std::io::Write as _;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};
use thiserror::Error;

use forgecfg_adapters::{asset_fs, AssetKind, AssetSource};

#[derive(Debug, Error)]
pub enum FsError {
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid permission string \"{0}\"")]
    BadPermission(String),
    #[error("file name contains a newline: {0}")]
    NewlineInName(String),
    #[error("asset source error at {path}: {source}")]
    Asset {
        path: String,
        #[source]
        source: forgecfg_adapters::AssetError,
    },
}

fn io(path: impl AsRef<Path>, source: std::io::Error) -> FsError {
    FsError::Io {
        path: path.as_ref().display().to_string(),
        source,
    }
}

/// Parse an octal permission string (e.g. `"0644"`) as `spec.md` §6
/// requires — base-8, not validated beyond what `u32::from_str_radix`
/// rejects.
pub fn parse_permission(s: &str) -> Result<u32, FsError> {
    u32::from_str_radix(s.trim_start_matches("0o"), 8)
        .map_err(|_| FsError::BadPermission(s.to_string()))
}

/// SHA-256 of a file's bytes, hex-encoded.
pub fn file_hash(path: &Path) -> Result<String, FsError> {
    let bytes = std::fs::read(path).map_err(|e| io(path, e))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex(&hasher.finalize()))
}

/// The "dirhash h1" scheme (`spec.md` §4.5): list files recursively under
/// `root`, sort by path, fold `"<sha256-hex>  <path>\n"` lines into a
/// running SHA-256, prefix the base64 of the final digest with `"h1:"`.
/// Returns `Ok(None)` if `root` does not exist (treated as "no prior
/// destination to compare against" by callers).
pub fn dirhash(root: &Path) -> Result<Option<String>, FsError> {
    if !root.exists() {
        return Ok(None);
    }
    let mut files = Vec::new();
    collect_files(root, root, &mut files)?;
    files.sort();

    let mut hasher = Sha256::new();
    for rel in &files {
        if rel.contains('\n') {
            return Err(FsError::NewlineInName(rel.clone()));
        }
        let abs = root.join(rel);
        let file_digest = file_hash(&abs)?;
        hasher.update(format!("{file_digest}  {rel}\n").as_bytes());
    }
    Ok(Some(format!("h1:{}", STANDARD.encode(hasher.finalize()))))
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) -> Result<(), FsError> {
    for entry in std::fs::read_dir(dir).map_err(|e| io(dir, e))? {
        let entry = entry.map_err(|e| io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(root, &path, out)?;
        } else {
            let rel = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .into_owned();
            out.push(rel);
        }
    }
    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Content hash of either a file or a directory at `path`, dispatching by
/// metadata. `None` when `path` doesn't exist.
pub fn content_hash(path: &Path) -> Result<Option<String>, FsError> {
    if !path.exists() {
        return Ok(None);
    }
    if path.is_dir() {
        dirhash(path)
    } else {
        file_hash(path).map(Some)
    }
}

/// Write `contents` to `dest`, creating parent directories along the way.
pub fn write_file(dest: &Path, contents: &[u8]) -> Result<(), FsError> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io(parent, e))?;
    }
    let mut f = std::fs::File::create(dest).map_err(|e| io(dest, e))?;
    f.write_all(contents).map_err(|e| io(dest, e))
}

/// Recursively copy `src` (a directory) to `dest`, creating `dest` and any
/// intermediate directories as needed.
pub fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<(), FsError> {
    std::fs::create_dir_all(dest).map_err(|e| io(dest, e))?;
    for entry in std::fs::read_dir(src).map_err(|e| io(src, e))? {
        let entry = entry.map_err(|e| io(src, e))?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        if from.is_dir() {
            copy_dir_recursive(&from, &to)?;
        } else if from.is_symlink() {
            let target = std::fs::read_link(&from).map_err(|e| io(&from, e))?;
            let _ = std::fs::remove_file(&to);
            std::os::unix::fs::symlink(&target, &to).map_err(|e| io(&to, e))?;
        } else {
            std::fs::copy(&from, &to).map_err(|e| io(&from, e))?;
        }
    }
    Ok(())
}

fn asset(path: &str, source: forgecfg_adapters::AssetError) -> FsError {
    FsError::Asset {
        path: path.to_string(),
        source,
    }
}

fn collect_source_files(
    source: &dyn AssetSource,
    root: &str,
    dir: &str,
    out: &mut Vec<String>,
) -> Result<(), FsError> {
    for name in source.read_dir(dir).map_err(|e| asset(dir, e))? {
        let child = asset_fs::join(dir, &name);
        let meta = source.stat(&child).map_err(|e| asset(&child, e))?;
        match meta.kind {
            AssetKind::Dir => collect_source_files(source, root, &child, out)?,
            AssetKind::File => {
                let rel = child.strip_prefix(root).unwrap_or(&child);
                out.push(rel.trim_start_matches('/').to_string());
            }
        }
    }
    Ok(())
}

/// The "dirhash h1" scheme computed directly against an
/// [`AssetSource`] (rather than the real local filesystem — see
/// [`dirhash`]), used to hash a `copy`/`template` action's source tree
/// whichever of `src_type ∈ {local, embed}` it came from.
pub fn source_dirhash(source: &dyn AssetSource, root: &str) -> Result<String, FsError> {
    let mut files = Vec::new();
    collect_source_files(source, root, root, &mut files)?;
    files.sort();

    let mut hasher = Sha256::new();
    for rel in &files {
        if rel.contains('\n') {
            return Err(FsError::NewlineInName(rel.clone()));
        }
        let abs = asset_fs::join(root, rel);
        let bytes = source.read(&abs).map_err(|e| asset(&abs, e))?;
        let mut file_hasher = Sha256::new();
        file_hasher.update(&bytes);
        let file_digest = hex(&file_hasher.finalize());
        hasher.update(format!("{file_digest}  {rel}\n").as_bytes());
    }
    Ok(format!("h1:{}", STANDARD.encode(hasher.finalize())))
}

/// Recursively copy a directory tree out of an [`AssetSource`] onto the
/// real local filesystem at `dest`.
pub fn copy_source_tree(source: &dyn AssetSource, src: &str, dest: &Path) -> Result<(), FsError> {
    std::fs::create_dir_all(dest).map_err(|e| io(dest, e))?;
    for name in source.read_dir(src).map_err(|e| asset(src, e))? {
        let child_src = asset_fs::join(src, &name);
        let meta = source.stat(&child_src).map_err(|e| asset(&child_src, e))?;
        let child_dest = dest.join(&name);
        match meta.kind {
            AssetKind::Dir => copy_source_tree(source, &child_src, &child_dest)?,
            AssetKind::File => {
                let bytes = source.read(&child_src).map_err(|e| asset(&child_src, e))?;
                write_file(&child_dest, &bytes)?;
            }
        }
    }
    Ok(())
}

/// Resolve `owner`/`group` names against `/etc/passwd`/`/etc/group` and
/// apply them to `path`. `group` falling back to the owner's primary GID
/// when empty, per `spec.md` §4.5 step 3.
pub fn chown_by_name(path: &Path, owner: &str, group: &str) -> Result<(), FsError> {
    let passwd_entry = crate::passwd::parse_passwd(Path::new(&crate::env::passwd_path()))
        .map_err(|e| io(path, std::io::Error::other(e.to_string())))?
        .into_iter()
        .find(|e| e.name == owner)
        .ok_or_else(|| io(path, std::io::Error::other(format!("unknown owner: {owner}"))))?;

    let gid = if group.is_empty() {
        passwd_entry.gid
    } else {
        crate::passwd::parse_group(Path::new(&crate::env::group_path()))
            .map_err(|e| io(path, std::io::Error::other(e.to_string())))?
            .into_iter()
            .find(|g| g.name == group)
            .map(|g| g.gid)
            .ok_or_else(|| io(path, std::io::Error::other(format!("unknown group: {group}"))))?
    };

    chown(path, Some(passwd_entry.uid), Some(gid))
}

/// Apply an octal-string permission to `path`.
pub fn apply_permission(path: &Path, permission: &str) -> Result<(), FsError> {
    let mode = parse_permission(permission)?;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|e| io(path, e))
}

/// Apply a uid/gid ownership pair to `path` (no-op fields left `None`).
pub fn chown(path: &Path, uid: Option<u32>, gid: Option<u32>) -> Result<(), FsError> {
    nix::unistd::chown(
        path,
        uid.map(nix::unistd::Uid::from_raw),
        gid.map(nix::unistd::Gid::from_raw),
    )
    .map_err(|errno| io(path, std::io::Error::from_raw_os_error(errno as i32)))
}

/// The backup destination for `basename` under `agent` (task name), per
/// `spec.md` §6: `<backup_dir>/<agent>/<basename>`.
pub fn backup_path(backup_dir: &str, agent: &str, basename: &str) -> PathBuf {
    Path::new(backup_dir).join(agent).join(basename)
}

/// Copy `src` (file or directory) into the backup location, overwriting
/// any prior backup.
pub fn backup(src: &Path, backup_dir: &str, agent: &str, basename: &str) -> Result<(), FsError> {
    let dest = backup_path(backup_dir, agent, basename);
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io(parent, e))?;
    }
    if src.is_dir() {
        copy_dir_recursive(src, &dest)
    } else {
        std::fs::copy(src, &dest).map(|_| ()).map_err(|e| io(src, e))
    }
}

#[cfg(test)]
#[path = "fs_util_tests.rs"]
mod tests;
