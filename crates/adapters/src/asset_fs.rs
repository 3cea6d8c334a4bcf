// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Asset filesystem adapter: an embedded-asset virtual filesystem
//! provider. A read-only filesystem abstraction supporting
//! stat/read/readdir/glob, unifying the `copy`/`template` actions'
//! `src_type ∈ {local, embed}` duality behind a single trait instead of a
//! `source_kind` discriminator threaded through every filesystem helper.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    File,
    Dir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMeta {
    pub kind: AssetKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("io error reading {path}: {message}")]
    Io { path: String, message: String },
    #[error("invalid glob pattern: {0}")]
    BadGlob(String),
}

/// Read-only filesystem abstraction: local disk or an embedded, in-memory
/// asset bundle, whichever the embedding application supplies to
/// `Engine::new`/`new_with_log`.
pub trait AssetSource: Send + Sync {
    fn stat(&self, path: &str) -> Result<AssetMeta, AssetError>;
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError>;
    fn read_dir(&self, path: &str) -> Result<Vec<String>, AssetError>;
    fn glob(&self, pattern: &str) -> Result<Vec<String>, AssetError>;
}

/// Backed by the real local filesystem, rooted at `root`.
pub struct LocalAssetSource {
    root: PathBuf,
}

impl LocalAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl AssetSource for LocalAssetSource {
    fn stat(&self, path: &str) -> Result<AssetMeta, AssetError> {
        let full = self.resolve(path);
        let meta = std::fs::metadata(&full).map_err(|e| io_err(path, e))?;
        Ok(AssetMeta {
            kind: if meta.is_dir() {
                AssetKind::Dir
            } else {
                AssetKind::File
            },
        })
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let full = self.resolve(path);
        std::fs::read(&full).map_err(|e| io_err(path, e))
    }

    fn read_dir(&self, path: &str) -> Result<Vec<String>, AssetError> {
        let full = self.resolve(path);
        let mut out = Vec::new();
        for entry in std::fs::read_dir(&full).map_err(|e| io_err(path, e))? {
            let entry = entry.map_err(|e| io_err(path, e))?;
            out.push(entry.file_name().to_string_lossy().into_owned());
        }
        out.sort();
        Ok(out)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<String>, AssetError> {
        let full_pattern = self.root.join(pattern.trim_start_matches('/'));
        let pattern_str = full_pattern.to_string_lossy().into_owned();
        let mut out = Vec::new();
        for entry in glob::glob(&pattern_str).map_err(|e| AssetError::BadGlob(e.to_string()))? {
            let path = entry.map_err(|e| AssetError::BadGlob(e.to_string()))?;
            if let Ok(rel) = path.strip_prefix(&self.root) {
                out.push(rel.to_string_lossy().into_owned());
            }
        }
        out.sort();
        Ok(out)
    }
}

fn io_err(path: &str, e: std::io::Error) -> AssetError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AssetError::NotFound(path.to_string())
    } else {
        AssetError::Io {
            path: path.to_string(),
            message: e.to_string(),
        }
    }
}

/// An in-memory asset bundle, a virtual filesystem assembled at compile
/// time. Used by embedders who bundle their task-list templates into the
/// binary via `include_str!`/`include_bytes!` rather than shipping them
/// on disk.
#[derive(Default)]
pub struct EmbeddedAssetSource {
    files: BTreeMap<String, Vec<u8>>,
}

impl EmbeddedAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.files.insert(normalize(&path.into()), contents.into());
    }
}

fn normalize(path: &str) -> String {
    path.trim_start_matches('/').to_string()
}

impl AssetSource for EmbeddedAssetSource {
    fn stat(&self, path: &str) -> Result<AssetMeta, AssetError> {
        let path = normalize(path);
        if self.files.contains_key(&path) {
            return Ok(AssetMeta {
                kind: AssetKind::File,
            });
        }
        let prefix = format!("{path}/");
        if path.is_empty() || self.files.keys().any(|k| k.starts_with(&prefix)) {
            return Ok(AssetMeta {
                kind: AssetKind::Dir,
            });
        }
        Err(AssetError::NotFound(path))
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let path = normalize(path);
        self.files
            .get(&path)
            .cloned()
            .ok_or(AssetError::NotFound(path))
    }

    fn read_dir(&self, path: &str) -> Result<Vec<String>, AssetError> {
        let path = normalize(path);
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };
        let mut seen = std::collections::BTreeSet::new();
        for key in self.files.keys() {
            if let Some(rest) = key.strip_prefix(&prefix) {
                if let Some((head, _)) = rest.split_once('/') {
                    seen.insert(head.to_string());
                } else if !rest.is_empty() {
                    seen.insert(rest.to_string());
                }
            }
        }
        if seen.is_empty() && !self.files.contains_key(&path) {
            return Err(AssetError::NotFound(path));
        }
        Ok(seen.into_iter().collect())
    }

    fn glob(&self, pattern: &str) -> Result<Vec<String>, AssetError> {
        let pattern = normalize(pattern);
        let matcher =
            glob::Pattern::new(&pattern).map_err(|e| AssetError::BadGlob(e.to_string()))?;
        let mut out: Vec<String> = self
            .files
            .keys()
            .filter(|k| matcher.matches(k))
            .cloned()
            .collect();
        out.sort();
        Ok(out)
    }
}

/// Joins filesystem path components the way the engine's filesystem
/// helpers expect: always `/`-separated regardless of host OS, since
/// embedded assets are always `/`-keyed.
pub fn join(base: &str, child: &str) -> String {
    if base.is_empty() {
        child.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), child)
    }
}

pub fn basename(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
}

#[cfg(test)]
#[path = "asset_fs_tests.rs"]
mod tests;
