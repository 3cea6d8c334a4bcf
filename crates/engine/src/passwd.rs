// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manual `/etc/passwd` and `/etc/group` parsing for the `user` action's
//! probe step (`spec.md` §4.9). Colon-delimited, comment-tolerant; no
//! crate does this parsing for us so it's hand-rolled, same as the
//! original's own ad-hoc file scan.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswdError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswdEntry {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
    pub home: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    pub name: String,
    pub gid: u32,
}

fn read_lines(path: &Path) -> Result<Vec<String>, PasswdError> {
    let content = std::fs::read_to_string(path).map_err(|e| PasswdError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Parse `/etc/passwd`-shaped content at `path`. Malformed lines (wrong
/// field count, non-numeric uid/gid) are skipped rather than failing the
/// whole read, matching a best-effort system-file scan.
pub fn parse_passwd(path: &Path) -> Result<Vec<PasswdEntry>, PasswdError> {
    let mut out = Vec::new();
    for line in read_lines(path)? {
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() < 6 {
            continue;
        }
        let (Ok(uid), Ok(gid)) = (fields[2].parse(), fields[3].parse()) else {
            continue;
        };
        out.push(PasswdEntry {
            name: fields[0].to_string(),
            uid,
            gid,
            home: fields[5].to_string(),
        });
    }
    Ok(out)
}

/// Parse `/etc/group`-shaped content at `path`.
pub fn parse_group(path: &Path) -> Result<Vec<GroupEntry>, PasswdError> {
    let mut out = Vec::new();
    for line in read_lines(path)? {
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() < 3 {
            continue;
        }
        let Ok(gid) = fields[2].parse() else {
            continue;
        };
        out.push(GroupEntry {
            name: fields[0].to_string(),
            gid,
        });
    }
    Ok(out)
}

/// Everything the `user` action's probe step (`spec.md` §4.9) needs to
/// decide whether/how to mutate a user account.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    pub user: Option<PasswdEntry>,
    pub uid_taken: Option<String>,
    pub gid_taken: Option<String>,
    pub group_name_exists: bool,
    pub home_owner: Option<String>,
}

/// Run the probe described in `spec.md` §4.9 against the given
/// `/etc/passwd`/`/etc/group` paths, for the user named `name` wanting
/// `uid`/`gid`/`home`.
pub fn probe(
    passwd_path: &Path,
    group_path: &Path,
    name: &str,
    uid: u32,
    gid: u32,
    home: &str,
) -> Result<Probe, PasswdError> {
    let passwd = parse_passwd(passwd_path)?;
    let groups = parse_group(group_path)?;

    let user = passwd.iter().find(|e| e.name == name).cloned();
    let uid_taken = passwd
        .iter()
        .find(|e| e.uid == uid && e.name != name)
        .map(|e| e.name.clone());
    let gid_taken = passwd
        .iter()
        .find(|e| e.gid == gid && e.name != name)
        .map(|e| e.name.clone());
    let group_name_exists = groups.iter().any(|g| g.name == name);
    let home_owner = passwd
        .iter()
        .find(|e| e.home == home && e.name != name)
        .map(|e| e.name.clone());

    Ok(Probe {
        user,
        uid_taken,
        gid_taken,
        group_name_exists,
        home_owner,
    })
}

#[cfg(test)]
#[path = "passwd_tests.rs"]
mod tests;
