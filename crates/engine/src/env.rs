// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for engine/action tunables.

use std::time::Duration;

fn parse_u64(var: &str) -> Option<u64> {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok())
}

/// Default timeout applied to an action whose declared `timeout` is zero,
/// normalized at the factory boundary (`spec.md` §4.2).
pub fn default_timeout() -> Duration {
    Duration::from_secs(
        parse_u64("FORGECFG_DEFAULT_TIMEOUT_SECS").unwrap_or(forgecfg_core::DEFAULT_TIMEOUT_SECS),
    )
}

/// Root directory under which the `copy`/`template` actions stash a
/// pre-overwrite backup, keyed `<backup_dir>/<task-name>/<basename>`
/// (`spec.md` §6). Defaults to `/tmp/backup`, matching the original's
/// hardcoded path.
pub fn backup_dir() -> String {
    std::env::var("FORGECFG_BACKUP_DIR").unwrap_or_else(|_| "/tmp/backup".to_string())
}

/// Directory the `template` action renders its staging file into before
/// the copy-idempotence rule takes over (`spec.md` §4.6). Defaults to
/// `/tmp`, matching the original.
pub fn staging_dir() -> String {
    std::env::var("FORGECFG_STAGING_DIR").unwrap_or_else(|_| "/tmp".to_string())
}

/// Path to the `passwd(5)`-shaped file the `copy`/`template`/`user`
/// actions resolve owner names and the `user` action probes existing
/// accounts against. Defaults to `/etc/passwd`; tests override this to a
/// fixture file so they never touch the real system account database.
pub fn passwd_path() -> String {
    std::env::var("FORGECFG_PASSWD_PATH").unwrap_or_else(|_| "/etc/passwd".to_string())
}

/// Path to the `group(5)`-shaped file, mirroring [`passwd_path`].
pub fn group_path() -> String {
    std::env::var("FORGECFG_GROUP_PATH").unwrap_or_else(|_| "/etc/group".to_string())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
