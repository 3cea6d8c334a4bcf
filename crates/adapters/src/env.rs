// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.
//!
//! The engine-level tunables (`FORGECFG_DEFAULT_TIMEOUT_SECS`,
//! `FORGECFG_BACKUP_DIR`, `FORGECFG_STAGING_DIR`) live in
//! `forgecfg_engine::env` since they govern engine/action behavior, not
//! the adapters; this module is left for adapter-local tunables, of which
//! there is currently exactly one.

use std::time::Duration;

fn parse_duration_secs(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Floor applied to the `hostname -f` / `hostname` fact probes so a
/// misconfigured host can't hang fact resolution indefinitely (default:
/// 10s, matching `netutils.GetHostName`'s timeout parameter).
pub fn hostname_probe_timeout() -> Duration {
    parse_duration_secs("FORGECFG_HOSTNAME_PROBE_TIMEOUT_SECS").unwrap_or(Duration::from_secs(10))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
