// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hostname / network fact resolution.
//!
//! Four facts are resolved once per engine construction (when
//! `TemplateOptions.enable_wizard_facts` is set) and stored into a
//! [`forgecfg_core::FactTable`]:
//!
//! - `os_hostname` — the kernel hostname.
//! - `fqdn_hostname` — best-effort FQDN via `hostname -f`, falling back to
//!   the OS hostname on failure.
//! - `cmd_hostname` — the verbatim output of the `hostname` command.
//! - `env(name)` — looked up directly against an [`forgecfg_core::EnvSnapshot`]
//!   by the template renderer, not resolved here (it's one-argument, not
//!   zero-argument, so it doesn't fit a flat `FactTable` entry; see
//!   `engine::template`).
//!
//! `fqdn_hostname` and `cmd_hostname` are both bounded by a 10-second
//! timeout.

use std::sync::Arc;

use forgecfg_core::FactTable;

use crate::env::hostname_probe_timeout;
use crate::subprocess::SubprocessRunner;

/// Resolve the OS hostname via `hostname::get()`, falling back to the
/// empty string if unavailable rather than propagating an error into the
/// fact table.
pub fn os_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_default()
}

/// Best-effort FQDN via `hostname -f`, falling back to [`os_hostname`] on
/// any failure (nonzero exit, timeout, or missing binary).
pub async fn fqdn_hostname(runner: &dyn SubprocessRunner) -> String {
    match runner
        .run_argv("hostname", &["-f".to_string()], hostname_probe_timeout())
        .await
    {
        Ok(output) if output.exit_code == 0 => {
            let trimmed = output.stdout.trim();
            if trimmed.is_empty() {
                os_hostname()
            } else {
                trimmed.to_string()
            }
        }
        _ => os_hostname(),
    }
}

/// The verbatim output of running `hostname` with no arguments.
pub async fn cmd_hostname(runner: &dyn SubprocessRunner) -> String {
    match runner
        .run_argv("hostname", &[], hostname_probe_timeout())
        .await
    {
        Ok(output) if output.exit_code == 0 => output.stdout.trim().to_string(),
        _ => String::new(),
    }
}

/// Populate a [`FactTable`] with the three zero-argument hostname facts.
/// `env(name)` is resolved separately by the template renderer against an
/// `EnvSnapshot`, since it takes an argument.
pub async fn populate_hostname_facts(runner: Arc<dyn SubprocessRunner>, facts: &mut FactTable) {
    facts.insert("os_hostname", os_hostname());
    facts.insert("fqdn_hostname", fqdn_hostname(runner.as_ref()).await);
    facts.insert("cmd_hostname", cmd_hostname(runner.as_ref()).await);
}

#[cfg(test)]
#[path = "facts_tests.rs"]
mod tests;
