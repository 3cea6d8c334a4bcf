// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Systemd control adapter: the external collaborator behind the
//! `systemd` action — start/stop/restart/reload a unit and daemon-reload,
//! each implemented as a single `systemctl` invocation through the
//! subprocess adapter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::subprocess::{SubprocessError, SubprocessRunner};

const SYSTEMCTL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SystemdError {
    #[error("systemctl {0} {1} exited {2}: {3}")]
    CommandFailed(String, String, i64, String),
    #[error("systemctl invocation failed: {0}")]
    Subprocess(#[from] SubprocessError),
}

/// The five systemd operations the `systemd` action dispatches through.
#[async_trait]
pub trait SystemdAdapter: Send + Sync {
    async fn reload_daemon(&self) -> Result<(), SystemdError>;
    async fn start_service(&self, name: &str) -> Result<(), SystemdError>;
    async fn stop_service(&self, name: &str) -> Result<(), SystemdError>;
    async fn restart_service(&self, name: &str) -> Result<(), SystemdError>;
    async fn reload_service(&self, name: &str) -> Result<(), SystemdError>;
}

/// Real adapter: shells out to `systemctl` via a [`SubprocessRunner`].
pub struct RealSystemdAdapter {
    runner: Arc<dyn SubprocessRunner>,
}

impl RealSystemdAdapter {
    pub fn new(runner: Arc<dyn SubprocessRunner>) -> Self {
        Self { runner }
    }

    async fn systemctl(&self, verb: &str, unit: Option<&str>) -> Result<(), SystemdError> {
        let mut args = vec![verb.to_string()];
        if let Some(unit) = unit {
            args.push(unit.to_string());
        }
        let output = self
            .runner
            .run_argv("systemctl", &args, SYSTEMCTL_TIMEOUT)
            .await?;
        if output.exit_code != 0 {
            return Err(SystemdError::CommandFailed(
                verb.to_string(),
                unit.unwrap_or("").to_string(),
                output.exit_code,
                output.stderr,
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SystemdAdapter for RealSystemdAdapter {
    async fn reload_daemon(&self) -> Result<(), SystemdError> {
        self.systemctl("daemon-reload", None).await
    }

    async fn start_service(&self, name: &str) -> Result<(), SystemdError> {
        self.systemctl("start", Some(name)).await
    }

    async fn stop_service(&self, name: &str) -> Result<(), SystemdError> {
        self.systemctl("stop", Some(name)).await
    }

    async fn restart_service(&self, name: &str) -> Result<(), SystemdError> {
        self.systemctl("restart", Some(name)).await
    }

    async fn reload_service(&self, name: &str) -> Result<(), SystemdError> {
        self.systemctl("reload", Some(name)).await
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSystemdAdapter;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc as StdArc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SystemdCall {
        ReloadDaemon,
        Start(String),
        Stop(String),
        Restart(String),
        Reload(String),
    }

    /// Fake systemd adapter recording every call; optionally configured to
    /// fail on a specific unit name.
    #[derive(Clone, Default)]
    pub struct FakeSystemdAdapter {
        calls: StdArc<Mutex<Vec<SystemdCall>>>,
        failing_unit: StdArc<Mutex<Option<String>>>,
    }

    impl FakeSystemdAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<SystemdCall> {
            self.calls.lock().clone()
        }

        pub fn fail_unit(&self, name: &str) {
            *self.failing_unit.lock() = Some(name.to_string());
        }

        fn check(&self, name: &str) -> Result<(), SystemdError> {
            if self.failing_unit.lock().as_deref() == Some(name) {
                return Err(SystemdError::CommandFailed(
                    "fake".to_string(),
                    name.to_string(),
                    1,
                    "forced failure".to_string(),
                ));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SystemdAdapter for FakeSystemdAdapter {
        async fn reload_daemon(&self) -> Result<(), SystemdError> {
            self.calls.lock().push(SystemdCall::ReloadDaemon);
            Ok(())
        }

        async fn start_service(&self, name: &str) -> Result<(), SystemdError> {
            self.calls.lock().push(SystemdCall::Start(name.to_string()));
            self.check(name)
        }

        async fn stop_service(&self, name: &str) -> Result<(), SystemdError> {
            self.calls.lock().push(SystemdCall::Stop(name.to_string()));
            self.check(name)
        }

        async fn restart_service(&self, name: &str) -> Result<(), SystemdError> {
            self.calls
                .lock()
                .push(SystemdCall::Restart(name.to_string()));
            self.check(name)
        }

        async fn reload_service(&self, name: &str) -> Result<(), SystemdError> {
            self.calls
                .lock()
                .push(SystemdCall::Reload(name.to_string()));
            self.check(name)
        }
    }
}

#[cfg(test)]
#[path = "systemd_tests.rs"]
mod tests;
