// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution adapter: a timeout-bounded subprocess runner
//! returning stdout/stderr/exit code, used by the `cmd` action, the
//! `when` guard's shell-expression branch, and the `user`/`systemd`
//! action's tool-availability probes.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// The captured result of a completed subprocess.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i64,
}

#[derive(Debug, Error)]
pub enum SubprocessError {
    #[error("{description} timed out after {timeout_secs}s")]
    Timeout {
        description: String,
        timeout_secs: u64,
    },
    #[error("{description} failed to launch: {source}")]
    Spawn {
        description: String,
        #[source]
        source: std::io::Error,
    },
}

/// Runs argv-style commands and inline shell expressions, both bounded by
/// a caller-supplied timeout: an argv entry point (used by the `cmd`
/// action) and a `run_shell(shell, source)` entry point (used by the
/// `when` guard's `cmd` branch).
#[async_trait]
pub trait SubprocessRunner: Send + Sync {
    /// Run `argv0 args...` directly (no shell involved).
    async fn run_argv(
        &self,
        argv0: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, SubprocessError>;

    /// Run `expression` through `bash -c` (or another shell binary).
    async fn run_shell(
        &self,
        shell: &str,
        expression: &str,
        timeout: Duration,
    ) -> Result<CommandOutput, SubprocessError>;
}

/// The real adapter, backed by `tokio::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealSubprocessRunner;

impl RealSubprocessRunner {
    pub fn new() -> Self {
        Self
    }
}

async fn run(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<CommandOutput, SubprocessError> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1) as i64,
        }),
        Ok(Err(source)) => Err(SubprocessError::Spawn {
            description: description.to_string(),
            source,
        }),
        Err(_elapsed) => Err(SubprocessError::Timeout {
            description: description.to_string(),
            timeout_secs: timeout.as_secs(),
        }),
    }
}

#[async_trait]
impl SubprocessRunner for RealSubprocessRunner {
    async fn run_argv(
        &self,
        argv0: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, SubprocessError> {
        let mut cmd = Command::new(argv0);
        cmd.args(args);
        run(cmd, timeout, argv0).await
    }

    async fn run_shell(
        &self,
        shell: &str,
        expression: &str,
        timeout: Duration,
    ) -> Result<CommandOutput, SubprocessError> {
        let mut cmd = Command::new(shell);
        cmd.arg("-c").arg(expression);
        run(cmd, timeout, shell).await
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSubprocessRunner, SubprocessCall};

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// One recorded invocation of the fake runner.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SubprocessCall {
        Argv { argv0: String, args: Vec<String> },
        Shell { shell: String, expression: String },
    }

    struct FakeState {
        calls: Vec<SubprocessCall>,
        argv_responses: HashMap<String, Result<CommandOutput, String>>,
        shell_responses: HashMap<String, Result<CommandOutput, String>>,
        default_response: CommandOutput,
    }

    /// A programmable [`SubprocessRunner`] for engine/action tests: register
    /// a canned response keyed by `argv0` or by the exact shell expression,
    /// and the fake replays it instead of touching the real host.
    #[derive(Clone)]
    pub struct FakeSubprocessRunner {
        inner: Arc<Mutex<FakeState>>,
    }

    impl Default for FakeSubprocessRunner {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeState {
                    calls: Vec::new(),
                    argv_responses: HashMap::new(),
                    shell_responses: HashMap::new(),
                    default_response: CommandOutput::default(),
                })),
            }
        }
    }

    impl FakeSubprocessRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<SubprocessCall> {
            self.inner.lock().calls.clone()
        }

        /// Program the response for `run_argv` calls whose `argv0` equals `bin`.
        pub fn on_argv(&self, bin: &str, output: CommandOutput) {
            self.inner
                .lock()
                .argv_responses
                .insert(bin.to_string(), Ok(output));
        }

        /// Program `run_argv` for `bin` to fail with `message` (modeled as a spawn failure).
        pub fn on_argv_error(&self, bin: &str, message: &str) {
            self.inner
                .lock()
                .argv_responses
                .insert(bin.to_string(), Err(message.to_string()));
        }

        /// Program the response for `run_shell` calls whose expression equals `expr`.
        pub fn on_shell(&self, expr: &str, output: CommandOutput) {
            self.inner
                .lock()
                .shell_responses
                .insert(expr.to_string(), Ok(output));
        }

        pub fn set_default_response(&self, output: CommandOutput) {
            self.inner.lock().default_response = output;
        }
    }

    #[async_trait]
    impl SubprocessRunner for FakeSubprocessRunner {
        async fn run_argv(
            &self,
            argv0: &str,
            args: &[String],
            _timeout: Duration,
        ) -> Result<CommandOutput, SubprocessError> {
            let mut inner = self.inner.lock();
            inner.calls.push(SubprocessCall::Argv {
                argv0: argv0.to_string(),
                args: args.to_vec(),
            });
            match inner.argv_responses.get(argv0) {
                Some(Ok(output)) => Ok(output.clone()),
                Some(Err(message)) => Err(SubprocessError::Spawn {
                    description: argv0.to_string(),
                    source: std::io::Error::other(message.clone()),
                }),
                None => Ok(inner.default_response.clone()),
            }
        }

        async fn run_shell(
            &self,
            shell: &str,
            expression: &str,
            _timeout: Duration,
        ) -> Result<CommandOutput, SubprocessError> {
            let mut inner = self.inner.lock();
            inner.calls.push(SubprocessCall::Shell {
                shell: shell.to_string(),
                expression: expression.to_string(),
            });
            match inner.shell_responses.get(expression) {
                Some(Ok(output)) => Ok(output.clone()),
                Some(Err(message)) => Err(SubprocessError::Spawn {
                    description: shell.to_string(),
                    source: std::io::Error::other(message.clone()),
                }),
                None => Ok(inner.default_response.clone()),
            }
        }
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
