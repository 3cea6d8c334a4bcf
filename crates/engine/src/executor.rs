// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The task executor (`spec.md` §4.1): iterates `priority`, drives each
//! task's actions through the factory, enforces the `whenNotSatisfied` /
//! `ignore_error` classification, and streams log events.

use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error as trace_error, info, warn};

use forgecfg_core::{EnvSnapshot, FactTable, LogEvent, Register, RegisterStore, TaskList};

use crate::error::ExecuteError;
use crate::factory::{self, Collaborators};

/// Everything the executor needs beyond the task list itself: the shared
/// register store and the external collaborators every action's
/// [`crate::actions::ActionCtx`] is built from.
pub struct ExecutorDeps {
    pub store: RegisterStore,
    pub collaborators: Collaborators,
    pub template_config: Value,
    pub facts: FactTable,
    pub env: EnvSnapshot,
    pub enable_wizard_facts: bool,
}

/// Run every task in `priority` order, streaming log events to `log` and
/// returning the first fatal error, per `spec.md` §4.1's algorithm. The
/// caller (`Engine::execute`/`Engine::perform`) owns sending the channel
/// close — see the single-writer note below.
///
/// A task-name in `priority` with no entry in `tasks` is a silent no-op
/// (`spec.md` §3: "Tasks not referenced in priority are not executed" —
/// the converse, a referenced name absent from `tasks`, is treated the
/// same way, matching a Go map's zero-value lookup for a missing key).
pub async fn run(
    task_list: &TaskList,
    deps: &ExecutorDeps,
    log: &UnboundedSender<LogEvent>,
) -> Result<(), ExecuteError> {
    for task_name in &task_list.priority {
        let Some(actions) = task_list.tasks.get(task_name) else {
            continue;
        };
        for action in actions {
            let message = format!(
                "Perform: Task={task_name} Action={kind:?} Name={name}",
                kind = action.kind,
                name = action.name
            );
            info!(task = %task_name, action = %action.name, "{message}");
            emit(log, LogEvent::info(message));

            let register_key = action.register_key();
            deps.store.set(register_key.clone(), Register::default());

            let (implementation, ctx) = match factory::build(
                action,
                task_name,
                register_key.clone(),
                deps.store.clone(),
                &deps.collaborators,
                &deps.template_config,
                &deps.facts,
                &deps.env,
                deps.enable_wizard_facts,
                log.clone(),
            ) {
                Ok(built) => built,
                Err(source) => {
                    let err = ExecuteError::FactoryFailed {
                        task: task_name.clone(),
                        action: action.name.clone(),
                        source,
                    };
                    trace_error!(task = %task_name, action = %action.name, error = %err, "factory failed");
                    emit(log, LogEvent::error(err.to_string()));
                    return Err(err);
                }
            };

            let when_result = crate::when::check(
                action.when.as_ref(),
                &deps.store,
                ctx.subprocess.as_ref(),
                ctx.timeout,
            )
            .await;

            let result = match when_result {
                Ok(()) => implementation.execute(&ctx).await,
                Err(guard_err) => Err(guard_err),
            };

            if let Err(action_err) = result {
                if let Some(mut register) = deps.store.get(&register_key) {
                    register.stderr = action_err.to_string();
                    deps.store.set(register_key.clone(), register);
                }

                if matches!(action_err, crate::error::ActionError::WhenNotSatisfied) {
                    let message = format!(
                        "when not satisfied: Task={task_name} Action={name}",
                        name = action.name
                    );
                    warn!(task = %task_name, action = %action.name, "{message}");
                    emit(log, LogEvent::warn(message));
                    continue;
                }

                let message = format!(
                    "Task={task_name} Action={name} failed: {action_err}",
                    name = action.name
                );
                if action.ignore_error {
                    debug!(task = %task_name, action = %action.name, "{message}");
                    emit(log, LogEvent::error(message));
                    continue;
                }

                trace_error!(task = %task_name, action = %action.name, "{message}");
                emit(log, LogEvent::error(message));
                return Err(ExecuteError::ActionFailed {
                    task: task_name.clone(),
                    action: action.name.clone(),
                    source: action_err,
                });
            }
        }
    }
    Ok(())
}

fn emit(log: &UnboundedSender<LogEvent>, event: LogEvent) {
    let _ = log.send(event);
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
