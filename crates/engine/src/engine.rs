// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The public `Engine` API (`spec.md` §6): parses a `TaskList`, captures
//! the environment and (optionally) hostname facts, and drives the
//! executor in collected (`execute`) or streaming (`perform`) mode.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use forgecfg_adapters::{
    AssetSource, LocalAssetSource, RealSubprocessRunner, RealSystemdAdapter, SubprocessRunner,
};
use forgecfg_core::{EnvSnapshot, FactTable, LogEvent, RegisterStore, TaskList};

use crate::error::EngineError;
use crate::executor::{self, ExecutorDeps};
use crate::factory::Collaborators;

/// Caller-supplied template knobs (`spec.md` §6).
#[derive(Clone, Default)]
pub struct TemplateOptions {
    pub enable_wizard_facts: bool,
    pub template_config: Value,
}

/// An embeddable configuration-management engine instance: an immutable
/// `TaskList` plus the collaborators and captured environment every
/// action invocation needs.
pub struct Engine {
    task_list: TaskList,
    store: RegisterStore,
    collaborators: Collaborators,
    template_config: Value,
    facts: FactTable,
    env: EnvSnapshot,
    enable_wizard_facts: bool,
}

impl Engine {
    /// Parse `config` as a `TaskList`, capture the process environment,
    /// and (when `options.enable_wizard_facts`) resolve the hostname
    /// facts, per `spec.md` §6's `New`.
    pub async fn new(
        config: &[u8],
        assets: Arc<dyn AssetSource>,
        options: TemplateOptions,
    ) -> Result<Engine, EngineError> {
        let task_list: TaskList =
            serde_json::from_slice(config).map_err(forgecfg_core::ModelError::from)?;

        let subprocess: Arc<dyn SubprocessRunner> = Arc::new(RealSubprocessRunner::new());
        let mut facts = FactTable::new();
        if options.enable_wizard_facts {
            forgecfg_adapters::facts::populate_hostname_facts(subprocess.clone(), &mut facts).await;
        }

        Ok(Engine {
            task_list,
            store: RegisterStore::new(),
            collaborators: Collaborators {
                subprocess: subprocess.clone(),
                systemd: Arc::new(RealSystemdAdapter::new(subprocess)),
                assets_local: Arc::new(LocalAssetSource::new("/")),
                assets_embed: assets,
            },
            template_config: options.template_config,
            facts,
            env: EnvSnapshot::capture(),
            enable_wizard_facts: options.enable_wizard_facts,
        })
    }

    /// As [`Engine::new`], additionally opening the streaming log channel
    /// (`spec.md` §6's `NewWithLog`). Go's single `chan Event` value can
    /// serve as both send and receive handle; Rust's `mpsc` splits those
    /// into distinct types, so this returns both halves — the sender to
    /// hand back into [`Engine::perform`], the receiver to drain
    /// concurrently, exactly the channel [`Engine::perform`] will close on
    /// return.
    pub async fn new_with_log(
        config: &[u8],
        assets: Arc<dyn AssetSource>,
        options: TemplateOptions,
    ) -> Result<(Engine, UnboundedSender<LogEvent>, UnboundedReceiver<LogEvent>), EngineError> {
        let engine = Engine::new(config, assets, options).await?;
        let (tx, rx) = unbounded_channel();
        Ok((engine, tx, rx))
    }

    /// The register store backing this engine instance, exposed so a
    /// caller can call `RegisterStore::reset` between independent runs
    /// (`spec.md` §6).
    pub fn register_store(&self) -> &RegisterStore {
        &self.store
    }

    fn deps(&self) -> ExecutorDeps {
        ExecutorDeps {
            store: self.store.clone(),
            collaborators: self.collaborators.clone(),
            template_config: self.template_config.clone(),
            facts: self.facts.clone(),
            env: self.env.clone(),
            enable_wizard_facts: self.enable_wizard_facts,
        }
    }

    /// Collected mode (`spec.md` §4.1/§6): run every task in priority
    /// order, draining the log stream into an ordered `Vec` rather than
    /// handing the caller a channel.
    pub async fn execute(&self) -> (Vec<LogEvent>, Result<(), EngineError>) {
        let (tx, mut rx) = unbounded_channel::<LogEvent>();
        let task_list = self.task_list.clone();
        let deps = self.deps();

        let run_handle = tokio::spawn(async move {
            let result = executor::run(&task_list, &deps, &tx).await;
            drop(tx);
            result
        });

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        let result = match run_handle.await {
            Ok(result) => result.map_err(EngineError::from),
            Err(join_err) => Err(EngineError::Execute(
                crate::error::ExecuteError::ActionFailed {
                    task: String::new(),
                    action: String::new(),
                    source: crate::error::ActionError::Policy(format!(
                        "executor task panicked: {join_err}"
                    )),
                },
            )),
        };

        (events, result)
    }

    /// Streaming mode (`spec.md` §4.1/§6): emit events to the
    /// caller-provided channel as they occur, closing it on return by
    /// dropping `tx` — the single-writer convention from `spec.md` §5/§9.
    pub async fn perform(self, tx: UnboundedSender<LogEvent>) -> Result<(), EngineError> {
        let deps = self.deps();
        let result = executor::run(&self.task_list, &deps, &tx).await;
        drop(tx);
        result.map_err(EngineError::from)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
