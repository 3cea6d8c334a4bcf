// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! forgecfg - example driver for the configuration-management engine.
//!
//! Loads a TaskList JSON file from disk and runs it through
//! [`forgecfg_engine::Engine`], either in collected mode (buffer every log
//! event, then print) or streaming mode (print events as they arrive on
//! the channel). Mirrors the teacher's `example/tasks/main.go` `non-chan`
//! / `chan` split.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use forgecfg_adapters::LocalAssetSource;
use forgecfg_core::LogEvent;
use forgecfg_engine::{Engine, TemplateOptions};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Mode {
    /// Buffer all log events, then print them once the run finishes.
    Collected,
    /// Print each log event as it arrives on the streaming channel.
    Streaming,
}

#[derive(Parser)]
#[command(
    name = "forgecfg",
    version,
    about = "Run a forgecfg TaskList JSON file against the local host"
)]
struct Cli {
    /// Path to the TaskList JSON config file
    config: PathBuf,

    /// Root directory asset copy/template actions with `src_type: "local"` resolve against
    #[arg(long, default_value = "/")]
    assets_dir: PathBuf,

    /// How to drain the engine's log stream
    #[arg(long, value_enum, default_value_t = Mode::Collected)]
    mode: Mode,

    /// Populate hostname/fqdn/ip facts before running (`spec.md` §3's wizard facts)
    #[arg(long)]
    enable_wizard_facts: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = std::fs::read(&cli.config)
        .with_context(|| format!("cannot read {}", cli.config.display()))?;
    let assets = Arc::new(LocalAssetSource::new(&cli.assets_dir));
    let options = TemplateOptions {
        enable_wizard_facts: cli.enable_wizard_facts,
        template_config: serde_json::Value::Null,
    };

    match cli.mode {
        Mode::Collected => run_collected(&config, assets, options).await,
        Mode::Streaming => run_streaming(&config, assets, options).await,
    }
}

async fn run_collected(
    config: &[u8],
    assets: Arc<LocalAssetSource>,
    options: TemplateOptions,
) -> Result<()> {
    let engine = Engine::new(config, assets, options)
        .await
        .context("cannot create engine")?;

    let (events, result) = engine.execute().await;
    for event in &events {
        print_event(event);
    }
    result.context("task execution failed")?;
    println!("INFO: Performed all tasks successfully");
    Ok(())
}

async fn run_streaming(
    config: &[u8],
    assets: Arc<LocalAssetSource>,
    options: TemplateOptions,
) -> Result<()> {
    let (engine, tx, mut rx) = Engine::new_with_log(config, assets, options)
        .await
        .context("cannot create engine")?;

    let perform = tokio::spawn(async move { engine.perform(tx).await });

    while let Some(event) = rx.recv().await {
        print_event(&event);
    }

    perform
        .await
        .context("perform task panicked")?
        .context("task execution failed")?;

    println!("INFO: Performed all tasks successfully");
    Ok(())
}

fn print_event(event: &LogEvent) {
    match event {
        LogEvent::Info { message, .. } => println!("INFO: {message}"),
        LogEvent::Warn { message, .. } => println!("WARN: {message}"),
        LogEvent::Error { message, .. } => println!("ERROR: {message}"),
        LogEvent::Debug { message, .. } => println!("DEBUG: {message}"),
    }
}
