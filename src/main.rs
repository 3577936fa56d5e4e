use std::{env, io, process, sync::Arc};

use anyhow::Context;
use log::{error, info};
use tokio::io::BufReader;

use integration::ThreadPoolEngine;
use orchestrator::{
    Config, JsonReporter, ProcessPool, QuerySource, Reporter, TextReporter, WorkerCommand,
    configs::{EngineKind, ReportFormat},
};
use worker::WorkerConfig;

const WORKER_MODE: &str = "worker";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mode = args.get(1).map(String::as_str);

    if mode == Some(WORKER_MODE) {
        return run_worker().await;
    }

    let mut config = Config::from_env().context("reading configuration")?;
    match mode {
        None => {}
        Some(mode @ ("threads" | "processes")) => config.engine = mode.parse()?,
        Some(mode) => {
            eprintln!(
                "Unknown mode: {mode}. Usage: {} [threads|processes|{WORKER_MODE}]",
                args[0]
            );
            process::exit(1);
        }
    }

    let reporter: Arc<dyn Reporter> = match config.report {
        ReportFormat::Text => Arc::new(TextReporter),
        ReportFormat::Json => Arc::new(JsonReporter),
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let mut source = QuerySource::new(stdin, config.on_invalid).with_prompt(config.prompt);

    match config.engine {
        EngineKind::Threads => {
            let engine = ThreadPoolEngine::new(config.threads).with_reduction(config.reduction);
            orchestrator::run_threads(&mut source, &engine, reporter.as_ref()).await?;
        }
        EngineKind::Processes => {
            let command = worker_command(&config)?;
            let pool = ProcessPool::new(command, config.max_workers, reporter);

            let summary = orchestrator::run_processes(&mut source, pool)
                .await
                .inspect_err(|e| error!("aborting: {e}"))?;
            info!("{} of {} queries reported", summary.reported, summary.spawned);
        }
    }

    Ok(())
}

/// Evaluates the single query this process was spawned for.
async fn run_worker() -> anyhow::Result<()> {
    let config = WorkerConfig::from_env()?;
    worker::run_stdio(&config)
        .await
        .map_err(io::Error::from)
        .context("worker failed")?;
    Ok(())
}

/// Re-executes this binary, or the configured program, in worker mode.
fn worker_command(config: &Config) -> anyhow::Result<WorkerCommand> {
    let program = match &config.worker_bin {
        Some(program) => program.clone(),
        None => env::current_exe().context("locating the worker executable")?,
    };

    Ok(WorkerCommand::new(program)
        .arg(WORKER_MODE)
        .env(worker::config::THREADS_VAR, config.worker_threads.to_string())
        .env(worker::config::REDUCTION_VAR, config.reduction.to_string()))
}
