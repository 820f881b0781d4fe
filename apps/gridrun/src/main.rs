mod config;
mod console;

use std::sync::Arc;

use anyhow::Context;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use gridrun_core::{DispatchConfig, Dispatcher, Subscribe, fill_queue};
use gridrun_exec::prelude::*;
use gridrun_observe::{Journal, logger_init};

use crate::{config::AppConfig, console::Console};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cfg = AppConfig::from_env().context("loading configuration")?;
    logger_init(&cfg.logger).context("initializing logger")?;
    let grid = cfg.grid;

    // Simulators run in their own process groups, so the handler must be in
    // place before the first one is spawned.
    let cancel = CancellationToken::new();
    let interrupt = listen_for_interrupt(cancel.clone()).context("installing SIGINT handler")?;

    let queue = Arc::new(fill_queue(&grid.axes));
    let dispatch = DispatchConfig::from_grid(&grid);
    println!("{} tasks are created", queue.len());
    println!("{} available cpu cores", dispatch.cores);

    let runner = SimRunner::new(grid.sim.clone())
        .context("preparing simulator runner")?
        .with_stdio(StdioPolicy::quiet(grid.quiet));
    info!(program = %runner.spec().program, scenario = %runner.spec().scenario, "simulator configured");

    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Journal::new()), Arc::new(Console)];
    let dispatcher = Dispatcher::new(Arc::new(runner), dispatch).with_subscribers(subscribers);

    let summary = dispatcher.run(queue, cancel).await?;
    interrupt.abort();

    info!(
        workers = summary.workers,
        completed = summary.completed,
        cancelled = summary.cancelled,
        "run finished"
    );
    Ok(())
}

/// Register for SIGINT now and cancel `cancel` once it arrives.
#[cfg(unix)]
fn listen_for_interrupt(cancel: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    Ok(tokio::spawn(async move {
        if sigint.recv().await.is_some() {
            info!("interrupt received; terminating workers");
            cancel.cancel();
        }
    }))
}

#[cfg(not(unix))]
fn listen_for_interrupt(cancel: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    use tracing::error;

    Ok(tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received; terminating workers");
                cancel.cancel();
            }
            Err(e) => error!(error = %e, "unable to listen for interrupt"),
        }
    }))
}
