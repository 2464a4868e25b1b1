// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cloudspace daemon (csd)

use std::process::ExitCode;

use cs_daemon::lifecycle::{startup, Backend, Config, LifecycleError, StartupResult};
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("csd: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = match init_logging(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("csd: failed to open log file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "daemon failed");
            eprintln!("csd: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to `<state_dir>/daemon.log` through a non-blocking writer.
fn init_logging(config: &Config) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(&config.state_dir)?;
    let file = std::fs::OpenOptions::new().create(true).append(true).open(&config.log_path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
    Ok(guard)
}

async fn run(config: Config) -> Result<(), LifecycleError> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let StartupResult { mut daemon, listener, pods } = startup(&config, Backend::Kube).await?;

    let cancel = CancellationToken::new();
    let listener_task = tokio::spawn(listener.run(cancel.clone()));
    let watcher_task = pods.map(|pods| {
        tokio::spawn(cs_daemon::watcher::run(pods, daemon.bridge.clone(), cancel.clone()))
    });

    info!(socket = %config.socket_path.display(), "daemon ready");
    println!("READY");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM"),
        _ = sigint.recv() => info!("received SIGINT"),
        _ = daemon.shutdown.notified() => info!("shutdown requested"),
    }
    cancel.cancel();

    let drain = async {
        let _ = listener_task.await;
        if let Some(task) = watcher_task {
            let _ = task.await;
        }
        daemon.ctx.tasks.wait().await;
    };
    tokio::select! {
        result = tokio::time::timeout(config.drain_deadline(), drain) => {
            if result.is_err() {
                warn!(
                    in_flight = daemon.ctx.tasks.len(),
                    "drain timeout elapsed, abandoning in-flight requests"
                );
            }
        }
        _ = sigterm.recv() => warn!("second signal, exiting immediately"),
        _ = sigint.recv() => warn!("second signal, exiting immediately"),
    }

    daemon.shutdown()
}
