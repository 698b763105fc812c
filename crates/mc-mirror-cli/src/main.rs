mod config;
mod logging;
mod scheduler;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use mc_mirror::{MirrorTarget, Provider, SyncEngine};
use mc_mirror_http::{
    HttpConfig, HttpDownloader, PaperMcProvider, PurpurMcProvider, StaticPathProvider,
};
use mc_mirror_store::SidecarStore;
use tokio_util::sync::CancellationToken;

use crate::config::{AppConfig, ProjectEntry, ProviderType};

#[derive(Parser)]
#[command(name = "mc-mirror")]
#[command(about = "Mirror Minecraft server and proxy builds into a local content tree")]
struct Cli {
    /// Hours between sync passes (overrides the config file, default 24)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,
    /// Run a single sync pass now and exit instead of starting the service
    #[arg(short, long)]
    run_now: bool,
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory to mirror into (overrides the config file)
    #[arg(long)]
    content_dir: Option<PathBuf>,
}

fn build_provider_for(entry: &ProjectEntry, http: &HttpConfig) -> Arc<dyn Provider> {
    match &entry.provider {
        ProviderType::PaperMc { api_base_url } => Arc::new(PaperMcProvider::new(
            &entry.id,
            api_base_url.as_deref(),
            http,
        )),
        ProviderType::PurpurMc { api_base_url } => Arc::new(PurpurMcProvider::new(
            &entry.id,
            api_base_url.as_deref(),
            http,
        )),
        ProviderType::StaticPath {
            download_base_url,
            versions,
        } => Arc::new(StaticPathProvider::new(
            &entry.id,
            download_base_url.as_deref(),
            versions.clone(),
        )),
    }
}

fn build_targets(config: &AppConfig, http: &HttpConfig) -> Vec<MirrorTarget> {
    config
        .projects
        .iter()
        .filter(|entry| entry.enabled)
        .map(|entry| MirrorTarget::new(entry.project(), build_provider_for(entry, http)))
        .collect()
}

/// One full pass over every target.
///
/// The pass runs on its own task so a panic inside it is reported here
/// instead of taking the service down.
async fn run_pass(engine: Arc<SyncEngine>, targets: Arc<Vec<MirrorTarget>>) {
    tracing::info!(projects = targets.len(), "starting sync pass");

    let handle = tokio::spawn(async move { engine.run(&targets).await });

    match handle.await {
        Ok(report) => {
            for project in &report.projects {
                tracing::info!(
                    project = %project.project_id,
                    succeeded = project.succeeded(),
                    failed = project.failed(),
                    "{}",
                    if project.is_success() { "synced" } else { "partially failed" }
                );
            }
            if report.is_success() {
                tracing::info!("all projects synced successfully");
            } else {
                tracing::warn!("some projects failed to sync, see the log for details");
            }
        }
        Err(e) => {
            tracing::error!(error = ?e, "sync pass aborted unexpectedly");
            eprintln!("error: sync pass aborted unexpectedly: {e}");
        }
    }
}

/// Cancel `token` on Ctrl+C or SIGTERM.
fn spawn_shutdown_listener(token: CancellationToken) {
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("termination signal received, stopping after the current pass");
        token.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not listen for SIGTERM");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app_config = config::load_config(cli.config.as_deref())?;
    if let Some(dir) = cli.content_dir {
        app_config.content_dir = dir;
    }
    if let Some(hours) = cli.interval {
        app_config.interval_hours = hours;
    }

    logging::init(&app_config.log_file)?;

    let http = app_config.http.to_http_config();
    let targets = Arc::new(build_targets(&app_config, &http));
    if targets.is_empty() {
        tracing::warn!("no enabled projects configured");
    }

    let engine = Arc::new(SyncEngine::new(
        &app_config.content_dir,
        Arc::new(HttpDownloader::new(&http)),
        Arc::new(SidecarStore::new()),
    ));

    if cli.run_now {
        run_pass(engine, targets).await;
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    spawn_shutdown_listener(shutdown.clone());

    let interval = Duration::from_secs(app_config.interval_hours.saturating_mul(3600));
    tracing::info!(
        interval_hours = app_config.interval_hours,
        content_dir = %app_config.content_dir.display(),
        "service started, press Ctrl+C to stop"
    );

    scheduler::run_service(interval, scheduler::POLL_INTERVAL, shutdown, || {
        run_pass(Arc::clone(&engine), Arc::clone(&targets))
    })
    .await;

    Ok(())
}
