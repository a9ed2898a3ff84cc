//! Capture replay CLI.
//!
//! Points at a storage container of capture blobs and replays them onto an
//! event hub: list → filter → fetch → split → paced send, one blob at a
//! time, one message in flight at a time. Assumes the capture blob naming
//! pattern `{Namespace}/{EventHub}/{PartitionId}/{Year}/{Month}/{Day}/{Hour}/{Minute}/{Second}`.

mod args;
mod config;

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use replay_core::pacing::FixedInterval;
use replay_core::{Dispatcher, Orchestrator};
use replay_transport::{HttpBlobStore, HttpMessageBus, MemoryBus, MessageBus};

use crate::args::Args;
use crate::config::ReplayConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match ReplayConfig::from_env(&args) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "storage or event hub information is not defined");
            std::process::exit(1);
        }
    };

    tracing::info!(
        hub = %config.hub_name,
        namespace = %config.hub_namespace,
        sas_policy = %config.hub_sas_name,
        "connecting to event hub"
    );
    tracing::info!(account = %config.storage_account, container = %config.container, "connecting to blob storage");
    match &config.prefix {
        Some(prefix) => tracing::info!(%prefix, "using path prefix"),
        None => tracing::info!("scanning from root of container"),
    }
    tracing::info!(interval_ms = config.interval.as_millis() as u64, "send message interval");

    let store = Arc::new(HttpBlobStore::new(
        &config.storage_account,
        &config.container,
        &config.storage_sas_token,
    ));

    let bus: Arc<dyn MessageBus> = if args.dry_run {
        tracing::info!("dry run: messages will be recorded, not sent");
        Arc::new(MemoryBus::new())
    } else {
        Arc::new(HttpMessageBus::new(
            &config.hub_namespace,
            &config.hub_sas_token,
        ))
    };

    let dispatcher = Dispatcher::new(
        bus,
        &config.hub_name,
        Arc::new(FixedInterval::new(config.interval)),
    )
    .with_payload_logging(args.log_payloads);
    let orchestrator = Orchestrator::new(store, dispatcher);

    // Ctrl+C cancels at the next blob boundary or paced wait.
    let token = CancellationToken::new();
    let ctrlc_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping after the current message");
            ctrlc_token.cancel();
        }
    });

    let summary = match orchestrator.run(config.prefix.as_deref(), &token).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(error = %e, "replay run aborted");
            std::process::exit(1);
        }
    };

    if summary.any_failed() {
        tracing::error!(failed = summary.failed, "some blobs failed to replay");
        std::process::exit(1);
    }
}
