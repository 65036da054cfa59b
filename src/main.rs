use std::sync::Arc;

use anyhow::Result;
use orderbook_depth::{
    config::AppConfig,
    feed,
    models::Snapshot,
    pipeline::spawn_view_pipeline,
    presenter::run_presenter,
    state::{Event, ViewState},
    utils,
};
use tokio::sync::{mpsc, watch};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::load()?;
    tracing::info!(
        feed = %config.feed,
        symbol = %config.symbol,
        currency = %config.view.currency,
        svg_output = ?config.svg_output,
        "[INIT] orderbook-depth starting"
    );

    // Shared state channels
    let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::default());
    // No interactive front end here; the sender is held so the pipeline keeps running.
    let (_ui_tx, ui_rx) = mpsc::channel::<Event>(64);
    let (view_tx, view_rx) = watch::channel(Arc::new(ViewState::default()));

    let feed_task = feed::spawn_feed(&config, snapshot_tx);
    let pipeline_task = spawn_view_pipeline(snapshot_rx, ui_rx, view_tx, config.view.clone());

    // One ctrl-c listener for the whole run.
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "[SHUTDOWN] ctrl-c listener failed");
        }
    };
    let presented = run_presenter(view_rx, config, shutdown).await;
    tracing::info!(presented, "[SHUTDOWN] orderbook-depth stopped");

    feed_task.abort();
    pipeline_task.abort();
    Ok(())
}
