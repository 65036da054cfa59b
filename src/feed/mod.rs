//! Snapshot producers.
//!
//! Each feed runs as its own task and publishes full-replace snapshots on a
//! `watch` channel; consumers only ever see the latest one.

pub mod binance;
pub mod simulated;

use tokio::sync::watch;

use crate::config::{AppConfig, FeedKind};
use crate::models::Snapshot;

pub use binance::{connect_and_stream, spawn_binance_feed};
pub use simulated::{SimulatedFeed, spawn_simulated_feed};

/// Start the feed selected in `config`.
pub fn spawn_feed(
    config: &AppConfig,
    snapshot_tx: watch::Sender<Snapshot>,
) -> tokio::task::JoinHandle<()> {
    match config.feed {
        FeedKind::Simulated => spawn_simulated_feed(config.simulation.clone(), snapshot_tx),
        FeedKind::Binance => spawn_binance_feed(&config.symbol, snapshot_tx),
    }
}
