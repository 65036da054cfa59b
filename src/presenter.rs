//! Terminal and SVG output of the published view states.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::book::render_ladder;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::render::{SvgSurface, paint_depth_chart};
use crate::state::ViewState;

const SUMMARY_INTERVAL: Duration = Duration::from_secs(1);

/// Presents views until `shutdown` resolves or the pipeline goes away.
///
/// Every new view is written as SVG when `svg_output` is set; the ladder and a
/// one-line summary are printed once per second. Returns how many views were
/// received.
pub async fn run_presenter<F>(
    mut view_rx: watch::Receiver<Arc<ViewState>>,
    config: AppConfig,
    shutdown: F,
) -> u64
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(SUMMARY_INTERVAL);
    let mut ticks: u64 = 0;
    let mut presented: u64 = 0;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!(presented, "[SHUTDOWN] shutdown requested");
                break;
            }
            changed = view_rx.changed() => {
                if changed.is_err() {
                    warn!(presented, "[SHUTDOWN] view pipeline ended");
                    break;
                }
                presented += 1;
                let view = view_rx.borrow_and_update().clone();
                if let Some(path) = &config.svg_output {
                    if let Err(e) = write_svg(&view, path).await {
                        warn!(error = %e, path = %path.display(), "[SVG] chart not written");
                    }
                }
            }
            _ = ticker.tick() => {
                ticks += 1;
                let view = view_rx.borrow().clone();
                let book = &view.orderbook.model;
                if book.asks.is_empty() || book.bids.is_empty() {
                    if ticks % 5 == 0 {
                        info!("[HEARTBEAT] waiting for first complete snapshot");
                    }
                    continue;
                }
                info!(
                    fair_price = %book.fair_price,
                    asks = book.asks.len(),
                    bids = book.bids.len(),
                    "[BOOK] update"
                );
                println!(
                    "{}",
                    render_ladder(
                        book,
                        &view.orderbook.highlight,
                        config.ladder_depth,
                        &config.view.currency
                    )
                );
            }
        }
    }
    presented
}

/// Paints the chart of `view` to `path`. Returns `false` when there is no
/// chart yet.
pub async fn write_svg(view: &ViewState, path: &Path) -> Result<bool> {
    let Some(chart) = view.depth_chart.chart.as_ref() else {
        return Ok(false);
    };
    let mut surface = SvgSurface::new();
    paint_depth_chart(
        &mut surface,
        &chart.model,
        &chart.polygons,
        view.depth_chart.pointer.as_ref(),
    )?;
    tokio::fs::write(path, surface.finish()).await?;
    Ok(true)
}
