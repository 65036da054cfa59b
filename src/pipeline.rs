//! Consumer loop turning snapshots and UI events into view states.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::info;

use crate::models::Snapshot;
use crate::state::{Event, ViewSettings, ViewState};

/// Spawn the single task that owns the view state.
///
/// Snapshots trigger a full model rebuild; UI events (hover, selection,
/// pointer) only touch the already built models. Each resulting state is
/// published whole on `view_tx`. The task ends once both inputs are closed.
pub fn spawn_view_pipeline(
    mut snapshot_rx: watch::Receiver<Snapshot>,
    mut ui_rx: mpsc::Receiver<Event>,
    view_tx: watch::Sender<Arc<ViewState>>,
    settings: ViewSettings,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut state = Arc::new(ViewState::default());
        let mut snapshots_open = true;
        let mut ui_open = true;
        let mut rebuilds: u64 = 0;

        loop {
            let event = tokio::select! {
                changed = snapshot_rx.changed(), if snapshots_open => {
                    if changed.is_err() {
                        snapshots_open = false;
                        continue;
                    }
                    rebuilds += 1;
                    Event::Snapshot(snapshot_rx.borrow_and_update().clone())
                }
                event = ui_rx.recv(), if ui_open => match event {
                    Some(event) => event,
                    None => {
                        ui_open = false;
                        continue;
                    }
                },
                else => break,
            };

            state = Arc::new(state.apply(event, &settings));
            view_tx.send_replace(Arc::clone(&state));
        }

        info!(rebuilds, "[PIPELINE] inputs closed, view pipeline stopping");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PriceLevel, Side};

    fn snapshot() -> Snapshot {
        Snapshot::new(
            vec![PriceLevel::new(101.0, 1.0), PriceLevel::new(102.0, 2.0)],
            vec![PriceLevel::new(100.0, 2.0), PriceLevel::new(99.0, 2.0)],
        )
    }

    #[tokio::test]
    async fn snapshots_and_ui_events_update_view() {
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::default());
        let (ui_tx, ui_rx) = mpsc::channel(8);
        let (view_tx, mut view_rx) = watch::channel(Arc::new(ViewState::default()));
        let handle = spawn_view_pipeline(snapshot_rx, ui_rx, view_tx, ViewSettings::default());

        snapshot_tx.send(snapshot()).unwrap();
        view_rx.changed().await.unwrap();
        let view = view_rx.borrow_and_update().clone();
        assert_eq!(view.orderbook.model.fair_price, "100.5");
        assert!(view.depth_chart.chart.is_some());

        let uid = view.orderbook.model.bids[0].uid.clone();
        ui_tx
            .send(Event::RowSelected {
                side: Side::Bids,
                uid,
            })
            .await
            .unwrap();
        view_rx.changed().await.unwrap();
        assert_eq!(
            view_rx.borrow_and_update().message,
            "Sell 2.000 BTC at 100 USD"
        );

        drop(snapshot_tx);
        drop(ui_tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn pointer_before_data_is_noop() {
        let (_snapshot_tx, snapshot_rx) = watch::channel(Snapshot::default());
        let (ui_tx, ui_rx) = mpsc::channel(8);
        let (view_tx, mut view_rx) = watch::channel(Arc::new(ViewState::default()));
        let _handle = spawn_view_pipeline(snapshot_rx, ui_rx, view_tx, ViewSettings::default());

        ui_tx.send(Event::PointerMoved { x: 5.0, y: 5.0 }).await.unwrap();
        view_rx.changed().await.unwrap();
        assert!(view_rx.borrow().depth_chart.pointer.is_none());
    }
}
