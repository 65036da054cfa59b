use std::time::Duration;

use futures::{Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::watch;
use tokio_tungstenite::connect_async;
use tracing::{info, warn};
use url::Url;

use crate::errors::Result;
use crate::models::Snapshot;

const BINANCE_WS_ENDPOINT: &str = "wss://stream.binance.com:9443/ws";
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct DepthMsg {
    #[serde(rename = "lastUpdateId")]
    _last_update_id: u64,
    #[serde(flatten)]
    book: Snapshot,
}

/// Parses one partial-depth frame. Levels are kept as sent; cleaning is left
/// to the book sanitizer.
pub fn parse_depth_message(txt: &str) -> Result<Snapshot> {
    let parsed: DepthMsg = serde_json::from_str(txt)?;
    Ok(parsed.book)
}

/// Returns an asynchronous stream of `Snapshot`s for the given Binance symbol, e.g. "btcusdt".
pub async fn connect_and_stream(symbol: &str) -> Result<impl Stream<Item = Snapshot>> {
    let stream_path = format!("{}@depth20@100ms", symbol.to_lowercase());
    let url = Url::parse(&format!("{}/{}", BINANCE_WS_ENDPOINT, stream_path))?;

    let (ws_stream, _resp) = connect_async(url).await?;

    let mapped = ws_stream.filter_map(|msg_res| async move {
        match msg_res {
            Ok(msg) if msg.is_text() => {
                let txt = match msg.into_text() {
                    Ok(t) => t,
                    Err(e) => {
                        warn!(error = %e, "[FEED] text extraction failed");
                        return None;
                    }
                };
                match parse_depth_message(&txt) {
                    Ok(snapshot) => Some(snapshot),
                    Err(e) => {
                        warn!(error = %e, "[FEED] depth JSON parse failed");
                        None
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "[FEED] websocket message error");
                None
            }
            _ => None,
        }
    });
    Ok(mapped)
}

/// Spawn the Binance depth watcher task. Reconnects after a fixed delay
/// whenever the stream ends, until every receiver is gone.
pub fn spawn_binance_feed(
    symbol: &str,
    snapshot_tx: watch::Sender<Snapshot>,
) -> tokio::task::JoinHandle<()> {
    let symbol = symbol.to_string();

    tokio::spawn(async move {
        while !snapshot_tx.is_closed() {
            match connect_and_stream(&symbol).await {
                Ok(stream) => {
                    info!(%symbol, "[FEED] connected to binance depth stream");
                    futures::pin_mut!(stream);
                    while let Some(snapshot) = stream.next().await {
                        if snapshot_tx.send(snapshot).is_err() {
                            return;
                        }
                    }
                    warn!(%symbol, "[FEED] binance stream ended");
                }
                Err(e) => {
                    warn!(%symbol, error = %e, "[FEED] binance connect failed");
                }
            }
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceLevel;

    #[test]
    fn parse_depth_message_shape() {
        let raw = r#"{"lastUpdateId":1,"bids":[["100.0","1.0"]],"asks":[["101.0","2.0"]]}"#;
        let snapshot = parse_depth_message(raw).unwrap();
        assert_eq!(snapshot.bids, vec![PriceLevel::new(100.0, 1.0)]);
        assert_eq!(snapshot.asks, vec![PriceLevel::new(101.0, 2.0)]);
    }

    #[test]
    fn bad_numbers_survive_as_nan_for_the_sanitizer() {
        let raw = r#"{
            "lastUpdateId": 123,
            "bids": [["100.5", "2.25"], ["bad","1"]],
            "asks": [["101.5", "3.50"]]
        }"#;
        let snapshot = parse_depth_message(raw).unwrap();
        assert_eq!(snapshot.bids[0], PriceLevel::new(100.5, 2.25));
        assert!(snapshot.bids[1].price.is_nan());
        assert_eq!(snapshot.asks, vec![PriceLevel::new(101.5, 3.5)]);
    }

    #[test]
    fn rejects_malformed_frames() {
        assert!(parse_depth_message(r#"{"result":null,"id":1}"#).is_err());
        assert!(parse_depth_message("not json").is_err());
    }
}
