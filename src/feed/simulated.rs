//! Locally generated order book, for running without an exchange.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::models::{PriceLevel, Snapshot};
use crate::numeric::closest_index;

/// Random-walk book whose prices sit on a fixed tick ladder.
///
/// Levels are emitted shuffled and, now and then, with a garbage price mixed
/// in, the way a sloppy upstream would send them.
#[derive(Debug)]
pub struct SimulatedFeed {
    rng: StdRng,
    config: SimulationConfig,
    ladder: Vec<f64>,
    mid: f64,
}

impl SimulatedFeed {
    pub fn new(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        // Callers go through `AppConfig::validate`, which bounds the step count.
        let tick = config.tick_size;
        let steps = config.ladder_steps() as usize;
        let start = config.mid_price - config.ladder_half_span();
        let ladder = (0..=steps).map(|i| start + i as f64 * tick).collect();
        Self {
            rng,
            mid: config.mid_price,
            config,
            ladder,
        }
    }

    /// Current mid price of the walk.
    pub fn mid(&self) -> f64 {
        self.mid
    }

    /// Nearest ladder price.
    fn snap(&self, price: f64) -> f64 {
        closest_index(price, &self.ladder).map_or(price, |idx| self.ladder[idx])
    }

    pub fn next_snapshot(&mut self) -> Snapshot {
        let tick = self.config.tick_size;
        let levels = self.config.levels;
        let reach = tick * levels as f64 * 3.0;

        let step = self.rng.gen_range(-2.0..=2.0) * tick;
        // Keep the whole book above zero when the ladder reaches below it.
        let lo = (self.ladder[0] + reach + tick).max(reach + tick);
        let hi = self.ladder[self.ladder.len() - 1] - reach - tick;
        self.mid = self.snap((self.mid + step).clamp(lo, hi));

        let mut asks = Vec::with_capacity(levels + 1);
        let mut bids = Vec::with_capacity(levels + 1);
        for _ in 0..levels {
            let ask_offset = self.rng.gen_range(tick..=reach);
            let bid_offset = self.rng.gen_range(tick..=reach);
            asks.push(PriceLevel::new(
                self.snap(self.mid + ask_offset),
                self.random_amount(),
            ));
            bids.push(PriceLevel::new(
                self.snap(self.mid - bid_offset),
                self.random_amount(),
            ));
        }

        if self.rng.gen_bool(self.config.glitch_rate) {
            // Above any finite ceiling, whatever the mid price.
            let garbage = if self.rng.gen_bool(0.5) {
                f64::INFINITY
            } else {
                f64::MAX
            };
            debug!(price = garbage, "[FEED] injecting garbage level");
            asks.push(PriceLevel::new(garbage, self.random_amount()));
        }

        asks.shuffle(&mut self.rng);
        bids.shuffle(&mut self.rng);
        Snapshot::new(asks, bids)
    }

    fn random_amount(&mut self) -> f64 {
        // Thousandths of a coin, like real lot sizes.
        (self.rng.gen_range(0.001..5.0) * 1000.0_f64).round() / 1000.0
    }
}

/// Spawn the simulated feed; stops once every receiver is gone.
pub fn spawn_simulated_feed(
    config: SimulationConfig,
    snapshot_tx: watch::Sender<Snapshot>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let interval = Duration::from_millis(config.interval_ms);
        let mut feed = SimulatedFeed::new(config);
        let mut ticker = tokio::time::interval(interval);
        info!(mid = feed.mid(), ?interval, "[FEED] simulated feed started");
        loop {
            ticker.tick().await;
            if snapshot_tx.send(feed.next_snapshot()).is_err() {
                info!("[FEED] no receivers left, simulated feed stopping");
                return;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{DEFAULT_PRICE_CEILING, prepare_snapshot};

    fn config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed: Some(seed),
            glitch_rate: 0.0,
            ..SimulationConfig::default()
        }
    }

    fn on_ladder(price: f64, tick: f64) -> bool {
        let steps = price / tick;
        (steps - steps.round()).abs() < 1e-6
    }

    #[test]
    fn snapshots_are_on_ladder_and_uncrossed() {
        let mut feed = SimulatedFeed::new(config(7));
        for _ in 0..50 {
            let snapshot = feed.next_snapshot();
            assert_eq!(snapshot.asks.len(), 25);
            assert_eq!(snapshot.bids.len(), 25);
            let best_ask = snapshot.asks.iter().map(|l| l.price).fold(f64::INFINITY, f64::min);
            let best_bid = snapshot.bids.iter().map(|l| l.price).fold(f64::NEG_INFINITY, f64::max);
            assert!(best_bid < best_ask);
            for level in snapshot.asks.iter().chain(&snapshot.bids) {
                assert!(on_ladder(level.price, 0.5), "{} off ladder", level.price);
                assert!(level.amount > 0.0 && level.amount <= 5.0);
            }
        }
    }

    #[test]
    fn seeded_feeds_repeat() {
        let mut a = SimulatedFeed::new(config(42));
        let mut b = SimulatedFeed::new(config(42));
        assert_eq!(a.next_snapshot(), b.next_snapshot());
        assert_eq!(a.next_snapshot(), b.next_snapshot());
    }

    #[test]
    fn glitches_are_injected_and_sanitized_away() {
        for mid_price in [50.0, 6500.0] {
            let mut feed = SimulatedFeed::new(SimulationConfig {
                mid_price,
                glitch_rate: 1.0,
                ..config(4)
            });
            for _ in 0..20 {
                let snapshot = feed.next_snapshot();
                assert_eq!(snapshot.asks.len(), 26);
                assert!(
                    snapshot
                        .asks
                        .iter()
                        .any(|l| !l.price.is_finite() || l.price > DEFAULT_PRICE_CEILING)
                );

                let book = prepare_snapshot(&snapshot, DEFAULT_PRICE_CEILING);
                let reach = 0.5 * 25.0 * 3.0;
                let top = book.asks.last().unwrap().price;
                assert!(top <= feed.mid() + reach + 0.5, "{top} survived sanitizing");
                assert!(book.bids.iter().all(|l| l.price > 0.0));
            }
        }
    }

    #[tokio::test]
    async fn spawned_feed_publishes_and_stops() {
        let (tx, mut rx) = watch::channel(Snapshot::default());
        let handle = spawn_simulated_feed(
            SimulationConfig {
                interval_ms: 5,
                ..config(1)
            },
            tx,
        );
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().asks.len(), 25);
        drop(rx);
        handle.await.unwrap();
    }
}
