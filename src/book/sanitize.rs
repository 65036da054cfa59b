//! Cleaning, ordering and aggregation of raw snapshot levels.

use tracing::warn;

use crate::models::{DepthLevel, PriceLevel, Side, Snapshot};

/// Prices above this are treated as feed garbage.
pub const DEFAULT_PRICE_CEILING: f64 = 1_000_000.0;

/// Both sides of a snapshot after sanitize, sort and aggregate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedBook {
    pub asks: Vec<DepthLevel>,
    pub bids: Vec<DepthLevel>,
}

impl PreparedBook {
    pub fn side(&self, side: Side) -> &[DepthLevel] {
        match side {
            Side::Asks => &self.asks,
            Side::Bids => &self.bids,
        }
    }

    /// True when both sides carry at least one level.
    pub fn is_complete(&self) -> bool {
        !self.asks.is_empty() && !self.bids.is_empty()
    }
}

/// Drops levels with a non-finite or out-of-ceiling price, or a non-finite
/// amount. Each drop is logged; nothing is ever raised.
pub fn sanitize(levels: &[PriceLevel], ceiling: f64) -> Vec<PriceLevel> {
    levels
        .iter()
        .filter(|level| {
            if !level.price.is_finite() {
                warn!(price = level.price, "[BOOK] non-finite price, ignoring level");
                return false;
            }
            if level.price > ceiling {
                warn!(price = level.price, ceiling, "[BOOK] price above ceiling, ignoring level");
                return false;
            }
            if !level.amount.is_finite() {
                warn!(
                    price = level.price,
                    amount = level.amount,
                    "[BOOK] non-finite amount, ignoring level"
                );
                return false;
            }
            true
        })
        .copied()
        .collect()
}

/// Sorts a side best price first (asks ascending, bids descending).
///
/// Levels quoted at the same price are merged into one so the resulting
/// order is strict.
pub fn sort_side(mut levels: Vec<PriceLevel>, side: Side) -> Vec<PriceLevel> {
    match side {
        Side::Asks => levels.sort_by(|a, b| a.price.total_cmp(&b.price)),
        Side::Bids => levels.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }
    let mut merged: Vec<PriceLevel> = Vec::with_capacity(levels.len());
    for level in levels {
        match merged.last_mut() {
            Some(last) if last.price == level.price => last.amount += level.amount,
            _ => merged.push(level),
        }
    }
    merged
}

/// Running cumulative amount in the given order, best price first.
pub fn aggregate(levels: &[PriceLevel]) -> Vec<DepthLevel> {
    levels
        .iter()
        .enumerate()
        .scan(0.0, |cumulative, (rank, level)| {
            *cumulative += level.amount;
            Some(DepthLevel {
                price: level.price,
                amount: level.amount,
                cumulative: *cumulative,
                rank,
            })
        })
        .collect()
}

pub fn prepare_side(levels: &[PriceLevel], side: Side, ceiling: f64) -> Vec<DepthLevel> {
    aggregate(&sort_side(sanitize(levels, ceiling), side))
}

pub fn prepare_snapshot(snapshot: &Snapshot, ceiling: f64) -> PreparedBook {
    PreparedBook {
        asks: prepare_side(&snapshot.asks, Side::Asks, ceiling),
        bids: prepare_side(&snapshot.bids, Side::Bids, ceiling),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn levels(raw: &[(f64, f64)]) -> Vec<PriceLevel> {
        raw.iter().copied().map(PriceLevel::from).collect()
    }

    #[test]
    fn drops_garbage_levels() {
        let raw = levels(&[
            (100.0, 1.0),
            (f64::INFINITY, 1.0),
            (f64::NAN, 1.0),
            (2_000_000.0, 1.0),
            (101.0, f64::NAN),
            (102.0, 2.0),
        ]);
        let clean = sanitize(&raw, DEFAULT_PRICE_CEILING);
        assert_eq!(clean, levels(&[(100.0, 1.0), (102.0, 2.0)]));
    }

    #[test]
    fn ceiling_itself_is_kept() {
        let raw = levels(&[(1_000_000.0, 1.0)]);
        assert_eq!(sanitize(&raw, DEFAULT_PRICE_CEILING).len(), 1);
    }

    #[test]
    fn sorts_each_side_best_first() {
        let raw = levels(&[(102.0, 1.0), (100.0, 2.0), (101.0, 3.0)]);
        let asks = sort_side(raw.clone(), Side::Asks);
        let bids = sort_side(raw, Side::Bids);
        let prices = |v: &[PriceLevel]| v.iter().map(|l| l.price).collect::<Vec<_>>();
        assert_eq!(prices(&asks), vec![100.0, 101.0, 102.0]);
        assert_eq!(prices(&bids), vec![102.0, 101.0, 100.0]);
    }

    #[test]
    fn merges_duplicate_prices() {
        let raw = levels(&[(100.0, 1.0), (101.0, 3.0), (100.0, 0.5)]);
        let asks = sort_side(raw, Side::Asks);
        assert_eq!(asks, levels(&[(100.0, 1.5), (101.0, 3.0)]));
    }

    #[test]
    fn aggregates_cumulative_and_rank() {
        let raw = levels(&[(100.0, 1.0), (101.0, 2.5), (102.0, 0.5)]);
        let depth = aggregate(&raw);
        let cumulative: Vec<f64> = depth.iter().map(|l| l.cumulative).collect();
        assert_eq!(cumulative, vec![1.0, 3.5, 4.0]);
        assert_eq!(depth[2].rank, 2);
        assert_eq!(depth[1].amount, 2.5);
    }

    #[test]
    fn prepares_full_snapshot() {
        let snapshot = Snapshot::new(
            levels(&[(103.0, 1.0), (101.0, 1.0), (f64::INFINITY, 9.0)]),
            levels(&[(99.0, 2.0), (100.0, 1.0)]),
        );
        let book = prepare_snapshot(&snapshot, DEFAULT_PRICE_CEILING);
        assert!(book.is_complete());
        assert_eq!(book.asks[0].price, 101.0);
        assert_eq!(book.asks[1].cumulative, 2.0);
        assert_eq!(book.bids[0].price, 100.0);
        assert_eq!(book.side(Side::Bids)[1].cumulative, 3.0);
    }

    #[test]
    fn empty_side_is_incomplete() {
        let snapshot = Snapshot::new(levels(&[(101.0, 1.0)]), Vec::new());
        assert!(!prepare_snapshot(&snapshot, DEFAULT_PRICE_CEILING).is_complete());
    }

    fn arb_levels() -> impl Strategy<Value = Vec<PriceLevel>> {
        proptest::collection::vec(
            (
                prop_oneof![
                    8 => 1.0f64..2_000_000.0,
                    1 => Just(f64::INFINITY),
                    1 => Just(f64::NAN),
                ],
                0.0f64..100.0,
            )
                .prop_map(PriceLevel::from),
            0..40,
        )
    }

    proptest! {
        #[test]
        fn prepared_sides_are_strictly_ordered(asks in arb_levels(), bids in arb_levels()) {
            let book = prepare_snapshot(&Snapshot::new(asks, bids), DEFAULT_PRICE_CEILING);
            for pair in book.asks.windows(2) {
                prop_assert!(pair[0].price < pair[1].price);
            }
            for pair in book.bids.windows(2) {
                prop_assert!(pair[0].price > pair[1].price);
            }
            for level in book.asks.iter().chain(&book.bids) {
                prop_assert!(level.price.is_finite() && level.price <= DEFAULT_PRICE_CEILING);
            }
        }

        #[test]
        fn cumulative_never_decreases(asks in arb_levels()) {
            let depth = prepare_side(&asks, Side::Asks, DEFAULT_PRICE_CEILING);
            for pair in depth.windows(2) {
                prop_assert!(pair[0].cumulative <= pair[1].cumulative);
            }
        }
    }
}
