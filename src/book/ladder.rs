//! Plain-text rendering of the book, used for terminal output.

use std::fmt::Write;

use crate::models::{OrderRow, Side};

use super::rows::{HoverHighlight, OrderbookModel};

/// Renders both sides around the fair price, asks on top (worst first) and
/// bids below (best first). Changed price digits are bracketed and active
/// rows are marked with `>`.
pub fn render_ladder(
    model: &OrderbookModel,
    highlight: &HoverHighlight,
    depth: usize,
    currency: &str,
) -> String {
    let mut out = String::new();
    let asks = &model.asks[..model.asks.len().min(depth)];
    for row in asks.iter().rev() {
        push_row(&mut out, Side::Asks, row, highlight);
    }
    let _ = writeln!(out, "{:-^42}", format!(" {} {currency} ", model.fair_price));
    for row in model.bids.iter().take(depth) {
        push_row(&mut out, Side::Bids, row, highlight);
    }
    out
}

fn push_row(out: &mut String, side: Side, row: &OrderRow, highlight: &HoverHighlight) {
    let marker = if highlight.is_active(side, &row.uid) { '>' } else { ' ' };
    let price = if row.price_split.suffix.is_empty() {
        row.price_split.prefix.clone()
    } else {
        format!("{}[{}]", row.price_split.prefix, row.price_split.suffix)
    };
    let _ = writeln!(
        out,
        "{marker} {side:<4} {price:>14} {:>10} {:>10}",
        row.amount, row.cumulative
    );
}
