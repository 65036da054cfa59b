//! Formatted, diff-highlighted row lists for the textual book.

use crate::errors::{AppError, Result};
use crate::models::{DepthLevel, OrderRow, Side};
use crate::numeric::{diff_numeric_strings, format_number};

use super::sanitize::PreparedBook;

pub const PRICE_DIGITS: usize = 1;
pub const AMOUNT_DIGITS: usize = 3;

/// Rows of both sides plus the fair price label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderbookModel {
    pub fair_price: String,
    pub asks: Vec<OrderRow>,
    pub bids: Vec<OrderRow>,
}

impl OrderbookModel {
    pub fn side(&self, side: Side) -> &[OrderRow] {
        match side {
            Side::Asks => &self.asks,
            Side::Bids => &self.bids,
        }
    }
}

/// Midpoint of the best ask and the best bid, one fraction digit.
pub fn fair_price(asks: &[DepthLevel], bids: &[DepthLevel]) -> Result<String> {
    let best_ask = asks.first().ok_or(AppError::EmptySide(Side::Asks))?;
    let best_bid = bids.first().ok_or(AppError::EmptySide(Side::Bids))?;
    format_number((best_ask.price + best_bid.price) / 2.0, PRICE_DIGITS)
}

/// Formats one side, in its existing order.
///
/// Each price is diffed against the price of the row above it, so only the
/// digits that moved are emphasized.
pub fn build_rows(levels: &[DepthLevel]) -> Result<Vec<OrderRow>> {
    let mut rows = Vec::with_capacity(levels.len());
    let mut previous_price = String::new();
    for level in levels {
        let price = format_number(level.price, PRICE_DIGITS)?;
        let amount = format_number(level.amount, AMOUNT_DIGITS)?;
        let cumulative = format_number(level.cumulative, AMOUNT_DIGITS)?;
        let uid = format!("{price}{amount}");
        let price_split = diff_numeric_strings(&previous_price, &price);
        previous_price = price;
        rows.push(OrderRow {
            price_split,
            amount,
            cumulative,
            uid,
        });
    }
    Ok(rows)
}

pub fn build_orderbook_model(book: &PreparedBook) -> Result<OrderbookModel> {
    Ok(OrderbookModel {
        fair_price: fair_price(&book.asks, &book.bids)?,
        asks: build_rows(&book.asks)?,
        bids: build_rows(&book.bids)?,
    })
}

/// Uid of the first row of `opposite` whose cumulative volume strictly
/// exceeds the cumulative volume of the hovered row.
///
/// This is a first match in book order, not a nearest match.
pub fn find_counterpart(
    hovered_rows: &[OrderRow],
    hovered_uid: &str,
    opposite: &[OrderRow],
) -> Option<String> {
    let hovered = hovered_rows
        .iter()
        .find(|row| row.uid == hovered_uid)
        .and_then(cumulative_value)?;
    opposite
        .iter()
        .find(|row| cumulative_value(row).is_some_and(|c| hovered < c))
        .map(|row| row.uid.clone())
}

fn cumulative_value(row: &OrderRow) -> Option<f64> {
    row.cumulative.parse().ok()
}

/// Rows highlighted on each side while the pointer is over the book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverHighlight {
    pub active_ask: Option<String>,
    pub active_bid: Option<String>,
}

impl HoverHighlight {
    /// The hovered row stays active on its own side; the other side gets its
    /// counterpart, if any.
    pub fn for_row(side: Side, uid: &str, model: &OrderbookModel) -> Self {
        let counterpart = find_counterpart(model.side(side), uid, model.side(side.opposite()));
        match side {
            Side::Asks => Self {
                active_ask: Some(uid.to_string()),
                active_bid: counterpart,
            },
            Side::Bids => Self {
                active_ask: counterpart,
                active_bid: Some(uid.to_string()),
            },
        }
    }

    pub fn is_active(&self, side: Side, uid: &str) -> bool {
        let active = match side {
            Side::Asks => &self.active_ask,
            Side::Bids => &self.active_bid,
        };
        active.as_deref() == Some(uid)
    }
}

/// A row activated by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub side: Side,
    pub amount: String,
    pub price: f64,
}

impl Selection {
    pub fn from_row(side: Side, row: &OrderRow) -> Option<Self> {
        let price = row.price_split.joined().parse().ok()?;
        Some(Self {
            side,
            amount: row.amount.clone(),
            price,
        })
    }

    /// Taking an ask is a buy, hitting a bid is a sell.
    pub fn describe(&self, base_asset: &str, currency: &str) -> String {
        let action = match self.side {
            Side::Asks => "Buy",
            Side::Bids => "Sell",
        };
        format!(
            "{action} {} {base_asset} at {} {currency}",
            self.amount, self.price
        )
    }
}
