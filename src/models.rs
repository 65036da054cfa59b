//! Shared data structures used throughout the application.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Side of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Sell side, best (lowest) price first.
    Asks,
    /// Buy side, best (highest) price first.
    Bids,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Asks => Self::Bids,
            Self::Bids => Self::Asks,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asks => write!(f, "asks"),
            Self::Bids => write!(f, "bids"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asks" | "ask" => Ok(Self::Asks),
            "bids" | "bid" => Ok(Self::Bids),
            _ => Err(format!("invalid side '{s}', expected 'asks' or 'bids'")),
        }
    }
}

/// Raw price level as delivered by a feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceLevel {
    pub price: f64,
    pub amount: f64,
}

impl PriceLevel {
    pub fn new(price: f64, amount: f64) -> Self {
        Self { price, amount }
    }
}

impl From<(f64, f64)> for PriceLevel {
    fn from((price, amount): (f64, f64)) -> Self {
        Self::new(price, amount)
    }
}

/// Feeds send numbers either as JSON numbers or as decimal strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    fn into_f64(self) -> f64 {
        match self {
            Self::Number(n) => n,
            Self::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        }
    }
}

impl<'de> Deserialize<'de> for PriceLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [price, amount] = <[RawNumber; 2]>::deserialize(deserializer)?;
        Ok(Self::new(price.into_f64(), amount.into_f64()))
    }
}

/// Full-replace book snapshot, in whatever order the source produced it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Snapshot {
    pub asks: Vec<PriceLevel>,
    pub bids: Vec<PriceLevel>,
}

impl Snapshot {
    pub fn new(asks: Vec<PriceLevel>, bids: Vec<PriceLevel>) -> Self {
        Self { asks, bids }
    }

    pub fn side(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Asks => &self.asks,
            Side::Bids => &self.bids,
        }
    }
}

/// Sanitized level with its running cumulative amount, not yet formatted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthLevel {
    pub price: f64,
    pub amount: f64,
    pub cumulative: f64,
    /// Position from the best price outward; provisional identity.
    pub rank: usize,
}

/// A formatted price split at the first changed character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceSplit {
    /// Leading characters shared with the previous row (dimmed).
    pub prefix: String,
    /// Changed trailing characters (emphasized).
    pub suffix: String,
}

impl PriceSplit {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// The full formatted price.
    pub fn joined(&self) -> String {
        format!("{}{}", self.prefix, self.suffix)
    }
}

/// One display row of the textual book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub price_split: PriceSplit,
    pub amount: String,
    pub cumulative: String,
    pub uid: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPoint {
    pub x: i32,
    pub y: i32,
}

impl ChartPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pixel size of the depth chart surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDimensions {
    pub width: i32,
    pub height: i32,
    /// Left margin kept free for axis labels.
    pub reserved_width: i32,
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self {
            width: 460,
            height: 900,
            reserved_width: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_parses_numbers_and_strings() {
        let raw = r#"{
            "asks": [[101.5, "2.0"], ["1.05e2", 1]],
            "bids": [["100.0", "bad"]]
        }"#;
        let snapshot: Snapshot = serde_json::from_str(raw).expect("json should parse");
        assert_eq!(snapshot.asks[0], PriceLevel::new(101.5, 2.0));
        assert_eq!(snapshot.asks[1], PriceLevel::new(105.0, 1.0));
        assert_eq!(snapshot.bids[0].price, 100.0);
        assert!(snapshot.bids[0].amount.is_nan());
    }

    #[test]
    fn side_parses_and_displays() {
        assert_eq!("ASKS".parse::<Side>().unwrap(), Side::Asks);
        assert_eq!("bid".parse::<Side>().unwrap(), Side::Bids);
        assert!("both".parse::<Side>().is_err());
        assert_eq!(Side::Bids.to_string(), "bids");
        assert_eq!(Side::Asks.opposite(), Side::Bids);
    }

    #[test]
    fn price_split_joins() {
        assert_eq!(PriceSplit::new("65", "01.5").joined(), "6501.5");
    }
}
