use thiserror::Error;

use crate::models::Side;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// A non-finite value reached the number formatter.
    #[error("Format error: cannot format non-finite number {0}")]
    Format(f64),

    /// Both ends of a scale domain are equal.
    #[error("Degenerate scale domain: both ends are {0}")]
    DomainDegenerate(f64),

    #[error("Order book side is empty: {0}")]
    EmptySide(Side),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Decimal parse error: {0}")]
    Decimal(#[from] bigdecimal::ParseBigDecimalError),

    #[error("Parse float error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    #[error("Parse int error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}
