//! Configuration loader and application settings.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::book::DEFAULT_PRICE_CEILING;
use crate::errors::{AppError, Result};
use crate::models::ChartDimensions;
use crate::state::ViewSettings;

/// Where snapshots come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedKind {
    /// Locally generated random-walk book.
    #[default]
    Simulated,
    /// Binance public partial-depth stream.
    Binance,
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simulated => write!(f, "simulated"),
            Self::Binance => write!(f, "binance"),
        }
    }
}

impl FromStr for FeedKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "simulated" | "sim" | "mock" => Ok(Self::Simulated),
            "binance" => Ok(Self::Binance),
            _ => Err(AppError::Config(format!(
                "invalid feed '{s}', expected 'simulated' or 'binance'"
            ))),
        }
    }
}

/// Upper bound on the number of prices in the simulated tick ladder.
pub const MAX_LADDER_STEPS: f64 = 2_000_000.0;

/// Parameters of the simulated feed.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub mid_price: f64,
    pub tick_size: f64,
    /// Levels generated per side.
    pub levels: usize,
    pub interval_ms: u64,
    /// Probability that a snapshot carries one garbage level.
    pub glitch_rate: f64,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mid_price: 6500.0,
            tick_size: 0.5,
            levels: 25,
            interval_ms: 500,
            glitch_rate: 0.02,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Distance from the starting mid price to either end of the tick ladder.
    pub fn ladder_half_span(&self) -> f64 {
        (self.mid_price * 0.5).max(self.tick_size * self.levels as f64 * 8.0)
    }

    /// Number of tick steps the ladder spans.
    pub fn ladder_steps(&self) -> f64 {
        (2.0 * self.ladder_half_span() / self.tick_size).ceil()
    }
}

/// Consolidated application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub feed: FeedKind,
    /// Binance stream symbol, e.g. "btcusdt".
    pub symbol: String,
    pub simulation: SimulationConfig,
    pub view: ViewSettings,
    /// When set, the chart is written there as SVG on every update.
    pub svg_output: Option<PathBuf>,
    /// Rows per side in the terminal ladder.
    pub ladder_depth: usize,
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let parse_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let sim_defaults = SimulationConfig::default();
        let simulation = SimulationConfig {
            mid_price: parse_or("SIM_MID_PRICE", &sim_defaults.mid_price.to_string())
                .trim()
                .parse()?,
            tick_size: parse_or("SIM_TICK_SIZE", &sim_defaults.tick_size.to_string())
                .trim()
                .parse()?,
            levels: parse_or("SIM_LEVELS", &sim_defaults.levels.to_string())
                .trim()
                .parse()?,
            interval_ms: parse_or("SIM_INTERVAL_MS", &sim_defaults.interval_ms.to_string())
                .trim()
                .parse()?,
            glitch_rate: parse_or("SIM_GLITCH_RATE", &sim_defaults.glitch_rate.to_string())
                .trim()
                .parse()?,
            seed: var("SIM_SEED").map(|s| s.trim().parse()).transpose()?,
        };

        let view_defaults = ViewSettings::default();
        let dims_defaults = view_defaults.dimensions;
        let view = ViewSettings {
            currency: parse_or("QUOTE_CURRENCY", &view_defaults.currency),
            base_asset: parse_or("BASE_ASSET", &view_defaults.base_asset),
            dimensions: ChartDimensions {
                width: parse_or("CHART_WIDTH", &dims_defaults.width.to_string())
                    .trim()
                    .parse()?,
                height: parse_or("CHART_HEIGHT", &dims_defaults.height.to_string())
                    .trim()
                    .parse()?,
                reserved_width: parse_or(
                    "CHART_RESERVED_WIDTH",
                    &dims_defaults.reserved_width.to_string(),
                )
                .trim()
                .parse()?,
            },
            pixel_ratio: parse_or("PIXEL_RATIO", &view_defaults.pixel_ratio.to_string())
                .trim()
                .parse()?,
            price_ceiling: parse_or("PRICE_CEILING", &DEFAULT_PRICE_CEILING.to_string())
                .trim()
                .parse()?,
        };

        let config = Self {
            feed: parse_or("FEED", "simulated").parse()?,
            symbol: parse_or("SYMBOL", "btcusdt").to_lowercase(),
            simulation,
            view,
            svg_output: var("SVG_OUTPUT").map(PathBuf::from),
            ladder_depth: parse_or("LADDER_DEPTH", "10").trim().parse()?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let dims = self.view.dimensions;
        if dims.height <= 0 {
            return Err(AppError::Config(format!(
                "CHART_HEIGHT must be positive, got {}",
                dims.height
            )));
        }
        if dims.reserved_width < 0 || dims.width <= dims.reserved_width {
            return Err(AppError::Config(format!(
                "CHART_WIDTH ({}) must exceed CHART_RESERVED_WIDTH ({})",
                dims.width, dims.reserved_width
            )));
        }
        if !(self.view.pixel_ratio.is_finite() && self.view.pixel_ratio > 0.0) {
            return Err(AppError::Config(format!(
                "PIXEL_RATIO must be positive, got {}",
                self.view.pixel_ratio
            )));
        }
        if self.view.price_ceiling.is_nan() || self.view.price_ceiling <= 0.0 {
            return Err(AppError::Config(format!(
                "PRICE_CEILING must be positive, got {}",
                self.view.price_ceiling
            )));
        }
        let sim = &self.simulation;
        if !(sim.mid_price.is_finite() && sim.mid_price > 0.0)
            || !(sim.tick_size.is_finite() && sim.tick_size > 0.0)
        {
            return Err(AppError::Config(
                "SIM_MID_PRICE and SIM_TICK_SIZE must be positive".to_string(),
            ));
        }
        if sim.levels < 2 {
            return Err(AppError::Config(format!(
                "SIM_LEVELS must be at least 2, got {}",
                sim.levels
            )));
        }
        if !(0.0..=1.0).contains(&sim.glitch_rate) {
            return Err(AppError::Config(format!(
                "SIM_GLITCH_RATE must be within [0, 1], got {}",
                sim.glitch_rate
            )));
        }
        if sim.ladder_steps() > MAX_LADDER_STEPS {
            return Err(AppError::Config(format!(
                "simulated tick ladder would hold {} prices, limit is {MAX_LADDER_STEPS}; \
                 raise SIM_TICK_SIZE or lower SIM_MID_PRICE / SIM_LEVELS",
                sim.ladder_steps()
            )));
        }
        if sim.interval_ms == 0 {
            return Err(AppError::Config("SIM_INTERVAL_MS must be positive".to_string()));
        }
        Ok(())
    }
}
