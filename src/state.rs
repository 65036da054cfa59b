//! View state and its transitions.
//!
//! Every event produces a complete new [`ViewState`] from the previous one;
//! nothing is merged in place.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::book::{
    DEFAULT_PRICE_CEILING, HoverHighlight, OrderbookModel, Selection, build_orderbook_model,
    prepare_snapshot,
};
use crate::chart::{DepthChartModel, DepthPolygons, PointerReading, build_depth_chart};
use crate::models::{ChartDimensions, Side, Snapshot};

pub const NO_SELECTION_MESSAGE: &str = "[no order selected]";

/// Settings that shape the views but never change at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub currency: String,
    pub base_asset: String,
    pub dimensions: ChartDimensions,
    /// Surface pixels per pointer unit.
    pub pixel_ratio: f64,
    pub price_ceiling: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            base_asset: "BTC".to_string(),
            dimensions: ChartDimensions::default(),
            pixel_ratio: 2.0,
            price_ceiling: DEFAULT_PRICE_CEILING,
        }
    }
}

/// Inputs to the view state.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A full-replace snapshot from the feed.
    Snapshot(Snapshot),
    RowHovered { side: Side, uid: String },
    RowsLeft,
    RowSelected { side: Side, uid: String },
    /// Pointer position relative to the chart element, in pointer units.
    PointerMoved { x: f64, y: f64 },
    PointerLeft,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderbookView {
    pub model: OrderbookModel,
    pub highlight: HoverHighlight,
}

/// Chart model and its polygons, always replaced together.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub model: DepthChartModel,
    pub polygons: DepthPolygons,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepthChartView {
    /// `None` until the first usable snapshot.
    pub chart: Option<Arc<ChartView>>,
    pub pointer: Option<PointerReading>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub orderbook: OrderbookView,
    pub depth_chart: DepthChartView,
    /// Last selection, as shown to the user.
    pub message: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            orderbook: OrderbookView::default(),
            depth_chart: DepthChartView::default(),
            message: NO_SELECTION_MESSAGE.to_string(),
        }
    }
}

impl ViewState {
    /// Returns the state that follows `self` after `event`.
    pub fn apply(&self, event: Event, settings: &ViewSettings) -> ViewState {
        match event {
            Event::Snapshot(snapshot) => self.with_snapshot(&snapshot, settings),
            Event::RowHovered { side, uid } => ViewState {
                orderbook: OrderbookView {
                    model: self.orderbook.model.clone(),
                    highlight: HoverHighlight::for_row(side, &uid, &self.orderbook.model),
                },
                ..self.clone()
            },
            Event::RowsLeft => ViewState {
                orderbook: OrderbookView {
                    model: self.orderbook.model.clone(),
                    highlight: HoverHighlight::default(),
                },
                ..self.clone()
            },
            Event::RowSelected { side, uid } => self.with_selection(side, &uid, settings),
            Event::PointerMoved { x, y } => {
                let model = self.depth_chart.chart.as_ref().map(|chart| &chart.model);
                ViewState {
                    depth_chart: DepthChartView {
                        chart: self.depth_chart.chart.clone(),
                        pointer: PointerReading::from_pointer(model, x, y, settings.pixel_ratio),
                    },
                    ..self.clone()
                }
            }
            Event::PointerLeft => ViewState {
                depth_chart: DepthChartView {
                    chart: self.depth_chart.chart.clone(),
                    pointer: None,
                },
                ..self.clone()
            },
        }
    }

    fn with_snapshot(&self, snapshot: &Snapshot, settings: &ViewSettings) -> ViewState {
        let book = prepare_snapshot(snapshot, settings.price_ceiling);
        if !book.is_complete() {
            debug!(
                asks = book.asks.len(),
                bids = book.bids.len(),
                "[VIEW] snapshot has an empty side, keeping previous models"
            );
            return self.clone();
        }

        let model = match build_orderbook_model(&book) {
            Ok(model) => model,
            Err(e) => {
                warn!(error = %e, "[VIEW] order book model rejected");
                self.orderbook.model.clone()
            }
        };

        let chart = match build_depth_chart(&book.asks, &book.bids, settings.dimensions) {
            Ok(model) => {
                let polygons = DepthPolygons::from_model(&model);
                Some(Arc::new(ChartView { model, polygons }))
            }
            Err(e) => {
                warn!(error = %e, "[VIEW] depth chart model rejected");
                self.depth_chart.chart.clone()
            }
        };

        debug!(
            fair_price = %model.fair_price,
            asks = model.asks.len(),
            bids = model.bids.len(),
            "[VIEW] models rebuilt"
        );

        ViewState {
            orderbook: OrderbookView {
                model,
                highlight: self.orderbook.highlight.clone(),
            },
            depth_chart: DepthChartView {
                chart,
                pointer: self.depth_chart.pointer,
            },
            message: self.message.clone(),
        }
    }

    fn with_selection(&self, side: Side, uid: &str, settings: &ViewSettings) -> ViewState {
        let selection = self
            .orderbook
            .model
            .side(side)
            .iter()
            .find(|row| row.uid == uid)
            .and_then(|row| Selection::from_row(side, row));
        match selection {
            Some(selection) => ViewState {
                message: selection.describe(&settings.base_asset, &settings.currency),
                ..self.clone()
            },
            None => {
                debug!(%side, uid, "[VIEW] selected row not found");
                self.clone()
            }
        }
    }
}
