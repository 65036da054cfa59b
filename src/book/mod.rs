//! Textual order book model: sanitizing raw levels and turning them into
//! formatted, diff-highlighted rows.

pub mod ladder;
pub mod rows;
pub mod sanitize;

pub use ladder::render_ladder;
pub use rows::{
    HoverHighlight, OrderbookModel, Selection, build_orderbook_model, build_rows, fair_price,
    find_counterpart,
};
pub use sanitize::{DEFAULT_PRICE_CEILING, PreparedBook, prepare_snapshot};
