//! Core library for the orderbook-depth viewer.
//!
//! The model layer (`numeric`, `book`, `chart`) is pure and synchronous: it
//! turns raw level snapshots into formatted row lists and depth-chart
//! geometry. `feed`, `pipeline`, `state`, `render` and `presenter` wire it to a
//! data source and an output.

pub mod book;
pub mod chart;
pub mod config;
pub mod errors;
pub mod feed;
pub mod models;
pub mod numeric;
pub mod pipeline;
pub mod presenter;
pub mod render;
pub mod state;
pub mod utils;
