//! Signaltrix: multi-timeframe signal engine for forex and crypto pairs.
//!
//! The core pipeline (indicators → patterns/divergence → per-timeframe
//! analyzer → multi-timeframe aggregation) is a pure, synchronous
//! computation over candle data. The service layers around it (HTTP
//! surface, market-data provider, cache) feed it typed inputs and expose
//! its typed output.

pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod patterns;
pub mod services;
pub mod signals;
