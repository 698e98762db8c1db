//! External collaborators: candle retrieval and caching.

pub mod cache;
pub mod market_data;

pub use cache::CandleCache;
pub use market_data::{MarketDataError, MarketDataProvider, TwelveDataProvider};
