//! Candlestick-pattern and divergence detectors.

pub mod candlestick;
pub mod divergence;

pub use candlestick::{detect_candlestick_patterns, CandlePattern, PatternKind};
pub use divergence::{detect_macd_divergence, detect_rsi_divergence, Divergence, DivergenceKind};
