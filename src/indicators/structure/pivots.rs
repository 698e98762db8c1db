//! Pivot points from recent completed candles.

use crate::models::candle::Candle;

/// Classic pivot levels. All fields are `None` when fewer than two
/// candles exist.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PivotPoints {
    pub pivot: Option<f64>,
    pub r1: Option<f64>,
    pub r2: Option<f64>,
    pub r3: Option<f64>,
    pub s1: Option<f64>,
    pub s2: Option<f64>,
    pub s3: Option<f64>,
}

/// Pivot levels from the prior up-to-20 completed candles, excluding the
/// current (still-forming) one.
pub fn pivot_points(candles: &[Candle]) -> PivotPoints {
    if candles.len() < 2 {
        return PivotPoints::default();
    }
    let lookback = 20.min(candles.len() - 1);
    let window = &candles[candles.len() - 1 - lookback..candles.len() - 1];

    let high = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let close = window[window.len() - 1].close;

    let pivot = (high + low + close) / 3.0;
    let range = high - low;

    PivotPoints {
        pivot: Some(pivot),
        r1: Some(2.0 * pivot - low),
        r2: Some(pivot + range),
        r3: Some(high + 2.0 * (pivot - low)),
        s1: Some(2.0 * pivot - high),
        s2: Some(pivot - range),
        s3: Some(low - 2.0 * (high - pivot)),
    }
}
