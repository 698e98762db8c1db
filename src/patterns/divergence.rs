//! Price/oscillator divergence over a bounded lookback window.

use serde::{Deserialize, Serialize};

use crate::indicators::series::Series;
use crate::models::candle::Candle;
use crate::models::signal::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DivergenceKind {
    BullishRsiDivergence,
    BearishRsiDivergence,
    BullishMacdDiv,
    BearishMacdDiv,
}

/// A detected divergence. Strength already accounts for confirmation:
/// an unconfirmed divergence carries exactly half the confirmed weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Divergence {
    pub kind: DivergenceKind,
    pub direction: Direction,
    pub strength: f64,
    pub confirmed: bool,
}

#[derive(Debug, Clone, Copy)]
struct SwingPoint {
    idx: usize,
    price: f64,
    osc: f64,
}

/// RSI divergence: swing extrema over a ±2-bar window, the two most
/// recent swings at least `min_bars` apart, and price/oscillator moving
/// in opposite directions. Confirmed when the final candle closes in the
/// divergence direction.
pub fn detect_rsi_divergence(
    candles: &[Candle],
    rsi: &Series,
    lookback: usize,
    min_bars: usize,
) -> Option<Divergence> {
    let n = candles.len();
    if n < lookback || n < 5 {
        return None;
    }
    let start = n - lookback;
    let mut lows = Vec::new();
    let mut highs = Vec::new();

    for i in start + 2..n - 2 {
        let osc = match rsi.get(i) {
            Some(v) => v,
            None => continue,
        };
        let low = candles[i].low;
        if low <= candles[i - 1].low
            && low <= candles[i - 2].low
            && low <= candles[i + 1].low
            && low <= candles[i + 2].low
        {
            lows.push(SwingPoint {
                idx: i,
                price: low,
                osc,
            });
        }
        let high = candles[i].high;
        if high >= candles[i - 1].high
            && high >= candles[i - 2].high
            && high >= candles[i + 1].high
            && high >= candles[i + 2].high
        {
            highs.push(SwingPoint {
                idx: i,
                price: high,
                osc,
            });
        }
    }

    let last_candle = &candles[n - 1];

    if let [.., prev, recent] = lows.as_slice() {
        if recent.price < prev.price
            && recent.osc > prev.osc
            && recent.idx - prev.idx >= min_bars
        {
            let confirmed = last_candle.is_bullish();
            return Some(Divergence {
                kind: DivergenceKind::BullishRsiDivergence,
                direction: Direction::Buy,
                strength: if confirmed { 2.0 } else { 1.0 },
                confirmed,
            });
        }
    }

    if let [.., prev, recent] = highs.as_slice() {
        if recent.price > prev.price
            && recent.osc < prev.osc
            && recent.idx - prev.idx >= min_bars
        {
            let confirmed = last_candle.close < last_candle.open;
            return Some(Divergence {
                kind: DivergenceKind::BearishRsiDivergence,
                direction: Direction::Sell,
                strength: if confirmed { 2.0 } else { 1.0 },
                confirmed,
            });
        }
    }

    None
}

/// MACD-histogram divergence. Looser than the RSI variant: swing extrema
/// only need a ±1-bar window and no minimum swing separation.
pub fn detect_macd_divergence(
    candles: &[Candle],
    histogram: &Series,
    lookback: usize,
) -> Option<Divergence> {
    let n = candles.len();
    if n < lookback || n < 5 {
        return None;
    }
    let start = n - lookback;
    let mut lows = Vec::new();
    let mut highs = Vec::new();

    for i in start + 2..n - 2 {
        let osc = match histogram.get(i) {
            Some(v) => v,
            None => continue,
        };
        let low = candles[i].low;
        if low <= candles[i - 1].low && low <= candles[i + 1].low {
            lows.push(SwingPoint {
                idx: i,
                price: low,
                osc,
            });
        }
        let high = candles[i].high;
        if high >= candles[i - 1].high && high >= candles[i + 1].high {
            highs.push(SwingPoint {
                idx: i,
                price: high,
                osc,
            });
        }
    }

    let last_candle = &candles[n - 1];

    if let [.., prev, recent] = lows.as_slice() {
        if recent.price < prev.price && recent.osc > prev.osc {
            let confirmed = last_candle.is_bullish();
            return Some(Divergence {
                kind: DivergenceKind::BullishMacdDiv,
                direction: Direction::Buy,
                strength: if confirmed { 1.5 } else { 0.75 },
                confirmed,
            });
        }
    }

    if let [.., prev, recent] = highs.as_slice() {
        if recent.price > prev.price && recent.osc < prev.osc {
            let confirmed = last_candle.close < last_candle.open;
            return Some(Divergence {
                kind: DivergenceKind::BearishMacdDiv,
                direction: Direction::Sell,
                strength: if confirmed { 1.5 } else { 0.75 },
                confirmed,
            });
        }
    }

    None
}
