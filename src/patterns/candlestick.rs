//! Reversal and continuation shapes over the last one to three candles.

use serde::{Deserialize, Serialize};

use crate::models::candle::Candle;
use crate::models::signal::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternKind {
    BullishEngulfing,
    BearishEngulfing,
    Hammer,
    ShootingStar,
    Doji,
    PinBarBullish,
    PinBarBearish,
    MorningStar,
    EveningStar,
    ThreeWhiteSoldiers,
    ThreeBlackCrows,
}

impl PatternKind {
    /// Patterns strong enough to extend a signal's holding duration.
    pub fn is_strong_reversal(&self) -> bool {
        matches!(
            self,
            PatternKind::MorningStar
                | PatternKind::EveningStar
                | PatternKind::ThreeWhiteSoldiers
                | PatternKind::ThreeBlackCrows
                | PatternKind::BullishEngulfing
                | PatternKind::BearishEngulfing
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandlePattern {
    pub kind: PatternKind,
    pub direction: Direction,
    pub strength: f64,
}

impl CandlePattern {
    fn new(kind: PatternKind, direction: Direction, strength: f64) -> Self {
        Self {
            kind,
            direction,
            strength,
        }
    }
}

/// Detect the fixed pattern catalog on the most recent candles. Multiple
/// patterns may co-occur; the analyzer caps their summed contribution.
/// Fewer than three candles yields no detections.
pub fn detect_candlestick_patterns(candles: &[Candle]) -> Vec<CandlePattern> {
    let mut patterns = Vec::new();
    if candles.len() < 3 {
        return patterns;
    }
    let n = candles.len();
    let c0 = &candles[n - 1];
    let c1 = &candles[n - 2];
    let c2 = &candles[n - 3];

    let b0 = c0.body();
    let b1 = c1.body();
    let b2 = c2.body();
    let ab0 = b0.abs();
    let ab1 = b1.abs();
    let r0 = c0.range();
    let r1 = c1.range();
    let body_pct0 = ab0 / r0;
    let body_pct1 = ab1 / r1;
    let upper_wick = c0.high - c0.open.max(c0.close);
    let lower_wick = c0.open.min(c0.close) - c0.low;

    if b1 < 0.0 && b0 > 0.0 && c0.open <= c1.close && c0.close >= c1.open && ab0 > ab1 {
        patterns.push(CandlePattern::new(
            PatternKind::BullishEngulfing,
            Direction::Buy,
            2.0,
        ));
    }
    if b1 > 0.0 && b0 < 0.0 && c0.open >= c1.close && c0.close <= c1.open && ab0 > ab1 {
        patterns.push(CandlePattern::new(
            PatternKind::BearishEngulfing,
            Direction::Sell,
            2.0,
        ));
    }
    if body_pct0 < 0.35 && lower_wick > ab0 * 2.0 && upper_wick < ab0 * 0.5 {
        patterns.push(CandlePattern::new(PatternKind::Hammer, Direction::Buy, 1.5));
    }
    if body_pct0 < 0.35 && upper_wick > ab0 * 2.0 && lower_wick < ab0 * 0.5 {
        patterns.push(CandlePattern::new(
            PatternKind::ShootingStar,
            Direction::Sell,
            1.5,
        ));
    }
    if body_pct0 < 0.1 {
        patterns.push(CandlePattern::new(PatternKind::Doji, Direction::NoTrade, 0.5));
    }
    if lower_wick > r0 * 0.6 && upper_wick < r0 * 0.15 && body_pct0 < 0.3 {
        patterns.push(CandlePattern::new(
            PatternKind::PinBarBullish,
            Direction::Buy,
            1.8,
        ));
    }
    if upper_wick > r0 * 0.6 && lower_wick < r0 * 0.15 && body_pct0 < 0.3 {
        patterns.push(CandlePattern::new(
            PatternKind::PinBarBearish,
            Direction::Sell,
            1.8,
        ));
    }

    let r2 = c2.range();
    if b2 < 0.0
        && b2.abs() / r2 > 0.5
        && body_pct1 < 0.2
        && b0 > 0.0
        && body_pct0 > 0.5
        && c0.close > (c2.open + c2.close) / 2.0
    {
        patterns.push(CandlePattern::new(
            PatternKind::MorningStar,
            Direction::Buy,
            2.5,
        ));
    }
    if b2 > 0.0
        && b2.abs() / r2 > 0.5
        && body_pct1 < 0.2
        && b0 < 0.0
        && body_pct0 > 0.5
        && c0.close < (c2.open + c2.close) / 2.0
    {
        patterns.push(CandlePattern::new(
            PatternKind::EveningStar,
            Direction::Sell,
            2.5,
        ));
    }
    if b2 > 0.0
        && b1 > 0.0
        && b0 > 0.0
        && c1.close > c2.close
        && c0.close > c1.close
        && body_pct0 > 0.5
        && body_pct1 > 0.5
    {
        patterns.push(CandlePattern::new(
            PatternKind::ThreeWhiteSoldiers,
            Direction::Buy,
            2.0,
        ));
    }
    if b2 < 0.0
        && b1 < 0.0
        && b0 < 0.0
        && c1.close < c2.close
        && c0.close < c1.close
        && body_pct0 > 0.5
        && body_pct1 > 0.5
    {
        patterns.push(CandlePattern::new(
            PatternKind::ThreeBlackCrows,
            Direction::Sell,
            2.0,
        ));
    }

    patterns
}
