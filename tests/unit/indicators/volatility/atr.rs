//! Unit tests for ATR

use chrono::{Duration, TimeZone, Utc};
use signaltrix::indicators::volatility::atr;
use signaltrix::models::candle::Candle;

fn candle(i: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(i as i64);
    Candle::new(open, high, low, close, 1000.0, ts)
}

#[test]
fn test_atr_warm_up() {
    let candles: Vec<Candle> = (0..20)
        .map(|i| candle(i, 100.0, 101.0, 99.0, 100.0))
        .collect();
    let result = atr(&candles, 14);
    assert_eq!(result.len(), 20);
    assert_eq!(result.get(13), None);
    assert!(result.get(14).is_some());
}

#[test]
fn test_atr_short_series_all_markers() {
    let candles: Vec<Candle> = (0..14)
        .map(|i| candle(i, 100.0, 101.0, 99.0, 100.0))
        .collect();
    assert!(atr(&candles, 14).all_none());
}

#[test]
fn test_atr_constant_range() {
    // Identical candles: every true range is the high-low spread, so the
    // seed and every smoothed value equal it exactly.
    let candles: Vec<Candle> = (0..30)
        .map(|i| candle(i, 100.0, 101.5, 99.5, 100.0))
        .collect();
    let result = atr(&candles, 14);
    let value = result.last_value().unwrap();
    assert!((value - 2.0).abs() < 1e-9);
}

#[test]
fn test_atr_uses_gap_from_previous_close() {
    // A gap beyond the bar's own range widens the true range.
    let mut candles: Vec<Candle> = (0..20)
        .map(|i| candle(i, 100.0, 100.5, 99.5, 100.0))
        .collect();
    candles.push(candle(20, 110.0, 110.5, 109.5, 110.0));
    let with_gap = atr(&candles, 14).last_value().unwrap();
    assert!(with_gap > 1.0);
}
