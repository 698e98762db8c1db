//! Unit tests for ADX / DI

use chrono::{Duration, TimeZone, Utc};
use signaltrix::indicators::trend::{adx, detect_di_crossover};
use signaltrix::models::candle::Candle;
use signaltrix::models::signal::Direction;

fn candle(i: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(i as i64);
    Candle::new(open, high, low, close, 1000.0, ts)
}

fn uptrend_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let base = 100.0 + i as f64 * 0.4;
            candle(i, base, base + 0.45, base - 0.05, base + 0.4)
        })
        .collect()
}

fn downtrend_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let base = 100.0 - i as f64 * 0.4;
            candle(i, base, base + 0.05, base - 0.45, base - 0.4)
        })
        .collect()
}

#[test]
fn test_adx_needs_two_periods_plus_one() {
    let candles = uptrend_candles(28);
    let result = adx(&candles, 14);
    assert_eq!(result.adx.len(), 28);
    assert!(result.adx.all_none());
    assert!(result.plus_di.all_none());
    assert!(result.minus_di.all_none());
}

#[test]
fn test_adx_values_non_negative() {
    let candles = uptrend_candles(60);
    let result = adx(&candles, 14);
    for series in [&result.adx, &result.plus_di, &result.minus_di] {
        for v in series.values().iter().flatten() {
            assert!(*v >= 0.0);
        }
    }
    assert!(result.adx.last_value().is_some());
}

#[test]
fn test_uptrend_has_plus_di_dominance() {
    let candles = uptrend_candles(60);
    let result = adx(&candles, 14);
    let plus = result.plus_di.last_value().unwrap();
    let minus = result.minus_di.last_value().unwrap();
    assert!(plus > minus);
    // Persistent one-way movement reads as a strong trend.
    assert!(result.adx.last_value().unwrap() >= 25.0);
}

#[test]
fn test_di_crossover_detected_on_reversal() {
    // A long downtrend flipping hard into gains crosses +DI above -DI.
    let mut candles = downtrend_candles(50);
    let last_close = candles.last().unwrap().close;
    for i in 0..8 {
        let base = last_close + i as f64 * 1.5;
        candles.push(candle(50 + i, base, base + 1.6, base - 0.05, base + 1.5));
    }

    let mut crossed = false;
    for n in 51..=candles.len() {
        let result = adx(&candles[..n], 14);
        if let Some(cross) = detect_di_crossover(&result) {
            assert_eq!(cross.direction, Direction::Buy);
            assert_eq!(cross.kind, "BULLISH_DI_CROSS");
            crossed = true;
            break;
        }
    }
    assert!(crossed, "expected a bullish DI crossover during the reversal");
}

#[test]
fn test_no_crossover_in_steady_trend() {
    let candles = uptrend_candles(60);
    let result = adx(&candles, 14);
    assert!(detect_di_crossover(&result).is_none());
}
