//! Unit tests for pivot points

use chrono::{Duration, TimeZone, Utc};
use signaltrix::indicators::structure::pivot_points;
use signaltrix::models::candle::Candle;

fn candle(i: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(i as i64);
    Candle::new(open, high, low, close, 1000.0, ts)
}

#[test]
fn test_pivots_need_two_candles() {
    let result = pivot_points(&[candle(0, 100.0, 101.0, 99.0, 100.0)]);
    assert_eq!(result.pivot, None);
    assert_eq!(result.r1, None);
    assert_eq!(result.s1, None);
}

#[test]
fn test_pivots_exclude_current_candle() {
    // The forming candle's extreme high must not enter the window.
    let mut candles: Vec<Candle> = (0..10)
        .map(|i| candle(i, 100.0, 102.0, 98.0, 100.0))
        .collect();
    candles.push(candle(10, 100.0, 150.0, 95.0, 140.0));

    let result = pivot_points(&candles);
    // Window: high 102, low 98, last completed close 100.
    let pivot = result.pivot.unwrap();
    assert!((pivot - 100.0).abs() < 1e-9);
    assert!((result.r1.unwrap() - 102.0).abs() < 1e-9);
    assert!((result.s1.unwrap() - 98.0).abs() < 1e-9);
    assert!((result.r2.unwrap() - 104.0).abs() < 1e-9);
    assert!((result.s2.unwrap() - 96.0).abs() < 1e-9);
}

#[test]
fn test_pivot_level_ordering() {
    let candles: Vec<Candle> = (0..30)
        .map(|i| {
            let base = 100.0 + ((i * 5) % 11) as f64 * 0.3;
            candle(i, base, base + 0.6, base - 0.6, base + 0.2)
        })
        .collect();
    let result = pivot_points(&candles);
    let p = result.pivot.unwrap();
    assert!(result.r3.unwrap() >= result.r2.unwrap());
    assert!(result.r2.unwrap() >= result.r1.unwrap());
    assert!(result.r1.unwrap() >= result.s1.unwrap());
    assert!(result.s1.unwrap() >= result.s2.unwrap());
    assert!(result.s2.unwrap() >= result.s3.unwrap());
    assert!(result.r1.unwrap() >= p && p >= result.s1.unwrap());
}
