//! Unit tests for Williams %R, CCI and MFI

use chrono::{Duration, TimeZone, Utc};
use signaltrix::indicators::momentum::{cci, mfi, williams_r};
use signaltrix::models::candle::Candle;

fn candle(i: usize, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(i as i64);
    Candle::new(open, high, low, close, volume, ts)
}

fn uptrend_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let base = 100.0 + i as f64 * 0.4;
            candle(i, base, base + 0.45, base - 0.05, base + 0.4, 1000.0)
        })
        .collect()
}

fn flat_candles(count: usize) -> Vec<Candle> {
    (0..count).map(|i| candle(i, 5.0, 5.0, 5.0, 5.0, 0.0)).collect()
}

#[test]
fn test_williams_r_warm_up_and_bounds() {
    let candles = uptrend_candles(40);
    let result = williams_r(&candles, 14);
    assert_eq!(result.len(), 40);
    assert_eq!(result.get(12), None);
    assert!(result.get(13).is_some());
    for v in result.values().iter().flatten() {
        assert!((-100.0..=0.0).contains(v));
    }
}

#[test]
fn test_williams_r_zero_range_sentinel() {
    let result = williams_r(&flat_candles(20), 14);
    assert_eq!(result.last_value(), Some(-50.0));
}

#[test]
fn test_williams_r_near_top_in_uptrend() {
    let result = williams_r(&uptrend_candles(40), 14);
    // Close sits just under the window high, so %R is close to zero.
    assert!(result.last_value().unwrap() > -10.0);
}

#[test]
fn test_cci_warm_up_and_zero_mad() {
    let candles = uptrend_candles(40);
    let result = cci(&candles, 20);
    assert_eq!(result.get(18), None);
    assert!(result.get(19).is_some());

    let flat = cci(&flat_candles(30), 20);
    assert_eq!(flat.last_value(), Some(0.0));
}

#[test]
fn test_cci_positive_in_uptrend() {
    let result = cci(&uptrend_candles(40), 20);
    assert!(result.last_value().unwrap() > 100.0);
}

#[test]
fn test_mfi_warm_up_and_bounds() {
    let candles = uptrend_candles(40);
    let result = mfi(&candles, 14);
    assert_eq!(result.get(13), None);
    assert!(result.get(14).is_some());
    for v in result.values().iter().flatten() {
        assert!((0.0..=100.0).contains(v));
    }
}

#[test]
fn test_mfi_all_positive_flow_is_100() {
    // Typical price rises every bar, so negative flow is zero.
    let result = mfi(&uptrend_candles(40), 14);
    assert_eq!(result.last_value(), Some(100.0));
}

#[test]
fn test_short_series_all_markers() {
    let candles = uptrend_candles(10);
    assert!(williams_r(&candles, 14).all_none());
    assert!(cci(&candles, 20).all_none());
    assert!(mfi(&candles, 14).all_none());
}
