//! Unit tests for SMA and EMA

use signaltrix::indicators::trend::{ema, sma};

#[test]
fn test_sma_short_series_is_all_markers() {
    let data = vec![1.0, 2.0, 3.0];
    let result = sma(&data, 5);
    assert_eq!(result.len(), 3);
    assert!(result.all_none());
}

#[test]
fn test_sma_values() {
    let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    let result = sma(&data, 3);
    assert_eq!(result.get(0), None);
    assert_eq!(result.get(1), None);
    assert_eq!(result.get(2), Some(2.0));
    assert_eq!(result.get(3), Some(3.0));
    assert_eq!(result.get(4), Some(4.0));
}

#[test]
fn test_ema_seeds_from_simple_average() {
    let data = vec![2.0, 4.0, 6.0, 8.0];
    let result = ema(&data, 3);
    // Seed at index 2 is the SMA of the first three points.
    assert_eq!(result.get(1), None);
    assert_eq!(result.get(2), Some(4.0));
    // k = 2/(3+1) = 0.5, so next = 8*0.5 + 4*0.5 = 6.
    assert_eq!(result.get(3), Some(6.0));
}

#[test]
fn test_ema_short_series_is_all_markers() {
    let data = vec![1.0, 2.0];
    let result = ema(&data, 10);
    assert_eq!(result.len(), 2);
    assert!(result.all_none());
}

#[test]
fn test_ema_empty_input() {
    let result = ema(&[], 5);
    assert_eq!(result.len(), 0);
}

#[test]
fn test_ema_length_matches_input() {
    let data: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
    assert_eq!(ema(&data, 20).len(), 50);
    assert_eq!(sma(&data, 20).len(), 50);
}
