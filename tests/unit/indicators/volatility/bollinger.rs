//! Unit tests for Bollinger Bands

use signaltrix::indicators::volatility::bollinger;

#[test]
fn test_bollinger_warm_up_and_length() {
    let data: Vec<f64> = (0..40).map(|i| 100.0 + (i % 5) as f64).collect();
    let result = bollinger(&data, 20, 2.0);
    assert_eq!(result.upper.len(), 40);
    assert_eq!(result.middle.get(18), None);
    assert!(result.middle.get(19).is_some());
}

#[test]
fn test_bollinger_short_series_all_markers() {
    let data = vec![100.0; 10];
    let result = bollinger(&data, 20, 2.0);
    assert_eq!(result.upper.len(), 10);
    assert!(result.upper.all_none());
    assert!(result.percent_b.all_none());
}

#[test]
fn test_bollinger_band_ordering() {
    let data: Vec<f64> = (0..40).map(|i| 100.0 + ((i * 3) % 7) as f64).collect();
    let result = bollinger(&data, 20, 2.0);
    let upper = result.upper.last_value().unwrap();
    let middle = result.middle.last_value().unwrap();
    let lower = result.lower.last_value().unwrap();
    assert!(upper > middle);
    assert!(middle > lower);
}

#[test]
fn test_bollinger_constant_series_sentinels() {
    // Zero variance: the bands collapse onto the mean, bandwidth reads 0
    // and %B falls back to its 0.5 sentinel.
    let data = vec![50.0; 30];
    let result = bollinger(&data, 20, 2.0);
    assert_eq!(result.bandwidth.last_value(), Some(0.0));
    assert_eq!(result.percent_b.last_value(), Some(0.5));
    assert_eq!(result.upper.last_value(), Some(50.0));
}

#[test]
fn test_percent_b_unbounded_outside_bands() {
    // A hard spike on the final close pushes %B beyond 1.
    let mut data = vec![100.0; 25];
    for i in 0..25 {
        data[i] += ((i * 2) % 3) as f64 * 0.1;
    }
    data.push(110.0);
    let result = bollinger(&data, 20, 2.0);
    assert!(result.percent_b.last_value().unwrap() > 1.0);
}
