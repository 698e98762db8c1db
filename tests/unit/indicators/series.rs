//! Unit tests for the aligned series type

use signaltrix::indicators::series::Series;
use signaltrix::indicators::trend::sma;

#[test]
fn test_last_value_skips_markers() {
    let s = Series::new(vec![None, Some(1.0), Some(2.0), None]);
    assert_eq!(s.last_value(), Some(2.0));
}

#[test]
fn test_last_value_empty() {
    let s = Series::empty(5);
    assert_eq!(s.last_value(), None);
    assert!(s.all_none());
}

#[test]
fn test_last_two_order() {
    let s = Series::new(vec![Some(1.0), None, Some(2.0), Some(3.0), None]);
    assert_eq!(s.last_two(), (Some(2.0), Some(3.0)));
}

#[test]
fn test_last_two_single_value() {
    let s = Series::new(vec![None, Some(4.0)]);
    assert_eq!(s.last_two(), (None, Some(4.0)));
}

#[test]
fn test_last_n_oldest_first() {
    let s = Series::new(vec![Some(1.0), None, Some(2.0), Some(3.0), Some(4.0)]);
    assert_eq!(s.last_n(3), vec![2.0, 3.0, 4.0]);
    assert_eq!(s.last_n(10), vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_map_compact_preserves_indices() {
    // Three valid values at indices 2, 4, 5; SMA(2) of the compacted
    // subsequence must land back on indices 4 and 5.
    let s = Series::new(vec![None, None, Some(10.0), None, Some(20.0), Some(30.0)]);
    let smoothed = s.map_compact(|vals| sma(vals, 2));
    assert_eq!(smoothed.len(), s.len());
    assert_eq!(smoothed.get(2), None);
    assert_eq!(smoothed.get(4), Some(15.0));
    assert_eq!(smoothed.get(5), Some(25.0));
}

#[test]
fn test_zip_with_propagates_markers() {
    let a = Series::new(vec![None, Some(5.0), Some(7.0)]);
    let b = Series::new(vec![Some(1.0), Some(2.0), None]);
    let c = a.zip_with(&b, |x, y| x - y);
    assert_eq!(c.values(), &[None, Some(3.0), None]);
}
