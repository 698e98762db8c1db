//! Simple and exponential moving averages.

use crate::indicators::series::Series;

/// Rolling simple moving average. Positions before `period - 1` are
/// markers; the rest are the window mean.
pub fn sma(data: &[f64], period: usize) -> Series {
    if period == 0 || data.len() < period {
        return Series::empty(data.len());
    }
    let mut out = vec![None; period - 1];
    let mut sum: f64 = data[..period].iter().sum();
    out.push(Some(sum / period as f64));
    for i in period..data.len() {
        sum += data[i] - data[i - period];
        out.push(Some(sum / period as f64));
    }
    Series::new(out)
}

/// Exponential moving average seeded from the simple average of the
/// first `period` points, then recursing with k = 2 / (period + 1).
pub fn ema(data: &[f64], period: usize) -> Series {
    if data.is_empty() {
        return Series::empty(0);
    }
    if period == 0 || data.len() < period {
        return Series::empty(data.len());
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = vec![None; period - 1];
    let mut value: f64 = data[..period].iter().sum::<f64>() / period as f64;
    out.push(Some(value));
    for x in &data[period..] {
        value = x * k + value * (1.0 - k);
        out.push(Some(value));
    }
    Series::new(out)
}
