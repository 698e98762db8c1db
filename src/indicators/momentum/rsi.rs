//! Relative Strength Index with Wilder smoothing.

use crate::indicators::series::Series;

/// RSI over closes. Seeded from the simple average gain/loss of the
/// first `period` deltas; Wilder-smoothed afterwards. A zero average
/// loss reads as 100.
pub fn rsi(data: &[f64], period: usize) -> Series {
    if period == 0 || data.len() < period + 1 {
        return Series::empty(data.len());
    }

    let changes: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for c in &changes[..period] {
        if *c > 0.0 {
            avg_gain += c;
        } else {
            avg_loss += c.abs();
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    let rsi_of = |gain: f64, loss: f64| {
        if loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + gain / loss)
        }
    };

    let mut out = vec![None; period];
    out.push(Some(rsi_of(avg_gain, avg_loss)));
    for c in &changes[period..] {
        let gain = if *c > 0.0 { *c } else { 0.0 };
        let loss = if *c < 0.0 { c.abs() } else { 0.0 };
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        out.push(Some(rsi_of(avg_gain, avg_loss)));
    }
    Series::new(out)
}
