//! Commodity Channel Index.

use crate::indicators::series::Series;
use crate::models::candle::Candle;

/// CCI over typical price with the conventional 0.015 scaling constant;
/// 0 when the mean absolute deviation vanishes.
pub fn cci(candles: &[Candle], period: usize) -> Series {
    let n = candles.len();
    if period == 0 || n < period {
        return Series::empty(n);
    }
    let tp: Vec<f64> = candles
        .iter()
        .map(|c| (c.high + c.low + c.close) / 3.0)
        .collect();

    let mut out = vec![None; period - 1];
    for i in period - 1..n {
        let window = &tp[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let mad = window.iter().map(|v| (v - mean).abs()).sum::<f64>() / period as f64;
        out.push(Some(if mad > 0.0 {
            (tp[i] - mean) / (0.015 * mad)
        } else {
            0.0
        }));
    }
    Series::new(out)
}
