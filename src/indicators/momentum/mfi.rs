//! Money Flow Index.

use crate::indicators::series::Series;
use crate::models::candle::Candle;

/// Typical-price-weighted volume flow ratio; 100 when negative flow is
/// zero.
pub fn mfi(candles: &[Candle], period: usize) -> Series {
    let n = candles.len();
    if period == 0 || n < period + 1 {
        return Series::empty(n);
    }
    let tp: Vec<f64> = candles
        .iter()
        .map(|c| (c.high + c.low + c.close) / 3.0)
        .collect();
    let flow: Vec<f64> = candles
        .iter()
        .enumerate()
        .map(|(i, c)| tp[i] * c.volume)
        .collect();

    let mut out = vec![None; period];
    for i in period..n {
        let mut positive = 0.0;
        let mut negative = 0.0;
        for j in i + 1 - period..=i {
            if tp[j] > tp[j - 1] {
                positive += flow[j];
            } else if tp[j] < tp[j - 1] {
                negative += flow[j];
            }
        }
        out.push(Some(if negative > 0.0 {
            100.0 - 100.0 / (1.0 + positive / negative)
        } else {
            100.0
        }));
    }
    Series::new(out)
}
