//! Average True Range with Wilder smoothing.

use crate::indicators::series::Series;
use crate::models::candle::Candle;

/// ATR seeded by the simple average of the first `period` true ranges,
/// Wilder-smoothed afterwards. True range needs a prior close, so the
/// warm-up is `period + 1` candles.
pub fn atr(candles: &[Candle], period: usize) -> Series {
    let n = candles.len();
    if period == 0 || n < period + 1 {
        return Series::empty(n);
    }

    let mut tr = vec![0.0; n];
    for i in 1..n {
        let h = candles[i].high;
        let l = candles[i].low;
        let pc = candles[i - 1].close;
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }

    let mut value: f64 = tr[1..=period].iter().sum::<f64>() / period as f64;
    let mut out = vec![None; period];
    out.push(Some(value));
    for t in &tr[period + 1..] {
        value = (value * (period as f64 - 1.0) + t) / period as f64;
        out.push(Some(value));
    }
    Series::new(out)
}
