//! Williams %R.

use crate::indicators::series::Series;
use crate::models::candle::Candle;

/// Williams %R over a rolling high/low window; −50 on a zero range.
/// Values lie in [−100, 0].
pub fn williams_r(candles: &[Candle], period: usize) -> Series {
    let n = candles.len();
    if period == 0 || n < period {
        return Series::empty(n);
    }
    let mut out = vec![None; period - 1];
    for i in period - 1..n {
        let window = &candles[i + 1 - period..=i];
        let hi = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let lo = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let range = hi - lo;
        out.push(Some(if range > 0.0 {
            (hi - candles[i].close) / range * -100.0
        } else {
            -50.0
        }));
    }
    Series::new(out)
}
