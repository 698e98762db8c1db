//! MACD with a sparse-smoothed signal line.

use crate::indicators::series::Series;
use crate::indicators::trend::ema;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Series,
    pub signal: Series,
    pub histogram: Series,
}

/// MACD(fast, slow, signal) over closes. The line is fast-EMA minus
/// slow-EMA where both are computable. The signal line smooths the line's
/// valid subsequence only and scatters the result back, so the slow EMA's
/// warm-up never leaks into the signal's own warm-up arithmetic.
pub fn macd(data: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    if data.is_empty() {
        return MacdSeries {
            line: Series::empty(0),
            signal: Series::empty(0),
            histogram: Series::empty(0),
        };
    }

    let fast_ema = ema(data, fast);
    let slow_ema = ema(data, slow);
    let line = fast_ema.zip_with(&slow_ema, |f, s| f - s);
    let signal = line.map_compact(|vals| ema(vals, signal_period));
    let histogram = line.zip_with(&signal, |l, s| l - s);

    MacdSeries {
        line,
        signal,
        histogram,
    }
}
