//! Stochastic oscillator with null-safe double smoothing.

use crate::indicators::series::Series;
use crate::indicators::trend::sma;
use crate::models::candle::Candle;

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: Series,
    pub d: Series,
}

/// Stochastic(%K period, %K smoothing, %D smoothing). Raw %K reads 50
/// on a zero-range window. Both smoothing passes run over the valid
/// subsequence only and re-project to original indices; smoothing the
/// null-padded raw series would shrink the valid output window.
pub fn stochastic(
    candles: &[Candle],
    k_period: usize,
    smooth_k: usize,
    smooth_d: usize,
) -> StochasticSeries {
    let n = candles.len();
    if k_period == 0 || n < k_period {
        return StochasticSeries {
            k: Series::empty(n),
            d: Series::empty(n),
        };
    }

    let mut raw_k = vec![None; k_period - 1];
    for i in k_period - 1..n {
        let window = &candles[i + 1 - k_period..=i];
        let hi = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let lo = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let range = hi - lo;
        raw_k.push(Some(if range > 0.0 {
            (candles[i].close - lo) / range * 100.0
        } else {
            50.0
        }));
    }
    let raw_k = Series::new(raw_k);

    let k = raw_k.map_compact(|vals| sma(vals, smooth_k));
    let d = k.map_compact(|vals| sma(vals, smooth_d));

    StochasticSeries { k, d }
}
