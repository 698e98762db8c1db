//! Average Directional Index with +DI / −DI and crossover detection.

use crate::indicators::series::Series;
use crate::models::candle::Candle;
use crate::models::signal::Direction;

/// Aligned ADX output. All three series share the source length; ADX
/// itself needs a second warm-up on top of the DI lines.
#[derive(Debug, Clone, PartialEq)]
pub struct AdxSeries {
    pub adx: Series,
    pub plus_di: Series,
    pub minus_di: Series,
}

/// Wilder running-sum smoothing: seed with the sum of the first `period`
/// deltas, then `sum - sum/period + new` per bar.
fn wilder_sum(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if values.len() <= period {
        return out;
    }
    let mut sum: f64 = values[1..=period].iter().sum();
    out[period] = Some(sum);
    for i in period + 1..values.len() {
        sum = sum - sum / period as f64 + values[i];
        out[i] = Some(sum);
    }
    out
}

/// Directional movement and trend strength. Needs at least
/// `2 * period + 1` candles; otherwise every series is all markers.
pub fn adx(candles: &[Candle], period: usize) -> AdxSeries {
    let n = candles.len();
    if period == 0 || n < period * 2 + 1 {
        return AdxSeries {
            adx: Series::empty(n),
            plus_di: Series::empty(n),
            minus_di: Series::empty(n),
        };
    }

    let mut plus_dm = vec![0.0];
    let mut minus_dm = vec![0.0];
    let mut tr = vec![0.0];
    for i in 1..n {
        let up = candles[i].high - candles[i - 1].high;
        let down = candles[i - 1].low - candles[i].low;
        plus_dm.push(if up > down && up > 0.0 { up } else { 0.0 });
        minus_dm.push(if down > up && down > 0.0 { down } else { 0.0 });
        let h = candles[i].high;
        let l = candles[i].low;
        let pc = candles[i - 1].close;
        tr.push((h - l).max((h - pc).abs()).max((l - pc).abs()));
    }

    let smoothed_tr = wilder_sum(&tr, period);
    let smoothed_plus = wilder_sum(&plus_dm, period);
    let smoothed_minus = wilder_sum(&minus_dm, period);

    let mut plus_di = vec![None; n];
    let mut minus_di = vec![None; n];
    let mut dx = vec![None; n];
    for i in period..n {
        if let (Some(str_), Some(sp), Some(sm)) =
            (smoothed_tr[i], smoothed_plus[i], smoothed_minus[i])
        {
            if str_ > 0.0 {
                let pdi = sp / str_ * 100.0;
                let mdi = sm / str_ * 100.0;
                plus_di[i] = Some(pdi);
                minus_di[i] = Some(mdi);
                let di_sum = pdi + mdi;
                dx[i] = Some(if di_sum > 0.0 {
                    (pdi - mdi).abs() / di_sum * 100.0
                } else {
                    0.0
                });
            }
        }
    }

    // First ADX value is the simple average of the first `period` valid
    // DX readings; afterwards it is Wilder-smoothed.
    let mut adx_vals = vec![None; n];
    let mut dx_sum = 0.0;
    let mut dx_count = 0;
    let mut seed_idx = None;
    for i in period..n {
        if let Some(d) = dx[i] {
            dx_sum += d;
            dx_count += 1;
            if dx_count == period {
                adx_vals[i] = Some(dx_sum / period as f64);
                seed_idx = Some(i);
                break;
            }
        }
    }
    if let Some(start) = seed_idx {
        for i in start + 1..n {
            if let (Some(d), Some(prev)) = (dx[i], adx_vals[i - 1]) {
                adx_vals[i] = Some((prev * (period as f64 - 1.0) + d) / period as f64);
            }
        }
    }

    AdxSeries {
        adx: Series::new(adx_vals),
        plus_di: Series::new(plus_di),
        minus_di: Series::new(minus_di),
    }
}

/// A +DI / −DI crossing between the two most recent valid readings.
#[derive(Debug, Clone, PartialEq)]
pub struct DiCrossover {
    pub kind: &'static str,
    pub direction: Direction,
    pub strength: f64,
}

pub fn detect_di_crossover(adx: &AdxSeries) -> Option<DiCrossover> {
    let (plus_prev, plus_last) = adx.plus_di.last_two();
    let (minus_prev, minus_last) = adx.minus_di.last_two();
    let (pp, pl) = (plus_prev?, plus_last?);
    let (mp, ml) = (minus_prev?, minus_last?);

    if pp <= mp && pl > ml {
        return Some(DiCrossover {
            kind: "BULLISH_DI_CROSS",
            direction: Direction::Buy,
            strength: 1.5,
        });
    }
    if mp <= pp && ml > pl {
        return Some(DiCrossover {
            kind: "BEARISH_DI_CROSS",
            direction: Direction::Sell,
            strength: 1.5,
        });
    }
    None
}
