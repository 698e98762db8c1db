//! Bollinger Bands with bandwidth and %B.

use crate::indicators::series::Series;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
    /// Band spread as a percentage of the middle band; 0 when the mean is
    /// not positive.
    pub bandwidth: Series,
    /// Close position within the band; 0.5 on a zero-width band and
    /// unbounded outside [0, 1] by design of the measure.
    pub percent_b: Series,
}

/// Bollinger(period, mult) over closes using the population standard
/// deviation.
pub fn bollinger(data: &[f64], period: usize, mult: f64) -> BollingerSeries {
    let n = data.len();
    let mut upper = vec![None; n];
    let mut middle = vec![None; n];
    let mut lower = vec![None; n];
    let mut bandwidth = vec![None; n];
    let mut percent_b = vec![None; n];

    if period > 0 {
        for i in period.saturating_sub(1)..n {
            let window = &data[i + 1 - period..=i];
            let mean = window.iter().sum::<f64>() / period as f64;
            let variance =
                window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
            let sd = variance.sqrt();

            let up = mean + mult * sd;
            let lo = mean - mult * sd;
            middle[i] = Some(mean);
            upper[i] = Some(up);
            lower[i] = Some(lo);
            bandwidth[i] = Some(if mean > 0.0 {
                (up - lo) / mean * 100.0
            } else {
                0.0
            });
            let range = up - lo;
            percent_b[i] = Some(if range > 0.0 {
                (data[i] - lo) / range
            } else {
                0.5
            });
        }
    }

    BollingerSeries {
        upper: Series::new(upper),
        middle: Series::new(middle),
        lower: Series::new(lower),
        bandwidth: Series::new(bandwidth),
        percent_b: Series::new(percent_b),
    }
}
