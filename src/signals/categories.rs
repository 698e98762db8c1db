//! The ten category scorers behind a timeframe decision.
//!
//! Each scorer returns its weighted up/down contribution plus the
//! category's metadata. Context-dependent categories receive the
//! timeframe's `MarketContext` instead of re-deriving it: trending
//! markets score continuation, ranging markets score mean-reversion.

use crate::config::SignalConfig;
use crate::indicators::IndicatorSet;
use crate::models::candle::Candle;
use crate::models::pair::AssetType;
use crate::models::signal::{
    AdxScore, BandsScore, Direction, DivergenceScore, MacdScore, MarketContext, MomentumScore,
    PatternsScore, PivotsScore, Score, StochasticScore, TrendScore, VolumeScore,
};
use crate::patterns::divergence::{detect_macd_divergence, detect_rsi_divergence};

/// Last-bar indicator readings shared by the scorers, the analyzer's
/// guards and the duration model. `None` marks an indicator that has not
/// warmed up.
#[derive(Debug, Clone, Default)]
pub struct LastValues {
    pub ema5: Option<f64>,
    pub ema10: Option<f64>,
    pub ema20: Option<f64>,
    pub sma50: Option<f64>,
    pub rsi: Option<f64>,
    pub macd_hist: Option<f64>,
    pub prev_macd_hist: Option<f64>,
    pub macd_line: Option<f64>,
    pub prev_macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub atr: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_bandwidth: Option<f64>,
    pub bb_percent_b: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub prev_stoch_k: Option<f64>,
    pub adx: Option<f64>,
    pub prev_adx: Option<f64>,
    pub plus_di: Option<f64>,
    pub minus_di: Option<f64>,
    pub williams_r: Option<f64>,
    pub cci: Option<f64>,
    pub mfi: Option<f64>,
}

impl LastValues {
    pub fn extract(ind: &IndicatorSet) -> Self {
        let (prev_macd_hist, macd_hist) = ind.macd.histogram.last_two();
        let (prev_macd_line, macd_line) = ind.macd.line.last_two();
        let (prev_stoch_k, stoch_k) = ind.stochastic.k.last_two();
        let (prev_adx, adx) = ind.adx.adx.last_two();

        Self {
            ema5: ind.ema5.last_value(),
            ema10: ind.ema10.last_value(),
            ema20: ind.ema20.last_value(),
            sma50: ind.sma50.last_value(),
            rsi: ind.rsi.last_value(),
            macd_hist,
            prev_macd_hist,
            macd_line,
            prev_macd_line,
            macd_signal: ind.macd.signal.last_value(),
            atr: ind.atr.last_value(),
            bb_upper: ind.bollinger.upper.last_value(),
            bb_middle: ind.bollinger.middle.last_value(),
            bb_lower: ind.bollinger.lower.last_value(),
            bb_bandwidth: ind.bollinger.bandwidth.last_value(),
            bb_percent_b: ind.bollinger.percent_b.last_value(),
            stoch_k,
            stoch_d: ind.stochastic.d.last_value(),
            prev_stoch_k,
            adx,
            prev_adx,
            plus_di: ind.adx.plus_di.last_value(),
            minus_di: ind.adx.minus_di.last_value(),
            williams_r: ind.williams_r.last_value(),
            cci: ind.cci.last_value(),
            mfi: ind.mfi.last_value(),
        }
    }
}

/// EMA stack position, close vs SMA50, stack ordering and short EMA slope.
/// `ema5` and `ema20` are guaranteed by the analyzer's early exit.
pub fn score_trend(
    last: &LastValues,
    ind: &IndicatorSet,
    last_close: f64,
    ema5: f64,
    ema20: f64,
    weight: f64,
) -> TrendScore {
    let mut up = 0.0;
    let mut down = 0.0;

    if ema5 > ema20 {
        up += 1.0;
    } else if ema5 < ema20 {
        down += 1.0;
    }
    if let Some(ema10) = last.ema10 {
        if ema10 > ema20 {
            up += 0.5;
        } else if ema10 < ema20 {
            down += 0.5;
        }
    }
    if let Some(sma50) = last.sma50 {
        if last_close > sma50 {
            up += 0.75;
        } else if last_close < sma50 {
            down += 0.75;
        }
    }
    if let Some(ema10) = last.ema10 {
        if ema5 > ema10 && ema10 > ema20 {
            up += 0.75;
        } else if ema5 < ema10 && ema10 < ema20 {
            down += 0.75;
        }
    }
    let ema5_tail = ind.ema5.last_n(3);
    if ema5_tail.len() >= 3 {
        let slope = ema5_tail[2] - ema5_tail[0];
        if slope > 0.0 {
            up += 0.25;
        } else if slope < 0.0 {
            down += 0.25;
        }
    }

    TrendScore {
        score: Score::new(up * weight, down * weight),
    }
}

/// RSI, Williams %R and MFI against context-dependent thresholds: in a
/// trend, strength continues; in a range, extremes revert.
pub fn score_momentum(
    last: &LastValues,
    last_candle: &Candle,
    asset: AssetType,
    context: MarketContext,
    weight: f64,
) -> MomentumScore {
    let mut up = 0.0;
    let mut down = 0.0;

    if let Some(rsi) = last.rsi {
        match context {
            MarketContext::Trending => {
                if (60.0..80.0).contains(&rsi) {
                    up += 1.0;
                } else if (50.0..60.0).contains(&rsi) {
                    up += 0.5;
                } else if rsi > 40.0 && rsi < 50.0 {
                    down += 0.5;
                } else if rsi > 20.0 && rsi <= 40.0 {
                    down += 1.0;
                } else if rsi >= 80.0 {
                    up += 0.3;
                } else if rsi <= 20.0 {
                    down += 0.3;
                }
            }
            MarketContext::Ranging => {
                if rsi >= 75.0 {
                    down += 1.5;
                } else if rsi >= 65.0 {
                    down += 0.75;
                } else if rsi <= 25.0 {
                    up += 1.5;
                } else if rsi <= 35.0 {
                    up += 0.75;
                } else if rsi >= 55.0 {
                    up += 0.25;
                } else if rsi <= 45.0 {
                    down += 0.25;
                }
            }
            MarketContext::Unknown => {
                if rsi >= 75.0 {
                    down += 1.0;
                } else if rsi >= 60.0 {
                    up += 0.5;
                } else if rsi <= 25.0 {
                    up += 1.0;
                } else if rsi <= 40.0 {
                    down += 0.5;
                }
            }
        }
    }

    if let Some(wr) = last.williams_r {
        if context == MarketContext::Trending {
            if wr > -30.0 {
                up += 0.3;
            } else if wr < -70.0 {
                down += 0.3;
            }
        } else if wr > -20.0 {
            down += 0.5;
        } else if wr < -80.0 {
            up += 0.5;
        } else if wr > -50.0 {
            up += 0.25;
        } else {
            down += 0.25;
        }
    }

    if let Some(mfi) = last.mfi {
        let has_volume = asset == AssetType::Crypto || last_candle.volume > 0.0;
        if has_volume {
            if mfi >= 80.0 {
                down += 0.5;
            } else if mfi <= 20.0 {
                up += 0.5;
            } else if mfi >= 55.0 {
                up += 0.25;
            } else if mfi <= 45.0 {
                down += 0.25;
            }
        }
    }

    MomentumScore {
        score: Score::new(up * weight, down * weight),
        context,
    }
}

/// Histogram sign and acceleration, line-vs-signal position and
/// zero-line crossover.
pub fn score_macd(last: &LastValues, weight: f64) -> MacdScore {
    let mut up = 0.0;
    let mut down = 0.0;

    if let Some(hist) = last.macd_hist {
        if hist > 0.0 {
            up += 0.75;
        } else if hist < 0.0 {
            down += 0.75;
        }
        if let Some(prev) = last.prev_macd_hist {
            if hist > 0.0 && hist > prev {
                up += 0.4;
            } else if hist < 0.0 && hist < prev {
                down += 0.4;
            } else if hist > 0.0 && hist < prev {
                up += 0.1;
            } else if hist < 0.0 && hist > prev {
                down += 0.1;
            }
        }
    }

    if let (Some(line), Some(signal)) = (last.macd_line, last.macd_signal) {
        if line > signal {
            up += 0.5;
        } else if line < signal {
            down += 0.5;
        }
        if let Some(prev_line) = last.prev_macd_line {
            if prev_line <= 0.0 && line > 0.0 {
                up += 0.5;
            } else if prev_line >= 0.0 && line < 0.0 {
                down += 0.5;
            }
        }
    }

    MacdScore {
        score: Score::new(up * weight, down * weight),
    }
}

/// Trend-continuation pullback logic when trending; overbought/oversold
/// mean-reversion when not.
pub fn score_stochastic(last: &LastValues, context: MarketContext, weight: f64) -> StochasticScore {
    let mut up = 0.0;
    let mut down = 0.0;

    if let (Some(k), Some(d)) = (last.stoch_k, last.stoch_d) {
        if context == MarketContext::Trending {
            if k > d && k > 40.0 && k < 70.0 {
                up += 0.75;
            } else if k < d && k > 30.0 && k < 60.0 {
                down += 0.75;
            }
            if let Some(prev_k) = last.prev_stoch_k {
                if prev_k < 30.0 && k > 30.0 && k > d {
                    up += 0.75;
                }
                if prev_k > 70.0 && k < 70.0 && k < d {
                    down += 0.75;
                }
            }
        } else {
            if k > 80.0 && d > 80.0 {
                down += 0.75;
            } else if k < 20.0 && d < 20.0 {
                up += 0.75;
            }
            if k > d {
                up += 0.5;
            } else if k < d {
                down += 0.5;
            }
            if let Some(prev_k) = last.prev_stoch_k {
                if k > prev_k {
                    up += 0.25;
                } else if k < prev_k {
                    down += 0.25;
                }
            }
            if k < 20.0 && k > d {
                up += 0.5;
            }
            if k > 80.0 && k < d {
                down += 0.5;
            }
        }
    }

    StochasticScore {
        score: Score::new(up * weight, down * weight),
        context: two_way_context(context),
    }
}

/// Band breakout-continuation when trending, reversion-at-band when not;
/// CCI extremes read oppositely depending on context.
pub fn score_bands(
    last: &LastValues,
    last_close: f64,
    ema5: f64,
    ema20: f64,
    context: MarketContext,
    weight: f64,
) -> BandsScore {
    let mut up = 0.0;
    let mut down = 0.0;

    if let (Some(bb_upper), Some(bb_lower), Some(bb_middle)) =
        (last.bb_upper, last.bb_lower, last.bb_middle)
    {
        if context == MarketContext::Trending {
            if last_close >= bb_upper {
                if ema5 > ema20 {
                    up += 0.75;
                } else {
                    down += 0.5;
                }
            } else if last_close <= bb_lower {
                if ema5 < ema20 {
                    down += 0.75;
                } else {
                    up += 0.5;
                }
            } else if last_close > bb_middle {
                up += 0.25;
            } else if last_close < bb_middle {
                down += 0.25;
            }
        } else if last_close >= bb_upper {
            down += 1.0;
        } else if last_close <= bb_lower {
            up += 1.0;
        } else if last_close > bb_middle {
            up += 0.25;
        } else if last_close < bb_middle {
            down += 0.25;
        }

        if let Some(percent_b) = last.bb_percent_b {
            if context != MarketContext::Trending {
                if percent_b > 1.0 {
                    down += 0.5;
                } else if percent_b < 0.0 {
                    up += 0.5;
                }
            } else if percent_b > 1.0 && ema5 > ema20 {
                up += 0.25;
            } else if percent_b < 0.0 && ema5 < ema20 {
                down += 0.25;
            }
        }
    }

    if let Some(cci) = last.cci {
        if context == MarketContext::Trending {
            if cci > 150.0 {
                up += 0.5;
            } else if cci > 100.0 {
                up += 0.35;
            } else if cci < -150.0 {
                down += 0.5;
            } else if cci < -100.0 {
                down += 0.35;
            }
        } else if cci > 150.0 {
            down += 0.5;
        } else if cci > 100.0 {
            down += 0.35;
        } else if cci < -150.0 {
            up += 0.5;
        } else if cci < -100.0 {
            up += 0.35;
        } else if cci > 50.0 {
            up += 0.15;
        } else if cci < -50.0 {
            down += 0.15;
        }
    }

    BandsScore {
        score: Score::new(up * weight, down * weight),
        context: two_way_context(context),
    }
}

/// DI dominance, trend-strength boost, rising/falling ADX adjustment and
/// the DI-crossover sub-detector.
pub fn score_adx(last: &LastValues, ind: &IndicatorSet, weight: f64) -> AdxScore {
    let mut up = 0.0;
    let mut down = 0.0;
    let mut di_cross = None;

    if let (Some(adx), Some(plus_di), Some(minus_di)) = (last.adx, last.plus_di, last.minus_di) {
        if plus_di > minus_di {
            up += 0.75;
        } else if minus_di > plus_di {
            down += 0.75;
        }
        if adx >= 25.0 {
            if plus_di > minus_di {
                up += 0.75;
            } else {
                down += 0.75;
            }
        }
        if let Some(prev_adx) = last.prev_adx {
            if adx > prev_adx && adx >= 20.0 {
                if plus_di > minus_di {
                    up += 0.5;
                } else {
                    down += 0.5;
                }
            } else if adx < prev_adx && adx < 25.0 {
                up *= 0.7;
                down *= 0.7;
            }
        }
        if let Some(cross) = crate::indicators::trend::detect_di_crossover(&ind.adx) {
            match cross.direction {
                Direction::Buy => up += cross.strength,
                Direction::Sell => down += cross.strength,
                _ => {}
            }
            di_cross = Some(cross.kind.to_string());
        }
    }

    AdxScore {
        score: Score::new(up * weight, down * weight),
        di_cross,
    }
}

/// Detected pattern strengths, trend-adjusted (continuation ×1.3,
/// counter-trend ×0.6) and capped at 3.0 per side, plus a large-body
/// bonus on the final candle.
pub fn score_patterns(
    ind: &IndicatorSet,
    last_candle: &Candle,
    ema5: f64,
    ema20: f64,
    context: MarketContext,
    weight: f64,
) -> PatternsScore {
    let mut up = 0.0;
    let mut down = 0.0;

    for pattern in &ind.patterns {
        let mut strength = pattern.strength;
        if context == MarketContext::Trending {
            let is_continuation = (pattern.direction == Direction::Buy
                && ema5 > ema20)
                || (pattern.direction == Direction::Sell && ema5 < ema20);
            strength *= if is_continuation { 1.3 } else { 0.6 };
        }
        match pattern.direction {
            Direction::Buy => up += strength,
            Direction::Sell => down += strength,
            _ => {}
        }
    }

    let body = (last_candle.close - last_candle.open).abs();
    if body / last_candle.range() > 0.6 {
        if last_candle.close > last_candle.open {
            up += 0.5;
        } else {
            down += 0.5;
        }
    }

    up = up.min(3.0);
    down = down.min(3.0);

    PatternsScore {
        score: Score::new(up * weight, down * weight),
        detected: ind.patterns.iter().map(|p| p.kind).collect(),
    }
}

/// RSI and MACD divergence strengths (the detector already halves
/// unconfirmed ones), capped at 2.5 per side.
pub fn score_divergence(
    candles: &[Candle],
    ind: &IndicatorSet,
    config: &SignalConfig,
    weight: f64,
) -> DivergenceScore {
    let rsi_div = detect_rsi_divergence(
        candles,
        &ind.rsi,
        config.divergence_lookback,
        config.divergence_min_bars,
    );
    let macd_div = detect_macd_divergence(candles, &ind.macd.histogram, config.divergence_lookback);

    let mut up = 0.0;
    let mut down = 0.0;
    for div in [&rsi_div, &macd_div].into_iter().flatten() {
        match div.direction {
            Direction::Buy => up += div.strength,
            Direction::Sell => down += div.strength,
            _ => {}
        }
    }
    up = up.min(2.5);
    down = down.min(2.5);

    DivergenceScore {
        score: Score::new(up * weight, down * weight),
        rsi: rsi_div.as_ref().map(|d| d.kind),
        rsi_confirmed: rsi_div.as_ref().map(|d| d.confirmed).unwrap_or(false),
        macd: macd_div.as_ref().map(|d| d.kind),
        macd_confirmed: macd_div.as_ref().map(|d| d.confirmed).unwrap_or(false),
    }
}

/// Side-of-pivot bias plus proximity bonuses within half an ATR (or
/// 0.2 percent of price when ATR is unavailable), capped at 2.0 per side.
pub fn score_pivots(
    ind: &IndicatorSet,
    last: &LastValues,
    last_close: f64,
    weight: f64,
) -> PivotsScore {
    let mut up: f64 = 0.0;
    let mut down: f64 = 0.0;
    let pivots = &ind.pivots;

    if let Some(pivot) = pivots.pivot {
        if last_close > pivot {
            up += 0.5;
        } else if last_close < pivot {
            down += 0.5;
        }

        let proximity = match last.atr {
            Some(atr) => atr * 0.5,
            None => last_close * 0.002,
        };

        if let Some(s1) = pivots.s1 {
            if (last_close - s1).abs() < proximity {
                up += 0.75;
            }
        }
        if let Some(s2) = pivots.s2 {
            if (last_close - s2).abs() < proximity {
                up += 1.0;
            }
        }
        if let Some(r1) = pivots.r1 {
            if (last_close - r1).abs() < proximity {
                down += 0.75;
            }
        }
        if let Some(r2) = pivots.r2 {
            if (last_close - r2).abs() < proximity {
                down += 1.0;
            }
        }

        if let Some(r1) = pivots.r1 {
            if last_close > pivot && last_close < r1 {
                up += 0.25;
            }
        }
        if let Some(s1) = pivots.s1 {
            if last_close < pivot && last_close > s1 {
                down += 0.25;
            }
        }
    }

    up = up.min(2.0);
    down = down.min(2.0);

    PivotsScore {
        score: Score::new(up * weight, down * weight),
    }
}

/// Spike-vs-average, 5-bar momentum and pattern confirmation, active
/// only when volume is reliable (crypto always; forex when any of the
/// last 20 candles report volume).
pub fn score_volume(
    candles: &[Candle],
    ind: &IndicatorSet,
    last_candle: &Candle,
    asset: AssetType,
    weight: f64,
) -> VolumeScore {
    let mut up = 0.0;
    let mut down = 0.0;

    let reliable = asset == AssetType::Crypto
        || (candles.len() >= 20
            && candles[candles.len() - 20..].iter().any(|c| c.volume > 0.0));

    if reliable && candles.len() >= 20 {
        let recent = &candles[candles.len() - 20..];
        let avg = recent.iter().map(|c| c.volume).sum::<f64>() / recent.len() as f64;

        if avg > 0.0 && last_candle.volume > avg * 1.5 {
            if last_candle.close > last_candle.open {
                up += 0.75;
            } else if last_candle.close < last_candle.open {
                down += 0.75;
            }
        }

        if candles.len() >= 5 {
            let tail = &candles[candles.len() - 5..];
            let avg_recent = (tail[3].volume + tail[4].volume) / 2.0;
            let avg_older = (tail[0].volume + tail[1].volume) / 2.0;
            if avg_older > 0.0 && avg_recent > avg_older * 1.2 {
                if last_candle.close > candles[candles.len() - 5].close {
                    up += 0.25;
                } else {
                    down += 0.25;
                }
            }
        }

        if !ind.patterns.is_empty() && avg > 0.0 && last_candle.volume > avg * 1.3 {
            for pattern in &ind.patterns {
                match pattern.direction {
                    Direction::Buy => up += 0.15,
                    Direction::Sell => down += 0.15,
                    _ => {}
                }
            }
        }
    }

    VolumeScore {
        score: Score::new(up * weight, down * weight),
        reliable,
    }
}

/// Stochastic and band scorers treat an unknown context as ranging; the
/// reported metadata collapses the same way.
fn two_way_context(context: MarketContext) -> MarketContext {
    if context == MarketContext::Trending {
        MarketContext::Trending
    } else {
        MarketContext::Ranging
    }
}
