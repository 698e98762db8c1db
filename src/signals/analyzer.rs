//! Per-timeframe analysis: ten weighted categories, a layered adjustment
//! chain and the final directional decision for one candle series.

use crate::config::SignalConfig;
use crate::indicators::IndicatorSet;
use crate::models::candle::{Candle, Timeframe};
use crate::models::pair::AssetType;
use crate::models::signal::{
    round2, CategoryScores, ConfluenceDetail, Direction, DirectionalScore, EmaAlignment,
    HtfPenalty, IndicatorSnapshot, MarketContext, TimeframeAnalysis,
};
use crate::signals::categories::{self, LastValues};

/// A timeframe is trending when ADX reads 25 or above; without an ADX
/// reading the context is unknown.
pub fn market_context(adx: Option<f64>) -> MarketContext {
    match adx {
        Some(v) if v >= 25.0 => MarketContext::Trending,
        Some(_) => MarketContext::Ranging,
        None => MarketContext::Unknown,
    }
}

/// Run the full category pipeline for one timeframe.
///
/// Two terminal states short-circuit to NO_TRADE before any scoring:
/// missing core trend EMAs ("insufficient data") and an ATR below the
/// asset's tradable floor ("dead market"). Otherwise the ten categories
/// are scored, the volatility multiplier and higher-timeframe penalty are
/// applied in that order, and the decision rule fires.
pub fn analyze_timeframe(
    candles: &[Candle],
    ind: &IndicatorSet,
    timeframe: Timeframe,
    asset: AssetType,
    higher_tf_trend: Option<Direction>,
    config: &SignalConfig,
) -> TimeframeAnalysis {
    let vt = config.volatility(asset);
    let weights = &config.category_weights;
    let last = LastValues::extract(ind);

    let (ema5, ema20) = match (last.ema5, last.ema20) {
        (Some(e5), Some(e20)) => (e5, e20),
        _ => return no_trade_exit(timeframe, asset, "Insufficient data", false),
    };

    let last_candle = &candles[candles.len() - 1];
    let last_close = last_candle.close;
    let context = market_context(last.adx);

    if let Some(atr) = last.atr {
        if last_close > 0.0 {
            let atr_pct = atr / last_close * 100.0;
            if atr_pct < vt.min_tradable_atr {
                return no_trade_exit(timeframe, asset, "Dead market - ATR too low", true);
            }
        }
    }

    let mut up_score = 0.0;
    let mut down_score = 0.0;
    let mut up_cat = 0u32;
    let mut down_cat = 0u32;

    let mut tally = |up: f64, down: f64| {
        up_score += up;
        down_score += down;
        if up > down && (up - down).abs() >= config.min_category_score {
            up_cat += 1;
        } else if down > up && (down - up).abs() >= config.min_category_score {
            down_cat += 1;
        }
    };

    let trend = categories::score_trend(&last, ind, last_close, ema5, ema20, weights.trend);
    tally(trend.score.up, trend.score.down);

    let momentum =
        categories::score_momentum(&last, last_candle, asset, context, weights.momentum);
    tally(momentum.score.up, momentum.score.down);

    let macd = categories::score_macd(&last, weights.macd);
    tally(macd.score.up, macd.score.down);

    let stochastic = categories::score_stochastic(&last, context, weights.stochastic);
    tally(stochastic.score.up, stochastic.score.down);

    let bands = categories::score_bands(&last, last_close, ema5, ema20, context, weights.bands);
    tally(bands.score.up, bands.score.down);

    let adx = categories::score_adx(&last, ind, weights.adx);
    tally(adx.score.up, adx.score.down);

    let patterns =
        categories::score_patterns(ind, last_candle, ema5, ema20, context, weights.patterns);
    tally(patterns.score.up, patterns.score.down);

    let divergence = categories::score_divergence(candles, ind, config, weights.divergence);
    tally(divergence.score.up, divergence.score.down);

    let pivots = categories::score_pivots(ind, &last, last_close, weights.pivots);
    tally(pivots.score.up, pivots.score.down);

    let volume = categories::score_volume(candles, ind, last_candle, asset, weights.volume);
    tally(volume.score.up, volume.score.down);

    // Volatility filter: thin bands scale both sides down before any
    // decision is taken.
    let mut volatility_multiplier = 1.0;
    if let Some(bandwidth) = last.bb_bandwidth {
        if bandwidth < vt.bb_filter_dead {
            volatility_multiplier = 0.4;
        } else if bandwidth < vt.bb_filter_low {
            volatility_multiplier = 0.6;
        } else if bandwidth < vt.bb_filter_med {
            volatility_multiplier = 0.8;
        }
    }
    up_score *= volatility_multiplier;
    down_score *= volatility_multiplier;

    // Counter-trend penalty: a tentative side that disagrees with the
    // higher timeframe loses 30% of its score.
    let mut htf_penalty = HtfPenalty::None;
    if let Some(bias) = higher_tf_trend {
        let tentative = if up_score > down_score {
            Some(Direction::Buy)
        } else if down_score > up_score {
            Some(Direction::Sell)
        } else {
            None
        };
        if let Some(side) = tentative {
            if side != bias {
                htf_penalty = HtfPenalty::CounterTrendPenalty;
                if side == Direction::Buy {
                    up_score *= 0.7;
                } else {
                    down_score *= 0.7;
                }
            }
        }
    }

    let score_diff = (up_score - down_score).abs();
    let confluence = up_cat.max(down_cat);
    let min_score = config.score_threshold(asset);

    let direction = if up_score >= min_score
        && up_score > down_score
        && up_cat >= config.min_confluence
    {
        Direction::Buy
    } else if down_score >= min_score
        && down_score > up_score
        && down_cat >= config.min_confluence
    {
        Direction::Sell
    } else if score_diff >= 2.5 && confluence >= 2 {
        if up_score > down_score {
            Direction::Buy
        } else {
            Direction::Sell
        }
    } else {
        Direction::NoTrade
    };

    let category_scores = CategoryScores {
        trend: rounded(trend),
        momentum: crate::models::signal::MomentumScore {
            score: momentum.score.rounded(),
            context: momentum.context,
        },
        macd: crate::models::signal::MacdScore {
            score: macd.score.rounded(),
        },
        stochastic: crate::models::signal::StochasticScore {
            score: stochastic.score.rounded(),
            context: stochastic.context,
        },
        bands: crate::models::signal::BandsScore {
            score: bands.score.rounded(),
            context: bands.context,
        },
        adx: crate::models::signal::AdxScore {
            score: adx.score.rounded(),
            di_cross: adx.di_cross,
        },
        patterns: crate::models::signal::PatternsScore {
            score: patterns.score.rounded(),
            detected: patterns.detected,
        },
        divergence: crate::models::signal::DivergenceScore {
            score: divergence.score.rounded(),
            ..divergence
        },
        pivots: crate::models::signal::PivotsScore {
            score: pivots.score.rounded(),
        },
        volume: crate::models::signal::VolumeScore {
            score: volume.score.rounded(),
            reliable: volume.reliable,
        },
    };

    TimeframeAnalysis {
        direction,
        score: DirectionalScore {
            up: round2(up_score),
            down: round2(down_score),
            diff: round2(score_diff),
        },
        confluence,
        confluence_detail: ConfluenceDetail {
            bullish: up_cat,
            bearish: down_cat,
            total: 10,
        },
        category_scores: Some(category_scores),
        volatility_multiplier,
        htf_penalty,
        market_context: context,
        asset_type: asset,
        timeframe,
        reason: None,
        dead_market: false,
        indicators: Some(snapshot(&last, ind, ema5, ema20)),
        expiry: None,
        entry: None,
        higher_tf_trend,
        aligned_with_htf: true,
    }
}

fn rounded(trend: crate::models::signal::TrendScore) -> crate::models::signal::TrendScore {
    crate::models::signal::TrendScore {
        score: trend.score.rounded(),
    }
}

fn no_trade_exit(
    timeframe: Timeframe,
    asset: AssetType,
    reason: &str,
    dead_market: bool,
) -> TimeframeAnalysis {
    TimeframeAnalysis {
        direction: Direction::NoTrade,
        score: DirectionalScore {
            up: 0.0,
            down: 0.0,
            diff: 0.0,
        },
        confluence: 0,
        confluence_detail: ConfluenceDetail::default(),
        category_scores: None,
        volatility_multiplier: 0.0,
        htf_penalty: HtfPenalty::None,
        market_context: MarketContext::Unknown,
        asset_type: asset,
        timeframe,
        reason: Some(reason.to_string()),
        dead_market,
        indicators: None,
        expiry: None,
        entry: None,
        higher_tf_trend: None,
        aligned_with_htf: true,
    }
}

fn snapshot(last: &LastValues, ind: &IndicatorSet, ema5: f64, ema20: f64) -> IndicatorSnapshot {
    let ema_alignment = last.ema10.map(|ema10| {
        if ema5 > ema10 && ema10 > ema20 {
            EmaAlignment::Bullish
        } else if ema5 < ema10 && ema10 < ema20 {
            EmaAlignment::Bearish
        } else {
            EmaAlignment::Mixed
        }
    });

    IndicatorSnapshot {
        ema5: last.ema5,
        ema10: last.ema10,
        ema20: last.ema20,
        sma50: last.sma50,
        ema_alignment,
        rsi: last.rsi,
        stoch_k: last.stoch_k,
        stoch_d: last.stoch_d,
        macd_line: last.macd_line,
        macd_signal: last.macd_signal,
        macd_hist: last.macd_hist,
        adx: last.adx,
        plus_di: last.plus_di,
        minus_di: last.minus_di,
        williams_r: last.williams_r,
        cci: last.cci,
        mfi: last.mfi,
        atr: last.atr,
        bb_upper: last.bb_upper,
        bb_middle: last.bb_middle,
        bb_lower: last.bb_lower,
        bb_bandwidth: last.bb_bandwidth,
        bb_percent_b: last.bb_percent_b,
        pivot: ind.pivots.pivot,
        r1: ind.pivots.r1,
        r2: ind.pivots.r2,
        s1: ind.pivots.s1,
        s2: ind.pivots.s2,
    }
}
