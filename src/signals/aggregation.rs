//! Multi-timeframe aggregation: weighted voting, alignment, confidence
//! adjustments and best-timeframe selection.
//!
//! The aggregator is the only component aware of cross-timeframe
//! weighting. It runs in two strict phases: the 15-minute bias is derived
//! first, then every timeframe's analysis consumes it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::config::SignalConfig;
use crate::indicators::IndicatorSet;
use crate::models::candle::{Candle, Timeframe};
use crate::models::pair::AssetType;
use crate::models::session::SessionInfo;
use crate::models::signal::{
    round2, AggregateSignal, Alignment, BestTimeframe, CandleLean, Direction, DivergenceSummary,
    Entry, MarketCondition, Recommendation, TimeframeAnalysis, VoteTally,
};
use crate::signals::analyzer::analyze_timeframe;
use crate::signals::condition::detect_market_condition;
use crate::signals::duration::{candle_duration, expiry_envelope};
use crate::signals::grade::signal_grade;

struct Vote {
    timeframe: Timeframe,
    direction: Direction,
    up: f64,
    down: f64,
    confluence: u32,
}

/// Directional lean of the 15-minute timeframe: requires ADX ≥ 20 plus
/// agreeing EMA5-vs-EMA20 and DI readings, otherwise no bias.
fn higher_tf_bias(indicators: &BTreeMap<Timeframe, IndicatorSet>) -> Option<Direction> {
    let htf = indicators.get(&Timeframe::M15)?;
    let ema5 = htf.ema5.last_value()?;
    let ema20 = htf.ema20.last_value()?;
    let adx = htf.adx.adx.last_value()?;
    if adx < 20.0 {
        return None;
    }
    let plus_di = htf.adx.plus_di.last_value()?;
    let minus_di = htf.adx.minus_di.last_value()?;

    if ema5 > ema20 && plus_di > minus_di {
        Some(Direction::Buy)
    } else if ema5 < ema20 && minus_di > plus_di {
        Some(Direction::Sell)
    } else {
        None
    }
}

/// Aggregate up to three timeframe analyses into the final signal.
/// Degrades gracefully with a partial timeframe set; a missing timeframe
/// is simply absent from the vote.
pub fn aggregate(
    candle_map: &BTreeMap<Timeframe, Vec<Candle>>,
    asset: AssetType,
    session: &SessionInfo,
    exotic: bool,
    now: DateTime<Utc>,
    config: &SignalConfig,
) -> AggregateSignal {
    let indicators: BTreeMap<Timeframe, IndicatorSet> = candle_map
        .iter()
        .filter(|(_, candles)| !candles.is_empty())
        .map(|(tf, candles)| (*tf, IndicatorSet::compute(candles, config)))
        .collect();

    // Phase 1: higher-timeframe bias, before any dependent analysis.
    let higher_tf_trend = higher_tf_bias(&indicators);

    // Phase 2: per-timeframe analysis. The runs are independent given the
    // bias and could execute in parallel with identical results.
    let mut results: BTreeMap<Timeframe, TimeframeAnalysis> = BTreeMap::new();
    let mut votes: Vec<Vote> = Vec::new();

    for (tf, ind) in &indicators {
        let candles = &candle_map[tf];
        let mut analysis =
            analyze_timeframe(candles, ind, *tf, asset, higher_tf_trend, config);

        let duration =
            candle_duration(ind, analysis.direction, candles, *tf, asset, &analysis.score, config);
        analysis.expiry = Some(expiry_envelope(duration, *tf, now));

        let last_candle = &candles[candles.len() - 1];
        analysis.entry = Some(Entry {
            price: last_candle.close,
            candle_time: last_candle.timestamp,
            candle_direction: if last_candle.close >= last_candle.open {
                CandleLean::Bullish
            } else {
                CandleLean::Bearish
            },
        });

        analysis.higher_tf_trend = higher_tf_trend;
        analysis.aligned_with_htf = higher_tf_trend.is_none()
            || analysis.direction == Direction::NoTrade
            || Some(analysis.direction) == higher_tf_trend;

        votes.push(Vote {
            timeframe: *tf,
            direction: analysis.direction,
            up: analysis.score.up,
            down: analysis.score.down,
            confluence: analysis.confluence,
        });
        results.insert(*tf, analysis);
    }

    // Weighted cross-timeframe vote.
    let mut weighted_buy = 0.0;
    let mut weighted_sell = 0.0;
    let mut active: Vec<Direction> = Vec::new();

    for vote in &votes {
        let weight = config.timeframe_weights.get(vote.timeframe);
        match vote.direction {
            Direction::Buy => {
                weighted_buy += weight * if vote.up > 0.0 { vote.up } else { 1.0 };
                active.push(Direction::Buy);
            }
            Direction::Sell => {
                weighted_sell += weight * if vote.down > 0.0 { vote.down } else { 1.0 };
                active.push(Direction::Sell);
            }
            Direction::NoTrade => {}
        }
    }

    let all_buy = !active.is_empty() && active.iter().all(|d| *d == Direction::Buy);
    let all_sell = !active.is_empty() && active.iter().all(|d| *d == Direction::Sell);
    let mut alignment = Alignment::Mixed;
    let mut alignment_bonus = 0i64;

    if all_buy {
        alignment = Alignment::AllBullish;
        alignment_bonus = 15;
    } else if all_sell {
        alignment = Alignment::AllBearish;
        alignment_bonus = 15;
    } else if active.len() >= 2 {
        let buys = active.iter().filter(|d| **d == Direction::Buy).count();
        let sells = active.iter().filter(|d| **d == Direction::Sell).count();
        if buys > sells {
            alignment = Alignment::MostlyBullish;
            alignment_bonus = 7;
        }
        if sells > buys {
            alignment = Alignment::MostlyBearish;
            alignment_bonus = 7;
        }
    }

    // Final direction and raw confidence as the winning share of the
    // combined weighted score.
    let total_weighted = weighted_buy + weighted_sell;
    let (mut final_direction, mut confidence) = if weighted_buy > weighted_sell
        && weighted_buy > 0.0
    {
        (Direction::Buy, share_percent(weighted_buy, total_weighted))
    } else if weighted_sell > weighted_buy && weighted_sell > 0.0 {
        (Direction::Sell, share_percent(weighted_sell, total_weighted))
    } else {
        resolve_tie(&results, config)
    };

    // Confidence adjustment chain, in a fixed order.
    if let Some(bias) = higher_tf_trend {
        if final_direction == bias {
            confidence = (confidence + 5).min(99);
        } else if final_direction != Direction::NoTrade {
            confidence = (confidence - 10).max(30);
        }
    }

    confidence = (confidence + alignment_bonus).min(99);

    if asset == AssetType::Forex {
        match session.quality {
            crate::models::session::SessionQuality::Low => {
                confidence = (confidence - 8).max(25);
            }
            crate::models::session::SessionQuality::Highest => {
                confidence = (confidence + 3).min(99);
            }
            _ => {}
        }
    }

    if exotic {
        confidence = (confidence - config.exotic_confidence_penalty as i64).max(20);
    }

    let avg_confluence = votes.iter().map(|v| v.confluence as f64).sum::<f64>()
        / votes.len().max(1) as f64;
    let grade = signal_grade(confidence.max(0) as u32, avg_confluence, alignment);

    // Market condition reads the highest available timeframe.
    let condition_source = [Timeframe::M15, Timeframe::M5, Timeframe::M1]
        .into_iter()
        .find(|tf| indicators.contains_key(tf));
    let market_condition = match condition_source {
        Some(tf) => {
            let ind = &indicators[&tf];
            let last_close = candle_map[&tf].last().map(|c| c.close).unwrap_or(0.0);
            detect_market_condition(
                ind.adx.adx.last_value(),
                ind.bollinger.bandwidth.last_value(),
                ind.atr.last_value(),
                last_close,
                asset,
                config,
            )
        }
        None => vec![MarketCondition::Unknown],
    };

    // A dead market vetoes anything short of very high conviction.
    if market_condition.contains(&MarketCondition::DeadMarket) && confidence < 75 {
        final_direction = Direction::NoTrade;
        confidence = confidence.min(30);
    }

    let best_timeframe = find_best_timeframe(&results, final_direction);
    let recommendations = build_recommendations(&results);

    let tally = VoteTally {
        buy: votes.iter().filter(|v| v.direction == Direction::Buy).count(),
        sell: votes.iter().filter(|v| v.direction == Direction::Sell).count(),
        no_trade: votes
            .iter()
            .filter(|v| v.direction == Direction::NoTrade)
            .count(),
        total: votes.len(),
        weighted_buy: round2(weighted_buy),
        weighted_sell: round2(weighted_sell),
    };

    AggregateSignal {
        final_signal: final_direction,
        confidence: confidence.clamp(0, 99) as u32,
        grade,
        asset_type: asset,
        market_condition,
        alignment,
        higher_tf_trend,
        session: if asset == AssetType::Forex {
            session.clone()
        } else {
            SessionInfo::always_open()
        },
        recommendations,
        best_timeframe,
        votes: tally,
        average_confluence: (avg_confluence * 10.0).round() / 10.0,
        timeframe_analysis: results,
        method: "WEIGHTED_MULTI_TF".to_string(),
        generated_at: now,
        warning: None,
    }
}

fn share_percent(side: f64, total: f64) -> i64 {
    if total > 0.0 {
        (side / total * 100.0).round() as i64
    } else {
        50
    }
}

/// Tie fallback: re-weigh raw scores and confluence counts together. The
/// side that leads on score must also not trail on weighted confluence,
/// otherwise plain score order decides; a full tie is NO_TRADE at 50.
pub fn resolve_tie(
    results: &BTreeMap<Timeframe, TimeframeAnalysis>,
    config: &SignalConfig,
) -> (Direction, i64) {
    let mut total_up = 0.0;
    let mut total_down = 0.0;
    let mut conf_up = 0.0;
    let mut conf_down = 0.0;

    for (tf, analysis) in results {
        let weight = config.timeframe_weights.get(*tf);
        total_up += analysis.score.up * weight;
        total_down += analysis.score.down * weight;
        conf_up += analysis.confluence_detail.bullish as f64 * weight;
        conf_down += analysis.confluence_detail.bearish as f64 * weight;
    }

    let total = total_up + total_down;
    let pct = |side: f64| {
        if total > 0.0 {
            (side / total * 100.0).round() as i64
        } else {
            50
        }
    };

    if total_up > total_down && conf_up >= conf_down {
        return (Direction::Buy, pct(total_up));
    }
    if total_down > total_up && conf_down >= conf_up {
        return (Direction::Sell, pct(total_down));
    }
    if total_up > total_down {
        return (Direction::Buy, pct(total_up));
    }
    if total_down > total_up {
        return (Direction::Sell, pct(total_down));
    }
    (Direction::NoTrade, 50)
}

/// Among timeframes agreeing with the final direction (or all of them
/// when it is NO_TRADE), pick the highest confluence with a +1 bonus for
/// HTF alignment, tie-broken by raw score; fall back to the single
/// strongest side anywhere.
fn find_best_timeframe(
    results: &BTreeMap<Timeframe, TimeframeAnalysis>,
    final_direction: Direction,
) -> BestTimeframe {
    let mut best: Option<Timeframe> = None;
    let mut best_score = -1.0;
    let mut best_conf = -1i64;

    for (tf, analysis) in results {
        if analysis.direction == final_direction || final_direction == Direction::NoTrade {
            let score = match analysis.direction {
                Direction::Buy => analysis.score.up,
                Direction::Sell => analysis.score.down,
                Direction::NoTrade => 0.0,
            };
            let effective_conf =
                analysis.confluence as i64 + if analysis.aligned_with_htf { 1 } else { 0 };

            if effective_conf > best_conf || (effective_conf == best_conf && score > best_score) {
                best = Some(*tf);
                best_score = score;
                best_conf = effective_conf;
            }
        }
    }

    if best.is_none() {
        for (tf, analysis) in results {
            let score = analysis.score.up.max(analysis.score.down);
            if score > best_score {
                best = Some(*tf);
                best_score = score;
                best_conf = analysis.confluence as i64;
            }
        }
    }

    let Some(tf) = best else {
        return BestTimeframe {
            timeframe: None,
            direction: None,
            score: None,
            confluence: None,
            aligned_with_htf: None,
            expiry: None,
            reason: "No analyzable timeframe".to_string(),
        };
    };

    let analysis = &results[&tf];
    BestTimeframe {
        timeframe: Some(tf),
        direction: Some(analysis.direction),
        score: Some(best_score),
        confluence: Some(analysis.confluence),
        aligned_with_htf: Some(analysis.aligned_with_htf),
        expiry: analysis.expiry.clone(),
        reason: format!(
            "Strongest {} signal with {}/10 confluence{}",
            analysis.direction,
            analysis.confluence,
            if analysis.aligned_with_htf {
                " (aligned with higher TF)"
            } else {
                ""
            }
        ),
    }
}

fn build_recommendations(
    results: &BTreeMap<Timeframe, TimeframeAnalysis>,
) -> BTreeMap<Timeframe, Recommendation> {
    results
        .iter()
        .map(|(tf, analysis)| {
            let (patterns, divergence, di_crossover) = match &analysis.category_scores {
                Some(scores) => (
                    scores.patterns.detected.clone(),
                    DivergenceSummary {
                        rsi: scores.divergence.rsi,
                        macd: scores.divergence.macd,
                    },
                    scores.adx.di_cross.clone(),
                ),
                None => (
                    Vec::new(),
                    DivergenceSummary {
                        rsi: None,
                        macd: None,
                    },
                    None,
                ),
            };

            (
                *tf,
                Recommendation {
                    direction: analysis.direction,
                    score: analysis.score,
                    confluence: format!("{}/10 categories", analysis.confluence),
                    aligned_with_htf: analysis.aligned_with_htf,
                    expiry: analysis.expiry.clone(),
                    entry: analysis.entry.clone(),
                    patterns,
                    divergence,
                    di_crossover,
                },
            )
        })
        .collect()
}
