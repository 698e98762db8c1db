//! Unit tests for multi-timeframe aggregation

use std::collections::BTreeMap;

use chrono::{Duration, TimeZone, Utc};
use signaltrix::config::SignalConfig;
use signaltrix::models::candle::{Candle, Timeframe};
use signaltrix::models::pair::AssetType;
use signaltrix::models::session::SessionInfo;
use signaltrix::models::signal::{
    Alignment, ConfluenceDetail, Direction, DirectionalScore, HtfPenalty, MarketCondition,
    MarketContext, TimeframeAnalysis,
};
use signaltrix::signals::aggregation::{aggregate, resolve_tie};

fn candle(i: usize, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(i as i64);
    Candle::new(open, high, low, close, volume, ts)
}

fn uptrend_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let base = 100.0 + i as f64 * 0.4;
            candle(i, base, base + 0.45, base - 0.05, base + 0.4, 1000.0)
        })
        .collect()
}

fn flat_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| candle(i, 1.1, 1.1, 1.1, 1.1, 0.0))
        .collect()
}

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 6, 14, 0, 0).unwrap()
}

fn all_timeframes(candles: Vec<Candle>) -> BTreeMap<Timeframe, Vec<Candle>> {
    Timeframe::ALL
        .into_iter()
        .map(|tf| (tf, candles.clone()))
        .collect()
}

#[test]
fn test_all_bullish_alignment() {
    let candle_map = all_timeframes(uptrend_candles(60));
    let session = SessionInfo::always_open();
    let config = SignalConfig::default();

    let signal = aggregate(
        &candle_map,
        AssetType::Crypto,
        &session,
        false,
        fixed_now(),
        &config,
    );

    assert_eq!(signal.final_signal, Direction::Buy);
    assert_eq!(signal.alignment, Alignment::AllBullish);
    assert_eq!(signal.higher_tf_trend, Some(Direction::Buy));
    assert_eq!(signal.votes.buy, 3);
    assert_eq!(signal.votes.total, 3);
    // 100% share +5 bias bonus +15 alignment bonus, capped at 99.
    assert_eq!(signal.confidence, 99);
    assert!(signal.votes.weighted_buy > 0.0);
    assert_eq!(signal.votes.weighted_sell, 0.0);
}

#[test]
fn test_dead_market_override() {
    let candle_map = all_timeframes(flat_candles(60));
    let session = SessionInfo::always_open();
    let config = SignalConfig::default();

    let signal = aggregate(
        &candle_map,
        AssetType::Forex,
        &session,
        false,
        fixed_now(),
        &config,
    );

    // Every timeframe exits as a dead market, the unresolved vote ties at
    // 50, and the condition override caps the result at NO_TRADE / 30.
    assert_eq!(signal.final_signal, Direction::NoTrade);
    assert!(signal.market_condition.contains(&MarketCondition::DeadMarket));
    assert_eq!(signal.confidence, 30);
    assert_eq!(signal.votes.no_trade, 3);
}

#[test]
fn test_partial_timeframe_set() {
    let mut candle_map = BTreeMap::new();
    candle_map.insert(Timeframe::M1, uptrend_candles(60));
    let session = SessionInfo::always_open();
    let config = SignalConfig::default();

    let signal = aggregate(
        &candle_map,
        AssetType::Crypto,
        &session,
        false,
        fixed_now(),
        &config,
    );

    // No 15min data: no bias, but the vote still resolves from what is
    // available.
    assert_eq!(signal.higher_tf_trend, None);
    assert_eq!(signal.votes.total, 1);
    assert_eq!(signal.final_signal, Direction::Buy);
    assert_eq!(signal.timeframe_analysis.len(), 1);
    assert!(signal.recommendations.contains_key(&Timeframe::M1));
}

#[test]
fn test_determinism_byte_identical() {
    let candle_map = all_timeframes(uptrend_candles(60));
    let session = SessionInfo::always_open();
    let config = SignalConfig::default();
    let now = fixed_now();

    let a = aggregate(&candle_map, AssetType::Crypto, &session, false, now, &config);
    let b = aggregate(&candle_map, AssetType::Crypto, &session, false, now, &config);

    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_exotic_penalty_applies() {
    let candle_map = all_timeframes(uptrend_candles(60));
    let session = SessionInfo::always_open();
    let config = SignalConfig::default();

    let normal = aggregate(
        &candle_map,
        AssetType::Forex,
        &session,
        false,
        fixed_now(),
        &config,
    );
    let exotic = aggregate(
        &candle_map,
        AssetType::Forex,
        &session,
        true,
        fixed_now(),
        &config,
    );
    assert_eq!(
        exotic.confidence as i64,
        (normal.confidence as i64 - 10).max(20)
    );
}

#[test]
fn test_best_timeframe_matches_final_direction() {
    let candle_map = all_timeframes(uptrend_candles(60));
    let session = SessionInfo::always_open();
    let config = SignalConfig::default();

    let signal = aggregate(
        &candle_map,
        AssetType::Crypto,
        &session,
        false,
        fixed_now(),
        &config,
    );
    let best = &signal.best_timeframe;
    assert_eq!(best.direction, Some(Direction::Buy));
    assert!(best.timeframe.is_some());
    assert!(best.reason.contains("Strongest BUY"));
}

fn bare_analysis(
    tf: Timeframe,
    up: f64,
    down: f64,
    bullish_cats: u32,
    bearish_cats: u32,
) -> TimeframeAnalysis {
    TimeframeAnalysis {
        direction: Direction::NoTrade,
        score: DirectionalScore {
            up,
            down,
            diff: (up - down).abs(),
        },
        confluence: bullish_cats.max(bearish_cats),
        confluence_detail: ConfluenceDetail {
            bullish: bullish_cats,
            bearish: bearish_cats,
            total: 10,
        },
        category_scores: None,
        volatility_multiplier: 1.0,
        htf_penalty: HtfPenalty::None,
        market_context: MarketContext::Unknown,
        asset_type: AssetType::Forex,
        timeframe: tf,
        reason: None,
        dead_market: false,
        indicators: None,
        expiry: None,
        entry: None,
        higher_tf_trend: None,
        aligned_with_htf: true,
    }
}

#[test]
fn test_tie_resolution_prefers_confluence_agreement() {
    let config = SignalConfig::default();
    let mut results = BTreeMap::new();
    // Up leads on score and on weighted confluence.
    results.insert(Timeframe::M1, bare_analysis(Timeframe::M1, 3.0, 1.0, 4, 1));
    let (direction, confidence) = resolve_tie(&results, &config);
    assert_eq!(direction, Direction::Buy);
    assert_eq!(confidence, 75);
}

#[test]
fn test_tie_resolution_score_decides_when_confluence_disagrees() {
    let config = SignalConfig::default();
    let mut results = BTreeMap::new();
    // Up leads on score but bearish categories outnumber bullish ones:
    // the tolerance pass falls through to plain score order.
    results.insert(Timeframe::M1, bare_analysis(Timeframe::M1, 3.0, 1.0, 1, 4));
    let (direction, _) = resolve_tie(&results, &config);
    assert_eq!(direction, Direction::Buy);
}

#[test]
fn test_tie_resolution_full_tie_is_no_trade() {
    let config = SignalConfig::default();
    let mut results = BTreeMap::new();
    results.insert(Timeframe::M1, bare_analysis(Timeframe::M1, 2.0, 2.0, 2, 2));
    let (direction, confidence) = resolve_tie(&results, &config);
    assert_eq!(direction, Direction::NoTrade);
    assert_eq!(confidence, 50);
}
