//! Unit tests for the per-timeframe analyzer

use chrono::{Duration, TimeZone, Utc};
use signaltrix::config::SignalConfig;
use signaltrix::indicators::IndicatorSet;
use signaltrix::models::candle::{Candle, Timeframe};
use signaltrix::models::pair::AssetType;
use signaltrix::models::signal::{Direction, MarketContext};
use signaltrix::signals::analyze_timeframe;

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

fn analyze(
    candles: &[Candle],
    asset: AssetType,
    bias: Option<Direction>,
) -> signaltrix::models::signal::TimeframeAnalysis {
    let config = SignalConfig::default();
    let ind = IndicatorSet::compute(candles, &config);
    analyze_timeframe(candles, &ind, Timeframe::M5, asset, bias, &config)
}

#[test]
fn test_insufficient_data_exit() {
    let candles = uptrend_candles(10);
    let analysis = analyze(&candles, AssetType::Forex, None);
    assert_eq!(analysis.direction, Direction::NoTrade);
    assert_eq!(analysis.reason.as_deref(), Some("Insufficient data"));
    assert!(!analysis.dead_market);
    assert_eq!(analysis.confluence, 0);
    assert!(analysis.category_scores.is_none());
}

#[test]
fn test_dead_market_exit() {
    // High, low and close pinned together for the whole series: ATR as a
    // percentage of price sits below the forex tradable floor.
    let candles = flat_candles(60);
    let analysis = analyze(&candles, AssetType::Forex, None);
    assert_eq!(analysis.direction, Direction::NoTrade);
    assert!(analysis.dead_market);
    assert!(analysis
        .reason
        .as_deref()
        .unwrap()
        .contains("Dead market"));
}

#[test]
fn test_strong_uptrend_is_a_buy() {
    let candles = uptrend_candles(60);
    let analysis = analyze(&candles, AssetType::Crypto, None);
    assert_eq!(analysis.direction, Direction::Buy);
    assert!(analysis.score.up > analysis.score.down);
    assert!(analysis.confluence >= 3);
    assert_eq!(analysis.market_context, MarketContext::Trending);
    let scores = analysis.category_scores.as_ref().unwrap();
    assert!(scores.trend.score.up > scores.trend.score.down);
    assert!(scores.adx.score.up > scores.adx.score.down);
}

#[test]
fn test_confluence_bounded_by_category_count() {
    let candles = uptrend_candles(60);
    let analysis = analyze(&candles, AssetType::Crypto, None);
    assert!(analysis.confluence <= 10);
    let detail = analysis.confluence_detail;
    assert!(detail.bullish + detail.bearish <= 10);
    assert_eq!(detail.total, 10);
}

#[test]
fn test_counter_trend_penalty_reduces_score() {
    let candles = uptrend_candles(60);
    let unbiased = analyze(&candles, AssetType::Crypto, None);
    let opposed = analyze(&candles, AssetType::Crypto, Some(Direction::Sell));
    // The tentative BUY side loses 30% against a SELL bias.
    assert!(opposed.score.up < unbiased.score.up);
    let ratio = opposed.score.up / unbiased.score.up;
    assert!((ratio - 0.7).abs() < 0.02);
    assert_eq!(
        opposed.htf_penalty,
        signaltrix::models::signal::HtfPenalty::CounterTrendPenalty
    );
}

#[test]
fn test_aligned_bias_leaves_score_untouched() {
    let candles = uptrend_candles(60);
    let unbiased = analyze(&candles, AssetType::Crypto, None);
    let aligned = analyze(&candles, AssetType::Crypto, Some(Direction::Buy));
    assert_eq!(aligned.score.up, unbiased.score.up);
    assert_eq!(
        aligned.htf_penalty,
        signaltrix::models::signal::HtfPenalty::None
    );
}

#[test]
fn test_forex_zero_volume_skips_volume_category() {
    // Forex feed with no volume at all: the volume category must report
    // unreliable and contribute nothing.
    let candles: Vec<Candle> = (0..60)
        .map(|i| {
            let base = 100.0 + i as f64 * 0.4;
            candle(i, base, base + 0.45, base - 0.05, base + 0.4, 0.0)
        })
        .collect();
    let analysis = analyze(&candles, AssetType::Forex, None);
    let scores = analysis.category_scores.as_ref().unwrap();
    assert!(!scores.volume.reliable);
    assert_eq!(scores.volume.score.up, 0.0);
    assert_eq!(scores.volume.score.down, 0.0);
}

#[test]
fn test_snapshot_present_after_full_analysis() {
    let candles = uptrend_candles(60);
    let analysis = analyze(&candles, AssetType::Crypto, None);
    let snapshot = analysis.indicators.as_ref().unwrap();
    assert!(snapshot.ema5.unwrap() > snapshot.ema20.unwrap());
    assert!(snapshot.rsi.is_some());
    assert!(snapshot.adx.is_some());
    assert!(snapshot.pivot.is_some());
}
