//! Signal output types: per-timeframe analysis and the aggregate signal.
//!
//! Every wire type serializes in camelCase. Category results are
//! fixed-field structs (a shared up/down score plus category-specific
//! metadata) rather than open-ended maps, so consumers can rely on the
//! exact shape of each category.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::models::candle::Timeframe;
use crate::models::pair::AssetType;
use crate::models::session::SessionInfo;
use crate::patterns::candlestick::PatternKind;
use crate::patterns::divergence::DivergenceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Buy,
    Sell,
    NoTrade,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Buy => f.write_str("BUY"),
            Direction::Sell => f.write_str("SELL"),
            Direction::NoTrade => f.write_str("NO_TRADE"),
        }
    }
}

/// Market context for one timeframe, derived once from ADX and consumed
/// uniformly by every context-dependent category scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketContext {
    Trending,
    Ranging,
    Unknown,
}

/// Non-negative bullish/bearish contributions. Both sides may be positive
/// at once; a category only "wins" a side via the minimum-margin test.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Score {
    pub up: f64,
    pub down: f64,
}

impl Score {
    pub fn new(up: f64, down: f64) -> Self {
        Self { up, down }
    }

    /// Round both sides to two decimals for reporting.
    pub fn rounded(&self) -> Self {
        Self {
            up: round2(self.up),
            down: round2(self.down),
        }
    }
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Aggregate per-timeframe score with the absolute up/down margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalScore {
    pub up: f64,
    pub down: f64,
    pub diff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendScore {
    #[serde(flatten)]
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumScore {
    #[serde(flatten)]
    pub score: Score,
    pub context: MarketContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdScore {
    #[serde(flatten)]
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochasticScore {
    #[serde(flatten)]
    pub score: Score,
    pub context: MarketContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandsScore {
    #[serde(flatten)]
    pub score: Score,
    pub context: MarketContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdxScore {
    #[serde(flatten)]
    pub score: Score,
    #[serde(serialize_with = "ser_or_none")]
    pub di_cross: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternsScore {
    #[serde(flatten)]
    pub score: Score,
    pub detected: Vec<PatternKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergenceScore {
    #[serde(flatten)]
    pub score: Score,
    #[serde(serialize_with = "ser_or_none")]
    pub rsi: Option<DivergenceKind>,
    pub rsi_confirmed: bool,
    #[serde(serialize_with = "ser_or_none")]
    pub macd: Option<DivergenceKind>,
    pub macd_confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotsScore {
    #[serde(flatten)]
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeScore {
    #[serde(flatten)]
    pub score: Score,
    pub reliable: bool,
}

/// The ten category results a timeframe analysis reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub trend: TrendScore,
    pub momentum: MomentumScore,
    pub macd: MacdScore,
    pub stochastic: StochasticScore,
    pub bands: BandsScore,
    pub adx: AdxScore,
    pub patterns: PatternsScore,
    pub divergence: DivergenceScore,
    pub pivots: PivotsScore,
    pub volume: VolumeScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfluenceDetail {
    pub bullish: u32,
    pub bearish: u32,
    pub total: u32,
}

impl Default for ConfluenceDetail {
    fn default() -> Self {
        Self {
            bullish: 0,
            bearish: 0,
            total: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expiry {
    pub candles: i64,
    pub candle_size: String,
    pub total_minutes: i64,
    pub expiry_time: DateTime<Utc>,
    pub human_readable: String,
    pub next_candle_close: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandleLean {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub price: f64,
    pub candle_time: DateTime<Utc>,
    pub candle_direction: CandleLean,
}

/// EMA stack ordering summary for the snapshot block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmaAlignment {
    Bullish,
    Bearish,
    Mixed,
}

/// Latest indicator values for one timeframe. `None` means the indicator
/// had not warmed up at the final bar.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub ema5: Option<f64>,
    pub ema10: Option<f64>,
    pub ema20: Option<f64>,
    pub sma50: Option<f64>,
    pub ema_alignment: Option<EmaAlignment>,
    pub rsi: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub adx: Option<f64>,
    pub plus_di: Option<f64>,
    pub minus_di: Option<f64>,
    pub williams_r: Option<f64>,
    pub cci: Option<f64>,
    pub mfi: Option<f64>,
    pub atr: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_bandwidth: Option<f64>,
    pub bb_percent_b: Option<f64>,
    pub pivot: Option<f64>,
    pub r1: Option<f64>,
    pub r2: Option<f64>,
    pub s1: Option<f64>,
    pub s2: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HtfPenalty {
    None,
    CounterTrendPenalty,
}

/// Everything the per-timeframe analyzer produces for one candle series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeframeAnalysis {
    pub direction: Direction,
    pub score: DirectionalScore,
    pub confluence: u32,
    pub confluence_detail: ConfluenceDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_scores: Option<CategoryScores>,
    pub volatility_multiplier: f64,
    pub htf_penalty: HtfPenalty,
    pub market_context: MarketContext,
    pub asset_type: AssetType,
    pub timeframe: Timeframe,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub dead_market: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<Expiry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<Entry>,
    #[serde(rename = "higherTFTrend", skip_serializing_if = "Option::is_none")]
    pub higher_tf_trend: Option<Direction>,
    #[serde(rename = "alignedWithHTF")]
    pub aligned_with_htf: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub grade: String,
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alignment {
    AllBullish,
    AllBearish,
    MostlyBullish,
    MostlyBearish,
    Mixed,
    /// Placeholder signals only: no timeframe was analyzable.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketCondition {
    StrongTrend,
    Trending,
    WeakTrend,
    Ranging,
    Squeeze,
    HighVolatility,
    Volatile,
    DeadMarket,
    Normal,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    #[serde(rename = "BUY")]
    pub buy: usize,
    #[serde(rename = "SELL")]
    pub sell: usize,
    #[serde(rename = "NO_TRADE")]
    pub no_trade: usize,
    pub total: usize,
    pub weighted_buy: f64,
    pub weighted_sell: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestTimeframe {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<Timeframe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confluence: Option<u32>,
    #[serde(rename = "alignedWithHTF", skip_serializing_if = "Option::is_none")]
    pub aligned_with_htf: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<Expiry>,
    pub reason: String,
}

/// Divergence summary carried on each recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergenceSummary {
    #[serde(serialize_with = "ser_or_none")]
    pub rsi: Option<DivergenceKind>,
    #[serde(serialize_with = "ser_or_none")]
    pub macd: Option<DivergenceKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub direction: Direction,
    pub score: DirectionalScore,
    pub confluence: String,
    #[serde(rename = "alignedWithHTF")]
    pub aligned_with_htf: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<Expiry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<Entry>,
    pub patterns: Vec<PatternKind>,
    pub divergence: DivergenceSummary,
    #[serde(serialize_with = "ser_or_none")]
    pub di_crossover: Option<String>,
}

/// Final cross-timeframe signal: the engine's one output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSignal {
    pub final_signal: Direction,
    #[serde(serialize_with = "ser_percent")]
    pub confidence: u32,
    pub grade: Grade,
    pub asset_type: AssetType,
    pub market_condition: Vec<MarketCondition>,
    pub alignment: Alignment,
    #[serde(rename = "higherTFTrend", serialize_with = "ser_trend_or_neutral")]
    pub higher_tf_trend: Option<Direction>,
    pub session: SessionInfo,
    pub recommendations: BTreeMap<Timeframe, Recommendation>,
    pub best_timeframe: BestTimeframe,
    pub votes: VoteTally,
    pub average_confluence: f64,
    pub timeframe_analysis: BTreeMap<Timeframe, TimeframeAnalysis>,
    pub method: String,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

fn ser_percent<S: Serializer>(v: &u32, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("{}%", v))
}

fn ser_trend_or_neutral<S: Serializer>(v: &Option<Direction>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(d) => d.serialize(s),
        None => s.serialize_str("NEUTRAL"),
    }
}

/// Serialize an optional tag as its value or the literal `"NONE"`.
fn ser_or_none<S: Serializer, T: Serialize>(v: &Option<T>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(t) => t.serialize(s),
        None => s.serialize_str("NONE"),
    }
}
