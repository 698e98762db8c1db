//! Engine configuration: indicator periods, category weights, volatility
//! tiers and duration tables.
//!
//! Every threshold the pipeline consults lives here as a named field with
//! the production default. The config is immutable and threaded through
//! every component call, so tests and per-asset tuning never touch shared
//! state. The numeric defaults are hand-tuned; treat absolute output
//! values as uncalibrated until backtested.

use crate::models::candle::Timeframe;
use crate::models::pair::AssetType;

/// Per-category multipliers applied to raw category scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryWeights {
    pub trend: f64,
    pub momentum: f64,
    pub macd: f64,
    pub stochastic: f64,
    pub bands: f64,
    pub adx: f64,
    pub patterns: f64,
    pub divergence: f64,
    pub pivots: f64,
    pub volume: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            trend: 1.8,
            momentum: 1.4,
            macd: 1.2,
            stochastic: 1.0,
            bands: 1.0,
            adx: 1.3,
            patterns: 1.1,
            divergence: 1.5,
            pivots: 0.8,
            volume: 0.5,
        }
    }
}

/// Cross-timeframe vote weights. Higher timeframes dominate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeframeWeights {
    pub m1: f64,
    pub m5: f64,
    pub m15: f64,
}

impl TimeframeWeights {
    pub fn get(&self, tf: Timeframe) -> f64 {
        match tf {
            Timeframe::M1 => self.m1,
            Timeframe::M5 => self.m5,
            Timeframe::M15 => self.m15,
        }
    }
}

impl Default for TimeframeWeights {
    fn default() -> Self {
        Self {
            m1: 1.0,
            m5: 2.0,
            m15: 3.0,
        }
    }
}

/// ATR-percent and Bollinger-bandwidth tiers for one asset class. ATR tiers are
/// percentages of price; bandwidth tiers are the Bollinger bandwidth
/// itself (already a percentage of the middle band).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityThresholds {
    pub atr_very_high: f64,
    pub atr_high: f64,
    pub atr_low: f64,
    pub atr_dead: f64,
    pub atr_volatile: f64,
    pub atr_dead_market: f64,
    pub bb_squeeze: f64,
    pub bb_high_vol: f64,
    pub bb_filter_dead: f64,
    pub bb_filter_low: f64,
    pub bb_filter_med: f64,
    pub min_tradable_atr: f64,
}

impl VolatilityThresholds {
    pub fn forex() -> Self {
        Self {
            atr_very_high: 0.20,
            atr_high: 0.10,
            atr_low: 0.05,
            atr_dead: 0.02,
            atr_volatile: 0.20,
            atr_dead_market: 0.02,
            bb_squeeze: 0.05,
            bb_high_vol: 0.50,
            bb_filter_dead: 0.03,
            bb_filter_low: 0.05,
            bb_filter_med: 0.08,
            min_tradable_atr: 0.015,
        }
    }

    pub fn crypto() -> Self {
        Self {
            atr_very_high: 5.0,
            atr_high: 3.0,
            atr_low: 1.0,
            atr_dead: 0.3,
            atr_volatile: 5.0,
            atr_dead_market: 0.3,
            bb_squeeze: 2.0,
            bb_high_vol: 10.0,
            bb_filter_dead: 1.0,
            bb_filter_low: 2.0,
            bb_filter_med: 3.0,
            min_tradable_atr: 0.1,
        }
    }
}

/// Candle-count bounds for signal duration on one asset × timeframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationBounds {
    pub base: i64,
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationTable {
    pub m1: DurationBounds,
    pub m5: DurationBounds,
    pub m15: DurationBounds,
}

impl DurationTable {
    pub fn get(&self, tf: Timeframe) -> DurationBounds {
        match tf {
            Timeframe::M1 => self.m1,
            Timeframe::M5 => self.m5,
            Timeframe::M15 => self.m15,
        }
    }

    fn forex() -> Self {
        Self {
            m1: DurationBounds {
                base: 5,
                min: 2,
                max: 15,
            },
            m5: DurationBounds {
                base: 3,
                min: 1,
                max: 8,
            },
            m15: DurationBounds {
                base: 2,
                min: 1,
                max: 4,
            },
        }
    }

    fn crypto() -> Self {
        Self {
            m1: DurationBounds {
                base: 4,
                min: 1,
                max: 12,
            },
            m5: DurationBounds {
                base: 3,
                min: 1,
                max: 6,
            },
            m15: DurationBounds {
                base: 2,
                min: 1,
                max: 4,
            },
        }
    }
}

/// Indicator periods. Changing one changes the warm-up window of the
/// matching series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPeriods {
    pub rsi: usize,
    pub atr: usize,
    pub stoch: usize,
    pub stoch_smooth_k: usize,
    pub stoch_smooth_d: usize,
    pub adx: usize,
    pub cci: usize,
    pub mfi: usize,
    pub williams: usize,
    pub bb: usize,
    pub bb_std_dev: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        Self {
            rsi: 14,
            atr: 14,
            stoch: 14,
            stoch_smooth_k: 3,
            stoch_smooth_d: 3,
            adx: 14,
            cci: 20,
            mfi: 14,
            williams: 14,
            bb: 20,
            bb_std_dev: 2.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    pub periods: IndicatorPeriods,
    pub category_weights: CategoryWeights,
    pub timeframe_weights: TimeframeWeights,
    /// Categories that must win their margin test before a threshold
    /// decision is allowed.
    pub min_confluence: u32,
    /// Minimum up/down margin for a category to count toward confluence.
    pub min_category_score: f64,
    pub divergence_lookback: usize,
    pub divergence_min_bars: usize,
    pub forex_score_threshold: f64,
    pub crypto_score_threshold: f64,
    pub forex_volatility: VolatilityThresholds,
    pub crypto_volatility: VolatilityThresholds,
    pub forex_duration: DurationTable,
    pub crypto_duration: DurationTable,
    pub exotic_confidence_penalty: u32,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            periods: IndicatorPeriods::default(),
            category_weights: CategoryWeights::default(),
            timeframe_weights: TimeframeWeights::default(),
            min_confluence: 3,
            min_category_score: 0.3,
            divergence_lookback: 30,
            divergence_min_bars: 5,
            forex_score_threshold: 3.0,
            crypto_score_threshold: 2.5,
            forex_volatility: VolatilityThresholds::forex(),
            crypto_volatility: VolatilityThresholds::crypto(),
            forex_duration: DurationTable::forex(),
            crypto_duration: DurationTable::crypto(),
            exotic_confidence_penalty: 10,
        }
    }
}

impl SignalConfig {
    pub fn volatility(&self, asset: AssetType) -> &VolatilityThresholds {
        match asset {
            AssetType::Forex => &self.forex_volatility,
            AssetType::Crypto => &self.crypto_volatility,
        }
    }

    pub fn score_threshold(&self, asset: AssetType) -> f64 {
        match asset {
            AssetType::Forex => self.forex_score_threshold,
            AssetType::Crypto => self.crypto_score_threshold,
        }
    }

    pub fn duration(&self, asset: AssetType, tf: Timeframe) -> DurationBounds {
        match asset {
            AssetType::Forex => self.forex_duration.get(tf),
            AssetType::Crypto => self.crypto_duration.get(tf),
        }
    }
}

/// Deployment environment, read once per process from `ENVIRONMENT`.
pub fn get_environment() -> String {
    std::env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}
