//! One-shot computation of every indicator a timeframe analysis needs.

use crate::config::SignalConfig;
use crate::indicators::momentum::{cci, macd, mfi, rsi, stochastic, MacdSeries, StochasticSeries};
use crate::indicators::series::Series;
use crate::indicators::structure::{pivot_points, PivotPoints};
use crate::indicators::trend::{adx, ema, sma, AdxSeries};
use crate::indicators::volatility::{atr, bollinger, BollingerSeries};
use crate::models::candle::Candle;
use crate::patterns::candlestick::{detect_candlestick_patterns, CandlePattern};

/// All indicator series for one candle series, computed once per
/// timeframe and shared by the analyzer, the bias derivation and the
/// market-condition read.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub ema5: Series,
    pub ema10: Series,
    pub ema20: Series,
    pub sma50: Series,
    pub rsi: Series,
    pub macd: MacdSeries,
    pub atr: Series,
    pub bollinger: BollingerSeries,
    pub stochastic: StochasticSeries,
    pub adx: AdxSeries,
    pub williams_r: Series,
    pub cci: Series,
    pub mfi: Series,
    pub pivots: PivotPoints,
    pub patterns: Vec<CandlePattern>,
}

impl IndicatorSet {
    pub fn compute(candles: &[Candle], config: &SignalConfig) -> Self {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let p = &config.periods;

        Self {
            ema5: ema(&closes, 5),
            ema10: ema(&closes, 10),
            ema20: ema(&closes, 20),
            sma50: sma(&closes, 50),
            rsi: rsi(&closes, p.rsi),
            macd: macd(&closes, p.macd_fast, p.macd_slow, p.macd_signal),
            atr: atr(candles, p.atr),
            bollinger: bollinger(&closes, p.bb, p.bb_std_dev),
            stochastic: stochastic(candles, p.stoch, p.stoch_smooth_k, p.stoch_smooth_d),
            adx: adx(candles, p.adx),
            williams_r: crate::indicators::momentum::williams_r(candles, p.williams),
            cci: cci(candles, p.cci),
            mfi: mfi(candles, p.mfi),
            pivots: pivot_points(candles),
            patterns: detect_candlestick_patterns(candles),
        }
    }
}
