//! Market-condition classification from the highest available timeframe.

use crate::config::SignalConfig;
use crate::models::pair::AssetType;
use crate::models::signal::MarketCondition;

/// Tier ADX, Bollinger bandwidth and ATR-percent into condition tags.
/// An empty read (everything unavailable) reports NORMAL.
pub fn detect_market_condition(
    adx: Option<f64>,
    bb_bandwidth: Option<f64>,
    atr: Option<f64>,
    last_close: f64,
    asset: AssetType,
    config: &SignalConfig,
) -> Vec<MarketCondition> {
    let vt = config.volatility(asset);
    let mut conditions = Vec::new();

    if let Some(adx_val) = adx {
        if adx_val >= 40.0 {
            conditions.push(MarketCondition::StrongTrend);
        } else if adx_val >= 25.0 {
            conditions.push(MarketCondition::Trending);
        } else if adx_val >= 15.0 {
            conditions.push(MarketCondition::WeakTrend);
        } else {
            conditions.push(MarketCondition::Ranging);
        }
    }

    if let Some(bw) = bb_bandwidth {
        if bw < vt.bb_squeeze {
            conditions.push(MarketCondition::Squeeze);
        } else if bw > vt.bb_high_vol {
            conditions.push(MarketCondition::HighVolatility);
        }
    }

    if let Some(atr_val) = atr {
        if last_close > 0.0 {
            let atr_pct = atr_val / last_close * 100.0;
            if atr_pct > vt.atr_volatile {
                conditions.push(MarketCondition::Volatile);
            } else if atr_pct < vt.atr_dead_market {
                conditions.push(MarketCondition::DeadMarket);
            }
        }
    }

    if conditions.is_empty() {
        conditions.push(MarketCondition::Normal);
    }
    conditions
}
