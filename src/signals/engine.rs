//! Engine facade: the one entry point the service layer calls.

use std::collections::BTreeMap;

use chrono::{DateTime, Timelike, Utc};

use crate::config::SignalConfig;
use crate::models::candle::{Candle, Timeframe};
use crate::models::pair::{AssetType, Pair};
use crate::models::session::SessionInfo;
use crate::models::signal::{
    AggregateSignal, Alignment, BestTimeframe, Direction, Grade, MarketCondition, VoteTally,
};
use crate::signals::aggregation::aggregate;

pub struct SignalEngine;

impl SignalEngine {
    /// Evaluate the full multi-timeframe pipeline. Pure in its inputs:
    /// identical candle maps, session, flags and instant yield a
    /// byte-identical signal.
    pub fn evaluate(
        candle_map: &BTreeMap<Timeframe, Vec<Candle>>,
        asset: AssetType,
        session: &SessionInfo,
        exotic: bool,
        now: DateTime<Utc>,
        config: &SignalConfig,
    ) -> AggregateSignal {
        aggregate(candle_map, asset, session, exotic, now, config)
    }

    /// Clearly-marked placeholder when every timeframe's fetch failed.
    /// Zero reliability; the direction is a deterministic hash of the
    /// request, not an analysis.
    pub fn placeholder_signal(
        pair: &Pair,
        asset: AssetType,
        now: DateTime<Utc>,
    ) -> AggregateSignal {
        let symbol = pair.symbol();
        let seed = (now.minute() as u64
            + symbol.bytes().map(|b| b as u64).sum::<u64>())
            % 10;
        let direction = if seed < 4 {
            Direction::Buy
        } else if seed < 8 {
            Direction::Sell
        } else {
            Direction::NoTrade
        };

        AggregateSignal {
            final_signal: direction,
            confidence: 0,
            grade: Grade {
                grade: "F".to_string(),
                label: "DUMMY".to_string(),
                description: "Fallback - no real data.".to_string(),
            },
            asset_type: asset,
            market_condition: vec![MarketCondition::Unknown],
            alignment: Alignment::None,
            higher_tf_trend: None,
            session: SessionInfo::always_open(),
            recommendations: BTreeMap::new(),
            best_timeframe: BestTimeframe {
                timeframe: None,
                direction: None,
                score: None,
                confluence: None,
                aligned_with_htf: None,
                expiry: None,
                reason: "No analyzable timeframe".to_string(),
            },
            votes: VoteTally {
                buy: 0,
                sell: 0,
                no_trade: 0,
                total: 0,
                weighted_buy: 0.0,
                weighted_sell: 0.0,
            },
            average_confluence: 0.0,
            timeframe_analysis: BTreeMap::new(),
            method: "DUMMY_FALLBACK".to_string(),
            generated_at: now,
            warning: Some("All API calls failed. Zero reliability.".to_string()),
        }
    }
}
