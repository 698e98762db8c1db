//! Candle-count duration and expiry envelope for a timeframe signal.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::config::SignalConfig;
use crate::indicators::IndicatorSet;
use crate::models::candle::{Candle, Timeframe};
use crate::models::pair::AssetType;
use crate::models::signal::{Direction, DirectionalScore, Expiry};

/// Base candle count from the asset × timeframe table, nudged by signal
/// strength, oscillator extremity, ATR tier, ADX tier, band squeeze and
/// strong reversal patterns, then clamped to the table's bounds.
pub fn candle_duration(
    ind: &IndicatorSet,
    direction: Direction,
    candles: &[Candle],
    timeframe: Timeframe,
    asset: AssetType,
    score: &DirectionalScore,
    config: &SignalConfig,
) -> i64 {
    let bounds = config.duration(asset, timeframe);
    let vt = config.volatility(asset);
    let mut duration = bounds.base;

    let signal_score = match direction {
        Direction::Buy => score.up,
        Direction::Sell => score.down,
        Direction::NoTrade => 0.0,
    };
    if signal_score >= 8.0 {
        duration += 2;
    } else if signal_score >= 5.0 {
        duration += 1;
    } else if signal_score < 2.0 {
        duration -= 1;
    }

    if let Some(rsi) = ind.rsi.last_value() {
        if rsi > 80.0 || rsi < 20.0 {
            duration -= 2;
        } else if rsi > 70.0 || rsi < 30.0 {
            duration -= 1;
        }
    }

    if let Some(stoch_k) = ind.stochastic.k.last_value() {
        if stoch_k > 90.0 || stoch_k < 10.0 {
            duration -= 1;
        }
    }

    if let Some(atr) = ind.atr.last_value() {
        if let Some(last) = candles.last() {
            if last.close > 0.0 {
                let atr_pct = atr / last.close * 100.0;
                if atr_pct > vt.atr_very_high {
                    duration -= 2;
                } else if atr_pct > vt.atr_high {
                    duration -= 1;
                } else if atr_pct < vt.atr_dead {
                    duration += 2;
                } else if atr_pct < vt.atr_low {
                    duration += 1;
                }
            }
        }
    }

    let adx = ind.adx.adx.last_value();
    if let Some(adx_val) = adx {
        if adx_val >= 40.0 {
            duration += 1;
        } else if adx_val < 15.0 {
            duration -= 1;
        }
    }

    if let Some(bandwidth) = ind.bollinger.bandwidth.last_value() {
        if bandwidth < vt.bb_squeeze {
            duration += 1;
        }
    }

    if ind.patterns.iter().any(|p| p.kind.is_strong_reversal()) {
        duration += 1;
    }

    // Timeframe-specific ADX nudges: a weakly-trending 15min market cuts
    // the hold, a strongly-trending 1min market extends it.
    if timeframe == Timeframe::M15 {
        if let Some(adx_val) = adx {
            if adx_val < 20.0 {
                duration -= 1;
            }
        }
    }
    if timeframe == Timeframe::M1 {
        if let Some(adx_val) = adx {
            if adx_val >= 30.0 {
                duration += 1;
            }
        }
    }

    duration.clamp(bounds.min, bounds.max)
}

/// Build the full expiry envelope for a duration in candles.
pub fn expiry_envelope(duration_candles: i64, timeframe: Timeframe, now: DateTime<Utc>) -> Expiry {
    let candle_minutes = timeframe.minutes();
    let total_minutes = duration_candles * candle_minutes;

    Expiry {
        candles: duration_candles,
        candle_size: format!("{}min", candle_minutes),
        total_minutes,
        expiry_time: now + Duration::minutes(total_minutes),
        human_readable: format_duration(total_minutes),
        next_candle_close: next_candle_close(now, candle_minutes),
    }
}

/// Upcoming close boundary of the currently-forming candle.
pub fn next_candle_close(now: DateTime<Utc>, candle_minutes: i64) -> DateTime<Utc> {
    let ms = candle_minutes * 60_000;
    let slot = now.timestamp_millis().div_euclid(ms);
    Utc.timestamp_millis_opt((slot + 1) * ms).unwrap()
}

pub fn format_duration(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{} min", minutes);
    }
    let hours = minutes / 60;
    let rem = minutes % 60;
    if rem > 0 {
        format!("{}h {}min", hours, rem)
    } else {
        format!("{}h", hours)
    }
}
