//! Trading-session detection and the forex market calendar.
//!
//! Session quality feeds the aggregator's forex confidence adjustment;
//! the open/closed calendar gates the HTTP signal handler.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionQuality {
    Low,
    Medium,
    High,
    Highest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub sessions: Vec<String>,
    pub overlap: String,
    pub quality: SessionQuality,
    pub hour: u32,
}

impl SessionInfo {
    /// Session descriptor for crypto pairs, which trade around the clock.
    pub fn always_open() -> Self {
        Self {
            sessions: vec!["24/7".to_string()],
            overlap: "NONE".to_string(),
            quality: SessionQuality::High,
            hour: 0,
        }
    }
}

/// Classify the active sessions and overall liquidity quality for a UTC
/// instant.
pub fn detect_trading_session(now: DateTime<Utc>) -> SessionInfo {
    let hour = now.hour();
    let mut sessions = Vec::new();

    if hour < 9 {
        sessions.push("ASIAN".to_string());
    }
    if (7..16).contains(&hour) {
        sessions.push("LONDON".to_string());
    }
    if (12..21).contains(&hour) {
        sessions.push("NEW_YORK".to_string());
    }
    if hour >= 21 || hour < 6 {
        sessions.push("SYDNEY".to_string());
    }

    let has = |name: &str| sessions.iter().any(|s| s == name);
    let overlap = if has("LONDON") && has("NEW_YORK") {
        "LONDON_NY"
    } else if has("ASIAN") && has("LONDON") {
        "ASIAN_LONDON"
    } else {
        "NONE"
    };

    let quality = if overlap == "LONDON_NY" {
        SessionQuality::Highest
    } else if has("LONDON") || has("NEW_YORK") {
        SessionQuality::High
    } else if overlap == "ASIAN_LONDON" || has("ASIAN") {
        SessionQuality::Medium
    } else {
        SessionQuality::Low
    };

    SessionInfo {
        sessions,
        overlap: overlap.to_string(),
        quality,
        hour,
    }
}

/// Forex trades Sunday 22:00 UTC through Friday 22:00 UTC.
pub fn is_forex_market_open(now: DateTime<Utc>) -> bool {
    let day = now.weekday().num_days_from_sunday();
    let hour = now.hour();

    if day == 6 {
        return false;
    }
    if day == 5 && hour >= 22 {
        return false;
    }
    if day == 0 && hour < 22 {
        return false;
    }
    true
}

/// Fixed-date holidays with severely reduced forex liquidity.
pub fn forex_holiday(now: DateTime<Utc>) -> Option<&'static str> {
    match (now.month(), now.day()) {
        (12, 25) => Some("Christmas Day"),
        (1, 1) => Some("New Year's Day"),
        _ => None,
    }
}

/// Next Sunday 22:00 UTC open after `now`.
pub fn next_forex_open(now: DateTime<Utc>) -> DateTime<Utc> {
    if now.weekday().num_days_from_sunday() == 0 && now.hour() < 22 {
        return Utc
            .with_ymd_and_hms(now.year(), now.month(), now.day(), 22, 0, 0)
            .unwrap();
    }

    let mut next = now;
    loop {
        next += Duration::days(1);
        if next.weekday().num_days_from_sunday() == 0 {
            break;
        }
    }
    Utc.with_ymd_and_hms(next.year(), next.month(), next.day(), 22, 0, 0)
        .unwrap()
}

/// Human-readable countdown to a future instant.
pub fn format_time_until(now: DateTime<Utc>, target: DateTime<Utc>) -> String {
    let diff = target - now;
    if diff <= Duration::zero() {
        return "Opening soon...".to_string();
    }
    let hours = diff.num_hours();
    let mins = diff.num_minutes() % 60;
    if hours >= 24 {
        format!("{}d {}h {}m", hours / 24, hours % 24, mins)
    } else {
        format!("{}h {}m", hours, mins)
    }
}
