//! Market data provider interface and the TwelveData implementation.
//!
//! The provider owns everything the engine must not care about: API-key
//! rotation, retries with backoff, request timeouts and response
//! validation. It hands the engine complete ascending candle series or a
//! typed error.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::models::candle::{Candle, Timeframe};
use crate::models::pair::Pair;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(12);
const MAX_RETRIES: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum MarketDataError {
    #[error("no API keys configured")]
    NoApiKeys,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider rate limited")]
    RateLimited,
    #[error("provider error: {0}")]
    Api(String),
    #[error("no data returned for symbol")]
    NoData,
    #[error("non-finite values in response")]
    InvalidData,
}

impl MarketDataError {
    /// Transport errors, upstream rate limits and transient API errors
    /// are worth another attempt on the next key.
    fn is_retryable(&self) -> bool {
        !matches!(self, MarketDataError::NoApiKeys | MarketDataError::InvalidData)
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch up to `limit` candles for one pair and timeframe, ordered
    /// ascending by time.
    async fn get_candles(
        &self,
        pair: &Pair,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError>;
}

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    values: Option<Vec<RawCandle>>,
}

#[derive(Debug, Deserialize)]
struct RawCandle {
    datetime: String,
    open: String,
    high: String,
    low: String,
    close: String,
    #[serde(default)]
    volume: Option<String>,
}

/// HTTP provider against a TwelveData-style `/time_series` endpoint.
/// Each retry attempt rotates to the next configured API key.
pub struct TwelveDataProvider {
    client: reqwest::Client,
    base_url: String,
    api_keys: Vec<String>,
    key_cursor: AtomicUsize,
}

impl TwelveDataProvider {
    pub fn new(base_url: impl Into<String>, api_keys: Vec<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client");
        Self {
            client,
            base_url: base_url.into(),
            api_keys,
            key_cursor: AtomicUsize::new(0),
        }
    }

    /// Read `TWELVEDATA_API_KEY_1..10` (falling back to
    /// `TWELVEDATA_API_KEY`) and an optional `TWELVEDATA_BASE_URL`.
    pub fn from_env() -> Self {
        let mut keys = Vec::new();
        for i in 1..=10 {
            if let Ok(k) = std::env::var(format!("TWELVEDATA_API_KEY_{}", i)) {
                let k = k.trim().to_string();
                if !k.is_empty() {
                    keys.push(k);
                }
            }
        }
        if keys.is_empty() {
            if let Ok(k) = std::env::var("TWELVEDATA_API_KEY") {
                let k = k.trim().to_string();
                if !k.is_empty() {
                    keys.push(k);
                }
            }
        }
        let base_url = std::env::var("TWELVEDATA_BASE_URL")
            .unwrap_or_else(|_| "https://api.twelvedata.com".to_string());
        Self::new(base_url, keys)
    }

    pub fn key_count(&self) -> usize {
        self.api_keys.len()
    }

    fn next_key(&self) -> &str {
        let idx = self.key_cursor.fetch_add(1, Ordering::Relaxed) % self.api_keys.len();
        &self.api_keys[idx]
    }

    async fn fetch_once(
        &self,
        pair: &Pair,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let api_key = self.next_key();
        let mut url = Url::parse(&self.base_url)
            .and_then(|u| u.join("/time_series"))
            .map_err(|e| MarketDataError::Api(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("symbol", &pair.symbol())
            .append_pair("interval", timeframe.label())
            .append_pair("outputsize", &limit.to_string())
            .append_pair("apikey", api_key)
            .append_pair("format", "JSON");

        debug!(pair = %pair, timeframe = %timeframe, "fetching candles");

        let response = self.client.get(url).send().await?;
        if response.status().as_u16() == 429 {
            return Err(MarketDataError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(MarketDataError::Api(format!("HTTP {}", response.status())));
        }

        let body: TimeSeriesResponse = response.json().await?;
        if body.status.as_deref() == Some("error") {
            return Err(MarketDataError::Api(
                body.message.unwrap_or_else(|| "API error".to_string()),
            ));
        }

        let values = body.values.filter(|v| !v.is_empty()).ok_or(MarketDataError::NoData)?;

        // Provider returns newest-first; the engine wants ascending.
        let mut candles: Vec<Candle> = values
            .iter()
            .map(|raw| Candle {
                timestamp: parse_datetime(&raw.datetime),
                open: raw.open.parse().unwrap_or(f64::NAN),
                high: raw.high.parse().unwrap_or(f64::NAN),
                low: raw.low.parse().unwrap_or(f64::NAN),
                close: raw.close.parse().unwrap_or(f64::NAN),
                volume: raw
                    .volume
                    .as_deref()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0.0),
            })
            .collect();
        candles.reverse();

        if !candles.iter().all(Candle::is_valid) {
            return Err(MarketDataError::InvalidData);
        }
        Ok(candles)
    }
}

#[async_trait]
impl MarketDataProvider for TwelveDataProvider {
    async fn get_candles(
        &self,
        pair: &Pair,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        if self.api_keys.is_empty() {
            return Err(MarketDataError::NoApiKeys);
        }
        let max_attempts = MAX_RETRIES.min(self.api_keys.len());

        (|| async { self.fetch_once(pair, timeframe, limit).await })
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(100))
                    .with_max_times(max_attempts.saturating_sub(1)),
            )
            .when(MarketDataError::is_retryable)
            .notify(|err, _| warn!(error = %err, "candle fetch attempt failed, rotating key"))
            .await
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)))
        .unwrap_or_else(|_| Utc::now())
}
