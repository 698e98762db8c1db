//! Redis-backed candle cache with timeframe-specific TTLs.
//!
//! The cache is best-effort: read and write failures degrade to a miss
//! with a warning, never an error surfaced to the caller.

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::warn;

use crate::models::candle::{Candle, Timeframe};
use crate::models::pair::Pair;

#[derive(Clone)]
pub struct CandleCache {
    conn: ConnectionManager,
}

impl CandleCache {
    pub async fn connect(redis_url: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    fn key(pair: &Pair, timeframe: Timeframe, limit: usize) -> String {
        format!("c:{}:{}:{}", pair.symbol(), timeframe.label(), limit)
    }

    pub async fn get(
        &self,
        pair: &Pair,
        timeframe: Timeframe,
        limit: usize,
    ) -> Option<Vec<Candle>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = match conn.get(Self::key(pair, timeframe, limit)).await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "cache read failed");
                return None;
            }
        };
        let candles: Vec<Candle> = serde_json::from_str(&raw?).ok()?;
        if candles.is_empty() {
            None
        } else {
            Some(candles)
        }
    }

    pub async fn put(&self, pair: &Pair, timeframe: Timeframe, limit: usize, candles: &[Candle]) {
        if candles.is_empty() {
            return;
        }
        let payload = match serde_json::to_string(candles) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "cache serialize failed");
                return;
            }
        };
        let ttl = timeframe.cache_ttl_secs().max(60);
        let mut conn = self.conn.clone();
        if let Err(e) = conn
            .set_ex::<_, _, ()>(Self::key(pair, timeframe, limit), payload, ttl)
            .await
        {
            warn!(error = %e, "cache write failed");
        }
    }
}
