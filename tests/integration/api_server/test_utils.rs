//! Test utilities for API server integration tests

use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{Duration, TimeZone, Utc};
use signaltrix::core::http::{create_router, AppState};
use signaltrix::metrics::Metrics;
use signaltrix::models::candle::{Candle, Timeframe};
use signaltrix::models::pair::Pair;
use signaltrix::services::{MarketDataError, MarketDataProvider};

/// Provider stub serving a deterministic uptrend, or failing every call.
pub struct StubProvider {
    pub fail: bool,
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    async fn get_candles(
        &self,
        _pair: &Pair,
        _timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        if self.fail {
            return Err(MarketDataError::NoData);
        }
        let count = limit.min(100);
        Ok((0..count)
            .map(|i| {
                let base = 100.0 + i as f64 * 0.4;
                let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    + Duration::minutes(i as i64);
                Candle::new(base, base + 0.45, base - 0.05, base + 0.4, 1000.0, ts)
            })
            .collect())
    }
}

#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
}

impl TestApiServer {
    pub async fn new() -> Self {
        Self::with_provider(StubProvider { fail: false }).await
    }

    pub async fn failing() -> Self {
        Self::with_provider(StubProvider { fail: true }).await
    }

    async fn with_provider(provider: StubProvider) -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let state = AppState::new(Arc::new(provider), None, metrics.clone());
        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");
        Self { server, metrics }
    }
}
