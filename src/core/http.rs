//! HTTP endpoint server using Axum.
//!
//! Routes: `/health`, `/api/signal?pair=…`, `/api/pairs`, `/metrics`.
//! The signal route is rate limited per client; every route records
//! request metrics and emits trace spans.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::{
    extract::{Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::config::SignalConfig;
use crate::metrics::Metrics;
use crate::models::candle::{Candle, Timeframe};
use crate::models::pair::{
    AssetType, Pair, CRYPTO_BASES, CRYPTO_QUOTES, VALID_FOREX_CURRENCIES,
};
use crate::models::session::{
    detect_trading_session, forex_holiday, format_time_until, is_forex_market_open,
    next_forex_open, SessionInfo, SessionQuality,
};
use crate::models::signal::AggregateSignal;
use crate::services::{CandleCache, MarketDataProvider};
use crate::signals::SignalEngine;

const CANDLE_FETCH_LIMIT: usize = 100;
const REFRESH_INTERVAL_SECS: i64 = 60;
const RATE_LIMIT_MAX_REQUESTS: usize = 30;
const RATE_LIMIT_WINDOW_SECONDS: i64 = 60;

/// Per-client sliding-window rate limiter for the signal route.
pub struct RateLimiter {
    window_seconds: i64,
    max_requests: usize,
    requests: Mutex<HashMap<String, VecDeque<i64>>>,
}

impl RateLimiter {
    pub fn new(window_seconds: i64, max_requests: usize) -> Self {
        Self {
            window_seconds,
            max_requests,
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// Record a hit for `key` and report whether it is allowed.
    pub fn check(&self, key: &str, now_epoch: i64) -> bool {
        let mut map = self.requests.lock().expect("rate limiter lock");
        let entry = map.entry(key.to_string()).or_default();
        while let Some(front) = entry.front() {
            if *front <= now_epoch - self.window_seconds {
                entry.pop_front();
            } else {
                break;
            }
        }
        if entry.len() >= self.max_requests {
            return false;
        }
        entry.push_back(now_epoch);
        true
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub provider: Arc<dyn MarketDataProvider>,
    pub cache: Option<CandleCache>,
    pub config: Arc<SignalConfig>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        cache: Option<CandleCache>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics,
            start_time: Arc::new(Instant::now()),
            provider,
            cache,
            config: Arc::new(SignalConfig::default()),
            rate_limiter: Arc::new(RateLimiter::new(
                RATE_LIMIT_WINDOW_SECONDS,
                RATE_LIMIT_MAX_REQUESTS,
            )),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/api/signal", get(signal_handler))
        .route("/signal", get(signal_handler))
        .route("/api/pairs", get(pairs_handler))
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            metrics_middleware,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(cors),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> Result<(), std::io::Error> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port = port, "HTTP server listening");
    axum::serve(listener, app).await
}

async fn metrics_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    state.metrics.http_requests_in_flight.dec();

    let status = response.status().as_u16().to_string();
    state
        .metrics
        .http_requests_total
        .with_label_values(&[method.as_str(), &path, &status])
        .inc();
    state
        .metrics
        .http_request_duration_seconds
        .with_label_values(&[method.as_str(), &path])
        .observe(start.elapsed().as_secs_f64());

    response
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let health = state.health.read().await;
    let now = Utc::now();
    let session = detect_trading_session(now);
    let forex_open = is_forex_market_open(now);
    let holiday = forex_holiday(now);

    Json(json!({
        "status": health.status,
        "service": "signaltrix-signal-engine",
        "uptimeSeconds": state.start_time.elapsed().as_secs(),
        "timestamp": now.to_rfc3339(),
        "currentSession": session,
        "markets": {
            "forex": {
                "status": if forex_open { "OPEN" } else { "CLOSED" },
                "holiday": holiday.unwrap_or("NONE"),
                "currencies": VALID_FOREX_CURRENCIES.len(),
                "hours": "Mon-Fri 24h (Sun 22:00 UTC to Fri 22:00 UTC)",
            },
            "crypto": {
                "status": "ALWAYS OPEN (24/7)",
                "bases": CRYPTO_BASES,
                "quotes": CRYPTO_QUOTES,
            },
        },
    }))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

pub async fn pairs_handler() -> Json<Value> {
    let major_bases = ["EUR", "GBP", "AUD", "NZD", "USD", "CAD", "CHF", "JPY"];
    let mut major_pairs = Vec::new();
    for b in major_bases {
        for q in major_bases {
            if b != q {
                major_pairs.push(format!("{}/{}", b, q));
            }
        }
    }

    let mut crypto_pairs = Vec::new();
    for b in CRYPTO_BASES {
        for q in CRYPTO_QUOTES {
            if b != q {
                crypto_pairs.push(format!("{}/{}", b, q));
            }
        }
    }

    Json(json!({
        "forex": {
            "currencies": VALID_FOREX_CURRENCIES,
            "currencyCount": VALID_FOREX_CURRENCIES.len(),
            "totalPossiblePairs": VALID_FOREX_CURRENCIES.len() * (VALID_FOREX_CURRENCIES.len() - 1),
            "majorPairs": major_pairs.iter().take(30).collect::<Vec<_>>(),
            "marketHours": "Sunday 22:00 UTC to Friday 22:00 UTC",
        },
        "crypto": {
            "bases": CRYPTO_BASES,
            "quotes": CRYPTO_QUOTES,
            "totalPairs": crypto_pairs.len(),
            "allPairs": crypto_pairs,
            "marketHours": "24/7 - Never closes",
        },
        "usage": {
            "forexExample": "/api/signal?pair=EUR/USD",
            "cryptoExample": "/api/signal?pair=BTC/USD",
            "formats": ["EUR/USD", "EURUSD", "BTC/USD", "BTCUSD", "eur/usd"],
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct SignalParams {
    pair: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignalResponse {
    pair: String,
    asset_type: AssetType,
    market_status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    session: Option<SessionInfo>,
    is_exotic_pair: bool,
    signal: AggregateSignal,
    source: &'static str,
    timestamp: DateTime<Utc>,
    next_refresh: DateTime<Utc>,
    cache_hits: usize,
    data_status: BTreeMap<&'static str, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    holiday_warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exotic_warning: Option<String>,
}

pub async fn signal_handler(
    State(state): State<AppState>,
    Query(params): Query<SignalParams>,
    headers: HeaderMap,
) -> Response {
    let now = Utc::now();

    let client_key = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    if !state.rate_limiter.check(&client_key, now.timestamp()) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": true,
                "message": "Rate limit exceeded.",
                "retryAfter": RATE_LIMIT_WINDOW_SECONDS,
            })),
        )
            .into_response();
    }

    let raw_pair = params.pair.unwrap_or_else(|| "EUR/USD".to_string());
    let Some(pair) = Pair::sanitize(&raw_pair) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": true,
                "message": format!(
                    "Invalid pair: \"{}\". Use EUR/USD, EURUSD, BTC/USD, BTCUSD etc.",
                    raw_pair
                ),
                "validForexCurrencies": VALID_FOREX_CURRENCIES,
                "validCryptoBases": CRYPTO_BASES,
                "validCryptoQuotes": CRYPTO_QUOTES,
                "examples": ["EUR/USD", "GBP/JPY", "BTC/USD", "ETH/EUR", "SOL/USDT"],
            })),
        )
            .into_response();
    };

    let asset = pair.asset_type();
    let session = detect_trading_session(now);
    let exotic = pair.is_exotic();
    let mut holiday_warning = None;

    if asset == AssetType::Forex {
        if !is_forex_market_open(now) {
            let next_open = next_forex_open(now);
            return Json(json!({
                "pair": pair.symbol(),
                "assetType": asset,
                "marketStatus": "CLOSED",
                "message": "Forex market is currently CLOSED (Weekend)",
                "details": "Forex operates Sunday 22:00 UTC to Friday 22:00 UTC.",
                "nextOpen": next_open.to_rfc3339(),
                "opensIn": format_time_until(now, next_open),
                "advice": "Wait for market open or trade Crypto pairs (24/7).",
                "cryptoAlternative": "Try /api/signal?pair=BTC/USD",
                "signal": null,
                "timestamp": now.to_rfc3339(),
            }))
            .into_response();
        }
        if let Some(holiday) = forex_holiday(now) {
            holiday_warning = Some(format!(
                "Today is {}. Forex liquidity may be very low.",
                holiday
            ));
        }
    }

    let mut candle_map: BTreeMap<Timeframe, Vec<Candle>> = BTreeMap::new();
    let mut errors: BTreeMap<&'static str, String> = BTreeMap::new();
    let mut cache_hits = 0usize;

    for tf in Timeframe::ALL {
        match fetch_with_cache(&state, &pair, tf).await {
            Ok((candles, from_cache)) => {
                if from_cache {
                    cache_hits += 1;
                }
                candle_map.insert(tf, candles);
            }
            Err(e) => {
                warn!(pair = %pair, timeframe = %tf, error = %e, "candle fetch failed");
                errors.insert(tf.label(), e.to_string());
            }
        }
    }

    if candle_map.is_empty() {
        let signal = SignalEngine::placeholder_signal(&pair, asset, now);
        state
            .metrics
            .signals_generated_total
            .with_label_values(&[asset.to_string().as_str()])
            .inc();
        return Json(json!({
            "pair": pair.symbol(),
            "assetType": asset,
            "signal": signal,
            "source": "DUMMY_FALLBACK",
            "errors": errors,
            "timestamp": now.to_rfc3339(),
        }))
        .into_response();
    }

    let partial = !errors.is_empty();
    let signal = SignalEngine::evaluate(&candle_map, asset, &session, exotic, now, &state.config);
    state
        .metrics
        .signals_generated_total
        .with_label_values(&[asset.to_string().as_str()])
        .inc();

    let mut data_status = BTreeMap::new();
    for tf in Timeframe::ALL {
        let status = match candle_map.get(&tf) {
            Some(candles) => format!("{} candles", candles.len()),
            None => format!(
                "FAILED: {}",
                errors.get(tf.label()).map(String::as_str).unwrap_or("unknown")
            ),
        };
        data_status.insert(tf.label(), status);
    }

    let session_warning = (asset == AssetType::Forex && session.quality == SessionQuality::Low)
        .then(|| "Low liquidity session. Best: London (07-16 UTC), NY (12-21 UTC).".to_string());
    let exotic_warning =
        exotic.then(|| "Exotic pair. Higher spreads. Confidence reduced.".to_string());

    Json(SignalResponse {
        pair: pair.symbol(),
        asset_type: asset,
        market_status: "OPEN",
        session: Some(session),
        is_exotic_pair: exotic,
        signal,
        source: if partial { "PARTIAL_DATA" } else { "FULL_DATA" },
        timestamp: now,
        next_refresh: now + Duration::seconds(REFRESH_INTERVAL_SECS),
        cache_hits,
        data_status,
        holiday_warning,
        session_warning,
        exotic_warning,
    })
    .into_response()
}

async fn fetch_with_cache(
    state: &AppState,
    pair: &Pair,
    timeframe: Timeframe,
) -> Result<(Vec<Candle>, bool), crate::services::MarketDataError> {
    if let Some(cache) = &state.cache {
        if let Some(candles) = cache.get(pair, timeframe, CANDLE_FETCH_LIMIT).await {
            return Ok((candles, true));
        }
    }

    let candles = state
        .provider
        .get_candles(pair, timeframe, CANDLE_FETCH_LIMIT)
        .await?;

    if let Some(cache) = &state.cache {
        cache.put(pair, timeframe, CANDLE_FETCH_LIMIT, &candles).await;
    }
    Ok((candles, false))
}
