//! Integration tests for the TwelveData provider against a mock upstream

use serde_json::json;
use signaltrix::models::candle::Timeframe;
use signaltrix::models::pair::Pair;
use signaltrix::services::{MarketDataError, MarketDataProvider, TwelveDataProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn time_series_body() -> serde_json::Value {
    // Provider order is newest-first, as the real API returns it.
    json!({
        "values": [
            { "datetime": "2024-01-01 00:02:00", "open": "1.1002", "high": "1.1008",
              "low": "1.0999", "close": "1.1005", "volume": "0" },
            { "datetime": "2024-01-01 00:01:00", "open": "1.1001", "high": "1.1006",
              "low": "1.0998", "close": "1.1002", "volume": "0" },
            { "datetime": "2024-01-01 00:00:00", "open": "1.1000", "high": "1.1004",
              "low": "1.0997", "close": "1.1001", "volume": "0" },
        ]
    })
}

#[tokio::test]
async fn test_fetch_parses_and_reorders_candles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/time_series"))
        .and(query_param("symbol", "EUR/USD"))
        .and(query_param("interval", "1min"))
        .respond_with(ResponseTemplate::new(200).set_body_json(time_series_body()))
        .mount(&server)
        .await;

    let provider = TwelveDataProvider::new(server.uri(), vec!["test-key".to_string()]);
    let pair = Pair::sanitize("EUR/USD").unwrap();
    let candles = provider
        .get_candles(&pair, Timeframe::M1, 100)
        .await
        .expect("fetch should succeed");

    assert_eq!(candles.len(), 3);
    // Ascending by time after the reorder.
    assert!(candles[0].timestamp < candles[1].timestamp);
    assert!(candles[1].timestamp < candles[2].timestamp);
    assert_eq!(candles[0].close, 1.1001);
    assert_eq!(candles[2].close, 1.1005);
}

#[tokio::test]
async fn test_no_keys_fails_fast() {
    let provider = TwelveDataProvider::new("http://127.0.0.1:9", Vec::new());
    let pair = Pair::sanitize("EUR/USD").unwrap();
    let err = provider
        .get_candles(&pair, Timeframe::M1, 100)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::NoApiKeys));
}

#[tokio::test]
async fn test_api_error_payload_surfaces() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/time_series"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "symbol not found"
        })))
        .mount(&server)
        .await;

    let provider = TwelveDataProvider::new(server.uri(), vec!["k".to_string()]);
    let pair = Pair::sanitize("EUR/USD").unwrap();
    let err = provider
        .get_candles(&pair, Timeframe::M1, 100)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::Api(msg) if msg.contains("symbol not found")));
}

#[tokio::test]
async fn test_retry_rotates_to_next_key() {
    let server = MockServer::start().await;
    // First key is rate limited; the second succeeds.
    Mock::given(method("GET"))
        .and(path("/time_series"))
        .and(query_param("apikey", "key-one"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/time_series"))
        .and(query_param("apikey", "key-two"))
        .respond_with(ResponseTemplate::new(200).set_body_json(time_series_body()))
        .mount(&server)
        .await;

    let provider = TwelveDataProvider::new(
        server.uri(),
        vec!["key-one".to_string(), "key-two".to_string()],
    );
    let pair = Pair::sanitize("EUR/USD").unwrap();
    let candles = provider
        .get_candles(&pair, Timeframe::M1, 100)
        .await
        .expect("second key should succeed");
    assert_eq!(candles.len(), 3);
}

#[tokio::test]
async fn test_empty_values_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/time_series"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "values": [] })))
        .mount(&server)
        .await;

    let provider = TwelveDataProvider::new(server.uri(), vec!["k".to_string()]);
    let pair = Pair::sanitize("EUR/USD").unwrap();
    let err = provider
        .get_candles(&pair, Timeframe::M1, 100)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::NoData));
}
