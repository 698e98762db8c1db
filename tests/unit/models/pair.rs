//! Unit tests for pair parsing and classification

use signaltrix::models::pair::{AssetType, Pair};

#[test]
fn test_forex_with_slash() {
    let pair = Pair::sanitize("EUR/USD").unwrap();
    assert_eq!(pair.symbol(), "EUR/USD");
    assert_eq!(pair.asset_type(), AssetType::Forex);
}

#[test]
fn test_forex_without_slash() {
    let pair = Pair::sanitize("GBPJPY").unwrap();
    assert_eq!(pair.symbol(), "GBP/JPY");
}

#[test]
fn test_lowercase_and_noise_stripped() {
    let pair = Pair::sanitize(" eur/usd ").unwrap();
    assert_eq!(pair.symbol(), "EUR/USD");
    let pair = Pair::sanitize("eurusd123").unwrap();
    assert_eq!(pair.symbol(), "EUR/USD");
}

#[test]
fn test_crypto_with_slash() {
    let pair = Pair::sanitize("BTC/USD").unwrap();
    assert_eq!(pair.asset_type(), AssetType::Crypto);
}

#[test]
fn test_crypto_without_slash() {
    let pair = Pair::sanitize("ETHUSDT").unwrap();
    assert_eq!(pair.symbol(), "ETH/USDT");
    assert_eq!(pair.asset_type(), AssetType::Crypto);
}

#[test]
fn test_crypto_against_forex_quote() {
    let pair = Pair::sanitize("SOL/CHF").unwrap();
    assert_eq!(pair.asset_type(), AssetType::Crypto);
}

#[test]
fn test_rejects_unknown_and_same_currency() {
    assert!(Pair::sanitize("FOO/BAR").is_none());
    assert!(Pair::sanitize("USD/USD").is_none());
    assert!(Pair::sanitize("").is_none());
    assert!(Pair::sanitize("EURUS").is_none());
}

#[test]
fn test_exotic_detection_forex_only() {
    assert!(Pair::sanitize("USD/TRY").unwrap().is_exotic());
    assert!(Pair::sanitize("EUR/ZAR").unwrap().is_exotic());
    assert!(!Pair::sanitize("EUR/USD").unwrap().is_exotic());
    // TRY as a crypto quote does not make the pair exotic.
    assert!(!Pair::sanitize("BTC/TRY").unwrap().is_exotic());
}
