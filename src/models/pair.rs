//! Pair symbol parsing, validation and classification.

use serde::{Deserialize, Serialize};

pub const VALID_FOREX_CURRENCIES: &[&str] = &[
    "EUR", "USD", "GBP", "JPY", "AUD", "NZD", "CAD", "CHF", "SEK", "NOK", "DKK", "PLN", "HUF",
    "CZK", "RON", "BGN", "HRK", "ISK", "RUB", "TRY", "UAH", "HKD", "SGD", "CNH", "CNY", "KRW",
    "TWD", "THB", "MYR", "PHP", "IDR", "INR", "VND", "PKR", "BDT", "LKR", "MXN", "BRL", "CLP",
    "COP", "PEN", "ARS", "AED", "SAR", "ILS", "JOD", "KWD", "BHD", "OMR", "QAR", "ZAR", "EGP",
    "NGN", "KES", "GHS", "TZS", "UGX", "MAD",
];

pub const CRYPTO_BASES: &[&str] = &[
    "BTC", "ETH", "BNB", "XRP", "SOL", "ADA", "DOGE", "AVAX", "DOT", "LINK",
];

pub const CRYPTO_QUOTES: &[&str] = &["USD", "EUR", "GBP", "JPY", "USDT", "BTC"];

/// Currencies that carry an extra confidence penalty due to spreads and
/// thin liquidity.
pub const EXOTIC_CURRENCIES: &[&str] = &[
    "TRY", "ZAR", "MXN", "BRL", "PLN", "HUF", "CZK", "RON", "BGN", "HRK", "ISK", "RUB", "UAH",
    "CNH", "CNY", "KRW", "TWD", "THB", "MYR", "PHP", "IDR", "INR", "VND", "PKR", "BDT", "LKR",
    "CLP", "COP", "PEN", "ARS", "EGP", "NGN", "KES", "GHS", "TZS", "UGX", "MAD",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Forex,
    Crypto,
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetType::Forex => f.write_str("FOREX"),
            AssetType::Crypto => f.write_str("CRYPTO"),
        }
    }
}

/// A validated tradable pair in canonical `BASE/QUOTE` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub base: String,
    pub quote: String,
}

impl Pair {
    /// Sanitize user input into a canonical pair. Accepts `EUR/USD`,
    /// `EURUSD`, `BTC/USD`, `BTCUSDT` and lowercase variants. Returns
    /// `None` for anything that does not resolve to a known pair.
    pub fn sanitize(input: &str) -> Option<Pair> {
        let cleaned: String = input
            .chars()
            .filter(|c| c.is_ascii_alphabetic() || *c == '/')
            .collect::<String>()
            .to_uppercase();

        // Forex XXX/YYY
        if let Some((b, q)) = cleaned.split_once('/') {
            if b.len() == 3
                && q.len() == 3
                && is_forex_currency(b)
                && is_forex_currency(q)
                && b != q
            {
                return Some(Pair::from_parts(b, q));
            }
        }

        // Forex XXXYYY (6 letters, no slash)
        if cleaned.len() == 6 && !cleaned.contains('/') {
            let (b, q) = cleaned.split_at(3);
            if is_forex_currency(b) && is_forex_currency(q) && b != q {
                return Some(Pair::from_parts(b, q));
            }
        }

        // Crypto with slash
        if let Some((b, q)) = cleaned.split_once('/') {
            if is_crypto_base(b) && is_crypto_quote(q) && b != q {
                return Some(Pair::from_parts(b, q));
            }
        }

        // Crypto without slash: longest-known-base prefix match
        for base in CRYPTO_BASES {
            if let Some(quote) = cleaned.strip_prefix(base) {
                if is_crypto_quote(quote) && *base != quote {
                    return Some(Pair::from_parts(base, quote));
                }
            }
        }

        None
    }

    fn from_parts(base: &str, quote: &str) -> Pair {
        Pair {
            base: base.to_string(),
            quote: quote.to_string(),
        }
    }

    pub fn asset_type(&self) -> AssetType {
        if CRYPTO_BASES.contains(&self.base.as_str()) {
            AssetType::Crypto
        } else {
            AssetType::Forex
        }
    }

    /// Exotic classification only applies to forex pairs.
    pub fn is_exotic(&self) -> bool {
        self.asset_type() == AssetType::Forex
            && (EXOTIC_CURRENCIES.contains(&self.base.as_str())
                || EXOTIC_CURRENCIES.contains(&self.quote.as_str()))
    }

    pub fn symbol(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

fn is_forex_currency(code: &str) -> bool {
    VALID_FOREX_CURRENCIES.contains(&code)
}

fn is_crypto_base(code: &str) -> bool {
    CRYPTO_BASES.contains(&code)
}

fn is_crypto_quote(code: &str) -> bool {
    CRYPTO_QUOTES.contains(&code) || is_forex_currency(code)
}
