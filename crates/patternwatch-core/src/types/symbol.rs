//! 심볼 및 시장 유형 정의.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 시장 유형 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketType {
    /// 암호화폐 현물 시장
    Crypto,
    /// 주식 시장
    Stock,
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketType::Crypto => write!(f, "crypto"),
            MarketType::Stock => write!(f, "stock"),
        }
    }
}

/// 분석 대상 상품을 나타내는 심볼.
///
/// 기준 자산과 호가 자산으로 구성됩니다. 예: BTC/USDT.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    /// 기준 자산 (예: BTC)
    pub base: String,
    /// 호가 자산 (예: USDT)
    pub quote: String,
    /// 시장 유형
    pub market_type: MarketType,
}

impl Symbol {
    /// 새 심볼을 생성합니다.
    pub fn new(base: impl Into<String>, quote: impl Into<String>, market_type: MarketType) -> Self {
        Self {
            base: base.into().trim().to_uppercase(),
            quote: quote.into().trim().to_uppercase(),
            market_type,
        }
    }

    /// 암호화폐 심볼을 생성합니다.
    pub fn crypto(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self::new(base, quote, MarketType::Crypto)
    }

    /// "BASE/QUOTE" 형식 문자열에서 심볼을 파싱합니다.
    pub fn from_string(s: &str, market_type: MarketType) -> Option<Self> {
        let (base, quote) = s.split_once('/')?;
        if base.trim().is_empty() || quote.trim().is_empty() || quote.contains('/') {
            return None;
        }
        Some(Self::new(base, quote, market_type))
    }

    /// 구분자 없는 거래소 페어 형식을 반환합니다 (예: "BTCUSDT").
    pub fn to_pair_string(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_creation() {
        let symbol = Symbol::crypto("btc", "usdt");
        assert_eq!(symbol.base, "BTC");
        assert_eq!(symbol.quote, "USDT");
        assert_eq!(symbol.to_string(), "BTC/USDT");
        assert_eq!(symbol.to_pair_string(), "BTCUSDT");
    }

    #[test]
    fn test_symbol_from_string() {
        let symbol = Symbol::from_string("eth/usd", MarketType::Crypto).unwrap();
        assert_eq!(symbol.base, "ETH");
        assert_eq!(symbol.quote, "USD");

        assert!(Symbol::from_string("ETHUSD", MarketType::Crypto).is_none());
        assert!(Symbol::from_string("/USD", MarketType::Crypto).is_none());
        assert!(Symbol::from_string("A/B/C", MarketType::Crypto).is_none());
    }
}
