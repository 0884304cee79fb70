//! Binance Spot 캔들 조회.
//!
//! 공개 `/api/v3/klines` 엔드포인트만 사용하므로 API 키가 필요 없습니다.

use async_trait::async_trait;
use patternwatch_core::{
    Candle, MarketConfig, MarketType, ProviderError, SeriesProvider, SeriesRequest,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{build_client, parse_decimal, parse_timestamp_millis, public_get};

/// Binance 요청 한 번의 최대 캔들 수.
const MAX_KLINES_PER_REQUEST: u32 = 1000;

/// Binance 클라이언트 설정.
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// REST 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl From<&MarketConfig> for BinanceConfig {
    fn from(config: &MarketConfig) -> Self {
        Self {
            base_url: config.binance_base_url.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

// ============================================================================
// API 응답 타입
// ============================================================================

/// Kline 행: `[open_time, open, high, low, close, volume, close_time, ...]`.
#[allow(dead_code)] // API 응답 필드 전체 매핑 (일부만 사용)
#[derive(Debug, Deserialize)]
struct BinanceKline(
    i64,    // 0: Open time
    String, // 1: Open
    String, // 2: High
    String, // 3: Low
    String, // 4: Close
    String, // 5: Volume
    i64,    // 6: Close time
    String, // 7: Quote asset volume
    i64,    // 8: Number of trades
    String, // 9: Taker buy base asset volume
    String, // 10: Taker buy quote asset volume
    String, // 11: Ignore
);

impl BinanceKline {
    fn into_candle(self) -> Result<Candle, ProviderError> {
        Ok(Candle::new(
            parse_timestamp_millis(self.0)?,
            parse_decimal("open", &self.1)?,
            parse_decimal("high", &self.2)?,
            parse_decimal("low", &self.3)?,
            parse_decimal("close", &self.4)?,
            parse_decimal("volume", &self.5)?,
        ))
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Binance Spot klines 기반 캔들 제공자.
#[derive(Debug)]
pub struct BinanceKlineProvider {
    config: BinanceConfig,
    client: Client,
}

impl BinanceKlineProvider {
    /// 새 제공자 생성.
    pub fn new(config: BinanceConfig) -> Result<Self, ProviderError> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl SeriesProvider for BinanceKlineProvider {
    async fn fetch_candles(&self, request: &SeriesRequest) -> Result<Vec<Candle>, ProviderError> {
        if request.symbol.market_type != MarketType::Crypto {
            return Err(ProviderError::Unsupported(format!(
                "Binance는 암호화폐만 지원합니다: {}",
                request.symbol
            )));
        }

        let limit = request.limit.clamp(1, MAX_KLINES_PER_REQUEST);
        let rows: Vec<BinanceKline> = public_get(
            &self.client,
            &self.config.base_url,
            &["api", "v3", "klines"],
            &[
                ("symbol", request.symbol.to_pair_string()),
                ("interval", request.timeframe.as_interval().to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await?;

        let candles = rows
            .into_iter()
            .map(BinanceKline::into_candle)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(symbol = %request.symbol, count = candles.len(), "Binance klines 수신");

        Ok(candles)
    }

    fn provider_name(&self) -> &str {
        "binance"
    }
}
