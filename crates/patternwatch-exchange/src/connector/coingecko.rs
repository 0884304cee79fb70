//! CoinGecko OHLC 조회.
//!
//! `/api/v3/coins/{id}/ohlc` 엔드포인트를 사용합니다. CoinGecko는 조회 기간(days)에 따라
//! 봉 간격을 자동으로 정합니다 (1-2일: 30분봉, 3-30일: 4시간봉, 31일 이상: 4일봉).
//! 따라서 30분봉과 4시간봉만 지원하며, 응답의 봉 간격이 요청과 다르면 거부합니다.
//! 거래량을 제공하지 않으므로 거래량은 0입니다.

use async_trait::async_trait;
use patternwatch_core::{
    Candle, MarketConfig, MarketType, ProviderError, SeriesProvider, SeriesRequest, Symbol,
    Timeframe,
};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{build_client, parse_timestamp_millis, public_get};

/// 30분봉을 돌려주는 `days` 값.
static HALF_HOUR_DAYS: [u64; 1] = [1];

/// 4시간봉을 돌려주는 `days` 값.
static FOUR_HOUR_DAYS: [u64; 3] = [7, 14, 30];

/// CoinGecko 클라이언트 설정.
#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    /// REST 기본 URL
    pub base_url: String,
    /// 기준 통화 (예: "usd")
    pub vs_currency: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com".to_string(),
            vs_currency: "usd".to_string(),
            timeout_secs: 30,
        }
    }
}

impl From<&MarketConfig> for CoinGeckoConfig {
    fn from(config: &MarketConfig) -> Self {
        Self {
            base_url: config.coingecko_base_url.clone(),
            vs_currency: config.vs_currency.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// OHLC 행: `[timestamp_ms, open, high, low, close]`.
#[derive(Debug, Deserialize)]
struct CoinGeckoOhlc(i64, Decimal, Decimal, Decimal, Decimal);

impl CoinGeckoOhlc {
    fn into_candle(self) -> Result<Candle, ProviderError> {
        Ok(Candle::new(
            parse_timestamp_millis(self.0)?,
            self.1,
            self.2,
            self.3,
            self.4,
            Decimal::ZERO,
        ))
    }
}

/// 심볼의 기준 자산을 CoinGecko 코인 ID로 변환합니다.
pub fn coin_id(symbol: &Symbol) -> String {
    match symbol.base.as_str() {
        "BTC" => "bitcoin".to_string(),
        "ETH" => "ethereum".to_string(),
        other => other.to_lowercase(),
    }
}

/// 타임프레임에 맞는 봉 간격을 돌려주는 `days` 후보.
fn days_candidates(timeframe: Timeframe) -> Option<&'static [u64]> {
    match timeframe {
        Timeframe::M30 => Some(&HALF_HOUR_DAYS[..]),
        Timeframe::H4 => Some(&FOUR_HOUR_DAYS[..]),
        _ => None,
    }
}

/// 요청한 봉 수를 덮는 가장 작은 `days` 값.
///
/// 후보 중 가장 큰 값으로도 모자라면 가장 큰 값을 사용하며, 이때는 요청보다
/// 적은 봉이 반환됩니다.
fn days_param(request: &SeriesRequest) -> Result<u64, ProviderError> {
    let candidates = days_candidates(request.timeframe).ok_or_else(|| {
        ProviderError::Unsupported(format!(
            "CoinGecko OHLC는 30m, 4h 타임프레임만 지원합니다: {}",
            request.timeframe
        ))
    })?;

    let span_secs = u64::from(request.limit) * request.timeframe.as_secs();
    let needed = span_secs.div_ceil(86_400).max(1);

    let days = candidates
        .iter()
        .copied()
        .find(|days| *days >= needed)
        .or_else(|| candidates.last().copied())
        .unwrap_or(1);

    if days < needed {
        warn!(
            timeframe = %request.timeframe,
            limit = request.limit,
            days,
            "CoinGecko 조회 기간이 요청 봉 수를 덮지 못합니다"
        );
    }

    Ok(days)
}

/// 응답 봉의 최소 간격이 타임프레임과 같은지 확인합니다.
///
/// 누락된 봉으로 생긴 큰 간격은 허용합니다.
fn check_bar_spacing(candles: &[Candle], timeframe: Timeframe) -> Result<(), ProviderError> {
    let expected = timeframe.as_secs() as i64;
    let smallest = candles
        .windows(2)
        .map(|pair| (pair[1].open_time - pair[0].open_time).num_seconds())
        .min();

    match smallest {
        Some(gap) if gap != expected => Err(ProviderError::Unsupported(format!(
            "CoinGecko 봉 간격이 타임프레임과 다릅니다: {}초 (기대값 {}초)",
            gap, expected
        ))),
        _ => Ok(()),
    }
}

/// CoinGecko OHLC 기반 캔들 제공자.
#[derive(Debug)]
pub struct CoinGeckoOhlcProvider {
    config: CoinGeckoConfig,
    client: Client,
}

impl CoinGeckoOhlcProvider {
    /// 새 제공자 생성.
    pub fn new(config: CoinGeckoConfig) -> Result<Self, ProviderError> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl SeriesProvider for CoinGeckoOhlcProvider {
    async fn fetch_candles(&self, request: &SeriesRequest) -> Result<Vec<Candle>, ProviderError> {
        if request.symbol.market_type != MarketType::Crypto {
            return Err(ProviderError::Unsupported(format!(
                "CoinGecko는 암호화폐만 지원합니다: {}",
                request.symbol
            )));
        }

        let days = days_param(request)?;
        let id = coin_id(&request.symbol);
        let rows: Vec<CoinGeckoOhlc> = public_get(
            &self.client,
            &self.config.base_url,
            &["api", "v3", "coins", &id, "ohlc"],
            &[
                ("vs_currency", self.config.vs_currency.clone()),
                ("days", days.to_string()),
            ],
        )
        .await?;

        let mut candles = rows
            .into_iter()
            .map(CoinGeckoOhlc::into_candle)
            .collect::<Result<Vec<_>, _>>()?;
        check_bar_spacing(&candles, request.timeframe)?;

        // 요청한 봉 수만 유지 (최근 것 기준)
        let excess = candles.len().saturating_sub(request.limit as usize);
        candles.drain(..excess);

        debug!(symbol = %request.symbol, count = candles.len(), "CoinGecko OHLC 수신");

        Ok(candles)
    }

    fn provider_name(&self) -> &str {
        "coingecko"
    }
}
