//! 시장 데이터 커넥터.
//!
//! 공개 REST API에서 캔들을 조회하는 `SeriesProvider` 구현체.

pub mod binance;
pub mod coingecko;

pub use binance::{BinanceConfig, BinanceKlineProvider};
pub use coingecko::{CoinGeckoConfig, CoinGeckoOhlcProvider};

use patternwatch_core::ProviderError;
use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

/// 타임아웃이 설정된 HTTP 클라이언트 생성.
pub(crate) fn build_client(timeout_secs: u64) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))
}

/// 기본 URL 뒤에 경로 세그먼트를 붙입니다.
///
/// 각 세그먼트는 퍼센트 인코딩됩니다.
pub(crate) fn endpoint_url(base_url: &str, segments: &[&str]) -> Result<Url, ProviderError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ProviderError::Unsupported(format!("잘못된 기본 URL {}: {}", base_url, e)))?;

    url.path_segments_mut()
        .map_err(|_| ProviderError::Unsupported(format!("경로를 붙일 수 없는 URL: {}", base_url)))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// 공개 API GET 요청.
pub(crate) async fn public_get<T: for<'de> Deserialize<'de>>(
    client: &Client,
    base_url: &str,
    segments: &[&str],
    params: &[(&str, String)],
) -> Result<T, ProviderError> {
    let url = endpoint_url(base_url, segments)?;

    debug!(%url, ?params, "GET");

    let response = client
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    handle_response(response).await
}

async fn handle_response<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    if status.is_success() {
        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse response: {} - Body: {}", e, body);
            ProviderError::Parse(e.to_string())
        })
    } else {
        Err(ProviderError::Api {
            status: status.as_u16(),
            message: body,
        })
    }
}

/// 문자열 가격 파싱.
pub(crate) fn parse_decimal(field: &str, s: &str) -> Result<Decimal, ProviderError> {
    s.parse()
        .map_err(|_| ProviderError::Parse(format!("{} 값이 숫자가 아닙니다: {}", field, s)))
}

/// 밀리초 타임스탬프 변환.
pub(crate) fn parse_timestamp_millis(
    millis: i64,
) -> Result<chrono::DateTime<chrono::Utc>, ProviderError> {
    chrono::DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| ProviderError::Parse(format!("잘못된 타임스탬프: {}", millis)))
}
