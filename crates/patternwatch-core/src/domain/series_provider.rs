//! 캔들 시리즈 제공자 추상화.
//!
//! 시장 데이터 클라이언트(거래소, 시세 집계 서비스)로부터 캔들을 조회하기 위한
//! 제공자 중립적인 인터페이스를 제공합니다. 파이프라인은 이 trait에만 의존합니다.

use async_trait::async_trait;
use thiserror::Error;

use super::Candle;
use crate::types::{Symbol, Timeframe};

/// MACD(26) + 시그널(9) 계산에 필요한 권장 최소 조회 봉 수.
pub const MIN_RECOMMENDED_LOOKBACK: u32 = 50;

// =============================================================================
// 에러 타입
// =============================================================================

/// SeriesProvider 에러.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// API 에러 (HTTP 상태 코드 포함)
    #[error("API 에러 {status}: {message}")]
    Api { status: u16, message: String },

    /// 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 지원하지 않는 요청
    #[error("지원하지 않는 요청: {0}")]
    Unsupported(String),
}

// =============================================================================
// 요청
// =============================================================================

/// 캔들 조회 요청.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    /// 심볼
    pub symbol: Symbol,
    /// 타임프레임
    pub timeframe: Timeframe,
    /// 최근 N개 봉
    pub limit: u32,
}

impl SeriesRequest {
    /// 새 요청을 생성합니다.
    pub fn new(symbol: Symbol, timeframe: Timeframe, limit: u32) -> Self {
        Self {
            symbol,
            timeframe,
            limit,
        }
    }

    /// 권장 최소 조회 봉 수를 만족하는지 확인합니다.
    pub fn meets_recommended_lookback(&self) -> bool {
        self.limit >= MIN_RECOMMENDED_LOOKBACK
    }
}

// =============================================================================
// SeriesProvider Trait
// =============================================================================

/// 캔들 시리즈 제공자 trait.
///
/// 구현체는 요청된 심볼/타임프레임의 최근 캔들을 오래된 순서로 반환합니다.
/// 빈 벡터 반환은 허용되며, 파이프라인이 분석 전에 주기를 중단합니다.
///
/// # 구현 예시
///
/// ```ignore
/// pub struct BinanceKlineProvider {
///     client: reqwest::Client,
/// }
///
/// #[async_trait]
/// impl SeriesProvider for BinanceKlineProvider {
///     async fn fetch_candles(&self, request: &SeriesRequest) -> Result<Vec<Candle>, ProviderError> {
///         // /api/v3/klines 호출 및 변환
///     }
///
///     fn provider_name(&self) -> &str {
///         "binance"
///     }
/// }
/// ```
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// 최근 캔들 조회.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Network`: 네트워크 연결 실패
    /// - `ProviderError::Api`: 제공자가 오류 상태 코드를 반환
    /// - `ProviderError::Parse`: 응답 형식이 잘못됨
    async fn fetch_candles(&self, request: &SeriesRequest) -> Result<Vec<Candle>, ProviderError>;

    /// 제공자 이름 반환 (로깅용).
    fn provider_name(&self) -> &str;
}
