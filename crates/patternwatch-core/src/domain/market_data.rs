//! 캔들 및 캔들 시리즈.
//!
//! 이 모듈은 분석 파이프라인의 입력 데이터를 정의합니다:
//! - `Candle` - OHLCV 봉 하나
//! - `CandleSeries` - 시간순으로 정렬된 불변 캔들 시퀀스

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, Quantity, Symbol, Timeframe};

/// OHLCV 캔들스틱 데이터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// 캔들 시작 시간
    pub open_time: DateTime<Utc>,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량 (기준 자산 단위)
    pub volume: Quantity,
}

impl Candle {
    /// 새 캔들을 생성합니다.
    pub fn new(
        open_time: DateTime<Utc>,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 캔들 몸통 크기(절대값)를 반환합니다.
    pub fn body_size(&self) -> Decimal {
        (self.close - self.open).abs()
    }

    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 음봉(종가 < 시가)인지 확인합니다.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// 캔들 시리즈 생성 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    /// 캔들이 하나도 없음
    #[error("캔들 시리즈가 비어 있습니다")]
    Empty,

    /// 시간 순서가 엄격하게 증가하지 않음
    #[error("캔들 시간이 증가하지 않습니다: index {index}")]
    NonMonotonic { index: usize },
}

/// 시간순으로 정렬된 불변 캔들 시리즈.
///
/// 생성 시점에 비어 있지 않고 `open_time`이 엄격하게 증가함이 보장됩니다.
/// 생성 이후에는 읽기 전용 접근만 제공합니다.
#[derive(Debug, Clone, Serialize)]
pub struct CandleSeries {
    symbol: Symbol,
    timeframe: Timeframe,
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// 캔들 목록을 검증하여 시리즈를 생성합니다.
    pub fn new(
        symbol: Symbol,
        timeframe: Timeframe,
        candles: Vec<Candle>,
    ) -> Result<Self, SeriesError> {
        if candles.is_empty() {
            return Err(SeriesError::Empty);
        }

        if let Some(pos) = candles
            .windows(2)
            .position(|pair| pair[1].open_time <= pair[0].open_time)
        {
            return Err(SeriesError::NonMonotonic { index: pos + 1 });
        }

        Ok(Self {
            symbol,
            timeframe,
            candles,
        })
    }

    /// 심볼.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// 타임프레임.
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// 전체 캔들.
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// 캔들 수.
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// 항상 false (빈 시리즈는 생성되지 않음).
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// 가장 최근 캔들.
    pub fn last(&self) -> &Candle {
        &self.candles[self.candles.len() - 1]
    }

    /// 최근 `n`개 캔들 (시리즈가 더 짧으면 전체).
    pub fn tail(&self, n: usize) -> &[Candle] {
        let start = self.candles.len().saturating_sub(n);
        &self.candles[start..]
    }

    /// 종가 시퀀스.
    pub fn closes(&self) -> Vec<Decimal> {
        self.candles.iter().map(|c| c.close).collect()
    }
}
