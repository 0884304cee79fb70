//! 기술적 지표 모듈.
//!
//! 종가 시퀀스에서 패턴 확인에 사용하는 지표를 계산합니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **EMA**: 지수 이동평균 (Exponential Moving Average)
//! - **MACD**: 이동평균 수렴/확산 (Moving Average Convergence Divergence)
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **RSI**: 상대강도지수 (Relative Strength Index)
//!
//! # 사용 예시
//!
//! ```ignore
//! use patternwatch_analytics::indicators::IndicatorEngine;
//!
//! let engine = IndicatorEngine::new();
//! let frames = engine.compute(&series.closes());
//!
//! if let Some(frame) = frames.last() {
//!     println!("RSI: {:?}", frame.rsi);
//! }
//! ```

pub mod momentum;
pub mod trend;

use patternwatch_core::AnalysisConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use momentum::{MomentumCalculator, RsiParams};
pub use trend::{EmaParams, MacdParams, MacdResult, TrendIndicators};

/// 지표 계산 상태.
///
/// 데이터 부족은 에러가 아니라 상태로 보고됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IndicatorStatus {
    /// 최소 한 개 이상의 값이 정의됨
    Ready,
    /// 데이터 부족 (모든 값이 `None`)
    InsufficientData { required: usize, provided: usize },
}

impl IndicatorStatus {
    fn evaluate<'a>(
        mut values: impl Iterator<Item = &'a Option<Decimal>>,
        required: usize,
        provided: usize,
    ) -> Self {
        if values.any(|v| v.is_some()) {
            IndicatorStatus::Ready
        } else {
            IndicatorStatus::InsufficientData { required, provided }
        }
    }

    /// 계산 완료 여부.
    pub fn is_ready(&self) -> bool {
        matches!(self, IndicatorStatus::Ready)
    }
}

/// 지표 엔진 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorParams {
    /// RSI 파라미터
    pub rsi: RsiParams,
    /// 추세 EMA 파라미터
    pub ema: EmaParams,
    /// MACD 파라미터
    pub macd: MacdParams,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi: RsiParams::default(),
            ema: EmaParams::default(),
            macd: MacdParams::default(),
        }
    }
}

impl From<&AnalysisConfig> for IndicatorParams {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            rsi: RsiParams {
                period: config.rsi_period,
            },
            ema: EmaParams {
                period: config.ema_period,
            },
            macd: MacdParams {
                fast_period: config.macd_fast,
                slow_period: config.macd_slow,
                signal_period: config.macd_signal,
            },
        }
    }
}

/// 봉 하나에 대응하는 지표 값.
///
/// `None`은 해당 시점까지의 데이터로 값이 정의되지 않음을 뜻합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    /// RSI
    pub rsi: Option<Decimal>,
    /// 추세 EMA (기본 20)
    pub ema20: Option<Decimal>,
    /// MACD 라인
    pub macd: Option<Decimal>,
    /// MACD 시그널 라인
    pub macd_signal: Option<Decimal>,
    /// MACD 히스토그램
    pub macd_histogram: Option<Decimal>,
}

/// 시리즈 전체의 지표 프레임과 지표별 상태.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorFrames {
    /// 캔들과 1:1로 정렬된 프레임
    pub frames: Vec<IndicatorFrame>,
    /// RSI 상태
    pub rsi_status: Option<IndicatorStatus>,
    /// EMA 상태
    pub ema_status: Option<IndicatorStatus>,
    /// MACD 라인 상태
    pub macd_status: Option<IndicatorStatus>,
    /// MACD 시그널 상태
    pub signal_status: Option<IndicatorStatus>,
}

impl IndicatorFrames {
    /// 프레임 수.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// 비어 있는지 확인.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// 인덱스의 프레임.
    pub fn get(&self, index: usize) -> Option<&IndicatorFrame> {
        self.frames.get(index)
    }

    /// 가장 최근 프레임.
    pub fn last(&self) -> Option<&IndicatorFrame> {
        self.frames.last()
    }

    /// 모든 지표가 계산되었는지 확인.
    pub fn all_ready(&self) -> bool {
        [
            self.rsi_status,
            self.ema_status,
            self.macd_status,
            self.signal_status,
        ]
        .iter()
        .all(|s| s.is_some_and(|s| s.is_ready()))
    }
}

/// 통합 지표 엔진.
///
/// RSI, 추세 EMA, MACD를 한 번에 계산하여 봉별 프레임으로 묶습니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    params: IndicatorParams,
}

impl IndicatorEngine {
    /// 기본 파라미터(RSI 14, EMA 20, MACD 12/26/9)로 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지정한 파라미터로 엔진 생성.
    pub fn with_params(params: IndicatorParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// 엔진 파라미터.
    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    // ==================== 개별 지표 ====================

    /// 지수 이동평균 (EMA) 계산.
    pub fn ema(&self, prices: &[Decimal], params: EmaParams) -> Vec<Option<Decimal>> {
        self.trend.ema(prices, params)
    }

    /// MACD 계산.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> Vec<MacdResult> {
        self.trend.macd(prices, params)
    }

    /// RSI 계산.
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> Vec<Option<Decimal>> {
        self.momentum.rsi(prices, params)
    }

    // ==================== 통합 계산 ====================

    /// 종가 시퀀스에서 모든 지표 프레임을 계산합니다.
    ///
    /// 빈 입력은 빈 프레임을 반환합니다. 프레임 `i`는 `closes[..=i]`에만 의존합니다.
    pub fn compute(&self, closes: &[Decimal]) -> IndicatorFrames {
        if closes.is_empty() {
            return IndicatorFrames::default();
        }

        let provided = closes.len();
        let rsi = self.rsi(closes, self.params.rsi);
        let ema = self.ema(closes, self.params.ema);
        let macd = self.macd(closes, self.params.macd);

        let rsi_status = IndicatorStatus::evaluate(rsi.iter(), self.params.rsi.required(), provided);
        let ema_status = IndicatorStatus::evaluate(ema.iter(), self.params.ema.period, provided);
        let macd_line: Vec<Option<Decimal>> = macd.iter().map(|m| m.macd).collect();
        let macd_signal: Vec<Option<Decimal>> = macd.iter().map(|m| m.signal).collect();
        let macd_status = IndicatorStatus::evaluate(
            macd_line.iter(),
            self.params.macd.line_required(),
            provided,
        );
        let signal_status = IndicatorStatus::evaluate(
            macd_signal.iter(),
            self.params.macd.signal_required(),
            provided,
        );

        let frames: Vec<IndicatorFrame> = rsi
            .into_iter()
            .zip(ema)
            .zip(macd)
            .map(|((rsi, ema20), macd)| IndicatorFrame {
                rsi,
                ema20,
                macd: macd.macd,
                macd_signal: macd.signal,
                macd_histogram: macd.histogram,
            })
            .collect();

        debug!(
            bars = provided,
            rsi_ready = rsi_status.is_ready(),
            ema_ready = ema_status.is_ready(),
            macd_ready = macd_status.is_ready(),
            signal_ready = signal_status.is_ready(),
            "지표 계산 완료"
        );

        IndicatorFrames {
            frames,
            rsi_status: Some(rsi_status),
            ema_status: Some(ema_status),
            macd_status: Some(macd_status),
            signal_status: Some(signal_status),
        }
    }
}
