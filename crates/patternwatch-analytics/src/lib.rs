//! 패턴 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 기술적 지표 (RSI, EMA, MACD)
//! - 차트 패턴 감지 (구조적 패턴, 캔들 패턴)
//! - 지표 확인 및 매매 권고 결정
//! - 알림 페이로드 생성
//! - 위 단계를 묶는 분석 파이프라인
//!
//! # Re-exports
//!
//! - [`indicators`]: 지표 엔진 (IndicatorEngine, IndicatorFrame 등)
//! - [`patterns`]: 패턴 감지 (PatternMatch, detect_all 등)
//! - [`pipeline`]: 분석 파이프라인 (AnalysisPipeline)

pub mod alert;
pub mod fusion;
pub mod indicators;
pub mod patterns;
pub mod pipeline;

pub use alert::format_alert;
pub use fusion::{confirm_signal, determine_action, Confirmation, ConfirmationSet};
pub use indicators::{
    EmaParams, IndicatorEngine, IndicatorFrame, IndicatorFrames, IndicatorParams,
    IndicatorStatus, MacdParams, MacdResult, RsiParams,
};
pub use patterns::{
    detect_all, detect_breakout, detect_double_bottom, detect_head_and_shoulders,
    scan_candle_patterns, PatternAnchor, PatternMatch, PatternParams, TradeLevelParams,
};
pub use pipeline::{AnalysisPipeline, PipelineError, PipelineResult};
