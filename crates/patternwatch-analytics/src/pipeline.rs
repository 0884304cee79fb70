//! 분석 파이프라인.
//!
//! 시리즈 → 지표 → 패턴 감지 → 지표 확인 → 알림 결과 순서로 실행합니다.
//! `analyze`는 I/O 없는 순수 계산이며, `run_cycle`만 제공자를 통해 데이터를 가져옵니다.

use patternwatch_core::{
    analysis_span, AlertOutcome, AnalysisConfig, CandleSeries, PatternWatchError, ProviderError,
    SeriesError, SeriesProvider, SeriesRequest,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::alert::format_alert;
use crate::fusion::{confirm_signal, determine_action, ConfirmationSet};
use crate::indicators::{IndicatorEngine, IndicatorParams};
use crate::patterns::{detect_all, PatternParams, TradeLevelParams};

/// 파이프라인 에러.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 분석할 데이터를 얻지 못함
    #[error("데이터를 사용할 수 없습니다: {0}")]
    DataUnavailable(String),
}

impl From<ProviderError> for PipelineError {
    fn from(err: ProviderError) -> Self {
        PipelineError::DataUnavailable(err.to_string())
    }
}

impl From<SeriesError> for PipelineError {
    fn from(err: SeriesError) -> Self {
        PipelineError::DataUnavailable(err.to_string())
    }
}

impl From<PipelineError> for PatternWatchError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::DataUnavailable(message) => PatternWatchError::Data(message),
        }
    }
}

/// 파이프라인 결과 타입.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// 분석 파이프라인.
///
/// 주기마다 상태를 새로 만들며 주기 사이에 공유하는 상태가 없습니다.
#[derive(Debug, Default)]
pub struct AnalysisPipeline {
    engine: IndicatorEngine,
    pattern_params: PatternParams,
    level_params: TradeLevelParams,
}

impl AnalysisPipeline {
    /// 기본 파라미터로 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 분석 설정으로 생성.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            engine: IndicatorEngine::with_params(IndicatorParams::from(config)),
            pattern_params: PatternParams::from(config),
            level_params: TradeLevelParams::from(config),
        }
    }

    /// 패턴 감지 파라미터.
    pub fn pattern_params(&self) -> &PatternParams {
        &self.pattern_params
    }

    /// 시리즈 하나를 분석합니다.
    pub fn analyze(&self, series: &CandleSeries) -> AlertOutcome {
        let _span = analysis_span!("analyze", series.symbol(), series.timeframe()).entered();
        let frames = self.engine.compute(&series.closes());
        let patterns = detect_all(series, &self.pattern_params);

        let confirmations = frames
            .last()
            .map(|frame| confirm_signal(frame, series.last()))
            .unwrap_or_default();
        let action = determine_action(&confirmations);

        debug!(
            symbol = %series.symbol(),
            bars = series.len(),
            patterns = patterns.len(),
            confirmations = ?confirmations.labels(),
            %action,
            "분석 완료"
        );

        format_alert(
            series,
            &patterns,
            &confirmations,
            action,
            &self.level_params,
        )
    }

    /// 최신 확인 목록만 계산합니다.
    pub fn confirmations(&self, series: &CandleSeries) -> ConfirmationSet {
        let frames = self.engine.compute(&series.closes());
        frames
            .last()
            .map(|frame| confirm_signal(frame, series.last()))
            .unwrap_or_default()
    }

    /// 제공자에서 캔들을 가져와 한 주기를 실행합니다.
    ///
    /// 제공자 실패, 빈 응답, 잘못된 시계열은 `PipelineError::DataUnavailable`입니다.
    pub async fn run_cycle(
        &self,
        provider: &dyn SeriesProvider,
        request: &SeriesRequest,
    ) -> PipelineResult<AlertOutcome> {
        if !request.meets_recommended_lookback() {
            warn!(
                limit = request.limit,
                "조회 봉 수가 권장 최소값보다 적습니다"
            );
        }

        let candles = provider.fetch_candles(request).await.map_err(|e| {
            warn!(provider = provider.provider_name(), error = %e, "캔들 조회 실패");
            PipelineError::from(e)
        })?;

        if candles.is_empty() {
            return Err(PipelineError::DataUnavailable(format!(
                "{}: {} 응답이 비어 있습니다",
                provider.provider_name(),
                request.symbol
            )));
        }

        let series = CandleSeries::new(request.symbol.clone(), request.timeframe, candles)?;
        let outcome = self.analyze(&series);

        info!(
            provider = provider.provider_name(),
            symbol = %request.symbol,
            timeframe = %request.timeframe,
            alert = outcome.is_alert(),
            "분석 주기 완료"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_unavailable_maps_to_retryable_data_error() {
        let pipeline_err = PipelineError::from(ProviderError::Parse("bad row".to_string()));
        let err = PatternWatchError::from(pipeline_err);

        assert!(matches!(err, PatternWatchError::Data(ref m) if m.contains("bad row")));
        assert!(err.is_retryable());
    }
}
