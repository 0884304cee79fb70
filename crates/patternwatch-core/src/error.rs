//! 파이프라인 셸의 에러 타입.
//!
//! 분석 코어는 예상 가능한 상황(데이터 부족, 짧은 윈도우)에서 에러를 만들지 않습니다.
//! 이 모듈의 에러는 설정 로드, 데이터 수집, 알림 전송 등 코어 바깥 경계에서만 사용됩니다.

use thiserror::Error;

/// 최상위 에러.
#[derive(Debug, Error)]
pub enum PatternWatchError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 에러 (제공자 응답 없음, 잘못된 시리즈 등)
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 알림 전송 에러
    #[error("알림 에러: {0}")]
    Notification(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 셸 작업을 위한 Result 타입.
pub type PatternWatchResult<T> = Result<T, PatternWatchError>;

impl PatternWatchError {
    /// 다음 주기에서 다시 시도할 수 있는 에러인지 확인합니다.
    ///
    /// 데이터 수집과 알림 전송 실패는 현재 주기만 중단시킵니다.
    /// 설정 에러는 다음 주기에도 그대로이므로 감시를 멈춥니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PatternWatchError::Data(_) | PatternWatchError::Notification(_)
        )
    }
}

impl From<serde_json::Error> for PatternWatchError {
    fn from(err: serde_json::Error) -> Self {
        PatternWatchError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for PatternWatchError {
    fn from(err: config::ConfigError) -> Self {
        PatternWatchError::Config(err.to_string())
    }
}
