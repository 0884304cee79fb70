//! 단일 분석 주기 실행.

use anyhow::{Context, Result};
use patternwatch_core::{AlertOutcome, AppConfig};
use patternwatch_notification::NotificationManager;
use tracing::{info, warn};

use super::CycleContext;

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 사람이 읽는 알림 텍스트
    #[default]
    Text,
    /// JSON
    Json,
}

/// analyze 명령 옵션.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub format: OutputFormat,
    /// 결과를 알림 채널로 전송할지 여부
    pub notify: bool,
}

/// 한 주기를 실행하고 결과를 반환합니다.
pub async fn run_analyze(config: &AppConfig, options: &AnalyzeOptions) -> Result<AlertOutcome> {
    let context = CycleContext::from_config(config)?;

    let outcome = context
        .pipeline
        .run_cycle(context.provider.as_ref(), &context.request)
        .await
        .context("분석 주기 실패")?;

    if options.notify {
        let manager = NotificationManager::from_config(&config.notifications);
        if manager.enabled_count() == 0 {
            warn!("활성화된 알림 채널이 없습니다. 전송을 건너뜁니다");
        } else {
            manager
                .notify_alert(&outcome)
                .await
                .context("알림 전송 실패")?;
            info!(alert = outcome.is_alert(), "알림 처리 완료");
        }
    }

    Ok(outcome)
}

/// 결과를 지정된 형식의 문자열로 렌더링합니다.
pub fn render_outcome(outcome: &AlertOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(outcome.render_text()),
        OutputFormat::Json => outcome.to_json().context("JSON 직렬화 실패"),
    }
}
