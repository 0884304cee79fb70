//! 주기적 분석 데몬.
//!
//! 설정된 간격마다 분석 주기를 실행하고 알림을 전송합니다.
//! 데이터 수집과 알림 전송 실패는 로그만 남기고 다음 주기로 넘어가며,
//! 설정 에러는 감시를 중단시킵니다.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use patternwatch_core::{AppConfig, PatternWatchError};
use patternwatch_notification::NotificationManager;
use tracing::{error, info, warn};

use super::CycleContext;

/// watch 명령 옵션.
#[derive(Debug, Clone, Default)]
pub struct WatchOptions {
    /// 실행할 최대 주기 수 (None이면 종료 신호까지)
    pub max_cycles: Option<u64>,
}

/// 주기 실행 통계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    pub cycles: u64,
    pub alerts: u64,
    pub failures: u64,
}

/// Ctrl-C 또는 최대 주기 수에 도달할 때까지 분석 주기를 반복합니다.
pub async fn run_watch(config: &AppConfig, options: &WatchOptions) -> Result<WatchStats> {
    let context = CycleContext::from_config(config)?;
    let manager = if config.notifications.enabled {
        Some(NotificationManager::from_config(&config.notifications))
    } else {
        None
    };

    info!(
        symbol = %context.request.symbol,
        timeframe = %context.request.timeframe,
        provider = %config.market.provider,
        interval_minutes = config.schedule.interval_minutes,
        "감시 시작"
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "종료 신호 처리기를 등록하지 못했습니다");
            std::future::pending::<()>().await;
        }
    };

    watch_until(
        &context,
        manager.as_ref(),
        config.schedule.interval(),
        options,
        shutdown,
    )
    .await
}

/// `shutdown`이 완료될 때까지 `period` 간격으로 분석 주기를 반복합니다.
///
/// 진행 중인 주기도 `shutdown`에 의해 즉시 중단됩니다.
pub async fn watch_until<F>(
    context: &CycleContext,
    manager: Option<&NotificationManager>,
    period: Duration,
    options: &WatchOptions,
    shutdown: F,
) -> Result<WatchStats>
where
    F: Future<Output = ()>,
{
    let mut stats = WatchStats::default();
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("종료 신호 수신, 감시를 중단합니다");
                break;
            }
            _ = interval.tick() => {}
        }

        stats.cycles += 1;

        let result = tokio::select! {
            _ = &mut shutdown => {
                info!(cycle = stats.cycles, "종료 신호 수신, 진행 중인 주기를 중단합니다");
                break;
            }
            result = run_cycle_once(context, manager) => result,
        };

        match result {
            Ok(true) => stats.alerts += 1,
            Ok(false) => {}
            Err(e) if e.is_retryable() => {
                stats.failures += 1;
                error!(cycle = stats.cycles, error = %e, "분석 주기 실패");
                report_failure(manager, &e).await;
            }
            Err(e) => {
                error!(cycle = stats.cycles, error = %e, "복구할 수 없는 에러로 감시를 중단합니다");
                return Err(e.into());
            }
        }

        if options.max_cycles.is_some_and(|max| stats.cycles >= max) {
            break;
        }
    }

    info!(
        cycles = stats.cycles,
        alerts = stats.alerts,
        failures = stats.failures,
        "감시 종료"
    );

    Ok(stats)
}

/// 한 주기를 실행하고 알림을 보냅니다. 알림이 생성되었으면 `true`.
async fn run_cycle_once(
    context: &CycleContext,
    manager: Option<&NotificationManager>,
) -> Result<bool, PatternWatchError> {
    let outcome = context
        .pipeline
        .run_cycle(context.provider.as_ref(), &context.request)
        .await?;

    println!("{}", outcome.render_text());

    if let Some(manager) = manager {
        manager.notify_alert(&outcome).await?;
    }

    Ok(outcome.is_alert())
}

/// 데이터 수집 실패를 알림 채널로 보고합니다.
async fn report_failure(manager: Option<&NotificationManager>, err: &PatternWatchError) {
    let (Some(manager), PatternWatchError::Data(message)) = (manager, err) else {
        return;
    };

    if let Err(notify_err) = manager
        .notify_system_error("DATA_UNAVAILABLE", message)
        .await
    {
        warn!(error = %notify_err, "오류 알림 전송 실패");
    }
}
