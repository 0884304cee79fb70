//! 알림 페이로드 생성.

use patternwatch_core::{Action, AlertOutcome, AlertPayload, CandleSeries, PatternSummary};

use crate::fusion::ConfirmationSet;
use crate::patterns::{PatternMatch, TradeLevelParams};

/// 패턴, 확인 목록, 매매 권고로 알림 결과를 만듭니다.
///
/// 감지된 패턴이 없으면 `AlertOutcome::NoAlert`를 반환합니다.
/// 방향성 있는 패턴의 진입가는 시리즈의 마지막 종가입니다.
pub fn format_alert(
    series: &CandleSeries,
    patterns: &[PatternMatch],
    confirmations: &ConfirmationSet,
    action: Action,
    levels: &TradeLevelParams,
) -> AlertOutcome {
    let last = series.last();

    if patterns.is_empty() {
        return AlertOutcome::NoAlert {
            last_bar_time: last.open_time,
        };
    }

    let summaries = patterns
        .iter()
        .map(|pattern| {
            let trade_levels = pattern.trade_levels(last.close, levels);
            PatternSummary {
                kind: pattern.kind(),
                anchor_time: pattern.anchor().open_time,
                signal: pattern.signal(),
                strength: pattern.strength(),
                entry: trade_levels.map(|l| l.entry),
                stop_loss: trade_levels.map(|l| l.stop_loss),
                take_profit: trade_levels.map(|l| l.take_profit),
                confirmation_label: pattern.confirmation_label().map(str::to_string),
                strategy_note: pattern.strategy_note().map(str::to_string),
            }
        })
        .collect();

    AlertOutcome::Alert(AlertPayload {
        symbol: series.symbol().clone(),
        timeframe: series.timeframe(),
        last_bar_time: last.open_time,
        patterns: summaries,
        confirmations: confirmations.labels(),
        action,
    })
}
