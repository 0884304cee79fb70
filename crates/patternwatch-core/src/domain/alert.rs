//! 알림 페이로드 및 매매 권고.
//!
//! 패턴 감지와 신호 결합 결과를 외부 알림 채널에 넘기기 위한 구조화된 타입입니다.
//! 렌더링은 순수 함수이며 같은 입력은 항상 같은 바이트열을 만듭니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Price, Symbol, Timeframe};

/// 알림 시각 표시 형식.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// 알림 없음 메시지.
pub const NO_ALERT_MESSAGE: &str = "Aucune alerte détectée pour le moment.";

/// 매매 권고.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// 매수
    Buy,
    /// 매도
    Sell,
    /// 관망
    Wait,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Wait => write!(f, "WAIT"),
        }
    }
}

/// 차트 패턴 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// 이중 바닥
    DoubleBottom,
    /// 상향 돌파
    BreakoutUp,
    /// 하향 돌파
    BreakoutDown,
    /// 헤드 앤 숄더
    HeadAndShoulders,
    /// 강세 장악형
    EngulfingBullish,
    /// 약세 장악형
    EngulfingBearish,
    /// 도지
    Doji,
}

impl PatternKind {
    /// 알림 메시지에 표시되는 패턴 이름.
    pub fn label(&self) -> &'static str {
        match self {
            PatternKind::DoubleBottom => "Double Bottom",
            PatternKind::BreakoutUp => "Breakout Haussier",
            PatternKind::BreakoutDown => "Breakout Baissier",
            PatternKind::HeadAndShoulders => "Tête et épaules",
            PatternKind::EngulfingBullish => "Bullish Engulfing",
            PatternKind::EngulfingBearish => "Bearish Engulfing",
            PatternKind::Doji => "Doji",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 패턴이 암시하는 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSignal {
    /// 매수
    Buy,
    /// 매도
    Sell,
    /// 방향성 없음
    Neutral,
}

impl fmt::Display for TradeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSignal::Buy => write!(f, "buy"),
            TradeSignal::Sell => write!(f, "sell"),
            TradeSignal::Neutral => write!(f, "neutral"),
        }
    }
}

/// 패턴 강도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStrength {
    /// 약함
    Weak,
    /// 강함
    Strong,
}

impl fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalStrength::Weak => write!(f, "weak"),
            SignalStrength::Strong => write!(f, "strong"),
        }
    }
}

/// 진입/손절/익절 가격.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeLevels {
    /// 진입가
    pub entry: Price,
    /// 손절가
    pub stop_loss: Price,
    /// 익절가
    pub take_profit: Price,
}

/// 알림에 포함되는 패턴 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSummary {
    /// 패턴 종류
    pub kind: PatternKind,
    /// 패턴 기준 봉의 시작 시간
    pub anchor_time: DateTime<Utc>,
    /// 방향
    pub signal: TradeSignal,
    /// 강도
    pub strength: SignalStrength,
    /// 진입가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<Price>,
    /// 손절가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Price>,
    /// 익절가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Price>,
    /// 확인 지표 라벨
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_label: Option<String>,
    /// 전략 메모
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_note: Option<String>,
}

impl PatternSummary {
    /// 상세 한 줄 렌더링.
    fn render_line(&self) -> String {
        let mut line = format!(
            "- {} [{}] : {} ({})",
            self.kind.label(),
            self.anchor_time.format(TIMESTAMP_FORMAT),
            self.signal,
            self.strength
        );

        if let Some(entry) = self.entry {
            line.push_str(&format!(" | Entrée {}", entry));
        }
        if let Some(stop_loss) = self.stop_loss {
            line.push_str(&format!(" | Stop Loss {}", stop_loss));
        }
        if let Some(take_profit) = self.take_profit {
            line.push_str(&format!(" | Take Profit {}", take_profit));
        }
        if let Some(label) = &self.confirmation_label {
            line.push_str(&format!(" | Confirmé par {}", label));
        }
        if let Some(note) = &self.strategy_note {
            line.push_str(&format!(" | Stratégie : {}", note));
        }

        line
    }
}

/// 외부 알림 채널에 전달되는 구조화된 알림.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPayload {
    /// 심볼
    pub symbol: Symbol,
    /// 타임프레임
    pub timeframe: Timeframe,
    /// 마지막 봉의 시작 시간
    pub last_bar_time: DateTime<Utc>,
    /// 감지된 패턴 (감지 순서)
    pub patterns: Vec<PatternSummary>,
    /// 확인 라벨 (규칙 평가 순서)
    pub confirmations: Vec<String>,
    /// 매매 권고
    pub action: Action,
}

impl AlertPayload {
    /// 감지된 패턴 이름 목록.
    pub fn pattern_names(&self) -> Vec<&'static str> {
        self.patterns.iter().map(|p| p.kind.label()).collect()
    }

    /// 일반 텍스트 메시지로 렌더링합니다.
    pub fn render_text(&self) -> String {
        let confirmations = if self.confirmations.is_empty() {
            "Aucune".to_string()
        } else {
            self.confirmations.join(", ")
        };

        let mut text = format!(
            "ALERTE {} - {}\n\
             Patterns détectés : {}\n\
             Confirmations : {}\n\
             Recommandation : {}",
            self.symbol,
            self.last_bar_time.format(TIMESTAMP_FORMAT),
            self.pattern_names().join(", "),
            confirmations,
            self.action
        );

        for pattern in &self.patterns {
            text.push('\n');
            text.push_str(&pattern.render_line());
        }

        text
    }
}

/// 한 분석 주기의 최종 결과.
///
/// 보고할 패턴이 없는 경우를 빈 문자열이 아닌 명시적인 `NoAlert`로 구분합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AlertOutcome {
    /// 알림 발생
    Alert(AlertPayload),
    /// 감지된 패턴 없음
    NoAlert {
        /// 마지막 봉의 시작 시간
        last_bar_time: DateTime<Utc>,
    },
}

impl AlertOutcome {
    /// 알림 페이로드 (있는 경우).
    pub fn payload(&self) -> Option<&AlertPayload> {
        match self {
            AlertOutcome::Alert(payload) => Some(payload),
            AlertOutcome::NoAlert { .. } => None,
        }
    }

    /// 알림 발생 여부.
    pub fn is_alert(&self) -> bool {
        matches!(self, AlertOutcome::Alert(_))
    }

    /// 마지막 봉의 시작 시간.
    pub fn last_bar_time(&self) -> DateTime<Utc> {
        match self {
            AlertOutcome::Alert(payload) => payload.last_bar_time,
            AlertOutcome::NoAlert { last_bar_time } => *last_bar_time,
        }
    }

    /// 일반 텍스트로 렌더링합니다.
    pub fn render_text(&self) -> String {
        match self {
            AlertOutcome::Alert(payload) => payload.render_text(),
            AlertOutcome::NoAlert { .. } => NO_ALERT_MESSAGE.to_string(),
        }
    }

    /// JSON으로 직렬화합니다.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
