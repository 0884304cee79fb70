//! 지표 확인 및 매매 권고 결정.
//!
//! 마지막 봉의 지표 프레임과 캔들만으로 확인 목록을 만들고,
//! 확인 목록만으로 BUY/SELL/WAIT를 결정합니다.

use patternwatch_core::{Action, Candle};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::indicators::IndicatorFrame;

/// 지표 확인 조건.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confirmation {
    /// RSI < 30
    Oversold,
    /// MACD > 시그널
    BullishMomentum,
    /// 종가 > EMA20
    AboveTrend,
}

impl Confirmation {
    /// 알림에 표시되는 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            Confirmation::Oversold => "RSI < 30",
            Confirmation::BullishMomentum => "MACD haussier",
            Confirmation::AboveTrend => "Cours > EMA20",
        }
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 순서가 있고 중복이 없는 확인 목록.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationSet(Vec<Confirmation>);

impl ConfirmationSet {
    /// 빈 목록 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 확인 조건 추가 (이미 있으면 무시).
    pub fn insert(&mut self, confirmation: Confirmation) {
        if !self.0.contains(&confirmation) {
            self.0.push(confirmation);
        }
    }

    /// 포함 여부.
    pub fn contains(&self, confirmation: Confirmation) -> bool {
        self.0.contains(&confirmation)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Confirmation> {
        self.0.iter()
    }

    /// 라벨 목록.
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(|c| c.label().to_string()).collect()
    }
}

impl FromIterator<Confirmation> for ConfirmationSet {
    fn from_iter<I: IntoIterator<Item = Confirmation>>(iter: I) -> Self {
        let mut set = Self::new();
        for confirmation in iter {
            set.insert(confirmation);
        }
        set
    }
}

/// 마지막 봉의 지표로 확인 목록을 만듭니다.
///
/// 규칙은 RSI, MACD, EMA 순서로 평가되며 값이 정의되지 않은 규칙은 건너뜁니다.
pub fn confirm_signal(frame: &IndicatorFrame, candle: &Candle) -> ConfirmationSet {
    let mut set = ConfirmationSet::new();

    if frame.rsi.is_some_and(|rsi| rsi < dec!(30)) {
        set.insert(Confirmation::Oversold);
    }

    if let (Some(macd), Some(signal)) = (frame.macd, frame.macd_signal) {
        if macd > signal {
            set.insert(Confirmation::BullishMomentum);
        }
    }

    if frame.ema20.is_some_and(|ema| candle.close > ema) {
        set.insert(Confirmation::AboveTrend);
    }

    set
}

/// 확인 목록에서 매매 권고를 결정합니다.
///
/// - 과매도 + 상승 모멘텀 → BUY
/// - 상승 모멘텀도 추세 위도 아니면 → SELL
/// - 그 외 → WAIT
///
/// BUY와 SELL 조건은 대칭이 아닙니다. 매매 동작이 바뀌므로 임의로 대칭화하지 않습니다.
pub fn determine_action(confirmations: &ConfirmationSet) -> Action {
    let oversold = confirmations.contains(Confirmation::Oversold);
    let momentum = confirmations.contains(Confirmation::BullishMomentum);
    let above_trend = confirmations.contains(Confirmation::AboveTrend);

    if oversold && momentum {
        Action::Buy
    } else if !momentum && !above_trend {
        Action::Sell
    } else {
        Action::Wait
    }
}
