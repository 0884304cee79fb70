//! 차트 패턴 감지 모듈.
//!
//! 각 감지기는 캔들 시리즈의 최근 구간만 읽는 순수 함수입니다.
//! 상태가 없으므로 실행 순서나 병렬 실행 여부와 관계없이 같은 결과를 냅니다.
//!
//! ## 구조적 패턴 (`structural`)
//! - **Double Bottom**: 최근 20개 저가 중 최저가 근처(2%) 저점이 2개 이상
//! - **Breakout**: 직전 봉 기준 20봉 최고가/최저가 돌파
//! - **Head and Shoulders**: 최근 종가의 왼쪽 어깨/머리/오른쪽 어깨 형태
//!
//! ## 캔들 패턴 (`candle`)
//! - **Engulfing**: 강세/약세 장악형
//! - **Doji**: 시가와 종가가 거의 같은 봉

pub mod candle;
pub mod structural;

use chrono::{DateTime, Utc};
use patternwatch_core::{
    AnalysisConfig, CandleSeries, PatternKind, Percentage, Price, PriceExt, SignalStrength,
    TradeLevels, TradeSignal,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub use candle::{is_bearish_engulfing, is_bullish_engulfing, is_doji, scan_candle_patterns};
pub use structural::{detect_breakout, detect_double_bottom, detect_head_and_shoulders};

/// 캔들 패턴에 붙는 확인 지표 라벨.
pub const CANDLE_CONFIRMATION_LABEL: &str = "RSI + MACD";

/// 캔들 패턴에 붙는 전략 메모.
pub const CANDLE_STRATEGY_NOTE: &str = "Confirmation par RSI et MACD";

/// 패턴 기준 봉.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternAnchor {
    /// 시리즈 내 인덱스
    pub index: usize,
    /// 봉 시작 시간
    pub open_time: DateTime<Utc>,
}

/// 감지된 패턴.
///
/// 패턴 종류마다 해당 패턴에 필요한 필드만 가집니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternMatch {
    /// 이중 바닥
    DoubleBottom {
        anchor: PatternAnchor,
        /// 구간 최저가
        support: Price,
        /// 최저가 허용 범위 안의 저점 수
        touches: usize,
    },
    /// 상향 돌파
    BreakoutUp {
        anchor: PatternAnchor,
        /// 직전 봉 기준 구간 최고가
        resistance: Price,
        /// 돌파한 종가
        close: Price,
    },
    /// 하향 돌파
    BreakoutDown {
        anchor: PatternAnchor,
        /// 직전 봉 기준 구간 최저가
        support: Price,
        /// 이탈한 종가
        close: Price,
    },
    /// 헤드 앤 숄더
    HeadAndShoulders {
        anchor: PatternAnchor,
        left_shoulder: Price,
        head: Price,
        right_shoulder: Price,
    },
    /// 강세 장악형
    EngulfingBullish { anchor: PatternAnchor },
    /// 약세 장악형
    EngulfingBearish { anchor: PatternAnchor },
    /// 도지
    Doji {
        anchor: PatternAnchor,
        /// 몸통 크기
        body: Decimal,
    },
}

impl PatternMatch {
    /// 패턴 종류.
    pub fn kind(&self) -> PatternKind {
        match self {
            PatternMatch::DoubleBottom { .. } => PatternKind::DoubleBottom,
            PatternMatch::BreakoutUp { .. } => PatternKind::BreakoutUp,
            PatternMatch::BreakoutDown { .. } => PatternKind::BreakoutDown,
            PatternMatch::HeadAndShoulders { .. } => PatternKind::HeadAndShoulders,
            PatternMatch::EngulfingBullish { .. } => PatternKind::EngulfingBullish,
            PatternMatch::EngulfingBearish { .. } => PatternKind::EngulfingBearish,
            PatternMatch::Doji { .. } => PatternKind::Doji,
        }
    }

    /// 기준 봉.
    pub fn anchor(&self) -> PatternAnchor {
        match self {
            PatternMatch::DoubleBottom { anchor, .. }
            | PatternMatch::BreakoutUp { anchor, .. }
            | PatternMatch::BreakoutDown { anchor, .. }
            | PatternMatch::HeadAndShoulders { anchor, .. }
            | PatternMatch::EngulfingBullish { anchor }
            | PatternMatch::EngulfingBearish { anchor }
            | PatternMatch::Doji { anchor, .. } => *anchor,
        }
    }

    /// 패턴이 암시하는 방향.
    pub fn signal(&self) -> TradeSignal {
        match self {
            PatternMatch::DoubleBottom { .. }
            | PatternMatch::BreakoutUp { .. }
            | PatternMatch::EngulfingBullish { .. } => TradeSignal::Buy,
            PatternMatch::BreakoutDown { .. }
            | PatternMatch::HeadAndShoulders { .. }
            | PatternMatch::EngulfingBearish { .. } => TradeSignal::Sell,
            PatternMatch::Doji { .. } => TradeSignal::Neutral,
        }
    }

    /// 패턴 강도.
    pub fn strength(&self) -> SignalStrength {
        match self {
            PatternMatch::Doji { .. } => SignalStrength::Weak,
            _ => SignalStrength::Strong,
        }
    }

    /// 캔들 패턴 여부.
    pub fn is_candle_pattern(&self) -> bool {
        matches!(
            self,
            PatternMatch::EngulfingBullish { .. }
                | PatternMatch::EngulfingBearish { .. }
                | PatternMatch::Doji { .. }
        )
    }

    /// 확인 지표 라벨 (캔들 패턴만).
    pub fn confirmation_label(&self) -> Option<&'static str> {
        self.is_candle_pattern().then_some(CANDLE_CONFIRMATION_LABEL)
    }

    /// 전략 메모 (캔들 패턴만).
    pub fn strategy_note(&self) -> Option<&'static str> {
        self.is_candle_pattern().then_some(CANDLE_STRATEGY_NOTE)
    }

    /// 진입/손절/익절 가격.
    ///
    /// 방향성 있는 패턴만 가격을 가집니다. 매도 신호는 손절/익절 방향이 반대입니다.
    pub fn trade_levels(&self, entry: Price, params: &TradeLevelParams) -> Option<TradeLevels> {
        let (stop_loss, take_profit) = match self.signal() {
            TradeSignal::Buy => (
                entry.lower_by(params.stop_loss_pct),
                entry.raise_by(params.take_profit_pct),
            ),
            TradeSignal::Sell => (
                entry.raise_by(params.stop_loss_pct),
                entry.lower_by(params.take_profit_pct),
            ),
            TradeSignal::Neutral => return None,
        };

        Some(TradeLevels {
            entry: entry.to_display_price(),
            stop_loss: stop_loss.to_display_price(),
            take_profit: take_profit.to_display_price(),
        })
    }
}

/// 손절/익절 비율.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeLevelParams {
    /// 손절 비율 (기본 1%)
    pub stop_loss_pct: Percentage,
    /// 익절 비율 (기본 2%)
    pub take_profit_pct: Percentage,
}

impl Default for TradeLevelParams {
    fn default() -> Self {
        Self {
            stop_loss_pct: dec!(0.01),
            take_profit_pct: dec!(0.02),
        }
    }
}

impl From<&AnalysisConfig> for TradeLevelParams {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            stop_loss_pct: config.stop_loss_pct,
            take_profit_pct: config.take_profit_pct,
        }
    }
}

/// 패턴 감지 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternParams {
    /// 이중 바닥 저가 구간 (기본: 20)
    pub double_bottom_window: usize,
    /// 이중 바닥 최저가 허용 범위 (기본: 0.02)
    pub double_bottom_tolerance: Decimal,
    /// 돌파 기준 구간 (기본: 20)
    pub breakout_window: usize,
    /// 헤드 앤 숄더 종가 구간 (기본: 20)
    pub head_and_shoulders_window: usize,
    /// 어깨 높이 허용 범위 (머리 대비, 기본: 0.02)
    pub shoulder_tolerance: Decimal,
    /// 캔들 패턴 스캔 구간 (기본: 24)
    pub candle_scan_window: usize,
    /// 도지 몸통 임계값 (종가 대비, 기본: 0.001)
    pub doji_threshold: Decimal,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            double_bottom_window: 20,
            double_bottom_tolerance: dec!(0.02),
            breakout_window: 20,
            head_and_shoulders_window: 20,
            shoulder_tolerance: dec!(0.02),
            candle_scan_window: 24,
            doji_threshold: dec!(0.001),
        }
    }
}

impl From<&AnalysisConfig> for PatternParams {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            candle_scan_window: config.candle_scan_window,
            ..Self::default()
        }
    }
}

/// 모든 감지기를 실행합니다.
///
/// 결과 순서는 Double Bottom, Breakout, Head and Shoulders, 캔들 스캔 순으로 고정입니다.
pub fn detect_all(series: &CandleSeries, params: &PatternParams) -> Vec<PatternMatch> {
    let mut matches = Vec::new();

    matches.extend(detect_double_bottom(series, params));
    matches.extend(detect_breakout(series, params));
    matches.extend(detect_head_and_shoulders(series, params));
    matches.extend(scan_candle_patterns(series, params));

    matches
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn anchor() -> PatternAnchor {
        PatternAnchor {
            index: 0,
            open_time: Utc::now(),
        }
    }

    #[test]
    fn test_signal_and_strength() {
        let doji = PatternMatch::Doji {
            anchor: anchor(),
            body: Decimal::ZERO,
        };
        assert_eq!(doji.signal(), TradeSignal::Neutral);
        assert_eq!(doji.strength(), SignalStrength::Weak);
        assert_eq!(doji.confirmation_label(), Some("RSI + MACD"));

        let hs = PatternMatch::HeadAndShoulders {
            anchor: anchor(),
            left_shoulder: dec!(100),
            head: dec!(110),
            right_shoulder: dec!(100),
        };
        assert_eq!(hs.signal(), TradeSignal::Sell);
        assert_eq!(hs.strength(), SignalStrength::Strong);
        assert_eq!(hs.confirmation_label(), None);
        assert_eq!(hs.kind().label(), "Tête et épaules");
    }

    #[test]
    fn test_engulfing_is_strong_candle_pattern() {
        for found in [
            PatternMatch::EngulfingBullish { anchor: anchor() },
            PatternMatch::EngulfingBearish { anchor: anchor() },
        ] {
            assert_eq!(found.strength(), SignalStrength::Strong);
            assert!(found.is_candle_pattern());
            assert_eq!(found.confirmation_label(), Some("RSI + MACD"));
        }
    }

    #[test]
    fn test_trade_levels_buy_and_sell() {
        let params = TradeLevelParams::default();

        let buy = PatternMatch::EngulfingBullish { anchor: anchor() };
        let levels = buy.trade_levels(dec!(100), &params).unwrap();
        assert_eq!(levels.stop_loss, dec!(99));
        assert_eq!(levels.take_profit, dec!(102));

        let sell = PatternMatch::EngulfingBearish { anchor: anchor() };
        let levels = sell.trade_levels(dec!(100), &params).unwrap();
        assert_eq!(levels.stop_loss, dec!(101));
        assert_eq!(levels.take_profit, dec!(98));

        let doji = PatternMatch::Doji {
            anchor: anchor(),
            body: Decimal::ZERO,
        };
        assert!(doji.trade_levels(dec!(100), &params).is_none());
    }

    #[test]
    fn test_detect_all_short_series_has_no_structural_match() {
        let closes: Vec<Decimal> = (0..19).map(|i| dec!(100) + Decimal::from(i)).collect();
        let series = series_from_closes(&closes);

        let matches = detect_all(&series, &PatternParams::default());

        assert!(matches.iter().all(|m| m.is_candle_pattern()));
    }

    #[test]
    fn test_detect_all_order() {
        // 20봉 횡보 후 마지막 봉이 급등: Double Bottom + Breakout Up
        let mut closes = vec![dec!(100); 20];
        closes.push(dec!(110));
        let series = series_from_closes(&closes);

        let kinds: Vec<PatternKind> = detect_all(&series, &PatternParams::default())
            .iter()
            .map(|m| m.kind())
            .collect();

        assert_eq!(kinds[0], PatternKind::DoubleBottom);
        assert_eq!(kinds[1], PatternKind::BreakoutUp);
    }

    #[test]
    fn test_serde_tag() {
        let m = PatternMatch::EngulfingBullish { anchor: anchor() };
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"kind\":\"engulfing_bullish\""));
    }
}
