//! 구조적 차트 패턴.
//!
//! 모든 감지기는 마지막 봉을 기준으로 0개 또는 1개의 패턴을 반환합니다.
//! 이력이 부족하면 `None`을 반환합니다.

use patternwatch_core::{CandleSeries, Price};
use rust_decimal::Decimal;
use tracing::trace;

use super::{PatternAnchor, PatternMatch, PatternParams};

fn last_anchor(series: &CandleSeries) -> PatternAnchor {
    PatternAnchor {
        index: series.len() - 1,
        open_time: series.last().open_time,
    }
}

/// Double Bottom 감지.
///
/// 최근 `double_bottom_window`개 저가의 최저가 `m`에 대해
/// `m * (1 + tolerance)` 이하인 저가가 2개 이상이면 감지합니다.
pub fn detect_double_bottom(series: &CandleSeries, params: &PatternParams) -> Option<PatternMatch> {
    let window = params.double_bottom_window;
    if window == 0 || series.len() < window {
        return None;
    }

    let lows: Vec<Price> = series.tail(window).iter().map(|c| c.low).collect();
    let support = lows.iter().copied().min()?;
    let threshold = support * (Decimal::ONE + params.double_bottom_tolerance);
    let touches = lows.iter().filter(|low| **low <= threshold).count();

    trace!(%support, touches, "double bottom scan");

    (touches >= 2).then(|| PatternMatch::DoubleBottom {
        anchor: last_anchor(series),
        support,
        touches,
    })
}

/// Breakout 감지.
///
/// 마지막 종가를 직전 봉까지의 `breakout_window`봉 최고가/최저가와 비교합니다.
/// 마지막 봉 자신은 기준 구간에 포함되지 않습니다.
pub fn detect_breakout(series: &CandleSeries, params: &PatternParams) -> Option<PatternMatch> {
    let window = params.breakout_window;
    if window == 0 || series.len() < window + 1 {
        return None;
    }

    let candles = series.candles();
    let last_idx = candles.len() - 1;
    let prior = &candles[last_idx - window..last_idx];

    let resistance = prior.iter().map(|c| c.high).max()?;
    let support = prior.iter().map(|c| c.low).min()?;
    let close = candles[last_idx].close;

    trace!(%resistance, %support, %close, "breakout scan");

    if close > resistance {
        Some(PatternMatch::BreakoutUp {
            anchor: last_anchor(series),
            resistance,
            close,
        })
    } else if close < support {
        Some(PatternMatch::BreakoutDown {
            anchor: last_anchor(series),
            support,
            close,
        })
    } else {
        None
    }
}

/// Head and Shoulders 감지.
///
/// 최근 종가 구간에서 -7(왼쪽 어깨), -4(머리), -1(오른쪽 어깨) 위치를 비교합니다.
/// `left < head > right`이고 두 어깨 차이가 머리의 `shoulder_tolerance` 미만이면 감지합니다.
pub fn detect_head_and_shoulders(
    series: &CandleSeries,
    params: &PatternParams,
) -> Option<PatternMatch> {
    let window = params.head_and_shoulders_window.max(7);
    if series.len() < window {
        return None;
    }

    let closes: Vec<Price> = series.tail(window).iter().map(|c| c.close).collect();
    let n = closes.len();
    let left_shoulder = closes[n - 7];
    let head = closes[n - 4];
    let right_shoulder = closes[n - 1];

    let is_peak = left_shoulder < head && head > right_shoulder;
    let shoulders_level = (left_shoulder - right_shoulder).abs() < params.shoulder_tolerance * head;

    (is_peak && shoulders_level).then(|| PatternMatch::HeadAndShoulders {
        anchor: last_anchor(series),
        left_shoulder,
        head,
        right_shoulder,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use patternwatch_core::PatternKind;
    use rust_decimal_macros::dec;

    #[test]
    fn test_double_bottom_two_touches() {
        let mut closes = vec![dec!(110); 20];
        closes[5] = dec!(100);
        closes[15] = dec!(101);
        let series = series_from_closes(&closes);

        let found = detect_double_bottom(&series, &PatternParams::default()).unwrap();
        match found {
            PatternMatch::DoubleBottom {
                anchor,
                support,
                touches,
            } => {
                assert_eq!(anchor.index, 19);
                assert_eq!(support, dec!(99));
                assert_eq!(touches, 2);
            }
            other => panic!("unexpected pattern: {:?}", other),
        }
    }

    #[test]
    fn test_double_bottom_single_touch() {
        let mut closes = vec![dec!(110); 20];
        closes[5] = dec!(100);
        let series = series_from_closes(&closes);

        assert!(detect_double_bottom(&series, &PatternParams::default()).is_none());
    }

    #[test]
    fn test_double_bottom_needs_20_bars() {
        let series = series_from_closes(&[dec!(100); 19]);
        assert!(detect_double_bottom(&series, &PatternParams::default()).is_none());
    }

    #[test]
    fn test_breakout_up_uses_previous_window() {
        let mut closes = vec![dec!(100); 20];
        closes.push(dec!(101.5));
        let series = series_from_closes(&closes);

        // 직전 20봉 최고가 101 < 종가 101.5
        let found = detect_breakout(&series, &PatternParams::default()).unwrap();
        assert_eq!(found.kind(), PatternKind::BreakoutUp);
        assert_eq!(found.anchor().index, 20);
    }

    #[test]
    fn test_breakout_ignores_own_high() {
        // 마지막 봉의 고가가 아무리 높아도 기준 구간에 포함되지 않음
        let mut bars = vec![(dec!(100), dec!(101), dec!(99), dec!(100)); 20];
        bars.push((dec!(100), dec!(150), dec!(99), dec!(100.5)));
        let series = series_from_ohlc(&bars);

        assert!(detect_breakout(&series, &PatternParams::default()).is_none());
    }

    #[test]
    fn test_breakout_down() {
        let mut closes = vec![dec!(100); 20];
        closes.push(dec!(98));
        let series = series_from_closes(&closes);

        let found = detect_breakout(&series, &PatternParams::default()).unwrap();
        assert_eq!(found.kind(), PatternKind::BreakoutDown);
    }

    #[test]
    fn test_breakout_needs_21_bars() {
        let mut closes = vec![dec!(100); 19];
        closes.push(dec!(120));
        let series = series_from_closes(&closes);

        assert!(detect_breakout(&series, &PatternParams::default()).is_none());
    }

    #[test]
    fn test_head_and_shoulders() {
        let mut closes = vec![dec!(90); 20];
        closes[13] = dec!(100); // 왼쪽 어깨 (-7)
        closes[16] = dec!(110); // 머리 (-4)
        closes[19] = dec!(101); // 오른쪽 어깨 (-1)
        let series = series_from_closes(&closes);

        let found = detect_head_and_shoulders(&series, &PatternParams::default()).unwrap();
        assert_eq!(found.kind(), PatternKind::HeadAndShoulders);
        assert_eq!(found.anchor().index, 19);
    }

    #[test]
    fn test_head_and_shoulders_uneven_shoulders() {
        let mut closes = vec![dec!(90); 20];
        closes[13] = dec!(100);
        closes[16] = dec!(110);
        closes[19] = dec!(104); // |100 - 104| = 4 >= 2.2
        let series = series_from_closes(&closes);

        assert!(detect_head_and_shoulders(&series, &PatternParams::default()).is_none());
    }

    #[test]
    fn test_double_bottom_ignores_touch_before_window() {
        // 30봉 중 최근 20봉은 인덱스 10..30
        let mut closes = vec![dec!(110); 30];
        closes[9] = dec!(100); // len - 21: 구간 밖
        closes[20] = dec!(100);
        let series = series_from_closes(&closes);

        assert!(detect_double_bottom(&series, &PatternParams::default()).is_none());

        closes[10] = dec!(100); // len - 20: 구간 안
        let series = series_from_closes(&closes);
        assert!(detect_double_bottom(&series, &PatternParams::default()).is_some());
    }

    #[test]
    fn test_breakout_ignores_high_before_window() {
        // 기준 구간은 직전 20봉 (인덱스 1..21), 인덱스 0은 len - 22
        let mut bars = vec![(dec!(100), dec!(101), dec!(99), dec!(100)); 21];
        bars[0] = (dec!(100), dec!(150), dec!(99), dec!(100));
        bars.push((dec!(100), dec!(102), dec!(99), dec!(101.5)));
        let series = series_from_ohlc(&bars);

        match detect_breakout(&series, &PatternParams::default()) {
            Some(PatternMatch::BreakoutUp { resistance, .. }) => {
                assert_eq!(resistance, dec!(101))
            }
            other => panic!("unexpected pattern: {:?}", other),
        }
    }

    #[test]
    fn test_head_and_shoulders_ignores_shape_before_minus_seven() {
        // 완전한 어깨-머리-어깨를 -14, -11, -8 위치에 배치
        let mut closes = vec![dec!(90); 30];
        closes[16] = dec!(100);
        closes[19] = dec!(110);
        closes[22] = dec!(101);
        let series = series_from_closes(&closes);

        assert!(detect_head_and_shoulders(&series, &PatternParams::default()).is_none());

        // 구간(최근 20봉) 밖에 배치
        let mut closes = vec![dec!(90); 30];
        closes[3] = dec!(100);
        closes[6] = dec!(110);
        closes[9] = dec!(101);
        let series = series_from_closes(&closes);

        assert!(detect_head_and_shoulders(&series, &PatternParams::default()).is_none());
    }
}
