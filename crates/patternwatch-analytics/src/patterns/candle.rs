//! 캔들 패턴 감지.
//!
//! 최근 `candle_scan_window`개 봉 안에서 장악형과 도지를 찾습니다.
//! 한 번의 스캔에서 여러 개가 감지될 수 있습니다.

use patternwatch_core::{Candle, CandleSeries};
use rust_decimal::Decimal;
use tracing::trace;

use super::{PatternAnchor, PatternMatch, PatternParams};

/// 강세 장악형 여부.
///
/// 이전 봉은 음봉, 현재 봉은 양봉이며 현재 몸통이 이전 몸통을 감쌉니다.
pub fn is_bullish_engulfing(prior: &Candle, current: &Candle) -> bool {
    prior.is_bearish()
        && current.is_bullish()
        && current.open < prior.close
        && current.close > prior.open
}

/// 약세 장악형 여부.
pub fn is_bearish_engulfing(prior: &Candle, current: &Candle) -> bool {
    prior.is_bullish()
        && current.is_bearish()
        && current.open > prior.close
        && current.close < prior.open
}

/// 도지 여부 (`|close - open| < threshold * close`).
pub fn is_doji(candle: &Candle, threshold: Decimal) -> bool {
    candle.body_size() < threshold * candle.close
}

/// 최근 구간의 캔들 패턴을 봉 순서대로 반환합니다.
///
/// 장악형은 구간 안의 연속된 세 봉 `(i-2, i-1, i)`마다 `i-1`과 `i`를 비교하고,
/// 도지는 구간 안의 모든 봉에서 확인합니다. 같은 봉에서는
/// 강세 장악형, 약세 장악형, 도지 순서입니다.
pub fn scan_candle_patterns(series: &CandleSeries, params: &PatternParams) -> Vec<PatternMatch> {
    let candles = series.candles();
    let window = params.candle_scan_window.max(1);
    let start = candles.len().saturating_sub(window);

    let mut matches = Vec::new();

    for (index, current) in candles.iter().enumerate().skip(start) {
        let anchor = PatternAnchor {
            index,
            open_time: current.open_time,
        };

        if index >= start + 2 {
            let prior = &candles[index - 1];

            if is_bullish_engulfing(prior, current) {
                matches.push(PatternMatch::EngulfingBullish { anchor });
            }
            if is_bearish_engulfing(prior, current) {
                matches.push(PatternMatch::EngulfingBearish { anchor });
            }
        }

        if is_doji(current, params.doji_threshold) {
            matches.push(PatternMatch::Doji {
                anchor,
                body: current.body_size(),
            });
        }
    }

    trace!(window, found = matches.len(), "candle pattern scan");

    matches
}
