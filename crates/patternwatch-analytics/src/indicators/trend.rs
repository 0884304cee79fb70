//! 추세 지표 (Trend Indicators).
//!
//! 이동평균 기반의 추세 지표들을 제공합니다.
//! - EMA (Exponential Moving Average)
//! - MACD (Moving Average Convergence Divergence)
//!
//! 모든 계산은 전체 함수(total function)입니다. 데이터가 부족하면
//! 에러 대신 해당 시점의 값을 `None`으로 표시합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// 시그널 라인 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl MacdParams {
    /// MACD 라인이 처음 정의되는 데 필요한 봉 수.
    pub fn line_required(&self) -> usize {
        self.fast_period.max(self.slow_period)
    }

    /// 시그널 라인이 처음 정의되는 데 필요한 봉 수.
    pub fn signal_required(&self) -> usize {
        (self.line_required() + self.signal_period).saturating_sub(1)
    }
}

/// MACD 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdResult {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub macd: Option<Decimal>,
    /// 시그널 라인 (MACD의 EMA).
    pub signal: Option<Decimal>,
    /// 히스토그램 (MACD - 시그널).
    pub histogram: Option<Decimal>,
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// EMA = (현재가 × k) + (이전 EMA × (1 - k))
    /// k = 2 / (period + 1)
    ///
    /// 첫 EMA는 처음 `period`개 값의 단순 평균이며 인덱스 `period - 1`에 위치합니다.
    ///
    /// # 반환
    /// 입력과 같은 길이. 기간이 0이거나 데이터가 부족하면 모두 `None`.
    pub fn ema(&self, prices: &[Decimal], params: EmaParams) -> Vec<Option<Decimal>> {
        let period = params.period;

        if period == 0 || prices.len() < period {
            return vec![None; prices.len()];
        }

        let mut result = Vec::with_capacity(prices.len());
        let multiplier = dec!(2) / Decimal::from(period + 1);

        // 처음 period-1개는 None
        for _ in 0..period - 1 {
            result.push(None);
        }

        // 첫 EMA는 SMA로 시작
        let initial_sma: Decimal = prices[..period].iter().sum::<Decimal>() / Decimal::from(period);
        result.push(Some(initial_sma));

        let mut prev_ema = initial_sma;
        for price in prices.iter().skip(period) {
            let ema = (*price * multiplier) + (prev_ema * (Decimal::ONE - multiplier));
            result.push(Some(ema));
            prev_ema = ema;
        }

        result
    }

    /// MACD 계산.
    ///
    /// MACD 라인 = 단기 EMA - 장기 EMA
    /// 시그널 라인 = MACD 라인의 EMA
    /// 히스토그램 = MACD 라인 - 시그널 라인
    ///
    /// 시그널 EMA는 정의된 MACD 값만으로 계산한 뒤 원래 봉 인덱스에 다시 정렬합니다.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> Vec<MacdResult> {
        if params.fast_period == 0 || params.slow_period == 0 || params.signal_period == 0 {
            return vec![MacdResult::default(); prices.len()];
        }

        let fast_ema = self.ema(
            prices,
            EmaParams {
                period: params.fast_period,
            },
        );
        let slow_ema = self.ema(
            prices,
            EmaParams {
                period: params.slow_period,
            },
        );

        // MACD 라인은 두 EMA의 정확한 차이
        let macd_line: Vec<Option<Decimal>> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(fast, slow)| match (fast, slow) {
                (Some(fast), Some(slow)) => Some(*fast - *slow),
                _ => None,
            })
            .collect();

        let macd_values: Vec<Decimal> = macd_line.iter().flatten().copied().collect();
        let signal_ema = self.ema(
            &macd_values,
            EmaParams {
                period: params.signal_period,
            },
        );

        let mut result = Vec::with_capacity(prices.len());
        let mut signal_idx = 0;

        for macd_val in macd_line {
            match macd_val {
                Some(macd) => {
                    let signal = signal_ema.get(signal_idx).copied().flatten();
                    result.push(MacdResult {
                        macd: Some(macd),
                        signal,
                        histogram: signal.map(|s| macd - s),
                    });
                    signal_idx += 1;
                }
                None => result.push(MacdResult::default()),
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rising_prices(n: usize) -> Vec<Decimal> {
        (0..n).map(|i| Decimal::from(100 + i as i64)).collect()
    }

    #[test]
    fn test_ema_seeded_by_sma() {
        let trend = TrendIndicators::new();
        let prices = vec![dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)];

        let ema = trend.ema(&prices, EmaParams { period: 3 });

        assert_eq!(ema.len(), 5);
        assert!(ema[0].is_none());
        assert!(ema[1].is_none());
        assert_eq!(ema[2], Some(dec!(2)));
        // k = 0.5
        assert_eq!(ema[3], Some(dec!(3)));
        assert_eq!(ema[4], Some(dec!(4)));
    }

    #[test]
    fn test_ema_insufficient_data_is_all_none() {
        let trend = TrendIndicators::new();
        let ema = trend.ema(&[dec!(1), dec!(2)], EmaParams { period: 20 });
        assert_eq!(ema, vec![None, None]);
    }

    #[test]
    fn test_ema_zero_period_is_all_none() {
        let trend = TrendIndicators::new();
        let ema = trend.ema(&rising_prices(5), EmaParams { period: 0 });
        assert!(ema.iter().all(Option::is_none));
    }

    #[test]
    fn test_macd_alignment() {
        let trend = TrendIndicators::new();
        let prices = rising_prices(40);
        let params = MacdParams::default();

        let macd = trend.macd(&prices, params);

        assert_eq!(macd.len(), 40);
        // MACD 라인: 인덱스 25부터
        assert!(macd[24].macd.is_none());
        assert!(macd[25].macd.is_some());
        // 시그널: 인덱스 33부터
        assert!(macd[32].signal.is_none());
        assert!(macd[33].signal.is_some());
        assert_eq!(params.signal_required(), 34);

        let last = macd[39];
        assert_eq!(last.histogram, Some(last.macd.unwrap() - last.signal.unwrap()));
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let trend = TrendIndicators::new();
        let macd = trend.macd(&rising_prices(60), MacdParams::default());
        assert!(macd[59].macd.unwrap() > Decimal::ZERO);
    }
}
