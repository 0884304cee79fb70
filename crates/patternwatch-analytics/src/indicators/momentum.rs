//! 모멘텀 지표 (Momentum Indicators).
//!
//! - RSI (Relative Strength Index, Wilder 평활)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간.
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl RsiParams {
    /// 첫 RSI 값에 필요한 봉 수.
    pub fn required(&self) -> usize {
        self.period + 1
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 × 평균 상승폭 / (평균 상승폭 + 평균 하락폭)
    ///
    /// `100 - 100 / (1 + RS)`와 같은 값이지만, 평균 하락폭이 0에 가까워도
    /// RS 나눗셈이 넘치지 않습니다.
    ///
    /// Wilder 평활을 사용합니다. 인덱스 `period`의 첫 값은 처음 `period`개
    /// 가격 변화의 단순 평균으로 계산하고, 이후에는 `alpha = 1 / period`로
    /// 지수 평활합니다. 평균 하락폭이 0이면 100입니다.
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들 (인덱스 `0..period`는 `None`)
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> Vec<Option<Decimal>> {
        let period = params.period;

        if period == 0 || prices.len() < params.required() {
            return vec![None; prices.len()];
        }

        // 상승/하락 분리 (deltas[i]는 prices[i+1] - prices[i])
        let (gains, losses): (Vec<Decimal>, Vec<Decimal>) = prices
            .windows(2)
            .map(|pair| {
                let delta = pair[1] - pair[0];
                if delta > Decimal::ZERO {
                    (delta, Decimal::ZERO)
                } else {
                    (Decimal::ZERO, delta.abs())
                }
            })
            .unzip();

        let period_decimal = Decimal::from(period);
        let alpha = Decimal::ONE / period_decimal;
        let one_minus_alpha = Decimal::ONE - alpha;

        let mut avg_gain = gains[..period].iter().sum::<Decimal>() / period_decimal;
        let mut avg_loss = losses[..period].iter().sum::<Decimal>() / period_decimal;

        let mut result = vec![None; period];
        result.push(Some(Self::relative_strength_index(avg_gain, avg_loss)));

        for (gain, loss) in gains.iter().zip(losses.iter()).skip(period) {
            avg_gain = (avg_gain * one_minus_alpha) + (*gain * alpha);
            avg_loss = (avg_loss * one_minus_alpha) + (*loss * alpha);
            result.push(Some(Self::relative_strength_index(avg_gain, avg_loss)));
        }

        result
    }

    fn relative_strength_index(avg_gain: Decimal, avg_loss: Decimal) -> Decimal {
        if avg_loss == Decimal::ZERO {
            return dec!(100);
        }

        let total = avg_gain + avg_loss;
        let rsi = (avg_gain / total) * dec!(100);
        rsi.clamp(Decimal::ZERO, dec!(100))
    }
}
