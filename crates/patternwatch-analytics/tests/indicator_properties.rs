//! 지표 속성 테스트
//!
//! 임의의 종가 시퀀스에서 RSI 범위, MACD 정확성, 미래 참조 금지를 검증

use patternwatch_analytics::indicators::{
    EmaParams, IndicatorEngine, MacdParams, RsiParams,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// 0.01 ~ 1000.00 범위의 종가 시퀀스
fn closes_strategy(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(1i64..100_000i64, 0..max_len)
        .prop_map(|raw| raw.into_iter().map(|v| Decimal::new(v, 2)).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rsi_stays_within_bounds(closes in closes_strategy(80), period in 1usize..20) {
        let engine = IndicatorEngine::new();
        let rsi = engine.rsi(&closes, RsiParams { period });

        prop_assert_eq!(rsi.len(), closes.len());
        for (i, value) in rsi.iter().enumerate() {
            if i < period {
                prop_assert!(value.is_none());
            }
            if let Some(v) = value {
                prop_assert!(*v >= Decimal::ZERO);
                prop_assert!(*v <= Decimal::from(100));
            }
        }
    }

    #[test]
    fn macd_is_exact_ema_difference(closes in closes_strategy(80)) {
        let engine = IndicatorEngine::new();
        let params = MacdParams::default();

        let fast = engine.ema(&closes, EmaParams { period: params.fast_period });
        let slow = engine.ema(&closes, EmaParams { period: params.slow_period });
        let macd = engine.macd(&closes, params);

        prop_assert_eq!(macd.len(), closes.len());
        for i in 0..closes.len() {
            match (fast[i], slow[i]) {
                (Some(f), Some(s)) => prop_assert_eq!(macd[i].macd, Some(f - s)),
                _ => prop_assert!(macd[i].macd.is_none()),
            }
        }
    }

    #[test]
    fn frames_do_not_look_ahead(closes in closes_strategy(70), cut in 0usize..70) {
        let engine = IndicatorEngine::new();
        let cut = cut.min(closes.len());

        let full = engine.compute(&closes);
        let prefix = engine.compute(&closes[..cut]);

        prop_assert_eq!(&full.frames[..cut], &prefix.frames[..]);
    }
}
