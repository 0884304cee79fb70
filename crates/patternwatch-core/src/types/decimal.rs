//! 가격 계산을 위한 Decimal 유틸리티.

use rust_decimal::{Decimal, RoundingStrategy};

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 거래량 타입.
pub type Quantity = Decimal;

/// 비율 타입 (0.01 = 1%).
pub type Percentage = Decimal;

/// 알림에 표시되는 가격의 소수점 자릿수.
pub const PRICE_DISPLAY_DP: u32 = 8;

/// 가격 연산을 위한 확장 트레이트.
pub trait PriceExt {
    /// 가격을 비율만큼 올립니다 (`price * (1 + pct)`).
    fn raise_by(&self, pct: Percentage) -> Price;

    /// 가격을 비율만큼 내립니다 (`price * (1 - pct)`).
    fn lower_by(&self, pct: Percentage) -> Price;

    /// 표시용 자릿수로 반올림하고 불필요한 0을 제거합니다.
    fn to_display_price(&self) -> Price;
}

impl PriceExt for Decimal {
    fn raise_by(&self, pct: Percentage) -> Price {
        *self * (Decimal::ONE + pct)
    }

    fn lower_by(&self, pct: Percentage) -> Price {
        *self * (Decimal::ONE - pct)
    }

    fn to_display_price(&self) -> Price {
        self.round_dp_with_strategy(PRICE_DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
    }
}
