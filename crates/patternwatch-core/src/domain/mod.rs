//! 분석 파이프라인의 도메인 모델.

mod alert;
mod market_data;
mod series_provider;

pub use alert::*;
pub use market_data::*;
pub use series_provider::*;
