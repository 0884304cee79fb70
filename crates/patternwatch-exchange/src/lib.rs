//! 시장 데이터 제공자.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Binance Spot klines 제공자
//! - CoinGecko OHLC 제공자
//! - 설정에 따른 제공자 생성

pub mod connector;

pub use connector::*;

use patternwatch_core::{MarketConfig, ProviderError, ProviderKind, SeriesProvider};
use tracing::info;

/// 설정된 제공자 종류에 맞는 `SeriesProvider`를 생성합니다.
pub fn create_provider(config: &MarketConfig) -> Result<Box<dyn SeriesProvider>, ProviderError> {
    let provider: Box<dyn SeriesProvider> = match config.provider {
        ProviderKind::Binance => Box::new(BinanceKlineProvider::new(BinanceConfig::from(config))?),
        ProviderKind::CoinGecko => {
            Box::new(CoinGeckoOhlcProvider::new(CoinGeckoConfig::from(config))?)
        }
    };

    info!(provider = provider.provider_name(), "시장 데이터 제공자 생성");

    Ok(provider)
}
