//! CLI 명령어 구현 모듈.

pub mod analyze;
pub mod watch;

use anyhow::{Context, Result};
use patternwatch_analytics::AnalysisPipeline;
use patternwatch_core::{AppConfig, MarketConfig, ProviderKind, SeriesProvider, SeriesRequest};
use patternwatch_exchange::create_provider;

/// 명령줄에서 지정한 시장 설정 덮어쓰기.
#[derive(Debug, Default, Clone)]
pub struct MarketOverrides {
    /// 심볼 ("BASE/QUOTE")
    pub symbol: Option<String>,
    /// 타임프레임
    pub timeframe: Option<String>,
    /// 데이터 제공자
    pub provider: Option<ProviderKind>,
}

impl MarketOverrides {
    /// 지정된 값만 시장 설정에 덮어씁니다.
    pub fn apply(&self, market: &mut MarketConfig) {
        if let Some(symbol) = &self.symbol {
            market.symbol = symbol.clone();
        }
        if let Some(timeframe) = &self.timeframe {
            market.timeframe = timeframe.clone();
        }
        if let Some(provider) = self.provider {
            market.provider = provider;
        }
    }
}

/// 설정에서 캔들 조회 요청을 만듭니다.
pub fn build_request(market: &MarketConfig) -> Result<SeriesRequest> {
    let symbol = market.symbol().context("market.symbol 설정 오류")?;
    let timeframe = market.timeframe().context("market.timeframe 설정 오류")?;
    Ok(SeriesRequest::new(symbol, timeframe, market.limit))
}

/// 한 번의 분석 주기에 필요한 구성 요소.
pub struct CycleContext {
    pub provider: Box<dyn SeriesProvider>,
    pub pipeline: AnalysisPipeline,
    pub request: SeriesRequest,
}

impl CycleContext {
    /// 설정으로부터 제공자, 파이프라인, 요청을 구성합니다.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = create_provider(&config.market).context("시장 데이터 제공자 생성 실패")?;
        let pipeline = AnalysisPipeline::from_config(&config.analysis);
        let request = build_request(&config.market)?;

        Ok(Self {
            provider,
            pipeline,
            request,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patternwatch_core::Timeframe;

    #[test]
    fn test_overrides_only_replace_given_fields() {
        let mut market = MarketConfig::default();
        let overrides = MarketOverrides {
            symbol: Some("ETH/USDT".to_string()),
            timeframe: None,
            provider: Some(ProviderKind::CoinGecko),
        };

        overrides.apply(&mut market);

        assert_eq!(market.symbol, "ETH/USDT");
        assert_eq!(market.timeframe, "1h");
        assert_eq!(market.provider, ProviderKind::CoinGecko);
    }

    #[test]
    fn test_build_request_from_defaults() {
        let request = build_request(&MarketConfig::default()).unwrap();

        assert_eq!(request.symbol.to_string(), "BTC/USDT");
        assert_eq!(request.timeframe, Timeframe::H1);
        assert_eq!(request.limit, 500);
    }

    #[test]
    fn test_build_request_rejects_bad_symbol() {
        let market = MarketConfig {
            symbol: "BTCUSDT".to_string(),
            ..Default::default()
        };

        assert!(build_request(&market).is_err());
    }
}
