//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 자격증명(봇 토큰, 채팅 ID)은 설정으로만 주입되며 분석 코드에는 등장하지 않습니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::{PatternWatchError, PatternWatchResult};
use crate::types::{MarketType, Symbol, Timeframe};

/// 애플리케이션 설정.
///
/// 프로세스 시작 시 한 번 생성되어 참조로 전달됩니다.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 시장 데이터 설정
    pub market: MarketConfig,
    /// 분석 파라미터
    pub analysis: AnalysisConfig,
    /// 주기 실행 설정
    pub schedule: ScheduleConfig,
    /// 알림 설정
    pub notifications: NotificationConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 시장 데이터 제공자 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Binance Spot klines
    #[default]
    Binance,
    /// CoinGecko OHLC
    CoinGecko,
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binance" => Ok(Self::Binance),
            "coingecko" => Ok(Self::CoinGecko),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Binance => write!(f, "binance"),
            ProviderKind::CoinGecko => write!(f, "coingecko"),
        }
    }
}

/// 시장 데이터 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketConfig {
    /// 데이터 제공자
    pub provider: ProviderKind,
    /// 분석 대상 심볼 ("BASE/QUOTE")
    pub symbol: String,
    /// 캔들 타임프레임 (예: "1h")
    pub timeframe: String,
    /// 요청할 캔들 수
    pub limit: u32,
    /// Binance REST 기본 URL
    pub binance_base_url: String,
    /// CoinGecko REST 기본 URL
    pub coingecko_base_url: String,
    /// CoinGecko 기준 통화
    pub vs_currency: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Binance,
            symbol: "BTC/USDT".to_string(),
            timeframe: "1h".to_string(),
            limit: 500,
            binance_base_url: "https://api.binance.com".to_string(),
            coingecko_base_url: "https://api.coingecko.com".to_string(),
            vs_currency: "usd".to_string(),
            timeout_secs: 30,
        }
    }
}

impl MarketConfig {
    /// 설정된 심볼을 파싱합니다.
    pub fn symbol(&self) -> PatternWatchResult<Symbol> {
        Symbol::from_string(&self.symbol, MarketType::Crypto).ok_or_else(|| {
            PatternWatchError::Config(format!(
                "심볼 형식이 잘못되었습니다 (BASE/QUOTE 필요): {}",
                self.symbol
            ))
        })
    }

    /// 설정된 타임프레임을 파싱합니다.
    pub fn timeframe(&self) -> PatternWatchResult<Timeframe> {
        self.timeframe.parse().map_err(PatternWatchError::Config)
    }
}

/// 분석 파라미터.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// RSI 기간
    pub rsi_period: usize,
    /// 추세 EMA 기간
    pub ema_period: usize,
    /// MACD 단기 EMA 기간
    pub macd_fast: usize,
    /// MACD 장기 EMA 기간
    pub macd_slow: usize,
    /// MACD 시그널 기간
    pub macd_signal: usize,
    /// 캔들 패턴 스캔 윈도우 (최근 N개 봉)
    pub candle_scan_window: usize,
    /// 손절 비율 (0.01 = 1%)
    pub stop_loss_pct: Decimal,
    /// 익절 비율 (0.02 = 2%)
    pub take_profit_pct: Decimal,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ema_period: 20,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            candle_scan_window: 24,
            stop_loss_pct: dec!(0.01),
            take_profit_pct: dec!(0.02),
        }
    }
}

/// 주기 실행 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// 분석 주기 (분 단위)
    pub interval_minutes: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 60,
        }
    }
}

impl ScheduleConfig {
    /// 분석 주기를 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.max(1) * 60)
    }
}

/// 알림 설정.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NotificationConfig {
    /// 알림 활성화 여부
    #[serde(default)]
    pub enabled: bool,
    /// 텔레그램 설정
    #[serde(default)]
    pub telegram: TelegramSettings,
}

/// 텔레그램 알림 설정.
///
/// `Debug` 구현은 봇 토큰을 마스킹합니다.
#[derive(Default, Deserialize, Serialize)]
pub struct TelegramSettings {
    /// 활성화 여부
    #[serde(default)]
    pub enabled: bool,
    /// 봇 토큰
    #[serde(default)]
    pub bot_token: String,
    /// 채팅 ID
    #[serde(default)]
    pub chat_id: String,
}

impl fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked_token = if self.bot_token.is_empty() {
            "<unset>"
        } else {
            "***REDACTED***"
        };

        f.debug_struct("TelegramSettings")
            .field("enabled", &self.enabled)
            .field("bot_token", &masked_token)
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramSettings {
    /// 토큰과 채팅 ID가 모두 설정되어 있는지 확인합니다.
    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값에 환경 변수만 덮어씁니다.
    /// 환경 변수는 `PATTERNWATCH__MARKET__SYMBOL` 형식을 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("PATTERNWATCH")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
