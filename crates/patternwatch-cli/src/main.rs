//! PatternWatch CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 설정 파일 기준으로 한 번 분석
//! patternwatch analyze
//!
//! # 심볼과 제공자를 바꿔 JSON으로 출력
//! patternwatch analyze --symbol ETH/USDT --provider coingecko --json
//!
//! # 분석 후 텔레그램으로 전송
//! patternwatch analyze --notify
//!
//! # 설정된 간격으로 계속 감시 (Ctrl-C로 종료)
//! patternwatch watch --config config/default.toml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use patternwatch_cli::commands::analyze::{render_outcome, run_analyze, AnalyzeOptions, OutputFormat};
use patternwatch_cli::commands::watch::{run_watch, WatchOptions};
use patternwatch_cli::commands::MarketOverrides;
use patternwatch_core::{init_logging, AppConfig, LogConfig, PatternWatchError, ProviderKind};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "patternwatch")]
#[command(about = "PatternWatch - 차트 패턴 감지 및 알림 도구", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 분석 주기를 한 번 실행하고 결과를 출력
    Analyze {
        /// 설정 파일 경로
        #[arg(short, long, default_value = "config/default.toml")]
        config: String,

        /// 심볼 (예: BTC/USDT)
        #[arg(short, long)]
        symbol: Option<String>,

        /// 타임프레임 (예: 1h, 4h, 1d)
        #[arg(short, long)]
        timeframe: Option<String>,

        /// 데이터 제공자 (binance, coingecko)
        #[arg(short, long)]
        provider: Option<ProviderKind>,

        /// JSON으로 출력
        #[arg(long, default_value = "false")]
        json: bool,

        /// 결과를 알림 채널로 전송
        #[arg(long, default_value = "false")]
        notify: bool,
    },

    /// 설정된 간격으로 분석을 반복 (Ctrl-C로 종료)
    Watch {
        /// 설정 파일 경로
        #[arg(short, long, default_value = "config/default.toml")]
        config: String,

        /// 최대 주기 수 (지정하지 않으면 무한 반복)
        #[arg(long, hide = true)]
        max_cycles: Option<u64>,
    },
}

/// 설정을 로드하고 로깅을 초기화합니다.
fn load_config(path: &str) -> Result<AppConfig> {
    let config = AppConfig::load(path).with_context(|| format!("설정 로드 실패: {}", path))?;

    init_logging(LogConfig::from_settings(&config.logging))
        .map_err(|e| PatternWatchError::Internal(format!("로깅 초기화 실패: {}", e)))?;
    debug!(path, "설정 로드 완료");

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            config,
            symbol,
            timeframe,
            provider,
            json,
            notify,
        } => {
            let mut app_config = load_config(&config)?;
            MarketOverrides {
                symbol,
                timeframe,
                provider,
            }
            .apply(&mut app_config.market);

            let options = AnalyzeOptions {
                format: if json {
                    OutputFormat::Json
                } else {
                    OutputFormat::Text
                },
                notify,
            };

            let outcome = run_analyze(&app_config, &options).await?;
            println!("{}", render_outcome(&outcome, options.format)?);
        }

        Commands::Watch { config, max_cycles } => {
            let app_config = load_config(&config)?;
            let stats = run_watch(&app_config, &WatchOptions { max_cycles }).await?;
            info!(?stats, "watch 종료");
        }
    }

    Ok(())
}
