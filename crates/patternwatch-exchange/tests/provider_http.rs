//! HTTP 제공자 통합 테스트
//!
//! mockito 서버의 고정 응답으로 Binance/CoinGecko 파싱과 에러 매핑을 검증

use mockito::{Matcher, Server};
use patternwatch_core::{
    ProviderError, SeriesProvider, SeriesRequest, Symbol, Timeframe,
};
use patternwatch_exchange::{
    BinanceConfig, BinanceKlineProvider, CoinGeckoConfig, CoinGeckoOhlcProvider,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn btc_request(limit: u32) -> SeriesRequest {
    SeriesRequest::new(Symbol::crypto("BTC", "USDT"), Timeframe::H1, limit)
}

fn binance(server: &Server) -> BinanceKlineProvider {
    BinanceKlineProvider::new(BinanceConfig {
        base_url: server.url(),
        timeout_secs: 5,
    })
    .unwrap()
}

fn coingecko(server: &Server) -> CoinGeckoOhlcProvider {
    CoinGeckoOhlcProvider::new(CoinGeckoConfig {
        base_url: server.url(),
        vs_currency: "usd".to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

const BINANCE_KLINES: &str = r#"[
    [1704067200000, "42000.10", "42500.00", "41800.00", "42300.50", "12.5", 1704070799999, "528000.0", 310, "6.1", "258000.0", "0"],
    [1704070800000, "42300.50", "42400.00", "42100.00", "42150.00", "8.25", 1704074399999, "348000.0", 205, "4.0", "169000.0", "0"]
]"#;

#[tokio::test]
async fn binance_parses_klines() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v3/klines")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "BTCUSDT".into()),
            Matcher::UrlEncoded("interval".into(), "1h".into()),
            Matcher::UrlEncoded("limit".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(BINANCE_KLINES)
        .create_async()
        .await;

    let candles = binance(&server).fetch_candles(&btc_request(2)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0].open, dec!(42000.10));
    assert_eq!(candles[0].close, dec!(42300.50));
    assert_eq!(candles[0].volume, dec!(12.5));
    assert_eq!(candles[0].open_time.timestamp_millis(), 1704067200000);
    assert!(candles[1].open_time > candles[0].open_time);
}

#[tokio::test]
async fn binance_http_error_is_api_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v3/klines")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"code":-1121,"msg":"Invalid symbol."}"#)
        .create_async()
        .await;

    let result = binance(&server).fetch_candles(&btc_request(500)).await;

    match result {
        Err(ProviderError::Api { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("Invalid symbol"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn binance_malformed_row_is_parse_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v3/klines")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"[[1704067200000, "not-a-number", "1", "1", "1", "1", 1704070799999, "0", 1, "0", "0", "0"]]"#)
        .create_async()
        .await;

    let result = binance(&server).fetch_candles(&btc_request(500)).await;

    assert!(matches!(result, Err(ProviderError::Parse(_))));
}

#[tokio::test]
async fn binance_empty_response_is_empty_vec() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v3/klines")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let candles = binance(&server).fetch_candles(&btc_request(500)).await.unwrap();

    assert!(candles.is_empty());
}

#[tokio::test]
async fn coingecko_parses_ohlc_with_zero_volume() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v3/coins/bitcoin/ohlc")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("vs_currency".into(), "usd".into()),
            Matcher::UrlEncoded("days".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"[[1704067200000, 42000.5, 42500, 41800, 42300.25],
                [1704069000000, 42300.25, 42400, 42100, 42150],
                [1704070800000, 42150, 42200, 42000, 42050]]"#,
        )
        .create_async()
        .await;

    let request = SeriesRequest::new(Symbol::crypto("BTC", "USDT"), Timeframe::M30, 2);
    let candles = coingecko(&server).fetch_candles(&request).await.unwrap();

    mock.assert_async().await;
    // 최근 2개만 유지
    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0].open, dec!(42300.25));
    assert_eq!(candles[1].close, dec!(42050));
    assert!(candles.iter().all(|c| c.volume == Decimal::ZERO));
}

#[tokio::test]
async fn coingecko_rate_limit_is_api_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v3/coins/ethereum/ohlc")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body(r#"{"status":{"error_code":429,"error_message":"rate limited"}}"#)
        .create_async()
        .await;

    let request = SeriesRequest::new(Symbol::crypto("ETH", "USD"), Timeframe::H4, 100);
    let result = coingecko(&server).fetch_candles(&request).await;

    assert!(matches!(result, Err(ProviderError::Api { status: 429, .. })));
}

#[tokio::test]
async fn coingecko_rejects_bars_coarser_than_requested() {
    let mut server = Server::new_async().await;
    // days=1 요청에 4시간 간격 봉이 돌아온 경우
    let mock = server
        .mock("GET", "/api/v3/coins/bitcoin/ohlc")
        .match_query(Matcher::UrlEncoded("days".into(), "1".into()))
        .with_status(200)
        .with_body(
            r#"[[1704067200000, 42000, 42500, 41800, 42300],
                [1704081600000, 42300, 42400, 42100, 42150],
                [1704096000000, 42150, 42200, 42000, 42050]]"#,
        )
        .create_async()
        .await;

    let request = SeriesRequest::new(Symbol::crypto("BTC", "USDT"), Timeframe::M30, 3);
    let result = coingecko(&server).fetch_candles(&request).await;

    mock.assert_async().await;
    assert!(matches!(result, Err(ProviderError::Unsupported(_))));
}

#[tokio::test]
async fn coingecko_hourly_request_is_unsupported_without_calling_api() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let result = coingecko(&server).fetch_candles(&btc_request(500)).await;

    mock.assert_async().await;
    assert!(matches!(result, Err(ProviderError::Unsupported(_))));
}

#[tokio::test]
async fn coingecko_encodes_query_values() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v3/coins/bitcoin/ohlc")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("vs_currency".into(), "usd&days=max".into()),
            Matcher::UrlEncoded("days".into(), "7".into()),
        ]))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    let provider = CoinGeckoOhlcProvider::new(CoinGeckoConfig {
        base_url: server.url(),
        vs_currency: "usd&days=max".to_string(),
        timeout_secs: 5,
    })
    .unwrap();

    let request = SeriesRequest::new(Symbol::crypto("BTC", "USDT"), Timeframe::H4, 30);
    let candles = provider.fetch_candles(&request).await.unwrap();

    mock.assert_async().await;
    assert!(candles.is_empty());
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let provider = BinanceKlineProvider::new(BinanceConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 2,
    })
    .unwrap();

    let result = provider.fetch_candles(&btc_request(10)).await;

    assert!(matches!(result, Err(ProviderError::Network(_))));
}
