//! 텔레그램 전송 통합 테스트
//!
//! mockito 서버로 Bot API 요청 형식과 에러 매핑을 검증

use chrono::{TimeZone, Utc};
use mockito::{Matcher, Server};
use patternwatch_core::{
    Action, AlertOutcome, AlertPayload, PatternKind, PatternSummary, SignalStrength, Symbol,
    Timeframe, TradeSignal,
};
use patternwatch_notification::{
    Notification, NotificationError, NotificationEvent, NotificationManager, NotificationSender,
    TelegramConfig, TelegramSender,
};
use rust_decimal_macros::dec;
use serde_json::json;

fn sender(server: &Server) -> TelegramSender {
    TelegramSender::new(
        TelegramConfig::new("123:abc".to_string(), "42".to_string())
            .with_api_base_url(server.url()),
    )
}

fn double_bottom_outcome() -> AlertOutcome {
    let time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    AlertOutcome::Alert(AlertPayload {
        symbol: Symbol::crypto("BTC", "USDT"),
        timeframe: Timeframe::H1,
        last_bar_time: time,
        patterns: vec![PatternSummary {
            kind: PatternKind::DoubleBottom,
            anchor_time: time,
            signal: TradeSignal::Buy,
            strength: SignalStrength::Strong,
            entry: Some(dec!(100)),
            stop_loss: Some(dec!(99)),
            take_profit: Some(dec!(102)),
            confirmation_label: None,
            strategy_note: None,
        }],
        confirmations: vec![],
        action: Action::Sell,
    })
}

#[tokio::test]
async fn sends_html_message_to_chat() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/bot123:abc/sendMessage")
        .match_body(Matcher::PartialJson(json!({
            "chat_id": "42",
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        })))
        .with_status(200)
        .with_body(r#"{"ok":true,"result":{}}"#)
        .create_async()
        .await;

    let mut manager = NotificationManager::new();
    manager.add_sender(sender(&server));

    manager.notify_alert(&double_bottom_outcome()).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn message_contains_patterns_confirmations_and_action() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/bot123:abc/sendMessage")
        .match_body(Matcher::Regex(
            "Double Bottom.*Confirmations : Aucune.*<b>SELL</b>".to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"ok":true}"#)
        .create_async()
        .await;

    let outcome = double_bottom_outcome();
    let notification = Notification::pattern_alert(outcome.payload().unwrap().clone());

    sender(&server).send(&notification).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn no_alert_is_not_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut manager = NotificationManager::new();
    manager.add_sender(sender(&server));

    let outcome = AlertOutcome::NoAlert {
        last_bar_time: Utc::now(),
    };
    manager.notify_alert(&outcome).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn rate_limit_uses_retry_after() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/bot123:abc/sendMessage")
        .with_status(429)
        .with_body(r#"{"ok":false,"error_code":429,"parameters":{"retry_after":17}}"#)
        .create_async()
        .await;

    let notification = Notification::new(NotificationEvent::Custom {
        title: "test".to_string(),
        message: "hello".to_string(),
    });
    let result = sender(&server).send(&notification).await;

    assert!(matches!(result, Err(NotificationError::RateLimited(17))));
}

#[tokio::test]
async fn http_error_is_send_failed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/bot123:abc/sendMessage")
        .with_status(400)
        .with_body(r#"{"ok":false,"description":"Bad Request: message text is empty"}"#)
        .create_async()
        .await;

    let mut manager = NotificationManager::new();
    manager.add_sender(sender(&server));

    let result = manager.notify_alert(&double_bottom_outcome()).await;

    match result {
        Err(NotificationError::SendFailed(message)) => {
            assert!(message.contains("message text is empty"))
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn unknown_chat_is_invalid_config() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/bot123:abc/sendMessage")
        .with_status(400)
        .with_body(r#"{"ok":false,"description":"Bad Request: chat not found"}"#)
        .create_async()
        .await;

    let result = sender(&server)
        .send(&Notification::pattern_alert(
            double_bottom_outcome().payload().unwrap().clone(),
        ))
        .await;

    assert!(matches!(result, Err(NotificationError::InvalidConfig(_))));
}

#[tokio::test]
async fn rejected_token_is_invalid_config() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/bot123:abc/sendMessage")
        .with_status(401)
        .with_body(r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#)
        .create_async()
        .await;

    let result = sender(&server)
        .send(&Notification::new(NotificationEvent::Custom {
            title: "test".to_string(),
            message: "hello".to_string(),
        }))
        .await;

    match result {
        Err(NotificationError::InvalidConfig(message)) => {
            assert!(!message.contains("123:abc"))
        }
        other => panic!("unexpected result: {:?}", other),
    }
}
