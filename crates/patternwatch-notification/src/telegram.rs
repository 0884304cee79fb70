//! 텔레그램 알림 서비스.
//!
//! Telegram Bot API를 통해 패턴 알림을 전송합니다.

use crate::types::{
    Notification, NotificationError, NotificationEvent, NotificationPriority, NotificationResult,
    NotificationSender,
};
use async_trait::async_trait;
use patternwatch_core::{
    Action, AlertOutcome, AlertPayload, NotificationConfig, PatternSummary, TelegramSettings,
    TradeSignal,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info, warn};

/// Telegram Bot API 기본 URL.
pub const TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";

/// 텔레그램 메시지 최대 길이.
const TELEGRAM_MAX_MESSAGE_LEN: usize = 4096;

/// 헤더 필드(패턴 목록, 제목 등)의 최대 길이.
const HEADER_FIELD_MAX_CHARS: usize = 512;

/// 생략된 패턴 수 표시 줄을 위해 남겨 두는 길이.
const OMITTED_LINE_RESERVE: usize = 48;

/// 한도 초과 응답에 대기 시간이 없을 때 사용하는 값 (초).
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// 텔레그램 알림 전송 설정.
///
/// 봇 토큰은 `SecretString`으로 보관되어 `Debug` 출력에 노출되지 않습니다.
#[derive(Debug)]
pub struct TelegramConfig {
    /// @BotFather에서 받은 봇 토큰
    pub bot_token: SecretString,
    /// 메시지를 보낼 채팅 ID
    pub chat_id: String,
    /// 전송 활성화 여부
    pub enabled: bool,
    /// 파싱 모드 (HTML 또는 MarkdownV2)
    pub parse_mode: String,
    /// Bot API 기본 URL
    pub api_base_url: String,
}

impl TelegramConfig {
    /// 새 텔레그램 설정을 생성합니다.
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            bot_token: SecretString::from(bot_token),
            chat_id,
            enabled: true,
            parse_mode: "HTML".to_string(),
            api_base_url: TELEGRAM_API_BASE_URL.to_string(),
        }
    }

    /// Bot API 기본 URL을 변경합니다.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// 애플리케이션 설정에서 생성합니다.
    ///
    /// 토큰 또는 채팅 ID가 비어 있으면 `None`을 반환합니다.
    pub fn from_settings(settings: &TelegramSettings) -> Option<Self> {
        if !settings.is_configured() {
            return None;
        }

        let mut config = Self::new(settings.bot_token.clone(), settings.chat_id.clone());
        config.enabled = settings.enabled;
        Some(config)
    }

    /// 환경 변수에서 설정을 생성합니다.
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok()?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID").ok()?;
        let enabled = std::env::var("TELEGRAM_ENABLED")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(true);

        if bot_token.is_empty() || chat_id.is_empty() {
            return None;
        }

        let mut config = Self::new(bot_token, chat_id);
        config.enabled = enabled;
        Some(config)
    }
}

/// HTML 파싱 모드용 이스케이프.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// 이스케이프한 결과가 `max_chars` 글자 안에 들어가도록 자릅니다.
///
/// 엔티티(`&amp;` 등) 중간에서 끊지 않으며, 잘린 경우 `…`로 끝납니다.
fn escape_html_within(text: &str, max_chars: usize) -> String {
    let escaped = escape_html(text);
    if escaped.chars().count() <= max_chars {
        return escaped;
    }

    let limit = max_chars.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    let mut buf = [0u8; 4];

    for c in text.chars() {
        let piece: &str = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            _ => c.encode_utf8(&mut buf),
        };
        let len = piece.chars().count();
        if used + len > limit {
            break;
        }
        out.push_str(piece);
        used += len;
    }

    if max_chars > 0 {
        out.push('…');
    }
    out
}

/// 텔레그램 알림 전송기.
pub struct TelegramSender {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramSender {
    /// 새 텔레그램 전송기를 생성합니다.
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// 환경 변수에서 전송기를 생성합니다.
    pub fn from_env() -> Option<Self> {
        TelegramConfig::from_env().map(Self::new)
    }

    /// 패턴 하나의 상세 블록.
    fn format_pattern_block(pattern: &PatternSummary) -> String {
        let signal_emoji = match pattern.signal {
            TradeSignal::Buy => "🟢",
            TradeSignal::Sell => "🔴",
            TradeSignal::Neutral => "⚪",
        };

        let mut block = format!(
            "\n\n{signal_emoji} <b>{}</b> ({}, {})",
            escape_html(pattern.kind.label()),
            pattern.signal,
            pattern.strength
        );

        if let Some(entry) = pattern.entry {
            block.push_str(&format!("\n    ➤ Entrée à {}", entry));
        }
        if let Some(stop_loss) = pattern.stop_loss {
            block.push_str(&format!("\n    ➤ Stop Loss à {}", stop_loss));
        }
        if let Some(take_profit) = pattern.take_profit {
            block.push_str(&format!("\n    ➤ Take Profit à {}", take_profit));
        }
        if let Some(label) = &pattern.confirmation_label {
            block.push_str(&format!("\n    ✅ Confirmé par {}", escape_html(label)));
        }
        if let Some(note) = &pattern.strategy_note {
            block.push_str(&format!("\n    💡 Stratégie : {}", escape_html(note)));
        }

        block
    }

    /// 패턴 알림 본문.
    ///
    /// 본문은 `budget` 글자를 넘지 않습니다. 패턴 블록은 통째로 넣거나 빼며,
    /// 빠진 블록 수는 마지막 줄에 표시합니다.
    fn format_pattern_alert(payload: &AlertPayload, budget: usize) -> String {
        let action_emoji = match payload.action {
            Action::Buy => "🟢",
            Action::Sell => "🔴",
            Action::Wait => "⏸️",
        };

        let confirmations = if payload.confirmations.is_empty() {
            "Aucune".to_string()
        } else {
            escape_html_within(&payload.confirmations.join(", "), HEADER_FIELD_MAX_CHARS)
        };
        let patterns =
            escape_html_within(&payload.pattern_names().join(", "), HEADER_FIELD_MAX_CHARS);

        let mut text = format!(
            "{action_emoji} <b>ALERTE {symbol}</b> ({timeframe}) - {time}\n\n\
             📐 Patterns détectés : {patterns}\n\
             ✅ Confirmations : {confirmations}\n\
             📊 Recommandation : <b>{action}</b>",
            symbol = escape_html(&payload.symbol.to_string()),
            timeframe = payload.timeframe,
            time = payload.last_bar_time.format("%Y-%m-%d %H:%M"),
            action = payload.action,
        );
        let mut used = text.chars().count();
        let mut omitted = 0usize;

        for pattern in &payload.patterns {
            let block = Self::format_pattern_block(pattern);
            let len = block.chars().count();

            if omitted == 0 && used + len + OMITTED_LINE_RESERVE <= budget {
                text.push_str(&block);
                used += len;
            } else {
                omitted += 1;
            }
        }

        if omitted > 0 {
            text.push_str(&format!("\n\n… +{omitted} pattern(s) non affiché(s)"));
        }

        text
    }

    /// 알림을 텔레그램 메시지로 포맷합니다.
    pub fn format_message(&self, notification: &Notification) -> String {
        let priority_emoji = match notification.priority {
            NotificationPriority::Low => "ℹ️",
            NotificationPriority::Normal => "📊",
            NotificationPriority::High => "⚠️",
            NotificationPriority::Critical => "🚨",
        };

        let timestamp = notification.timestamp.format("%Y-%m-%d %H:%M:%S UTC");
        let footer = format!("\n\n<i>🕐 {timestamp}</i>");
        let budget = TELEGRAM_MAX_MESSAGE_LEN - footer.chars().count();

        // 태그는 잘린 텍스트 바깥에서만 붙이므로 항상 짝이 맞습니다.
        let content = match &notification.event {
            NotificationEvent::PatternAlert { payload } => {
                Self::format_pattern_alert(payload, budget)
            }

            NotificationEvent::SystemError {
                error_code,
                message,
            } => {
                let head = format!(
                    "🚨 <b>Erreur système</b>\n\n\
                     Code : <code>{}</code>\n\
                     Message : ",
                    escape_html_within(error_code, HEADER_FIELD_MAX_CHARS)
                );
                let rest = budget.saturating_sub(head.chars().count());
                head + &escape_html_within(message, rest)
            }

            NotificationEvent::Custom { title, message } => {
                let head = format!(
                    "{priority_emoji} <b>{}</b>\n\n",
                    escape_html_within(title, HEADER_FIELD_MAX_CHARS)
                );
                let rest = budget.saturating_sub(head.chars().count());
                head + &escape_html_within(message, rest)
            }
        };

        format!("{content}{footer}")
    }

    /// 텔레그램에 원시 메시지를 전송합니다.
    async fn send_message(&self, text: &str) -> NotificationResult<()> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.bot_token.expose_secret()
        );

        let params = serde_json::json!({
            "chat_id": self.config.chat_id,
            "text": text,
            "parse_mode": self.config.parse_mode,
            "disable_web_page_preview": true,
        });

        debug!(
            "Sending Telegram message to chat_id: {}",
            self.config.chat_id
        );

        let body = serde_json::to_vec(&params)?;

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| NotificationError::NetworkError(e.without_url()))?;

        if response.status().is_success() {
            info!("Telegram notification sent successfully");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // 요청 한도 제한 확인
            if status.as_u16() == 429 {
                let retry_after = serde_json::from_str::<serde_json::Value>(&body)
                    .ok()
                    .and_then(|v| v["parameters"]["retry_after"].as_u64())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                warn!(retry_after, "Telegram rate limited");
                return Err(NotificationError::RateLimited(retry_after));
            }

            // 토큰이나 채팅 ID가 잘못된 경우 재시도해도 같은 결과
            if status.as_u16() == 401
                || status.as_u16() == 404
                || (status.as_u16() == 400 && body.contains("chat not found"))
            {
                error!(%status, "Telegram rejected bot credentials");
                return Err(NotificationError::InvalidConfig(format!(
                    "텔레그램 자격증명 거부 (HTTP {}): {}",
                    status, body
                )));
            }

            error!("Failed to send Telegram message: {} - {}", status, body);
            Err(NotificationError::SendFailed(format!(
                "HTTP {}: {}",
                status, body
            )))
        }
    }
}

#[async_trait]
impl NotificationSender for TelegramSender {
    async fn send(&self, notification: &Notification) -> NotificationResult<()> {
        if !self.is_enabled() {
            debug!("Telegram notifications are disabled, skipping");
            return Ok(());
        }

        let message = self.format_message(notification);
        self.send_message(&message).await
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
            && !self.config.bot_token.expose_secret().is_empty()
            && !self.config.chat_id.is_empty()
    }

    fn name(&self) -> &str {
        "telegram"
    }
}

/// 여러 전송기를 관리하는 알림 관리자.
pub struct NotificationManager {
    senders: Vec<Box<dyn NotificationSender>>,
}

impl NotificationManager {
    /// 새 알림 관리자를 생성합니다.
    pub fn new() -> Self {
        Self {
            senders: Vec::new(),
        }
    }

    /// 애플리케이션 설정으로 관리자를 구성합니다.
    ///
    /// 설정 파일에 텔레그램 자격증명이 없으면 `TELEGRAM_BOT_TOKEN`/`TELEGRAM_CHAT_ID`
    /// 환경 변수를 사용합니다.
    pub fn from_config(config: &NotificationConfig) -> Self {
        let mut manager = Self::new();

        if !config.enabled {
            info!("알림이 비활성화되어 있습니다");
            return manager;
        }

        let telegram = TelegramConfig::from_settings(&config.telegram)
            .or_else(TelegramConfig::from_env);

        match telegram {
            Some(telegram) => manager.add_sender(TelegramSender::new(telegram)),
            None => warn!("텔레그램 자격증명이 설정되지 않았습니다"),
        }

        manager
    }

    /// 알림 전송기를 추가합니다.
    pub fn add_sender<S: NotificationSender + 'static>(&mut self, sender: S) {
        self.senders.push(Box::new(sender));
    }

    /// 활성화된 전송기 수.
    pub fn enabled_count(&self) -> usize {
        self.senders.iter().filter(|s| s.is_enabled()).count()
    }

    /// 활성화된 모든 전송기를 통해 알림을 전송합니다.
    pub async fn notify(&self, notification: &Notification) -> NotificationResult<()> {
        let mut last_error = None;

        for sender in &self.senders {
            if sender.is_enabled() {
                if let Err(e) = sender.send(notification).await {
                    error!("Failed to send notification via {}: {}", sender.name(), e);
                    last_error = Some(e);
                }
            }
        }

        if let Some(e) = last_error {
            // 모든 전송기가 실패한 경우에만 에러 반환
            if self.enabled_count() == 1 {
                return Err(e);
            }
        }

        Ok(())
    }

    /// 분석 결과를 알림으로 전송합니다.
    ///
    /// `NoAlert` 결과는 전송하지 않습니다.
    pub async fn notify_alert(&self, outcome: &AlertOutcome) -> NotificationResult<()> {
        match outcome {
            AlertOutcome::Alert(payload) => {
                let notification = Notification::pattern_alert(payload.clone());
                self.notify(&notification).await
            }
            AlertOutcome::NoAlert { last_bar_time } => {
                debug!(%last_bar_time, "감지된 패턴이 없어 알림을 건너뜁니다");
                Ok(())
            }
        }
    }

    /// 시스템 오류 알림을 전송합니다.
    pub async fn notify_system_error(
        &self,
        error_code: &str,
        message: &str,
    ) -> NotificationResult<()> {
        let notification = Notification::new(NotificationEvent::SystemError {
            error_code: error_code.to_string(),
            message: message.to_string(),
        })
        .with_priority(NotificationPriority::Critical);

        self.notify(&notification).await
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}
