//! # PatternWatch Notification
//!
//! 패턴 알림 전송 서비스.
//!
//! 지원 채널:
//! - Telegram
//!
//! 분석 결과(`AlertOutcome`)를 받아 활성화된 모든 채널로 전송합니다.
//! 자격증명은 설정으로만 주입됩니다.

pub mod telegram;
pub mod types;

pub use telegram::*;
pub use types::*;
