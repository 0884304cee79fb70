//! PatternWatch CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 단일 분석 주기 실행 (`analyze`)
//! - 주기적 감시 데몬 (`watch`)

pub mod commands;

pub use commands::*;
