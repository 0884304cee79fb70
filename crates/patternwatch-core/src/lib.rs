//! # PatternWatch Core
//!
//! 패턴 알림 파이프라인의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 캔들 및 캔들 시리즈 (불변 시계열)
//! - 시리즈 제공자 추상화 (시장 데이터 클라이언트 경계)
//! - 알림 페이로드 및 매매 권고 타입
//! - 심볼 및 타임프레임 정의
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
