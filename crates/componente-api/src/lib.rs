//! REST API 및 JWT 인증.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (`/api/recursos`, `/api/auth`)
//! - JWT 토큰 서비스 및 인증 미들웨어
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 및 조립 루트 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: JWT 토큰 서비스, 인증 추출기, 역할 게이트
//! - [`error`]: 통합 API 에러 응답

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

pub use auth::{EstadoClave, JwtAuth, Reclamos, Rol, TokenService};
pub use error::{ApiErrorResponse, ApiResult};
pub use routes::create_router;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
