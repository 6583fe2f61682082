//! REST API 엔드포인트.

pub mod auth;
pub mod health;
pub mod recursos;

use std::sync::Arc;

use axum::{Extension, Router};

use crate::state::AppState;

pub use auth::auth_router;
pub use health::health_router;
pub use recursos::recursos_router;

/// 전체 API 라우터를 조립합니다.
///
/// 토큰 서비스는 인증 추출기가 접근할 수 있도록 Extension으로 주입됩니다.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/recursos", recursos_router())
        .nest("/api/auth", auth_router())
        .nest("/health", health_router())
        .layer(Extension(Arc::clone(&state.tokens)))
        .with_state(state)
}
