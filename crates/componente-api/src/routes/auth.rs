//! 인증 및 토큰 관리 엔드포인트.
//!
//! 데모/테스트 목적의 컨트롤러입니다. 실제 환경에서는 중앙 인증
//! 서비스에 대해 인증해야 합니다.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::RECLAMO_ROL;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 데모 토큰의 subject.
const SUBJECT_SISTEMA: &str = "sistema";

/// 토큰 발급 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// 발급된 JWT
    pub token: String,
    /// 토큰 타입 (항상 "Bearer")
    pub tipo: String,
    /// 만료까지 남은 시간 (초)
    pub expiracion_secs: u64,
    /// 사용 제한 안내
    pub nota: String,
}

/// 테스트용 시스템 토큰 발급.
///
/// 데모/테스트 전용 진입점이며 운영 환경에서 사용해서는 안 됩니다.
/// GET /api/auth/token-sistema
async fn token_sistema(State(state): State<Arc<AppState>>) -> ApiResult<Json<TokenResponse>> {
    warn!("Demo system token requested");

    let mut extra = HashMap::new();
    extra.insert(RECLAMO_ROL.to_string(), serde_json::json!("SISTEMA"));

    let token = state
        .tokens
        .generate_token_con_reclamos(SUBJECT_SISTEMA, extra)
        .map_err(|err| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiErrorResponse::new("ERR_INTERNO", err.to_string())),
            )
        })?;

    Ok(Json(TokenResponse {
        token,
        tipo: "Bearer".to_string(),
        expiracion_secs: state.tokens.expiracion_secs(),
        nota: "SOLO PARA PROPÓSITOS DE PRUEBA".to_string(),
    }))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new().route("/token-sistema", get(token_sistema))
}
