//! Axum용 JWT 인증 미들웨어.
//!
//! Bearer 토큰을 검증하고 요청 범위의 인증된 주체를 설정합니다.
//! 토큰 검증은 fail-closed입니다: 어떤 파싱/서명 문제도 401로 끝납니다.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::jwt::{Reclamos, TokenService};
use super::roles::{Rol, RECLAMO_ROL};

/// JWT 인증 추출기.
///
/// 핸들러 시그니처에 포함하면 검증된 클레임을 주입합니다.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protegido(JwtAuth(reclamos): JwtAuth) -> impl IntoResponse {
///     format!("Hola, {}", reclamos.sub)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JwtAuth(pub Reclamos);

impl JwtAuth {
    /// 클레임의 `rol`을 파싱합니다.
    pub fn rol(&self) -> Option<Rol> {
        self.0
            .extra
            .get(RECLAMO_ROL)
            .and_then(|v| v.as_str())
            .and_then(Rol::parse)
    }

    /// 주어진 역할 이상을 요구합니다.
    pub fn requiere_rol(&self, requerido: Rol) -> Result<(), AuthError> {
        match self.rol() {
            Some(rol) if rol.nivel() >= requerido.nivel() => Ok(()),
            _ => Err(AuthError::RolInsuficiente),
        }
    }
}

/// JWT 인증 에러.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Se requiere un token de autenticación")]
    TokenFaltante,
    #[error("Formato de encabezado Authorization inválido")]
    EncabezadoInvalido,
    #[error("Token inválido o expirado")]
    TokenInvalido,
    #[error("Rol insuficiente para esta operación")]
    RolInsuficiente,
    #[error("Servicio de tokens no disponible")]
    ServicioNoDisponible,
}

impl AuthError {
    fn codigo(&self) -> &'static str {
        match self {
            AuthError::TokenFaltante => "TOKEN_FALTANTE",
            AuthError::EncabezadoInvalido => "ENCABEZADO_INVALIDO",
            AuthError::TokenInvalido => "TOKEN_INVALIDO",
            AuthError::RolInsuficiente => "ROL_INSUFICIENTE",
            AuthError::ServicioNoDisponible => "ERR_INTERNO",
        }
    }
}

impl AuthError {
    fn status(&self) -> StatusCode {
        match self {
            AuthError::RolInsuficiente => StatusCode::FORBIDDEN,
            AuthError::ServicioNoDisponible => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// 통합 API 에러 봉투 형태로 변환합니다.
    pub fn como_respuesta_api(&self) -> (StatusCode, Json<crate::error::ApiErrorResponse>) {
        (
            self.status(),
            Json(crate::error::ApiErrorResponse::new(
                self.codigo(),
                self.to_string(),
            )),
        )
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "codigo": self.codigo(),
            "mensaje": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

impl<S> FromRequestParts<S> for JwtAuth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::TokenFaltante)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::EncabezadoInvalido)?;

        let tokens = parts
            .extensions
            .get::<Arc<TokenService>>()
            .ok_or(AuthError::ServicioNoDisponible)?;

        // subject 추출 후 그 subject에 대한 유효성까지 확인 (fail closed)
        let username = tokens
            .extract_username(token)
            .ok_or(AuthError::TokenInvalido)?;
        if !tokens.is_token_valid(token, &username) {
            return Err(AuthError::TokenInvalido);
        }

        let reclamos = tokens
            .verificar(token)
            .map_err(|_| AuthError::TokenInvalido)?;

        Ok(JwtAuth(reclamos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Extension, Router};
    use componente_core::config::JwtConfig;
    use tower::ServiceExt;

    async fn protegido(auth: JwtAuth) -> String {
        format!("hola {}", auth.0.sub)
    }

    async fn solo_sistema(auth: JwtAuth) -> Result<String, AuthError> {
        auth.requiere_rol(Rol::Sistema)?;
        Ok("autorizado".to_string())
    }

    fn app(tokens: Arc<TokenService>) -> Router {
        Router::new()
            .route("/protegido", get(protegido))
            .route("/sistema", get(solo_sistema))
            .layer(Extension(tokens))
    }

    fn servicio_de_prueba() -> Arc<TokenService> {
        Arc::new(TokenService::new(&JwtConfig::default()))
    }

    #[tokio::test]
    async fn test_sin_token_devuelve_401() {
        let app = app(servicio_de_prueba());
        let respuesta = app
            .oneshot(
                Request::builder()
                    .uri("/protegido")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(respuesta.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_token_valido_pasa() {
        let tokens = servicio_de_prueba();
        let token = tokens.generate_token("alice").unwrap();
        let app = app(Arc::clone(&tokens));

        let respuesta = app
            .oneshot(
                Request::builder()
                    .uri("/protegido")
                    .header(AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(respuesta.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_token_manipulado_devuelve_401() {
        let tokens = servicio_de_prueba();
        let token = tokens.generate_token("alice").unwrap();
        let app = app(Arc::clone(&tokens));

        let respuesta = app
            .oneshot(
                Request::builder()
                    .uri("/protegido")
                    .header(AUTHORIZATION, format!("Bearer {}x", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(respuesta.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_rol_insuficiente_devuelve_403() {
        let tokens = servicio_de_prueba();
        // rol 클레임 없는 토큰은 시스템 게이트를 통과할 수 없음
        let token = tokens.generate_token("alice").unwrap();
        let app = app(Arc::clone(&tokens));

        let respuesta = app
            .oneshot(
                Request::builder()
                    .uri("/sistema")
                    .header(AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(respuesta.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_rol_sistema_autorizado() {
        let tokens = servicio_de_prueba();
        let mut extra = std::collections::HashMap::new();
        extra.insert(RECLAMO_ROL.to_string(), serde_json::json!("SISTEMA"));
        let token = tokens
            .generate_token_con_reclamos("sistema", extra)
            .unwrap();
        let app = app(Arc::clone(&tokens));

        let respuesta = app
            .oneshot(
                Request::builder()
                    .uri("/sistema")
                    .header(AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(respuesta.status(), StatusCode::OK);
    }
}
