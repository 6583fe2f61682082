//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트에서 일관된 에러 형식을 제공합니다.
//!
//! # 예시
//!
//! ```json
//! {
//!   "codigo": "RECURSO_NO_ENCONTRADO",
//!   "mensaje": "Recurso no encontrado con ID: ...",
//!   "timestamp": 1738300800
//! }
//! ```

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use componente_core::error::ComponenteError;

/// 통합 API 에러 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 안정적인 에러 코드 (예: "VALIDACION_EXTENSION", "RECURSO_NO_ENCONTRADO")
    pub codigo: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub mensaje: String,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    pub timestamp: i64,
    /// 요청 경로 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// 필드별 검증 에러 상세 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errores: Option<Value>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성.
    pub fn new(codigo: impl Into<String>, mensaje: impl Into<String>) -> Self {
        Self {
            codigo: codigo.into(),
            mensaje: mensaje.into(),
            timestamp: chrono::Utc::now().timestamp(),
            path: None,
            errores: None,
        }
    }

    /// 필드별 상세 정보를 추가합니다.
    #[must_use]
    pub fn with_errores(mut self, errores: Value) -> Self {
        self.errores = Some(errores);
        self
    }

    /// 요청 경로를 추가합니다.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.codigo, self.mensaje)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 비즈니스 에러를 HTTP 응답으로 변환합니다.
///
/// 복구 가능한 비즈니스 에러는 코드/메시지를 그대로 노출하고,
/// 그 외는 내부를 드러내지 않는 일반 500으로 강등됩니다.
pub fn mapear_error(err: ComponenteError) -> (StatusCode, Json<ApiErrorResponse>) {
    let status = match &err {
        ComponenteError::Validacion { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ComponenteError::ExtensionRechazo => StatusCode::UNPROCESSABLE_ENTITY,
        ComponenteError::NoEncontrado { .. } => StatusCode::NOT_FOUND,
        ComponenteError::Almacenamiento(_) | ComponenteError::Interno(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(codigo = err.codigo(), error = %err, "Unhandled internal error");
        return (
            status,
            Json(ApiErrorResponse::new(
                "ERR_INTERNO",
                "Error interno del servidor",
            )),
        );
    }

    (
        status,
        Json(ApiErrorResponse::new(err.codigo(), err.to_string())),
    )
}
