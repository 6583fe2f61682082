//! 리소스 관리 REST 엔드포인트.
//!
//! 조회는 공개, 변경(생성/수정/삭제)은 SISTEMA 역할 토큰을 요구합니다.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use componente_core::domain::Recurso;

use crate::auth::{JwtAuth, Rol};
use crate::error::{mapear_error, ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 리소스 생성/수정 요청 페이로드.
#[derive(Debug, Deserialize, Validate)]
pub struct RecursoRequest {
    /// 리소스 이름
    #[validate(length(min = 1, max = 100, message = "El nombre es requerido y no puede exceder los 100 caracteres"))]
    pub nombre: String,
    /// 리소스 설명
    #[validate(length(max = 500, message = "La descripción no puede exceder los 500 caracteres"))]
    pub descripcion: Option<String>,
    /// 활성화 여부
    #[serde(default = "default_activo")]
    pub activo: bool,
    /// 추가 속성
    #[serde(default)]
    pub atributos: HashMap<String, String>,
}

fn default_activo() -> bool {
    true
}

impl RecursoRequest {
    fn into_recurso(self) -> Recurso {
        let mut recurso = Recurso::new(self.nombre).with_activo(self.activo);
        recurso.descripcion = self.descripcion;
        recurso.atributos = self.atributos;
        recurso
    }
}

/// 목록 조회 필터.
#[derive(Debug, Default, Deserialize)]
pub struct ListarParams {
    /// 활성 리소스만 조회
    pub solo_activos: Option<bool>,
    /// 이름 부분 일치 검색
    pub nombre: Option<String>,
}

/// 페이로드 검증 실패를 400 응답으로 변환합니다.
fn validar_payload(payload: &RecursoRequest) -> Result<(), (StatusCode, Json<ApiErrorResponse>)> {
    payload.validate().map_err(|errores| {
        (
            StatusCode::BAD_REQUEST,
            Json(
                ApiErrorResponse::new(
                    "ERR_VALIDACION",
                    "Error de validación en los datos de entrada",
                )
                .with_errores(serde_json::json!(errores)),
            ),
        )
    })
}

/// 리소스 목록 조회. 필터 우선순위: nombre > solo_activos > 전체.
///
/// GET /api/recursos?nombre=...&solo_activos=true
async fn listar(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListarParams>,
) -> ApiResult<Json<Vec<Recurso>>> {
    let recursos = if let Some(nombre) = params.nombre.as_deref().filter(|n| !n.trim().is_empty()) {
        debug!(nombre, "Searching resources by name");
        state.servicio.buscar_por_nombre(nombre).await
    } else if params.solo_activos.unwrap_or(false) {
        state.servicio.obtener_activos().await
    } else {
        state.servicio.obtener_todos().await
    };

    recursos.map(Json).map_err(mapear_error)
}

/// 식별자로 리소스 조회.
///
/// GET /api/recursos/{id}
async fn obtener(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Recurso>> {
    state
        .servicio
        .obtener_por_id(id)
        .await
        .map(Json)
        .map_err(mapear_error)
}

/// 새 리소스 생성.
///
/// POST /api/recursos
async fn crear(
    State(state): State<Arc<AppState>>,
    auth: JwtAuth,
    Json(payload): Json<RecursoRequest>,
) -> ApiResult<(StatusCode, Json<Recurso>)> {
    auth.requiere_rol(Rol::Sistema)
        .map_err(|err| err.como_respuesta_api())?;
    validar_payload(&payload)?;

    state
        .servicio
        .crear(payload.into_recurso())
        .await
        .map(|creado| (StatusCode::CREATED, Json(creado)))
        .map_err(mapear_error)
}

/// 기존 리소스 수정.
///
/// PUT /api/recursos/{id}
async fn actualizar(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    auth: JwtAuth,
    Json(payload): Json<RecursoRequest>,
) -> ApiResult<Json<Recurso>> {
    auth.requiere_rol(Rol::Sistema)
        .map_err(|err| err.como_respuesta_api())?;
    validar_payload(&payload)?;

    state
        .servicio
        .actualizar(id, payload.into_recurso())
        .await
        .map(Json)
        .map_err(mapear_error)
}

/// 리소스 삭제.
///
/// DELETE /api/recursos/{id}
async fn eliminar(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    auth: JwtAuth,
) -> ApiResult<StatusCode> {
    auth.requiere_rol(Rol::Sistema)
        .map_err(|err| err.como_respuesta_api())?;

    state
        .servicio
        .eliminar(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(mapear_error)
}

/// 리소스 라우터 생성.
pub fn recursos_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(listar).post(crear))
        .route("/{id}", get(obtener).put(actualizar).delete(eliminar))
}
