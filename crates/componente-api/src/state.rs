//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! 조립 루트입니다: 레지스트리 구성과 기본 확장 등록, 토큰 서비스의
//! 키 결정이 모두 여기서, 서버가 트래픽을 받기 전에 끝납니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use componente_core::config::AppConfig;
use componente_extension::extensiones::{LimiteAtributos, NombreReservado};
use componente_extension::TipoSujeto;
use componente_servicio::{CanalEventos, RecursoService, RegistroRecursos, RepositorioEnMemoria};

use crate::auth::TokenService;

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 리소스 라이프사이클 서비스
    pub servicio: Arc<RecursoService>,

    /// JWT 토큰 서비스 (키 자료는 생성 이후 읽기 전용)
    pub tokens: Arc<TokenService>,

    /// 저장소 collaborator (인메모리 구현)
    pub repositorio: Arc<RepositorioEnMemoria>,

    /// 확장 포인트 레지스트리
    pub extensiones: Arc<RegistroRecursos>,

    /// 도메인 이벤트 채널
    pub eventos: Arc<CanalEventos>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: DateTime<Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 설정에서 전체 상태를 조립합니다.
    ///
    /// 기본 탑재 확장은 여기서 등록되며, 이 함수가 반환된 뒤에야
    /// 라우터가 만들어지므로 첫 요청 전에 등록이 완료됩니다.
    pub fn new(config: &AppConfig) -> Self {
        let repositorio = Arc::new(RepositorioEnMemoria::new());
        let eventos = Arc::new(CanalEventos::default());

        let extensiones = Arc::new(RegistroRecursos::new());
        extensiones.registrar(TipoSujeto::Recurso, Arc::new(NombreReservado::default()));
        extensiones.registrar(TipoSujeto::Recurso, Arc::new(LimiteAtributos::default()));

        let servicio = Arc::new(RecursoService::new(
            Arc::clone(&repositorio) as Arc<dyn componente_core::domain::RecursoRepository>,
            Arc::clone(&extensiones),
            Arc::clone(&eventos) as Arc<dyn componente_core::domain::PublicadorEventos>,
        ));

        let tokens = Arc::new(TokenService::new(&config.seguridad.jwt));

        Self {
            servicio,
            tokens,
            repositorio,
            extensiones,
            eventos,
            started_at: Utc::now(),
            version: config.componente.version.clone(),
        }
    }

    /// 서버 업타임(초)을 반환합니다.
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

/// 테스트용 상태 생성 (기본 설정, 기본 확장 포함).
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    AppState::new(&AppConfig::default())
}
