//! # Componente Servicio
//!
//! 리소스 변경 라이프사이클을 조율합니다:
//! 검증 → 확장 실행 → 영속화 → 이벤트 발행.
//!
//! # 구성 요소
//!
//! - [`RecursoService`]: 생성/수정/삭제/조회 오케스트레이션
//! - [`RepositorioEnMemoria`]: 저장소 collaborator의 인메모리 구현
//! - [`CanalEventos`]: tokio broadcast 기반 이벤트 발행자

pub mod eventos;
pub mod memoria;
pub mod servicio;

pub use eventos::CanalEventos;
pub use memoria::RepositorioEnMemoria;
pub use servicio::{RecursoService, RegistroRecursos};
