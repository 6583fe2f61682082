//! 리소스 저장소 collaborator 인터페이스.
//!
//! 코어는 각 연산을 원자적인 단일 객체 연산으로 취급합니다.
//! 저장소 에러는 [`ComponenteError::Almacenamiento`]로 변형 없이 전파됩니다.
//!
//! [`ComponenteError::Almacenamiento`]: crate::error::ComponenteError::Almacenamiento

use crate::domain::Recurso;
use crate::error::ComponenteResult;
use async_trait::async_trait;
use uuid::Uuid;

/// `Recurso` 엔티티의 저장소 인터페이스.
#[async_trait]
pub trait RecursoRepository: Send + Sync {
    /// 모든 리소스를 반환합니다.
    async fn find_all(&self) -> ComponenteResult<Vec<Recurso>>;

    /// 활성 리소스만 반환합니다.
    async fn find_activos(&self) -> ComponenteResult<Vec<Recurso>>;

    /// 이름에 주어진 부분 문자열이 포함된 리소스를 반환합니다.
    async fn find_by_nombre(&self, nombre: &str) -> ComponenteResult<Vec<Recurso>>;

    /// 식별자로 리소스를 조회합니다.
    async fn find_by_id(&self, id: Uuid) -> ComponenteResult<Option<Recurso>>;

    /// 리소스를 저장하고 영속화된 상태를 반환합니다.
    async fn save(&self, recurso: Recurso) -> ComponenteResult<Recurso>;

    /// 식별자로 리소스를 삭제합니다.
    async fn delete_by_id(&self, id: Uuid) -> ComponenteResult<()>;
}
