//! 도메인 이벤트.
//!
//! 이벤트는 영속화된 리소스의 불변 스냅샷을 실어 나릅니다.
//! 발행은 fire-and-forget이며 전달 보장은 이 계층에서 제공하지 않습니다.

use crate::domain::Recurso;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 리소스 생성 이벤트 타입 식별자.
pub const TIPO_RECURSO_CREADO: &str = "recurso.creado";

/// 이 컴포넌트가 발행하는 이벤트의 출처 식별자.
pub const ORIGEN_COMPONENTE: &str = "vucem-componente";

/// 시스템 공통 이벤트 구조.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evento<T> {
    /// 이벤트 타입 식별자
    pub tipo: String,
    /// 이벤트가 실어 나르는 데이터
    pub carga: T,
    /// 이벤트 생성 시각
    pub fecha_creacion: DateTime<Utc>,
    /// 이벤트를 생성한 컴포넌트 식별자
    pub origen: String,
}

impl<T> Evento<T> {
    /// 새 이벤트를 생성합니다.
    pub fn new(tipo: impl Into<String>, carga: T, origen: impl Into<String>) -> Self {
        Self {
            tipo: tipo.into(),
            carga,
            fecha_creacion: Utc::now(),
            origen: origen.into(),
        }
    }
}

/// 리소스 생성 이벤트.
pub type RecursoCreado = Evento<Recurso>;

/// 영속화된 리소스 스냅샷으로 생성 이벤트를 만듭니다.
pub fn recurso_creado(recurso: Recurso) -> RecursoCreado {
    Evento::new(TIPO_RECURSO_CREADO, recurso, ORIGEN_COMPONENTE)
}

/// 이벤트 발행 collaborator 인터페이스.
///
/// 발행 실패는 발행자 내부에서 처리되며 호출자에게 전파되지 않습니다.
pub trait PublicadorEventos: Send + Sync {
    /// 리소스 생성 이벤트를 발행합니다.
    fn publicar(&self, evento: RecursoCreado);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recurso_creado() {
        let recurso = Recurso::new("evento de prueba");
        let evento = recurso_creado(recurso.clone());

        assert_eq!(evento.tipo, TIPO_RECURSO_CREADO);
        assert_eq!(evento.origen, ORIGEN_COMPONENTE);
        assert_eq!(evento.carga.nombre, recurso.nombre);
    }
}
