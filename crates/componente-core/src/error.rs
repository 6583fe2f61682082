//! 컴포넌트의 비즈니스 에러 타입.
//!
//! 이 모듈은 컴포넌트 전반에서 사용되는 에러 타입을 정의합니다.
//! 각 에러는 안정적인 기계 판독용 코드(`codigo`)와 사람이 읽을 수 있는
//! 메시지를 함께 제공합니다.

use thiserror::Error;
use uuid::Uuid;

/// 핵심 비즈니스 에러.
#[derive(Debug, Error)]
pub enum ComponenteError {
    /// 입력 데이터 검증 실패
    #[error("{razon}")]
    Validacion {
        /// 안정적인 에러 코드 (예: "NOMBRE_REQUERIDO")
        codigo: String,
        /// 검증에 실패한 필드명
        campo: String,
        /// 사람이 읽을 수 있는 사유
        razon: String,
    },

    /// 리소스를 찾을 수 없음
    #[error("Recurso no encontrado con ID: {id}")]
    NoEncontrado {
        /// 조회에 사용된 식별자
        id: Uuid,
    },

    /// 확장 포인트가 거부 판정을 반환함
    #[error("El recurso no cumple con las validaciones de las extensiones")]
    ExtensionRechazo,

    /// 저장소 collaborator 에러 (변형 없이 전파)
    #[error("Error de almacenamiento: {0}")]
    Almacenamiento(String),

    /// 내부 에러
    #[error("Error interno: {0}")]
    Interno(String),
}

/// 컴포넌트 작업을 위한 Result 타입.
pub type ComponenteResult<T> = Result<T, ComponenteError>;

impl ComponenteError {
    /// 검증 에러를 생성합니다.
    pub fn validacion(
        codigo: impl Into<String>,
        campo: impl Into<String>,
        razon: impl Into<String>,
    ) -> Self {
        ComponenteError::Validacion {
            codigo: codigo.into(),
            campo: campo.into(),
            razon: razon.into(),
        }
    }

    /// 안정적인 기계 판독용 에러 코드를 반환합니다.
    pub fn codigo(&self) -> &str {
        match self {
            ComponenteError::Validacion { codigo, .. } => codigo,
            ComponenteError::NoEncontrado { .. } => "RECURSO_NO_ENCONTRADO",
            ComponenteError::ExtensionRechazo => "VALIDACION_EXTENSION",
            ComponenteError::Almacenamiento(_) => "ERR_ALMACENAMIENTO",
            ComponenteError::Interno(_) => "ERR_INTERNO",
        }
    }

    /// 호출자가 복구 가능한 에러인지 확인합니다.
    ///
    /// 비즈니스 규칙 에러(검증, 미발견, 확장 거부)는 사용자에게 그대로
    /// 노출되는 복구 가능한 에러입니다.
    pub fn es_recuperable(&self) -> bool {
        matches!(
            self,
            ComponenteError::Validacion { .. }
                | ComponenteError::NoEncontrado { .. }
                | ComponenteError::ExtensionRechazo
        )
    }
}
