//! 엔티티 감사 정보.
//!
//! 생성/수정 주체와 시각은 외부 감사 collaborator가 기록하며,
//! 라이프사이클 코어는 절대 직접 기록하지 않습니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 인증된 주체가 없을 때 사용하는 시스템 감사 식별자.
pub const ACTOR_SISTEMA: &str = "SISTEMA";

/// 엔티티 감사 필드.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Auditoria {
    /// 생성 주체
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creado_por: Option<String>,
    /// 생성 시각
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_creacion: Option<DateTime<Utc>>,
    /// 마지막 수정 주체
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modificado_por: Option<String>,
    /// 마지막 수정 시각
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_modificacion: Option<DateTime<Utc>>,
}

/// 현재 감사 주체를 제공하는 collaborator 인터페이스.
pub trait ProveedorAuditor: Send + Sync {
    /// 현재 요청의 주체 식별자를 반환합니다.
    ///
    /// 인증된 주체가 없으면 [`ACTOR_SISTEMA`]를 반환해야 합니다.
    fn actor_actual(&self) -> String;
}

/// 항상 시스템 식별자를 반환하는 기본 감사 제공자.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditorSistema;

impl ProveedorAuditor for AuditorSistema {
    fn actor_actual(&self) -> String {
        ACTOR_SISTEMA.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auditor_sistema() {
        let auditor = AuditorSistema;
        assert_eq!(auditor.actor_actual(), "SISTEMA");
    }

    #[test]
    fn test_auditoria_serde_omite_vacios() {
        let auditoria = Auditoria::default();
        let json = serde_json::to_string(&auditoria).unwrap();
        assert_eq!(json, "{}");
    }
}
