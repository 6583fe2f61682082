//! 거친 단위의 역할 게이트.
//!
//! 전체 RBAC가 아니라 발급된 토큰의 `rol` 클레임에 기반한
//! 엔드포인트 단위 게이트만 제공합니다.

use serde::{Deserialize, Serialize};

/// `rol` 추가 클레임의 키.
pub const RECLAMO_ROL: &str = "rol";

/// 사용자 역할.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rol {
    /// 시스템 주체 - 변경 작업 허용
    Sistema,
    /// 운영자 - 조회 전용
    Operador,
}

impl Rol {
    /// 역할의 우선순위 레벨 반환 (높을수록 더 많은 권한).
    pub fn nivel(&self) -> u8 {
        match self {
            Rol::Sistema => 100,
            Rol::Operador => 10,
        }
    }

    /// 문자열에서 역할 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SISTEMA" => Some(Rol::Sistema),
            "OPERADOR" => Some(Rol::Operador),
            _ => None,
        }
    }
}

impl std::fmt::Display for Rol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Rol::Sistema => "SISTEMA",
            Rol::Operador => "OPERADOR",
        };
        write!(f, "{}", s)
    }
}
