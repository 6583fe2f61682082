//! 리소스 도메인 엔티티.
//!
//! `Recurso`는 컴포넌트 템플릿의 예시 도메인 엔티티입니다.
//! 생성 시 식별자가 없으면 라이프사이클이 새 UUID를 부여하며,
//! 수정 시에는 절대 재생성하지 않습니다.

use crate::domain::Auditoria;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// 리소스 이름 최대 길이.
pub const NOMBRE_MAX_LEN: usize = 100;

/// 리소스 설명 최대 길이.
pub const DESCRIPCION_MAX_LEN: usize = 500;

/// 일반 리소스를 나타내는 도메인 엔티티.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recurso {
    /// 리소스 고유 식별자 (생성 전에는 없을 수 있음)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// 리소스 이름
    pub nombre: String,
    /// 리소스 설명
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    /// 리소스 활성화 여부
    #[serde(default = "default_activo")]
    pub activo: bool,
    /// 추가 속성
    #[serde(default)]
    pub atributos: HashMap<String, String>,
    /// 감사 정보 (외부 감사 collaborator가 기록)
    #[serde(flatten)]
    pub auditoria: Auditoria,
}

fn default_activo() -> bool {
    true
}

impl Recurso {
    /// 새 리소스를 생성합니다 (식별자 미부여, 활성 상태).
    pub fn new(nombre: impl Into<String>) -> Self {
        Self {
            id: None,
            nombre: nombre.into(),
            descripcion: None,
            activo: true,
            atributos: HashMap::new(),
            auditoria: Auditoria::default(),
        }
    }

    /// 식별자를 설정합니다.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// 설명을 설정합니다.
    pub fn with_descripcion(mut self, descripcion: impl Into<String>) -> Self {
        self.descripcion = Some(descripcion.into());
        self
    }

    /// 속성을 추가합니다.
    pub fn with_atributo(mut self, clave: impl Into<String>, valor: impl Into<String>) -> Self {
        self.atributos.insert(clave.into(), valor.into());
        self
    }

    /// 활성화 여부를 설정합니다.
    pub fn with_activo(mut self, activo: bool) -> Self {
        self.activo = activo;
        self
    }

    /// 리소스가 기본 비즈니스 규칙을 만족하는지 확인합니다.
    pub fn es_valido(&self) -> bool {
        !self.nombre.trim().is_empty()
    }
}
