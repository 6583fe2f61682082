//! 저장소 collaborator의 인메모리 구현.
//!
//! 조립 루트의 기본 저장소이자 테스트 더블입니다. 감사 필드는 주입된
//! 감사 제공자를 통해 이 계층에서 기록됩니다 (라이프사이클 코어는
//! 감사 필드를 만지지 않습니다).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use componente_core::domain::{AuditorSistema, ProveedorAuditor, Recurso, RecursoRepository};
use componente_core::error::{ComponenteError, ComponenteResult};

/// 인메모리 리소스 저장소.
pub struct RepositorioEnMemoria {
    datos: RwLock<HashMap<Uuid, Recurso>>,
    auditor: Arc<dyn ProveedorAuditor>,
}

impl Default for RepositorioEnMemoria {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositorioEnMemoria {
    /// 시스템 감사 제공자로 빈 저장소를 생성합니다.
    pub fn new() -> Self {
        Self::with_auditor(Arc::new(AuditorSistema))
    }

    /// 주어진 감사 제공자로 빈 저장소를 생성합니다.
    pub fn with_auditor(auditor: Arc<dyn ProveedorAuditor>) -> Self {
        Self {
            datos: RwLock::new(HashMap::new()),
            auditor,
        }
    }

    /// 저장된 리소스 수를 반환합니다.
    pub async fn cuenta(&self) -> usize {
        self.datos.read().await.len()
    }
}

#[async_trait]
impl RecursoRepository for RepositorioEnMemoria {
    async fn find_all(&self) -> ComponenteResult<Vec<Recurso>> {
        Ok(self.datos.read().await.values().cloned().collect())
    }

    async fn find_activos(&self) -> ComponenteResult<Vec<Recurso>> {
        Ok(self
            .datos
            .read()
            .await
            .values()
            .filter(|r| r.activo)
            .cloned()
            .collect())
    }

    async fn find_by_nombre(&self, nombre: &str) -> ComponenteResult<Vec<Recurso>> {
        Ok(self
            .datos
            .read()
            .await
            .values()
            .filter(|r| r.nombre.contains(nombre))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> ComponenteResult<Option<Recurso>> {
        Ok(self.datos.read().await.get(&id).cloned())
    }

    async fn save(&self, mut recurso: Recurso) -> ComponenteResult<Recurso> {
        let id = recurso.id.ok_or_else(|| {
            ComponenteError::Almacenamiento(
                "el recurso no tiene identificador asignado".to_string(),
            )
        })?;

        let mut datos = self.datos.write().await;
        let ahora = Utc::now();
        let actor = self.auditor.actor_actual();

        match datos.get(&id) {
            Some(existente) => {
                // 생성 감사 필드는 저장된 값을 유지
                recurso.auditoria.creado_por = existente.auditoria.creado_por.clone();
                recurso.auditoria.fecha_creacion = existente.auditoria.fecha_creacion;
                recurso.auditoria.modificado_por = Some(actor);
                recurso.auditoria.fecha_modificacion = Some(ahora);
            }
            None => {
                recurso.auditoria.creado_por = Some(actor);
                recurso.auditoria.fecha_creacion = Some(ahora);
            }
        }

        datos.insert(id, recurso.clone());
        Ok(recurso)
    }

    async fn delete_by_id(&self, id: Uuid) -> ComponenteResult<()> {
        self.datos.write().await.remove(&id);
        Ok(())
    }
}
