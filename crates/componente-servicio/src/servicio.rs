//! 리소스 관리 서비스.
//!
//! 변경 작업(생성/수정/삭제)의 상태 기계를 구현합니다.
//! 확장의 *실행 실패*는 레지스트리 안에서 격리되지만, 확장의 명시적
//! *거부 판정*은 작업 전체를 중단시킵니다.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use componente_core::domain::recurso::{DESCRIPCION_MAX_LEN, NOMBRE_MAX_LEN};
use componente_core::domain::{recurso_creado, PublicadorEventos, Recurso, RecursoRepository};
use componente_core::error::{ComponenteError, ComponenteResult};
use componente_extension::traits::CTX_RECURSO_EXISTENTE;
use componente_extension::{Contexto, RegistroExtensiones, TipoSujeto, Veredicto};

/// 리소스 주제에 특화된 확장 레지스트리 타입.
pub type RegistroRecursos = RegistroExtensiones<Recurso, Veredicto>;

/// 리소스 관리 서비스.
///
/// 모든 collaborator는 조립 루트에서 주입됩니다.
pub struct RecursoService {
    repositorio: Arc<dyn RecursoRepository>,
    extensiones: Arc<RegistroRecursos>,
    publicador: Arc<dyn PublicadorEventos>,
}

impl RecursoService {
    /// 새 서비스를 생성합니다.
    pub fn new(
        repositorio: Arc<dyn RecursoRepository>,
        extensiones: Arc<RegistroRecursos>,
        publicador: Arc<dyn PublicadorEventos>,
    ) -> Self {
        Self {
            repositorio,
            extensiones,
            publicador,
        }
    }

    /// 모든 리소스를 반환합니다.
    pub async fn obtener_todos(&self) -> ComponenteResult<Vec<Recurso>> {
        debug!("Fetching all resources");
        self.repositorio.find_all().await
    }

    /// 활성 리소스만 반환합니다.
    pub async fn obtener_activos(&self) -> ComponenteResult<Vec<Recurso>> {
        debug!("Fetching active resources");
        self.repositorio.find_activos().await
    }

    /// 이름으로 리소스를 검색합니다.
    pub async fn buscar_por_nombre(&self, nombre: &str) -> ComponenteResult<Vec<Recurso>> {
        debug!(nombre, "Searching resources by name");
        self.repositorio.find_by_nombre(nombre).await
    }

    /// 식별자로 리소스를 조회합니다.
    pub async fn obtener_por_id(&self, id: Uuid) -> ComponenteResult<Recurso> {
        debug!(%id, "Fetching resource by id");
        self.repositorio
            .find_by_id(id)
            .await?
            .ok_or(ComponenteError::NoEncontrado { id })
    }

    /// 새 리소스를 생성합니다.
    ///
    /// 상태 흐름: 검증 → 확장 실행 → (필요 시) 식별자 부여 → 영속화 →
    /// 생성 이벤트 발행. 어느 단계에서든 거부되면 부수 효과 없이 중단합니다.
    /// 이벤트 발행 실패는 이미 영속화된 쓰기를 되돌리지 않습니다
    /// (fire-and-forget 경계).
    pub async fn crear(&self, mut recurso: Recurso) -> ComponenteResult<Recurso> {
        debug!(nombre = %recurso.nombre, "Creating resource");
        validar_recurso(&recurso)?;

        let mut contexto = Contexto::new();
        self.aplicar_extensiones(&recurso, &mut contexto)?;

        // 식별자가 없을 때만 부여, 기존 식별자는 절대 덮어쓰지 않음
        if recurso.id.is_none() {
            recurso.id = Some(Uuid::new_v4());
        }

        let guardado = self.repositorio.save(recurso).await?;

        self.publicador.publicar(recurso_creado(guardado.clone()));

        Ok(guardado)
    }

    /// 기존 리소스를 수정합니다.
    ///
    /// 식별자는 경로의 `id`로 고정되며 페이로드의 식별자는 무시됩니다.
    /// 확장 컨텍스트에 기존 리소스를 실어 확장이 변경 전후를 비교할 수
    /// 있게 합니다. 수정은 이벤트를 발행하지 않습니다.
    pub async fn actualizar(&self, id: Uuid, mut recurso: Recurso) -> ComponenteResult<Recurso> {
        debug!(%id, "Updating resource");
        let existente = self.obtener_por_id(id).await?;

        recurso.id = Some(id);
        validar_recurso(&recurso)?;

        let mut contexto = Contexto::new();
        contexto.insert(
            CTX_RECURSO_EXISTENTE.to_string(),
            serde_json::to_value(&existente).unwrap_or_default(),
        );
        self.aplicar_extensiones(&recurso, &mut contexto)?;

        self.repositorio.save(recurso).await
    }

    /// 식별자로 리소스를 삭제합니다.
    ///
    /// 존재 확인 후 삭제하며, 삭제에는 확장이 실행되지 않습니다.
    pub async fn eliminar(&self, id: Uuid) -> ComponenteResult<()> {
        debug!(%id, "Deleting resource");
        self.obtener_por_id(id).await?;
        self.repositorio.delete_by_id(id).await
    }

    /// 등록된 확장을 실행하고 거부 판정이 있으면 작업을 중단합니다.
    fn aplicar_extensiones(
        &self,
        recurso: &Recurso,
        contexto: &mut Contexto,
    ) -> ComponenteResult<()> {
        let veredictos = self
            .extensiones
            .ejecutar(TipoSujeto::Recurso, recurso, contexto);

        let motivos: Vec<&str> = veredictos
            .iter()
            .filter_map(|v| match v {
                Veredicto::Rechazado { motivo } => Some(motivo.as_str()),
                Veredicto::Aprobado => None,
            })
            .collect();

        if !motivos.is_empty() {
            warn!(
                nombre = %recurso.nombre,
                motivos = ?motivos,
                "Resource rejected by extension verdict"
            );
            return Err(ComponenteError::ExtensionRechazo);
        }

        Ok(())
    }
}

/// 리소스가 비즈니스 규칙을 만족하는지 검증합니다.
///
/// 첫 번째 위반에서 해당 에러로 중단합니다.
fn validar_recurso(recurso: &Recurso) -> ComponenteResult<()> {
    if recurso.nombre.trim().is_empty() {
        return Err(ComponenteError::validacion(
            "NOMBRE_REQUERIDO",
            "nombre",
            "El nombre del recurso es requerido",
        ));
    }

    if recurso.nombre.chars().count() > NOMBRE_MAX_LEN {
        return Err(ComponenteError::validacion(
            "NOMBRE_MUY_LARGO",
            "nombre",
            format!(
                "El nombre del recurso no puede exceder los {} caracteres",
                NOMBRE_MAX_LEN
            ),
        ));
    }

    if let Some(descripcion) = &recurso.descripcion {
        if descripcion.chars().count() > DESCRIPCION_MAX_LEN {
            return Err(ComponenteError::validacion(
                "DESCRIPCION_MUY_LARGA",
                "descripcion",
                format!(
                    "La descripción del recurso no puede exceder los {} caracteres",
                    DESCRIPCION_MAX_LEN
                ),
            ));
        }
    }

    Ok(())
}
