//! 예약된 이름 검증 확장.

use componente_core::domain::Recurso;
use tracing::debug;

use crate::traits::{Contexto, ExtensionError, PuntoExtension, Veredicto};

/// 기본 예약 이름 목록.
const RESERVADOS_DEFAULT: &[&str] = &["sistema", "admin", "vucem"];

/// 예약된 이름을 가진 리소스를 거부하는 검증 확장.
///
/// 이름 비교는 공백을 제거하고 대소문자를 구분하지 않습니다.
pub struct NombreReservado {
    reservados: Vec<String>,
}

impl Default for NombreReservado {
    fn default() -> Self {
        Self::new(RESERVADOS_DEFAULT.iter().map(|s| s.to_string()))
    }
}

impl NombreReservado {
    /// 주어진 예약 이름 목록으로 확장을 생성합니다.
    pub fn new(reservados: impl IntoIterator<Item = String>) -> Self {
        Self {
            reservados: reservados
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect(),
        }
    }
}

impl PuntoExtension<Recurso, Veredicto> for NombreReservado {
    fn identificador(&self) -> &str {
        "validacion.nombre-reservado"
    }

    fn prioridad(&self) -> i32 {
        10
    }

    fn ejecutar(
        &self,
        entrada: &Recurso,
        _contexto: &mut Contexto,
    ) -> Result<Veredicto, ExtensionError> {
        let nombre = entrada.nombre.trim().to_lowercase();
        if self.reservados.iter().any(|r| r == &nombre) {
            debug!(nombre = %entrada.nombre, "Reserved name rejected");
            return Ok(Veredicto::rechazado(format!(
                "El nombre '{}' está reservado",
                entrada.nombre
            )));
        }
        Ok(Veredicto::Aprobado)
    }
}
