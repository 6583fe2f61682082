//! 속성 맵 한도 검증 확장.

use componente_core::domain::Recurso;

use crate::traits::{Contexto, ExtensionError, PuntoExtension, Veredicto};

/// 속성 수와 값 길이 한도를 검사하는 검증 확장.
///
/// 검사한 속성 수를 컨텍스트 키 `atributos_contados`에 기록하여
/// 뒤따르는 확장이 재계산 없이 사용할 수 있게 합니다.
pub struct LimiteAtributos {
    max_atributos: usize,
    max_valor_len: usize,
}

impl Default for LimiteAtributos {
    fn default() -> Self {
        Self {
            max_atributos: 50,
            max_valor_len: 1000,
        }
    }
}

impl LimiteAtributos {
    /// 주어진 한도로 확장을 생성합니다.
    pub fn new(max_atributos: usize, max_valor_len: usize) -> Self {
        Self {
            max_atributos,
            max_valor_len,
        }
    }
}

impl PuntoExtension<Recurso, Veredicto> for LimiteAtributos {
    fn identificador(&self) -> &str {
        "validacion.limite-atributos"
    }

    fn prioridad(&self) -> i32 {
        20
    }

    fn ejecutar(
        &self,
        entrada: &Recurso,
        contexto: &mut Contexto,
    ) -> Result<Veredicto, ExtensionError> {
        contexto.insert(
            "atributos_contados".to_string(),
            serde_json::json!(entrada.atributos.len()),
        );

        if entrada.atributos.len() > self.max_atributos {
            return Ok(Veredicto::rechazado(format!(
                "El recurso excede el máximo de {} atributos",
                self.max_atributos
            )));
        }

        for (clave, valor) in &entrada.atributos {
            if valor.len() > self.max_valor_len {
                return Ok(Veredicto::rechazado(format!(
                    "El valor del atributo '{}' excede los {} caracteres",
                    clave, self.max_valor_len
                )));
            }
        }

        Ok(Veredicto::Aprobado)
    }
}
