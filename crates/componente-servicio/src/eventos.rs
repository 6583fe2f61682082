//! tokio broadcast 기반 이벤트 발행자.
//!
//! 발행은 fire-and-forget입니다: 구독자가 없거나 수신이 지연되어도
//! 발행자는 실패하지 않으며, 이미 영속화된 쓰기에 영향을 주지 않습니다.

use tokio::sync::broadcast;
use tracing::debug;

use componente_core::domain::{PublicadorEventos, RecursoCreado};

/// 기본 브로드캐스트 버퍼 크기.
const CAPACIDAD_DEFAULT: usize = 256;

/// 프로세스 내 이벤트 채널.
pub struct CanalEventos {
    tx: broadcast::Sender<RecursoCreado>,
}

impl Default for CanalEventos {
    fn default() -> Self {
        Self::new(CAPACIDAD_DEFAULT)
    }
}

impl CanalEventos {
    /// 주어진 버퍼 크기로 채널을 생성합니다.
    pub fn new(capacidad: usize) -> Self {
        let (tx, _) = broadcast::channel(capacidad);
        Self { tx }
    }

    /// 이벤트 수신 핸들을 반환합니다.
    pub fn suscribirse(&self) -> broadcast::Receiver<RecursoCreado> {
        self.tx.subscribe()
    }

    /// 현재 구독자 수를 반환합니다.
    pub fn suscriptores(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl PublicadorEventos for CanalEventos {
    fn publicar(&self, evento: RecursoCreado) {
        // 구독자가 없으면 send가 실패하지만 전달 보장은 이 계층의
        // 책임이 아니므로 무시함
        match self.tx.send(evento) {
            Ok(entregados) => {
                debug!(entregados, "Domain event published");
            }
            Err(_) => {
                debug!("Domain event dropped, no subscribers");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use componente_core::domain::{recurso_creado, Recurso, TIPO_RECURSO_CREADO};

    #[tokio::test]
    async fn test_publicar_y_recibir() {
        let canal = CanalEventos::default();
        let mut rx = canal.suscribirse();

        canal.publicar(recurso_creado(Recurso::new("evento")));

        let evento = rx.recv().await.unwrap();
        assert_eq!(evento.tipo, TIPO_RECURSO_CREADO);
        assert_eq!(evento.carga.nombre, "evento");
    }

    #[test]
    fn test_publicar_sin_suscriptores_no_falla() {
        let canal = CanalEventos::default();
        assert_eq!(canal.suscriptores(), 0);
        canal.publicar(recurso_creado(Recurso::new("descartado")));
    }
}
