//! 확장 레지스트리 동시성/순서 통합 테스트.
//!
//! 검증하는 속성:
//! - 동시 등록 시 항목 유실/중복 없이 정렬 상태 유지
//! - 등록 중에도 읽는 쪽은 항상 완전하고 정렬된 시퀀스만 관찰
//! - 우선순위 p1 < p2 이면 등록 순서와 무관하게 p1이 먼저 실행

use std::sync::Arc;
use std::thread;

use componente_extension::{
    Contexto, ExtensionError, PuntoExtension, RegistroExtensiones, TipoSujeto,
};
use proptest::prelude::*;

/// 우선순위와 식별자만 갖는 테스트 확장.
struct Marcada {
    id: String,
    prioridad: i32,
}

impl Marcada {
    fn new(id: impl Into<String>, prioridad: i32) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            prioridad,
        })
    }
}

impl PuntoExtension<String, String> for Marcada {
    fn identificador(&self) -> &str {
        &self.id
    }

    fn prioridad(&self) -> i32 {
        self.prioridad
    }

    fn ejecutar(
        &self,
        _entrada: &String,
        _contexto: &mut Contexto,
    ) -> Result<String, ExtensionError> {
        Ok(self.id.clone())
    }
}

#[test]
fn registro_concurrente_no_pierde_entradas() {
    const HILOS: usize = 16;
    const POR_HILO: usize = 8;

    let registro: Arc<RegistroExtensiones<String, String>> =
        Arc::new(RegistroExtensiones::new());

    let mut handles = Vec::new();
    for hilo in 0..HILOS {
        let registro = Arc::clone(&registro);
        handles.push(thread::spawn(move || {
            for i in 0..POR_HILO {
                let prioridad = ((hilo + i) % 5) as i32;
                registro.registrar(
                    TipoSujeto::Recurso,
                    Marcada::new(format!("h{}-e{}", hilo, i), prioridad),
                );
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let extensiones = registro.obtener(TipoSujeto::Recurso);
    assert_eq!(extensiones.len(), HILOS * POR_HILO);

    // 중복 없음
    let mut ids: Vec<String> = extensiones
        .iter()
        .map(|e| e.identificador().to_string())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), HILOS * POR_HILO);

    // 우선순위 오름차순 정렬
    let prioridades: Vec<i32> = extensiones.iter().map(|e| e.prioridad()).collect();
    assert!(prioridades.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn lectores_concurrentes_ven_secuencias_ordenadas() {
    const REGISTROS: usize = 64;

    let registro: Arc<RegistroExtensiones<String, String>> =
        Arc::new(RegistroExtensiones::new());

    let escritor = {
        let registro = Arc::clone(&registro);
        thread::spawn(move || {
            for i in 0..REGISTROS {
                registro.registrar(
                    TipoSujeto::Recurso,
                    Marcada::new(format!("e{}", i), (REGISTROS - i) as i32),
                );
            }
        })
    };

    let mut lectores = Vec::new();
    for _ in 0..4 {
        let registro = Arc::clone(&registro);
        lectores.push(thread::spawn(move || {
            let mut contexto = Contexto::new();
            for _ in 0..200 {
                // 스냅샷은 언제나 완전하고 정렬된 상태여야 함
                let extensiones = registro.obtener(TipoSujeto::Recurso);
                let prioridades: Vec<i32> =
                    extensiones.iter().map(|e| e.prioridad()).collect();
                assert!(prioridades.windows(2).all(|w| w[0] <= w[1]));

                let resultados =
                    registro.ejecutar(TipoSujeto::Recurso, &"x".to_string(), &mut contexto);
                assert!(resultados.len() <= REGISTROS);
            }
        }));
    }

    escritor.join().unwrap();
    for lector in lectores {
        lector.join().unwrap();
    }

    assert_eq!(registro.cuenta(TipoSujeto::Recurso), REGISTROS);
}

proptest! {
    /// 임의 우선순위 수열에 대해: 실행 순서는 (우선순위, 등록 순서)로
    /// 안정 정렬된 순서와 일치해야 한다.
    #[test]
    fn prioridades_determinan_orden_de_ejecucion(
        prioridades in proptest::collection::vec(-100i32..100, 1..24)
    ) {
        let registro: RegistroExtensiones<String, String> = RegistroExtensiones::new();
        for (i, prioridad) in prioridades.iter().enumerate() {
            registro.registrar(TipoSujeto::Recurso, Marcada::new(format!("e{}", i), *prioridad));
        }

        let mut contexto = Contexto::new();
        let resultados = registro.ejecutar(TipoSujeto::Recurso, &"x".to_string(), &mut contexto);

        // 기대 순서: 안정 정렬
        let mut esperado: Vec<(i32, usize)> = prioridades
            .iter()
            .copied()
            .enumerate()
            .map(|(i, p)| (p, i))
            .collect();
        esperado.sort_by_key(|(p, i)| (*p, *i));
        let esperado: Vec<String> = esperado
            .into_iter()
            .map(|(_, i)| format!("e{}", i))
            .collect();

        prop_assert_eq!(resultados, esperado);
    }
}
