//! 확장 포인트 레지스트리.
//!
//! 주제 유형별로 확장을 우선순위 순서로 보관하고 실행합니다.
//! 등록은 기동 시점에 드물게 일어나고 조회/실행은 요청마다 일어나므로,
//! 쓰기는 copy-on-write로 시퀀스를 교체하고 읽기는 Arc 스냅샷만 가져갑니다.
//! 읽는 쪽은 정렬이 끝난 완전한 시퀀스만 관찰합니다.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, error, info};

use crate::traits::{Contexto, PuntoExtension, TipoSujeto};

/// 등록 항목. 같은 우선순위 안에서는 등록 순서가 실행 순서를 결정합니다.
struct Entrada<T, R> {
    orden: u64,
    extension: Arc<dyn PuntoExtension<T, R>>,
}

impl<T, R> Clone for Entrada<T, R> {
    fn clone(&self) -> Self {
        Self {
            orden: self.orden,
            extension: Arc::clone(&self.extension),
        }
    }
}

/// 컴포넌트의 확장 포인트를 등록하고 관리하는 레지스트리.
///
/// 전역 싱글턴이 아니라 조립 루트(composition root)가 소유하는 명시적
/// 객체입니다. 모든 등록은 첫 요청을 처리하기 전에 끝나야 합니다.
///
/// # 타입 매개변수
///
/// * `T` - 확장 입력 주제 타입
/// * `R` - 확장 실행 결과 타입
pub struct RegistroExtensiones<T, R> {
    extensiones: RwLock<HashMap<TipoSujeto, Arc<Vec<Entrada<T, R>>>>>,
    orden: AtomicU64,
}

impl<T, R> Default for RegistroExtensiones<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> RegistroExtensiones<T, R> {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self {
            extensiones: RwLock::new(HashMap::new()),
            orden: AtomicU64::new(0),
        }
    }

    /// 주제 유형에 새 확장 포인트를 등록합니다.
    ///
    /// 등록 후 시퀀스는 (우선순위 오름차순, 등록 순서 오름차순)으로
    /// 재정렬됩니다. 동시에 읽는 쪽은 교체 전의 완전한 시퀀스 또는
    /// 교체 후의 완전한 시퀀스만 관찰합니다.
    pub fn registrar(&self, tipo: TipoSujeto, extension: Arc<dyn PuntoExtension<T, R>>) {
        let orden = self.orden.fetch_add(1, Ordering::Relaxed);
        let identificador = extension.identificador().to_string();
        let prioridad = extension.prioridad();

        let mut mapa = self
            .extensiones
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entradas = mapa.entry(tipo).or_insert_with(|| Arc::new(Vec::new()));

        let mut nuevas: Vec<Entrada<T, R>> = entradas.as_ref().clone();
        nuevas.push(Entrada { orden, extension });
        nuevas.sort_by_key(|e| (e.extension.prioridad(), e.orden));
        *entradas = Arc::new(nuevas);

        info!(
            identificador = %identificador,
            tipo = %tipo,
            prioridad,
            "Extension point registered"
        );
    }

    /// 주제 유형에 등록된 확장 포인트를 우선순위 순서로 반환합니다.
    ///
    /// 등록된 확장이 없으면 빈 시퀀스를 반환합니다 (에러 아님).
    pub fn obtener(&self, tipo: TipoSujeto) -> Vec<Arc<dyn PuntoExtension<T, R>>> {
        self.snapshot(tipo)
            .iter()
            .map(|e| Arc::clone(&e.extension))
            .collect()
    }

    /// 주제 유형에 등록된 확장 포인트 수를 반환합니다.
    pub fn cuenta(&self, tipo: TipoSujeto) -> usize {
        self.snapshot(tipo).len()
    }

    /// 주제 유형에 등록된 모든 확장 포인트를 우선순위 순서로 실행합니다.
    ///
    /// 모든 확장은 같은 입력과 공유 컨텍스트에 대해 호출 스레드에서
    /// 순차 실행됩니다. 개별 확장의 실패(에러 반환 또는 패닉)는 격리되어
    /// 로깅만 되고, 나머지 확장의 실행을 막지 않습니다. 결과 시퀀스는
    /// 정상 완료한 확장당 한 항목씩, 상대 순서를 유지한 채 담깁니다.
    pub fn ejecutar(&self, tipo: TipoSujeto, entrada: &T, contexto: &mut Contexto) -> Vec<R> {
        let snapshot = self.snapshot(tipo);
        let mut resultados = Vec::with_capacity(snapshot.len());

        for item in snapshot.iter() {
            let extension = &item.extension;
            let salida = catch_unwind(AssertUnwindSafe(|| extension.ejecutar(entrada, contexto)));
            match salida {
                Ok(Ok(resultado)) => {
                    debug!(
                        identificador = %extension.identificador(),
                        tipo = %tipo,
                        "Extension point executed"
                    );
                    resultados.push(resultado);
                }
                Ok(Err(err)) => {
                    error!(
                        identificador = %extension.identificador(),
                        tipo = %tipo,
                        error = %err,
                        "Extension point failed"
                    );
                }
                Err(panico) => {
                    error!(
                        identificador = %extension.identificador(),
                        tipo = %tipo,
                        motivo = mensaje_panico(&panico),
                        "Extension point panicked"
                    );
                }
            }
        }

        resultados
    }

    /// 현재 시퀀스의 Arc 스냅샷을 가져옵니다. 락은 복제 동안만 유지됩니다.
    fn snapshot(&self, tipo: TipoSujeto) -> Arc<Vec<Entrada<T, R>>> {
        self.extensiones
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&tipo)
            .cloned()
            .unwrap_or_default()
    }
}

/// 패닉 페이로드에서 사람이 읽을 수 있는 메시지를 추출합니다.
fn mensaje_panico(panico: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panico.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panico.downcast_ref::<String>() {
        s.as_str()
    } else {
        "panic sin mensaje"
    }
}
