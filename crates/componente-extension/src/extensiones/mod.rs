//! 컴포넌트에 기본 탑재되는 검증 확장.
//!
//! 모든 기본 확장은 읽기 전용 검증기입니다: 리소스를 변경하지 않고
//! [`Veredicto`](crate::Veredicto)만 반환합니다. 구조적으로 값싼 검사가
//! 비싼 검사보다 낮은 우선순위 값(먼저 실행)을 갖습니다.

pub mod limite_atributos;
pub mod nombre_reservado;

pub use limite_atributos::LimiteAtributos;
pub use nombre_reservado::NombreReservado;
