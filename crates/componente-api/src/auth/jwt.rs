//! JWT 토큰 서비스.
//!
//! 서명 키의 기동 시 결정, 토큰 발급, 다중 조건 검증을 담당합니다.
//!
//! # 키 상태 기계
//!
//! 기동 시 정확히 한 번 결정되며 프로세스 수명 동안 불변입니다:
//! - **Configurada**: 설정에 base64 키가 있고 디코딩 결과가 32바이트
//!   이상이면 그대로 채택
//! - **Generada**: 키가 없거나 기준 미달이면 OS 엔트로피로 새 키를 생성
//!   (운영자가 보존할 수 있도록 한 번 로깅)
//! - **Respaldo**: 키 생성 경로가 실패하면 최소 길이의 난수 바이트로
//!   대체 키를 구성. 이 경로는 절대 키를 미설정 상태로 남기지 않음

use std::collections::HashMap;

use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use componente_core::config::JwtConfig;

/// HMAC-SHA256 서명 키의 최소 길이 (바이트).
pub const CLAVE_MIN_BYTES: usize = 32;

/// 서명 키가 어떻게 결정되었는지 나타내는 터미널 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstadoClave {
    /// 설정에서 제공된 키를 채택
    Configurada,
    /// 새로 생성한 키를 채택
    Generada,
    /// 생성 실패 후 대체 경로로 구성한 키를 채택
    Respaldo,
}

/// JWT 페이로드.
///
/// 발급 시 모든 표준 클레임이 채워지며, 검증 시 audience를 제외한
/// 모든 클레임이 검사됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reclamos {
    /// Subject - 사용자 이름
    pub sub: String,
    /// 토큰 발급자
    pub iss: String,
    /// 토큰 대상자
    pub aud: String,
    /// JWT ID - 토큰 고유 식별자
    pub jti: String,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Not Before (Unix timestamp)
    pub nbf: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// 호출자가 제공한 추가 클레임
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Reclamos {
    /// 현재 시각 기준으로 새 클레임을 생성합니다.
    pub fn new(
        subject: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        ttl_secs: u64,
        extra: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self::con_emision(subject, issuer, audience, ttl_secs, extra, Utc::now())
    }

    /// 주어진 발급 시각 기준으로 클레임을 생성합니다.
    ///
    /// 토큰 ID를 제외하면 같은 시각과 입력에 대해 결정적입니다.
    pub fn con_emision(
        subject: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        ttl_secs: u64,
        extra: HashMap<String, serde_json::Value>,
        emitido_en: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: subject.into(),
            iss: issuer.into(),
            aud: audience.into(),
            jti: Uuid::new_v4().to_string(),
            iat: emitido_en.timestamp(),
            nbf: emitido_en.timestamp(),
            exp: (emitido_en + Duration::seconds(ttl_secs as i64)).timestamp(),
            extra,
        }
    }
}

/// 토큰 발급 에러.
///
/// 검증 경로는 절대 에러를 밖으로 내보내지 않고 `false`로만 응답합니다.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Error al firmar el token: {0}")]
    Firma(#[from] jsonwebtoken::errors::Error),
}

/// JWT 토큰 서비스.
///
/// 조립 루트가 소유하며 서버가 트래픽을 받기 전에 생성됩니다.
/// 생성 이후 키 자료는 읽기 전용이므로 락이 필요 없습니다.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    estado: EstadoClave,
    issuer: String,
    audience: String,
    expiracion_secs: u64,
}

impl TokenService {
    /// 설정에서 토큰 서비스를 생성합니다.
    ///
    /// 키 결정은 실패할 수 없습니다: 설정 키가 없거나 약하면 생성 경로로,
    /// 생성이 실패하면 대체 경로로 내려갑니다.
    pub fn new(config: &JwtConfig) -> Self {
        let (clave, estado) = resolver_clave(config.secret.as_ref());

        Self {
            encoding: EncodingKey::from_secret(&clave),
            decoding: DecodingKey::from_secret(&clave),
            estado,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            expiracion_secs: config.expiracion_secs,
        }
    }

    /// 키가 어떻게 결정되었는지 반환합니다.
    pub fn estado(&self) -> EstadoClave {
        self.estado
    }

    /// 설정된 토큰 수명을 반환합니다 (초).
    pub fn expiracion_secs(&self) -> u64 {
        self.expiracion_secs
    }

    /// 표준 클레임만으로 토큰을 발급합니다.
    pub fn generate_token(&self, subject: &str) -> Result<String, TokenError> {
        self.generate_token_con_reclamos(subject, HashMap::new())
    }

    /// 추가 클레임을 병합하여 토큰을 발급합니다.
    pub fn generate_token_con_reclamos(
        &self,
        subject: &str,
        extra: HashMap<String, serde_json::Value>,
    ) -> Result<String, TokenError> {
        let reclamos = Reclamos::new(
            subject,
            &self.issuer,
            &self.audience,
            self.expiracion_secs,
            extra,
        );
        self.firmar(&reclamos)
    }

    /// 토큰이 주어진 subject에 대해 유효한지 확인합니다.
    ///
    /// 유효 조건: 서명 일치 ∧ subject 일치 ∧ 미만료 ∧ issuer 일치.
    /// 파싱/서명 에러는 전파되지 않고 `false`로 처리됩니다 (fail closed).
    pub fn is_token_valid(&self, token: &str, expected_subject: &str) -> bool {
        match self.verificar(token) {
            Ok(reclamos) => reclamos.sub == expected_subject && reclamos.iss == self.issuer,
            Err(err) => {
                warn!(error = %err, "Invalid JWT");
                false
            }
        }
    }

    /// 토큰에서 사용자 이름을 추출합니다.
    ///
    /// 서명이 검증되지 않으면 `None`을 반환합니다.
    pub fn extract_username(&self, token: &str) -> Option<String> {
        self.verificar(token).ok().map(|r| r.sub)
    }

    /// 토큰에서 특정 클레임을 추출합니다.
    ///
    /// 서명 검증을 통과한 클레임만 selector에 전달됩니다.
    pub fn extract_claim<T>(
        &self,
        token: &str,
        selector: impl FnOnce(&Reclamos) -> T,
    ) -> Result<T, jsonwebtoken::errors::Error> {
        let reclamos = self.verificar(token)?;
        Ok(selector(&reclamos))
    }

    /// 서명/만료/nbf를 검증하고 클레임을 반환합니다.
    pub fn verificar(&self, token: &str) -> Result<Reclamos, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        // 만료는 초 단위로 정확히 판정
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        // audience는 현재 범위에서 검증하지 않음
        validation.validate_aud = false;

        decode::<Reclamos>(token, &self.decoding, &validation).map(|data| data.claims)
    }

    fn firmar(&self, reclamos: &Reclamos) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), reclamos, &self.encoding).map_err(TokenError::from)
    }
}

/// 서명 키 자료와 그 결정 상태를 계산합니다.
fn resolver_clave(secret: Option<&SecretString>) -> (Vec<u8>, EstadoClave) {
    if let Some(secret) = secret {
        let texto = secret.expose_secret().trim();
        if !texto.is_empty() {
            match base64::engine::general_purpose::STANDARD.decode(texto) {
                Ok(bytes) if bytes.len() >= CLAVE_MIN_BYTES => {
                    info!("JWT signing key initialized from configuration");
                    return (bytes, EstadoClave::Configurada);
                }
                Ok(bytes) => {
                    warn!(
                        bytes = bytes.len(),
                        minimo = CLAVE_MIN_BYTES,
                        "Configured JWT key is too weak, generating a new one"
                    );
                }
                Err(err) => {
                    warn!(error = %err, "Failed to decode configured JWT key, generating a new one");
                }
            }
        }
    }

    match generar_clave() {
        Ok(bytes) => {
            warn!("Using an auto-generated JWT key; configure a fixed key for production");
            info!(
                clave = %base64::engine::general_purpose::STANDARD.encode(&bytes),
                "Generated JWT key, persist it in your environment or configuration"
            );
            (bytes, EstadoClave::Generada)
        }
        Err(err) => {
            warn!(error = %err, "OS entropy source failed, deriving a fallback key");
            (clave_respaldo(), EstadoClave::Respaldo)
        }
    }
}

/// OS 엔트로피에서 새 키를 생성합니다.
fn generar_clave() -> Result<Vec<u8>, rand::Error> {
    let mut bytes = vec![0u8; CLAVE_MIN_BYTES];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(bytes)
}

/// 마지막 수단: 스레드 로컬 RNG로 최소 길이의 키를 구성합니다.
fn clave_respaldo() -> Vec<u8> {
    let mut bytes = vec![0u8; CLAVE_MIN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    // "0123456789abcdef0123456789abcdef" (32바이트)
    const CLAVE_32: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";
    // "0123456789abcdef" (16바이트, 기준 미달)
    const CLAVE_16: &str = "MDEyMzQ1Njc4OWFiY2RlZg==";

    fn config_con_clave(secret: Option<&str>) -> JwtConfig {
        JwtConfig {
            secret: secret.map(|s| SecretString::from(s.to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_clave_configurada_roundtrip() {
        let servicio = TokenService::new(&config_con_clave(Some(CLAVE_32)));
        assert_eq!(servicio.estado(), EstadoClave::Configurada);

        let token = servicio.generate_token("alice").unwrap();
        assert!(servicio.is_token_valid(&token, "alice"));
        assert!(!servicio.is_token_valid(&token, "bob"));
        assert_eq!(servicio.extract_username(&token).as_deref(), Some("alice"));
    }

    #[test]
    fn test_misma_clave_entre_instancias() {
        // 같은 설정 키를 가진 두 인스턴스는 서로의 토큰을 검증할 수 있어야 함
        let emisor = TokenService::new(&config_con_clave(Some(CLAVE_32)));
        let verificador = TokenService::new(&config_con_clave(Some(CLAVE_32)));

        let token = emisor.generate_token("alice").unwrap();
        assert!(verificador.is_token_valid(&token, "alice"));
    }

    #[test]
    fn test_clave_debil_no_se_adopta() {
        let servicio = TokenService::new(&config_con_clave(Some(CLAVE_16)));
        // 기준 미달 키는 버리고 생성 경로로 내려감
        assert_eq!(servicio.estado(), EstadoClave::Generada);

        // 생성된 키도 최소 강도를 만족해야 함: 발급/검증이 정상 동작
        let token = servicio.generate_token("alice").unwrap();
        assert!(servicio.is_token_valid(&token, "alice"));
    }

    #[test]
    fn test_sin_clave_configurada_se_genera() {
        let servicio = TokenService::new(&config_con_clave(None));
        assert_eq!(servicio.estado(), EstadoClave::Generada);
    }

    #[test]
    fn test_clave_no_base64_se_descarta() {
        let servicio = TokenService::new(&config_con_clave(Some("no es base64 !!!")));
        assert_eq!(servicio.estado(), EstadoClave::Generada);
    }

    #[test]
    fn test_token_expirado_es_invalido() {
        let servicio = TokenService::new(&config_con_clave(Some(CLAVE_32)));

        // 수명이 이미 지난 발급 시각으로 클레임을 구성 (시계 시뮬레이션)
        let pasado = Utc::now() - Duration::seconds(7200);
        let reclamos = Reclamos::con_emision(
            "alice",
            "vucem.gob.mx",
            "api",
            3600,
            HashMap::new(),
            pasado,
        );
        let token = servicio.firmar(&reclamos).unwrap();

        assert!(!servicio.is_token_valid(&token, "alice"));
    }

    #[test]
    fn test_clave_distinta_es_invalida() {
        let emisor = TokenService::new(&config_con_clave(None));
        let verificador = TokenService::new(&config_con_clave(None));

        // 생성된 키는 인스턴스마다 다르므로 교차 검증은 실패해야 함
        let token = emisor.generate_token("alice").unwrap();
        assert!(!verificador.is_token_valid(&token, "alice"));
    }

    #[test]
    fn test_payload_manipulado_es_invalido() {
        let servicio = TokenService::new(&config_con_clave(Some(CLAVE_32)));
        let token = servicio.generate_token("alice").unwrap();

        // 페이로드 구간의 문자 하나를 바꿔 서명을 깨뜨림
        let mut partes: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(partes.len(), 3);
        let mut payload: Vec<char> = partes[1].chars().collect();
        payload[0] = if payload[0] == 'A' { 'B' } else { 'A' };
        partes[1] = payload.into_iter().collect();
        let manipulado = partes.join(".");

        assert!(!servicio.is_token_valid(&manipulado, "alice"));
    }

    #[test]
    fn test_issuer_distinto_es_invalido() {
        let emisor = TokenService::new(&config_con_clave(Some(CLAVE_32)));

        let otro_issuer = JwtConfig {
            secret: Some(SecretString::from(CLAVE_32.to_string())),
            issuer: "otro.issuer.mx".to_string(),
            ..Default::default()
        };
        let verificador = TokenService::new(&otro_issuer);

        // 같은 키라도 issuer가 다르면 무효
        let token = emisor.generate_token("alice").unwrap();
        assert!(!verificador.is_token_valid(&token, "alice"));
    }

    #[test]
    fn test_token_malformado_no_lanza() {
        let servicio = TokenService::new(&config_con_clave(Some(CLAVE_32)));
        assert!(!servicio.is_token_valid("token.invalido.aqui", "alice"));
        assert!(!servicio.is_token_valid("", "alice"));
        assert!(servicio.extract_username("basura").is_none());
    }

    #[test]
    fn test_extract_claim_verifica_antes_de_exponer() {
        let servicio = TokenService::new(&config_con_clave(Some(CLAVE_32)));

        let mut extra = HashMap::new();
        extra.insert("rol".to_string(), serde_json::json!("SISTEMA"));
        let token = servicio.generate_token_con_reclamos("sistema", extra).unwrap();

        let rol = servicio
            .extract_claim(&token, |r| r.extra.get("rol").cloned())
            .unwrap();
        assert_eq!(rol, Some(serde_json::json!("SISTEMA")));

        let jti = servicio.extract_claim(&token, |r| r.jti.clone()).unwrap();
        assert!(!jti.is_empty());

        // 검증 불가 토큰에서는 어떤 클레임도 반환하지 않음
        assert!(servicio.extract_claim("basura", |r| r.sub.clone()).is_err());
    }

    #[test]
    fn test_reclamos_estandar_completos() {
        let servicio = TokenService::new(&config_con_clave(Some(CLAVE_32)));
        let token = servicio.generate_token("alice").unwrap();

        let reclamos = servicio.verificar(&token).unwrap();
        assert_eq!(reclamos.sub, "alice");
        assert_eq!(reclamos.iss, "vucem.gob.mx");
        assert_eq!(reclamos.aud, "api");
        assert_eq!(reclamos.iat, reclamos.nbf);
        assert_eq!(reclamos.exp, reclamos.iat + 3600);
        assert!(Uuid::parse_str(&reclamos.jti).is_ok());
    }
}
