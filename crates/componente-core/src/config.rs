//! 설정 관리.
//!
//! 이 모듈은 컴포넌트 설정을 정의하고 관리합니다.
//! 설정은 파일(`config/default.toml`)에서 로드되며 `VUCEM__` 접두사의
//! 환경 변수로 오버라이드할 수 있습니다.

use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;

/// JWT 만료 시간의 하한 (초).
pub const EXPIRACION_MIN_SECS: u64 = 60;

/// 컴포넌트 설정.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 컴포넌트 메타데이터 설정
    #[serde(default)]
    pub componente: ComponenteConfig,
    /// 보안 설정
    #[serde(default)]
    pub seguridad: SeguridadConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 컴포넌트 메타데이터 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponenteConfig {
    /// 컴포넌트 이름
    pub nombre: String,
    /// 컴포넌트 버전
    pub version: String,
    /// 작업 최대 재시도 횟수
    pub max_reintentos: u32,
    /// 작업 타임아웃 (밀리초)
    pub timeout_ms: u64,
}

impl Default for ComponenteConfig {
    fn default() -> Self {
        Self {
            nombre: "vucem-componente".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            max_reintentos: 3,
            timeout_ms: 5000,
        }
    }
}

/// 보안 설정.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeguridadConfig {
    /// JWT 설정
    #[serde(default)]
    pub jwt: JwtConfig,
}

/// JWT 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// 서명 키 (base64 인코딩, 미설정 시 기동 시점에 자동 생성)
    #[serde(default)]
    pub secret: Option<SecretString>,
    /// 토큰 만료 시간 (초)
    pub expiracion_secs: u64,
    /// 토큰 발급자
    pub issuer: String,
    /// 토큰 대상자
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            expiracion_secs: 3600,
            issuer: "vucem.gob.mx".to_string(),
            audience: "api".to_string(),
        }
    }
}

impl JwtConfig {
    /// 만료 시간 하한을 적용합니다.
    ///
    /// 설정값이 [`EXPIRACION_MIN_SECS`] 미만이면 하한으로 끌어올립니다.
    /// 기동 경로는 실패할 수 없어야 하므로 에러 대신 보정합니다.
    fn normalizar(&mut self) {
        if self.expiracion_secs < EXPIRACION_MIN_SECS {
            tracing::warn!(
                configurado = self.expiracion_secs,
                minimo = EXPIRACION_MIN_SECS,
                "JWT expiration below minimum, clamping"
            );
            self.expiracion_secs = EXPIRACION_MIN_SECS;
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("VUCEM")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;
        app_config.seguridad.jwt.normalizar();
        Ok(app_config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}
