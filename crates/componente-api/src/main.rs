//! VUCEM 컴포넌트 API 서버.
//!
//! 조립 순서: 설정 로드 → 로깅 초기화 → 상태 조립(확장 등록, 서명 키
//! 결정) → 라우터 구성 → 서비스 시작. 모든 확장 등록과 키 결정은 첫
//! 요청을 받기 전에 끝납니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use componente_api::routes::create_router;
use componente_api::state::AppState;
use componente_core::config::AppConfig;
use componente_core::logging::{init_logging, LogConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일은 선택적
    dotenvy::dotenv().ok();

    let config = AppConfig::load_default()?;
    init_logging(LogConfig::from_app_config(&config.logging)).map_err(|e| anyhow::anyhow!(e))?;

    info!(
        nombre = %config.componente.nombre,
        version = %config.componente.version,
        "Starting component"
    );

    let state = Arc::new(AppState::new(&config));

    let app = create_router(Arc::clone(&state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_millis(
            config.componente.timeout_ms,
        )));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Ctrl-C 또는 SIGTERM에서 우아한 종료를 트리거합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut senal) => {
                senal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
