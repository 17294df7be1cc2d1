mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use blens_audit::AuditDeps;
use blens_llm::LlmClient;
use blens_scraper::{CaptureClient, PageFetcher};

use crate::api::{build_app, default_rate_limit_state, AppState};
use crate::middleware::AuthState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = blens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let fetcher = PageFetcher::new(config.fetch_timeout_secs, &config.fetch_user_agent)?;
    let capture = match &config.capture_base_url {
        Some(base) => Some(CaptureClient::new(base, config.capture_timeout_secs)?),
        None => {
            tracing::warn!(
                "BLENS_CAPTURE_BASE_URL not set; screenshot capture disabled, audits will \
                 use sentinel visual data"
            );
            None
        }
    };
    let llm = LlmClient::new(
        &config.llm_api_base,
        &config.llm_api_key,
        &config.llm_model,
        config.llm_request_timeout_secs,
    )?;

    let deps = Arc::new(AuditDeps {
        fetcher,
        capture,
        llm,
        call_delay_ms: config.llm_call_delay_ms,
        compare_delay_ms: config.llm_compare_delay_ms,
    });

    let auth = AuthState::from_env(matches!(config.env, blens_core::Environment::Development))?;
    let app = build_app(AppState { deps }, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "blens-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
