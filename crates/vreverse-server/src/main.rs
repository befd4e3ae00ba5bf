mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use vreverse_core::AccessPolicy;
use vreverse_gemini::GeminiClient;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = vreverse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = vreverse_db::PoolConfig::from_app_config(&config);
    let pool = vreverse_db::connect_pool(config.require_database_url()?, pool_config).await?;
    let applied = vreverse_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let analyzer = GeminiClient::with_base_url(
        config.require_gemini_api_key()?,
        &config.gemini_model,
        config.gemini_timeout_secs,
        &config.gemini_base_url,
    )?
    .with_strict_variations(config.strict_variations);

    let auth = AuthState::from_env(matches!(
        config.env,
        vreverse_core::Environment::Development
    ))?;
    let state = AppState {
        pool,
        analyzer: Arc::new(analyzer),
        access: Arc::new(AccessPolicy::new(&config.admin_emails)),
        webhook_token: config.webhook_token.clone().map(Arc::from),
        max_upload_bytes: config.max_upload_bytes,
    };
    if state.webhook_token.is_none() {
        tracing::warn!("VREVERSE_WEBHOOK_TOKEN not set; payment webhook accepts unsigned calls");
    }
    let app = build_app(state, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        env = %config.env,
        model = %config.gemini_model,
        "listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
