mod api;
mod middleware;

use radar_core::SearchService;
use radar_db::PgRecordStore;
use radar_summarizer::ChatSummarizer;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = radar_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "loaded configuration");

    let pool = radar_db::connect_and_migrate(&config).await?;

    let summarizer = match config.openai_api_key.as_deref() {
        Some(key) => Some(ChatSummarizer::with_base_url(
            key,
            &config.summarizer_model,
            config.summarizer_timeout_secs,
            &config.summarizer_base_url,
        )?),
        None => {
            tracing::warn!("OPENAI_API_KEY not set; enriched search will use local summaries");
            None
        }
    };

    let service = SearchService::with_generator(PgRecordStore::new(pool), summarizer);
    let state = AppState::new(service, config.default_radius_miles);
    let app = build_app(
        state,
        &config.cors_origins,
        RateLimitState::per_minute(config.rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "restroom radar listening");
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
