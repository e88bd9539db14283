mod error;
mod routes;

use std::sync::Arc;

use anyhow::Result;
use nexgen_core::config::NexgenConfig;
use nexgen_core::llm::LlmService;
use nexgen_core::session::SessionWatch;
use nexgen_core::storage::{self, Storage};

pub struct AppState {
    pub storage: Storage,
    pub llm: Option<LlmService>,
    pub sessions: SessionWatch,
    pub config: NexgenConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nexgen_web=info".parse().unwrap()),
        )
        .init();

    let cwd = std::env::current_dir().ok();
    let config = NexgenConfig::load(cwd.as_deref())
        .unwrap_or_else(|_| NexgenConfig::default_config());

    let storage = storage::create_backend(&config.backend)?;

    let llm = if config.llm.enabled {
        LlmService::from_config(&config.llm).ok()
    } else {
        None
    };

    let state = Arc::new(AppState {
        storage,
        llm,
        sessions: SessionWatch::new(),
        config: config.clone(),
    });

    let app = routes::router()
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive());

    let addr = format!("{}:{}", config.web.host, config.web.port);
    tracing::info!("nexgen-web listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
