use std::net::SocketAddr;
use std::sync::Arc;

use dream_api::{app, AppState, AuthConfig};
use dream_core::{BackendApi, MockIdResolver};
use dream_query::{Config, MemoryBackend, Queries, QueryCache, RemoteBackend};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dream_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting DreamDestination API on port {}", config.server.port);

    let backend: Arc<dyn BackendApi> = match &config.backend.base_url {
        Some(base_url) => {
            tracing::info!(%base_url, "using remote booking backend");
            Arc::new(RemoteBackend::new(base_url))
        }
        None => {
            tracing::info!("no backend configured, using seeded in-memory backend");
            let memory = MemoryBackend::new();
            memory.seed_demo();
            Arc::new(memory)
        }
    };

    let queries = Queries::new(backend, Arc::new(QueryCache::new()));
    let state = AppState::new(
        queries,
        Arc::new(MockIdResolver),
        AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    );

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
