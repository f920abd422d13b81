use std::net::SocketAddr;
use std::sync::Arc;

use influence_core::memory::{InMemoryLeadStore, InMemoryTemplateStore};
use influence_core::store::{LeadStore, TemplateStore};
use influence_db::{PgLeadStore, PgTemplateStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use influence_api::config::{ServerConfig, StoreBackend};
use influence_api::router::build_app_router;
use influence_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "influence_api=debug,influence_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        backend = config.store_backend.as_str(),
        "Loaded server configuration"
    );

    // --- Storage ---
    let (leads, templates) = build_stores(config.store_backend).await;

    // --- App state ---
    let state = AppState::new(config.clone(), leads, templates);

    if config.seed_default_templates {
        let seeded = state
            .templates
            .seed_defaults()
            .await
            .expect("Failed to seed default templates");
        tracing::info!(seeded, "Default templates checked");
    }

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Construct the lead and template stores for the configured backend.
async fn build_stores(backend: StoreBackend) -> (Arc<dyn LeadStore>, Arc<dyn TemplateStore>) {
    match backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory stores; data is lost on restart");
            let leads: Arc<dyn LeadStore> = Arc::new(InMemoryLeadStore::new());
            let templates: Arc<dyn TemplateStore> = Arc::new(InMemoryTemplateStore::new());
            (leads, templates)
        }
        StoreBackend::Postgres => {
            let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

            let pool = influence_db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            influence_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            influence_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            let leads: Arc<dyn LeadStore> = Arc::new(PgLeadStore::new(pool.clone()));
            let templates: Arc<dyn TemplateStore> = Arc::new(PgTemplateStore::new(pool));
            (leads, templates)
        }
    }
}

/// Wait for SIGINT or SIGTERM (on Unix) to begin graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
