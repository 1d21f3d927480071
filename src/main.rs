use std::sync::Arc;

use vet_clinic_server::{config::Config, db, models::AppState, routes, store};

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use axum::http::header;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;

    let state = if cfg.use_memory_store {
        tracing::warn!("running with in-memory store, nothing will be persisted");
        AppState {
            store: Arc::new(store::MemStore::new()),
            session_ttl_hours: cfg.session_ttl_hours,
        }
    } else {
        let url = cfg
            .database_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required"))?;
        let pool = db::connect_pg(url).await?;
        AppState {
            store: Arc::new(store::PgStore::new(pool)),
            session_ttl_hours: cfg.session_ttl_hours,
        }
    };

    // Allow the static single-page frontend to call the API from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]);

    let app = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
