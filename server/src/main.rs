//! HR backend server.
//!
//! Run from repo root: `cargo run -p hr-server`

use hr_backend::{
    app, apply_migrations, ensure_database_exists, ensure_search_tables, AppConfig, AppState, MemorySearchIndex,
    PgSearchIndex, PgStore, SearchBackend, SearchIndex, ENTITY_DEFS,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hr_backend=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    ensure_database_exists(&config.database_url).await?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    apply_migrations(&pool, ENTITY_DEFS).await?;

    let search: Arc<dyn SearchIndex> = match config.search_backend {
        SearchBackend::Memory => Arc::new(MemorySearchIndex::new()),
        SearchBackend::Postgres => {
            let search_pool = if config.search_database_url == config.database_url {
                pool.clone()
            } else {
                ensure_database_exists(&config.search_database_url).await?;
                PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(&config.search_database_url)
                    .await?
            };
            ensure_search_tables(&search_pool).await?;
            Arc::new(PgSearchIndex::new(search_pool))
        }
    };

    let listener = TcpListener::bind(&config.bind_addr).await?;
    let addr = listener.local_addr()?;
    let state = AppState::new(Arc::new(PgStore::new(pool)), search, config);
    tracing::info!("HR backend listening on http://{}", addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
