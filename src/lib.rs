//! HR backend: REST resources over PostgreSQL entities with a free-text search mirror.

pub mod config;
pub mod domain;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod query;
pub mod repository;
pub mod response;
pub mod routes;
pub mod search;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{AppConfig, SearchBackend};
pub use domain::ENTITY_DEFS;
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use routes::{app, common_routes, entity_routes};
pub use search::{ensure_search_tables, MemorySearchIndex, PgSearchIndex, SearchIndex};
pub use service::{EntityService, QueryService};
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, RecordStore};
