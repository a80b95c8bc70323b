//! Relational record stores: PostgreSQL for the service, in-memory for tests and local runs.

pub mod bootstrap;
pub mod memory;
pub mod postgres;

pub use bootstrap::ensure_database_exists;
pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::AppError;
use crate::model::{EntityDef, Record};
use crate::query::{Predicate, Sort, Window};
use async_trait::async_trait;

/// Row-level access to entity tables. Records carry hydrated many-to-many links;
/// writes replace the links of the owning row.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new row; the store assigns the identifier.
    async fn insert(&self, def: &'static EntityDef, record: Record) -> Result<Record, AppError>;

    /// Overwrite the row with `id`. `None` when it does not exist.
    async fn update(&self, def: &'static EntityDef, id: i64, record: Record) -> Result<Option<Record>, AppError>;

    async fn find_by_id(&self, def: &'static EntityDef, id: i64) -> Result<Option<Record>, AppError>;

    /// Delete the row with `id`; returns whether a row was removed.
    async fn delete_by_id(&self, def: &'static EntityDef, id: i64) -> Result<bool, AppError>;

    async fn select(
        &self,
        def: &'static EntityDef,
        predicate: &Predicate,
        sort: &Sort,
        window: Option<Window>,
    ) -> Result<Vec<Record>, AppError>;

    async fn count(&self, def: &'static EntityDef, predicate: &Predicate) -> Result<u64, AppError>;

    /// Readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
}
