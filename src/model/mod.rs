//! Entity metadata and the storage-neutral record shape shared by both stores.

mod def;
mod record;

pub use def::*;
pub use record::*;

use crate::error::AppError;
use crate::query::Criteria;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt::Debug;

/// A persistent domain record backed by one relational table.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    type Criteria: Criteria;

    fn def() -> &'static EntityDef;
    fn id(&self) -> Option<i64>;
    fn to_record(&self) -> Record;
    fn from_record(record: Record) -> Result<Self, AppError>;
}

/// Flat wire projection of an entity, with the mapper in both directions.
///
/// Relationships are carried as identifier-only references so the projection
/// stays acyclic even though the entity graph is not (manager links, job/task).
pub trait Dto: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    type Entity: Entity;

    fn id(&self) -> Option<i64>;
    fn from_entity(entity: &Self::Entity) -> Self;
    fn into_entity(self) -> Self::Entity;
    /// Copies the fields present in `self` onto `entity`; absent fields are left alone.
    fn merge_into(self, entity: &mut Self::Entity);
}

/// `{ "id": n }` reference to a single related entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: i64,
}

impl IdRef {
    pub fn new(id: i64) -> Self {
        IdRef { id }
    }

    pub fn option(id: Option<i64>) -> Option<Self> {
        id.map(IdRef::new)
    }
}
