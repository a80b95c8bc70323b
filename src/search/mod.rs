//! Search mirror: a secondary free-text index of entity DTOs, keyed by the entity id.

pub mod memory;
pub mod postgres;

pub use memory::{MemorySearchIndex, SearchCall};
pub use postgres::{ensure_search_tables, PgSearchIndex};

use crate::model::{Dto, Entity};
use crate::query::{Page, Pageable};
use async_trait::async_trait;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search backend: {0}")]
    Backend(#[from] sqlx::Error),
    #[error("search document: {0}")]
    Document(#[from] serde_json::Error),
    #[error("document has no id")]
    MissingId,
    #[error("search index unavailable: {0}")]
    Unavailable(String),
}

/// Matching documents of one page plus the total number of matches.
#[derive(Debug, Default)]
pub struct SearchHits {
    pub total: u64,
    pub documents: Vec<Value>,
}

/// Document index. `index` names a collection (the entity path); documents are replaced whole.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn index(&self, index: &str, id: i64, document: Value) -> Result<(), SearchError>;

    async fn remove(&self, index: &str, id: i64) -> Result<(), SearchError>;

    /// Free-text query; `*` or an empty query matches every document. Hits are ordered by id.
    async fn search(
        &self,
        index: &str,
        query: &str,
        limit: Option<u64>,
        offset: u64,
    ) -> Result<SearchHits, SearchError>;
}

/// Whether `query` asks for everything.
pub(crate) fn is_match_all(query: &str) -> bool {
    let q = query.trim();
    q.is_empty() || q == "*"
}

/// Typed view of the index for one DTO type.
pub struct SearchMirror<D> {
    index: Arc<dyn SearchIndex>,
    _dto: PhantomData<fn() -> D>,
}

impl<D> Clone for SearchMirror<D> {
    fn clone(&self) -> Self {
        SearchMirror {
            index: self.index.clone(),
            _dto: PhantomData,
        }
    }
}

impl<D: Dto> SearchMirror<D> {
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        SearchMirror {
            index,
            _dto: PhantomData,
        }
    }

    pub fn index_name() -> &'static str {
        <D::Entity as Entity>::def().path
    }

    pub async fn save(&self, dto: &D) -> Result<(), SearchError> {
        let id = dto.id().ok_or(SearchError::MissingId)?;
        let document = serde_json::to_value(dto)?;
        self.index.index(Self::index_name(), id, document).await
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<(), SearchError> {
        self.index.remove(Self::index_name(), id).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<D>, SearchError> {
        let hits = self.index.search(Self::index_name(), query, None, 0).await?;
        decode(hits.documents)
    }

    pub async fn search_page(&self, query: &str, pageable: &Pageable) -> Result<Page<D>, SearchError> {
        let window = pageable.window();
        let hits = self
            .index
            .search(Self::index_name(), query, Some(window.limit), window.offset)
            .await?;
        Ok(Page::new(decode(hits.documents)?, pageable, hits.total))
    }
}

fn decode<D: Dto>(documents: Vec<Value>) -> Result<Vec<D>, SearchError> {
    documents
        .into_iter()
        .map(|d| serde_json::from_value(d).map_err(SearchError::from))
        .collect()
}
