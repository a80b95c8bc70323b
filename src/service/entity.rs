//! Write-through service: relational store first, then the search mirror.

use crate::error::AppError;
use crate::model::{Dto, Entity};
use crate::query::{Page, Pageable};
use crate::repository::Repository;
use crate::search::{SearchError, SearchIndex, SearchMirror};
use crate::store::RecordStore;
use std::sync::Arc;

/// Outcome of the mirror step of a write. The relational step already succeeded.
#[derive(Debug)]
pub enum MirrorStatus {
    Synced,
    Failed(SearchError),
}

impl MirrorStatus {
    pub fn is_synced(&self) -> bool {
        matches!(self, MirrorStatus::Synced)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MirrorStatus::Synced => "ok",
            MirrorStatus::Failed(_) => "failed",
        }
    }
}

/// Result of the relational write plus what happened to its mirror.
#[derive(Debug)]
pub struct WriteOutcome<T> {
    pub value: T,
    pub mirror: MirrorStatus,
}

pub struct EntityService<D: Dto> {
    repository: Repository<D::Entity>,
    mirror: SearchMirror<D>,
}

impl<D: Dto> Clone for EntityService<D> {
    fn clone(&self) -> Self {
        EntityService {
            repository: self.repository.clone(),
            mirror: self.mirror.clone(),
        }
    }
}

fn entity_name<D: Dto>() -> &'static str {
    <D::Entity as Entity>::def().name
}

impl<D: Dto> EntityService<D> {
    pub fn new(store: Arc<dyn RecordStore>, index: Arc<dyn SearchIndex>) -> Self {
        EntityService {
            repository: Repository::new(store),
            mirror: SearchMirror::new(index),
        }
    }

    /// Persist the DTO (insert without id, overwrite with id), then mirror the persisted state.
    /// A relational failure returns before the mirror is touched.
    pub async fn save(&self, dto: D) -> Result<WriteOutcome<D>, AppError> {
        tracing::debug!(entity = entity_name::<D>(), ?dto, "Request to save");
        let saved = self.repository.save(dto.into_entity()).await?;
        Ok(self.mirrored(D::from_entity(&saved)).await)
    }

    /// Copy the fields present in `dto` onto the stored entity, save and mirror.
    /// `None` when there is no stored entity with that id.
    pub async fn partial_update(&self, dto: D) -> Result<Option<WriteOutcome<D>>, AppError> {
        tracing::debug!(entity = entity_name::<D>(), ?dto, "Request to partially update");
        let Some(id) = dto.id() else {
            return Ok(None);
        };
        let Some(mut existing) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };
        dto.merge_into(&mut existing);
        let saved = self.repository.save(existing).await?;
        Ok(Some(self.mirrored(D::from_entity(&saved)).await))
    }

    pub async fn find_one(&self, id: i64) -> Result<Option<D>, AppError> {
        tracing::debug!(entity = entity_name::<D>(), id, "Request to get");
        Ok(self.repository.find_by_id(id).await?.as_ref().map(D::from_entity))
    }

    pub async fn exists(&self, id: i64) -> Result<bool, AppError> {
        self.repository.exists_by_id(id).await
    }

    /// Delete from both stores. The mirror delete is issued whether or not a row was removed.
    pub async fn delete(&self, id: i64) -> Result<WriteOutcome<()>, AppError> {
        tracing::debug!(entity = entity_name::<D>(), id, "Request to delete");
        self.repository.delete_by_id(id).await?;
        let mirror = match self.mirror.delete_by_id(id).await {
            Ok(()) => MirrorStatus::Synced,
            Err(e) => {
                tracing::warn!(entity = entity_name::<D>(), id, error = %e, "search mirror delete failed");
                MirrorStatus::Failed(e)
            }
        };
        Ok(WriteOutcome { value: (), mirror })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<D>, AppError> {
        tracing::debug!(entity = entity_name::<D>(), query = %query, "Request to search");
        Ok(self.mirror.search(query).await?)
    }

    pub async fn search_page(&self, query: &str, pageable: &Pageable) -> Result<Page<D>, AppError> {
        tracing::debug!(entity = entity_name::<D>(), query = %query, page = pageable.page, "Request to search for a page");
        Ok(self.mirror.search_page(query, pageable).await?)
    }

    async fn mirrored(&self, dto: D) -> WriteOutcome<D> {
        let mirror = match self.mirror.save(&dto).await {
            Ok(()) => MirrorStatus::Synced,
            Err(e) => {
                tracing::warn!(entity = entity_name::<D>(), id = ?dto.id(), error = %e, "search mirror save failed");
                MirrorStatus::Failed(e)
            }
        };
        WriteOutcome { value: dto, mirror }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CountryDto, COUNTRY};
    use crate::search::{MemorySearchIndex, SearchCall};
    use crate::store::MemoryStore;

    fn service() -> (Arc<MemoryStore>, Arc<MemorySearchIndex>, EntityService<CountryDto>) {
        let store = Arc::new(MemoryStore::new());
        let index = Arc::new(MemorySearchIndex::new());
        let svc = EntityService::new(store.clone(), index.clone());
        (store, index, svc)
    }

    fn country(name: &str) -> CountryDto {
        CountryDto {
            country_name: Some(name.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn save_mirrors_the_persisted_dto() {
        let (store, index, svc) = service();
        let out = svc.save(country("AAAAAAAAAA")).await.unwrap();
        assert!(out.mirror.is_synced());
        assert_eq!(out.value.id, Some(1));
        assert_eq!(store.row_count(&COUNTRY).await, 1);
        assert_eq!(index.index_calls("countries").await, vec![1]);
        assert_eq!(
            index.document("countries", 1).await,
            Some(serde_json::to_value(&out.value).unwrap())
        );
    }

    #[tokio::test]
    async fn mirror_failure_keeps_the_relational_write() {
        let (store, index, svc) = service();
        index.set_fail_writes(true);
        let out = svc.save(country("AAAAAAAAAA")).await.unwrap();
        assert!(matches!(out.mirror, MirrorStatus::Failed(_)));
        assert_eq!(out.mirror.as_str(), "failed");
        assert_eq!(store.row_count(&COUNTRY).await, 1);
        assert_eq!(index.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn relational_failure_skips_the_mirror() {
        let (_store, index, svc) = service();
        let mut dto = country("AAAAAAAAAA");
        dto.id = Some(42);
        assert!(svc.save(dto).await.is_err());
        assert!(index.calls().await.is_empty());
    }

    #[tokio::test]
    async fn partial_update_of_missing_entity_is_empty() {
        let (_store, index, svc) = service();
        let mut dto = country("BBBBBBBBBB");
        dto.id = Some(9);
        assert!(svc.partial_update(dto).await.unwrap().is_none());
        assert!(index.calls().await.is_empty());
    }

    #[tokio::test]
    async fn delete_hits_both_stores_without_existence_check() {
        let (_store, index, svc) = service();
        let out = svc.delete(5).await.unwrap();
        assert!(out.mirror.is_synced());
        assert_eq!(
            index.calls().await,
            vec![SearchCall::Remove { index: "countries".into(), id: 5 }]
        );
    }
}
