//! Typed repository over a [`RecordStore`] for one entity type.

use crate::error::AppError;
use crate::model::Entity;
use crate::query::{Page, Pageable, Predicate, Sort};
use crate::store::RecordStore;
use std::marker::PhantomData;
use std::sync::Arc;

pub struct Repository<E> {
    store: Arc<dyn RecordStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Repository {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Repository {
            store,
            _entity: PhantomData,
        }
    }

    /// Insert when the entity has no id, otherwise overwrite the existing row.
    pub async fn save(&self, entity: E) -> Result<E, AppError> {
        let def = E::def();
        let record = entity.to_record();
        let saved = match entity.id() {
            None => self.store.insert(def, record).await?,
            Some(id) => self
                .store
                .update(def, id, record)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("{} {}", def.name, id)))?,
        };
        E::from_record(saved)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<E>, AppError> {
        self.store
            .find_by_id(E::def(), id)
            .await?
            .map(E::from_record)
            .transpose()
    }

    pub async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.store.find_by_id(E::def(), id).await?.is_some())
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        self.store.delete_by_id(E::def(), id).await
    }

    pub async fn find_all(&self, predicate: &Predicate, sort: &Sort) -> Result<Vec<E>, AppError> {
        self.store
            .select(E::def(), predicate, sort, None)
            .await?
            .into_iter()
            .map(E::from_record)
            .collect()
    }

    pub async fn find_page(&self, predicate: &Predicate, pageable: &Pageable) -> Result<Page<E>, AppError> {
        let def = E::def();
        let records = self
            .store
            .select(def, predicate, &pageable.sort, Some(pageable.window()))
            .await?;
        let total = self.store.count(def, predicate).await?;
        let content = records
            .into_iter()
            .map(E::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(content, pageable, total))
    }

    pub async fn count(&self, predicate: &Predicate) -> Result<u64, AppError> {
        self.store.count(E::def(), predicate).await
    }
}
