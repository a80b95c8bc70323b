//! Criteria queries: full list, page, count over the same predicate.

use crate::error::AppError;
use crate::model::{Dto, Entity};
use crate::query::{Criteria, Page, Pageable, Sort};
use crate::repository::Repository;
use crate::store::RecordStore;
use std::sync::Arc;

/// Criteria type of a DTO's entity.
pub type CriteriaOf<D> = <<D as Dto>::Entity as Entity>::Criteria;

pub struct QueryService<D: Dto> {
    repository: Repository<D::Entity>,
}

impl<D: Dto> Clone for QueryService<D> {
    fn clone(&self) -> Self {
        QueryService {
            repository: self.repository.clone(),
        }
    }
}

impl<D: Dto> QueryService<D> {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        QueryService {
            repository: Repository::new(store),
        }
    }

    pub async fn find_by_criteria(&self, criteria: &CriteriaOf<D>, sort: &Sort) -> Result<Vec<D>, AppError> {
        tracing::debug!(entity = <D::Entity as Entity>::def().name, ?criteria, "find by criteria");
        let entities = self.repository.find_all(&criteria.to_predicate(), sort).await?;
        Ok(entities.iter().map(D::from_entity).collect())
    }

    pub async fn find_page_by_criteria(
        &self,
        criteria: &CriteriaOf<D>,
        pageable: &Pageable,
    ) -> Result<Page<D>, AppError> {
        tracing::debug!(
            entity = <D::Entity as Entity>::def().name,
            ?criteria,
            page = pageable.page,
            size = pageable.size,
            "find by criteria"
        );
        let page = self.repository.find_page(&criteria.to_predicate(), pageable).await?;
        Ok(page.map(|e| D::from_entity(&e)))
    }

    pub async fn count_by_criteria(&self, criteria: &CriteriaOf<D>) -> Result<u64, AppError> {
        tracing::debug!(entity = <D::Entity as Entity>::def().name, ?criteria, "count by criteria");
        self.repository.count(&criteria.to_predicate()).await
    }
}
