//! Query string of list, count and search requests: paging, sorting, free text and filters.

use crate::error::AppError;
use crate::model::EntityDef;
use crate::query::{FilterParams, Pageable, Sort, RESERVED_KEYS};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

#[derive(Clone, Debug, Default)]
pub struct ListQuery {
    pub path: String,
    /// Raw query string, kept for building `Link` headers.
    pub raw: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub sort: Vec<String>,
    pub query: Option<String>,
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    pub fn from_pairs(path: &str, raw: Option<&str>, pairs: Vec<(String, String)>) -> Self {
        let mut q = ListQuery {
            path: path.to_string(),
            raw: raw.map(str::to_string),
            ..Default::default()
        };
        for (key, value) in pairs {
            match key.as_str() {
                // unparsable paging values fall back to the defaults
                "page" => q.page = value.trim().parse().ok(),
                "size" => q.size = value.trim().parse().ok(),
                "sort" => q.sort.push(value),
                "query" => q.query = Some(value),
                k if RESERVED_KEYS.contains(&k) => {}
                _ => q.filters.push((key, value)),
            }
        }
        q
    }

    pub fn filter_params(&self) -> FilterParams {
        FilterParams::from_pairs(self.filters.iter().cloned())
    }

    pub fn sort(&self, def: &EntityDef) -> Result<Sort, AppError> {
        Sort::parse(def, &self.sort)
    }

    pub fn pageable(&self, def: &EntityDef, default_size: u64) -> Result<Pageable, AppError> {
        Ok(Pageable::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(default_size),
            self.sort(def)?,
        ))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|r| AppError::InvalidFilter(r.body_text()))?;
        Ok(ListQuery::from_pairs(parts.uri.path(), parts.uri.query(), pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EMPLOYEE;
    use crate::query::Direction;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn reserved_keys_are_split_off() {
        let q = ListQuery::from_pairs(
            "/api/employees",
            None,
            pairs(&[
                ("page", "2"),
                ("size", "5"),
                ("sort", "firstName,desc"),
                ("sort", "id"),
                ("eagerload", "true"),
                ("salary.greaterThan", "10"),
            ]),
        );
        assert_eq!(q.filters, pairs(&[("salary.greaterThan", "10")]));
        let pageable = q.pageable(&EMPLOYEE, 20).unwrap();
        assert_eq!((pageable.page, pageable.size), (2, 5));
        assert_eq!(pageable.sort.orders.len(), 2);
        assert_eq!(pageable.sort.orders[0].column, "first_name");
        assert_eq!(pageable.sort.orders[0].direction, Direction::Desc);
    }

    #[test]
    fn bad_paging_values_fall_back() {
        let q = ListQuery::from_pairs("/api/employees", None, pairs(&[("page", "-1"), ("size", "lots")]));
        let pageable = q.pageable(&EMPLOYEE, 20).unwrap();
        assert_eq!((pageable.page, pageable.size), (0, 20));
    }

    #[test]
    fn size_is_capped() {
        let q = ListQuery::from_pairs("/api/employees", None, pairs(&[("size", "5000")]));
        assert_eq!(q.pageable(&EMPLOYEE, 20).unwrap().size, 1000);
    }
}
