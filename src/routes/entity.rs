//! Entity resource routes, one set per DTO type.

use crate::domain::{CountryDto, DepartmentDto, EmployeeDto, JobDto, JobHistoryDto, LocationDto, RegionDto, TaskDto};
use crate::handlers::entity::{count, create, delete, list, partial_update, read, search, update};
use crate::model::{Dto, Entity};
use crate::state::AppState;
use axum::{routing::get, Router};

/// `/api/{path}`, `/api/{path}/count`, `/api/{path}/:id` and `/api/_search/{path}`.
pub fn resource_routes<D: Dto>() -> Router<AppState> {
    let path = <D::Entity as Entity>::def().path;
    Router::new()
        .route(&format!("/api/{}", path), get(list::<D>).post(create::<D>))
        .route(&format!("/api/{}/count", path), get(count::<D>))
        .route(
            &format!("/api/{}/:id", path),
            get(read::<D>)
                .put(update::<D>)
                .patch(partial_update::<D>)
                .delete(delete::<D>),
        )
        .route(&format!("/api/_search/{}", path), get(search::<D>))
}

pub fn entity_routes() -> Router<AppState> {
    Router::new()
        .merge(resource_routes::<RegionDto>())
        .merge(resource_routes::<CountryDto>())
        .merge(resource_routes::<LocationDto>())
        .merge(resource_routes::<DepartmentDto>())
        .merge(resource_routes::<TaskDto>())
        .merge(resource_routes::<EmployeeDto>())
        .merge(resource_routes::<JobDto>())
        .merge(resource_routes::<JobHistoryDto>())
}
