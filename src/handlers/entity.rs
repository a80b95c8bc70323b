//! Entity resource handlers, generic over the DTO type.

use crate::error::AppError;
use crate::extractors::{JsonBody, ListQuery, MergePatch};
use crate::model::{Dto, Entity, EntityDef};
use crate::query::Criteria;
use crate::response::{self, AlertAction};
use crate::service::{body_object, CriteriaOf, EntityService, MirrorStatus, QueryService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

fn def<D: Dto>() -> &'static EntityDef {
    <D::Entity as Entity>::def()
}

fn entity_service<D: Dto>(state: &AppState) -> EntityService<D> {
    EntityService::new(state.store.clone(), state.search.clone())
}

fn query_service<D: Dto>(state: &AppState) -> QueryService<D> {
    QueryService::new(state.store.clone())
}

fn parse_id(def: &EntityDef, raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::bad_request(def.name, "idinvalid", "Invalid ID"))
}

fn decode<D: Dto>(body: Value) -> Result<D, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))
}

fn write_headers(
    state: &AppState,
    def: &EntityDef,
    action: AlertAction,
    id: Option<i64>,
    mirror: &MirrorStatus,
) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let param = id.map(|id| id.to_string()).unwrap_or_default();
    response::entity_alert(&mut headers, &state.config.app_name, def.name, action, &param);
    response::mirror_status(&mut headers, mirror);
    headers
}

/// Ids on the body and the path must both be present and agree, and the entity must exist.
async fn check_update_target<D: Dto>(
    svc: &EntityService<D>,
    def: &EntityDef,
    path_id: i64,
    dto: &D,
) -> Result<(), AppError> {
    let Some(body_id) = dto.id() else {
        return Err(AppError::bad_request(def.name, "idnull", "Invalid id"));
    };
    if body_id != path_id {
        return Err(AppError::bad_request(def.name, "idinvalid", "Invalid ID"));
    }
    if !svc.exists(path_id).await? {
        return Err(AppError::bad_request(def.name, "idnotfound", "Entity not found"));
    }
    Ok(())
}

/// POST /api/{path}
pub async fn create<D: Dto>(State(state): State<AppState>, JsonBody(body): JsonBody) -> Result<Response, AppError> {
    let def = def::<D>();
    tracing::debug!(entity = def.name, "REST request to save");
    let fields = body_object(&body)?;
    RequestValidator::validate(fields, def)?;
    let dto: D = decode(body)?;
    if dto.id().is_some() {
        return Err(AppError::bad_request(
            def.name,
            "idexists",
            format!("A new {} cannot already have an ID", def.name),
        ));
    }
    let out = entity_service::<D>(&state).save(dto).await?;
    let id = out.value.id();
    let mut headers = write_headers(&state, def, AlertAction::Created, id, &out.mirror);
    if let Some(id) = id {
        if let Ok(location) = HeaderValue::from_str(&format!("/api/{}/{}", def.path, id)) {
            headers.insert(LOCATION, location);
        }
    }
    Ok((StatusCode::CREATED, headers, Json(out.value)).into_response())
}

/// PUT /api/{path}/{id}
pub async fn update<D: Dto>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Response, AppError> {
    let def = def::<D>();
    let id = parse_id(def, &id)?;
    tracing::debug!(entity = def.name, id, "REST request to update");
    let fields = body_object(&body)?;
    RequestValidator::validate(fields, def)?;
    let dto: D = decode(body)?;
    let svc = entity_service::<D>(&state);
    check_update_target(&svc, def, id, &dto).await?;
    let out = svc.save(dto).await?;
    let headers = write_headers(&state, def, AlertAction::Updated, out.value.id(), &out.mirror);
    Ok((headers, Json(out.value)).into_response())
}

/// PATCH /api/{path}/{id} with a merge-patch body: present fields overwrite, absent fields stay.
pub async fn partial_update<D: Dto>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    MergePatch(body): MergePatch,
) -> Result<Response, AppError> {
    let def = def::<D>();
    let id = parse_id(def, &id)?;
    tracing::debug!(entity = def.name, id, "REST request to partially update");
    let fields = body_object(&body)?;
    RequestValidator::validate_partial(fields, def)?;
    let dto: D = decode(body)?;
    let svc = entity_service::<D>(&state);
    check_update_target(&svc, def, id, &dto).await?;
    let out = svc
        .partial_update(dto)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} {}", def.name, id)))?;
    let headers = write_headers(&state, def, AlertAction::Updated, out.value.id(), &out.mirror);
    Ok((headers, Json(out.value)).into_response())
}

/// GET /api/{path}/{id}
pub async fn read<D: Dto>(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<D>, AppError> {
    let def = def::<D>();
    let id = parse_id(def, &id)?;
    tracing::debug!(entity = def.name, id, "REST request to get");
    entity_service::<D>(&state)
        .find_one(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("{} {}", def.name, id)))
}

/// GET /api/{path}: full filtered list, or one page for paginated entities.
pub async fn list<D: Dto>(State(state): State<AppState>, query: ListQuery) -> Result<Response, AppError> {
    let def = def::<D>();
    let criteria = CriteriaOf::<D>::parse(query.filter_params())?;
    tracing::debug!(entity = def.name, ?criteria, "REST request to get by criteria");
    let svc = query_service::<D>(&state);
    if def.paginated {
        let pageable = query.pageable(def, state.config.default_page_size)?;
        let page = svc.find_page_by_criteria(&criteria, &pageable).await?;
        let mut headers = HeaderMap::new();
        response::pagination(&mut headers, &page, &query.path, query.raw.as_deref());
        Ok((headers, Json(page.content)).into_response())
    } else {
        let sort = query.sort(def)?;
        Ok(Json(svc.find_by_criteria(&criteria, &sort).await?).into_response())
    }
}

/// GET /api/{path}/count
pub async fn count<D: Dto>(State(state): State<AppState>, query: ListQuery) -> Result<Json<u64>, AppError> {
    let criteria = CriteriaOf::<D>::parse(query.filter_params())?;
    tracing::debug!(entity = def::<D>().name, ?criteria, "REST request to count by criteria");
    Ok(Json(query_service::<D>(&state).count_by_criteria(&criteria).await?))
}

/// DELETE /api/{path}/{id}. No existence check; deleting a missing id still answers 204.
pub async fn delete<D: Dto>(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, AppError> {
    let def = def::<D>();
    let id = parse_id(def, &id)?;
    tracing::debug!(entity = def.name, id, "REST request to delete");
    let out = entity_service::<D>(&state).delete(id).await?;
    let headers = write_headers(&state, def, AlertAction::Deleted, Some(id), &out.mirror);
    Ok((StatusCode::NO_CONTENT, headers).into_response())
}

/// GET /api/_search/{path}?query=
pub async fn search<D: Dto>(State(state): State<AppState>, query: ListQuery) -> Result<Response, AppError> {
    let def = def::<D>();
    let text = query
        .query
        .clone()
        .ok_or_else(|| AppError::Validation("query parameter is required".into()))?;
    tracing::debug!(entity = def.name, query = %text, "REST request to search");
    let svc = entity_service::<D>(&state);
    if def.paginated {
        let pageable = query.pageable(def, state.config.default_page_size)?;
        let page = svc.search_page(&text, &pageable).await?;
        let mut headers = HeaderMap::new();
        response::pagination(&mut headers, &page, &query.path, query.raw.as_deref());
        Ok((headers, Json(page.content)).into_response())
    } else {
        Ok(Json(svc.search(&text).await?).into_response())
    }
}
