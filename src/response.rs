//! Response header helpers: entity alerts, pagination, search mirror outcome.

use crate::query::Page;
use crate::service::MirrorStatus;
use axum::http::{HeaderMap, HeaderName, HeaderValue};

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";
pub const SEARCH_MIRROR_HEADER: &str = "x-search-mirror";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertAction {
    Created,
    Updated,
    Deleted,
}

impl AlertAction {
    fn as_str(&self) -> &'static str {
        match self {
            AlertAction::Created => "created",
            AlertAction::Updated => "updated",
            AlertAction::Deleted => "deleted",
        }
    }
}

fn app_header(app: &str, suffix: &str) -> Option<HeaderName> {
    HeaderName::try_from(format!("x-{}-{}", app, suffix)).ok()
}

fn insert(headers: &mut HeaderMap, name: Option<HeaderName>, value: &str) {
    match (name, HeaderValue::from_str(value)) {
        (Some(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => tracing::warn!(value = %value, "skipping header that is not valid"),
    }
}

/// `X-{app}-alert: {app}.{entity}.{action}` and `X-{app}-params: {param}`.
pub fn entity_alert(headers: &mut HeaderMap, app: &str, entity: &str, action: AlertAction, param: &str) {
    insert(
        headers,
        app_header(app, "alert"),
        &format!("{}.{}.{}", app, entity, action.as_str()),
    );
    insert(headers, app_header(app, "params"), param);
}

/// `X-{app}-error: error.{key}` and `X-{app}-params: {entity}`.
pub fn failure_alert(headers: &mut HeaderMap, app: &str, key: &str, entity: Option<&str>) {
    insert(headers, app_header(app, "error"), &format!("error.{}", key));
    if let Some(entity) = entity {
        insert(headers, app_header(app, "params"), entity);
    }
}

pub fn mirror_status(headers: &mut HeaderMap, status: &MirrorStatus) {
    headers.insert(SEARCH_MIRROR_HEADER, HeaderValue::from_static(status.as_str()));
}

/// `X-Total-Count` plus a `Link` header with next/prev/last/first relations.
/// Query parameters other than `page` and `size` are carried over unchanged.
pub fn pagination<T>(headers: &mut HeaderMap, page: &Page<T>, path: &str, raw_query: Option<&str>) {
    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(page.total));
    let kept: Vec<&str> = raw_query
        .unwrap_or_default()
        .split('&')
        .filter(|p| !p.is_empty())
        .filter(|p| {
            let key = p.split('=').next().unwrap_or_default();
            key != "page" && key != "size"
        })
        .collect();
    let link = |n: u64, rel: &str| {
        let mut query = kept.join("&");
        if !query.is_empty() {
            query.push('&');
        }
        format!("<{}?{}page={}&size={}>; rel=\"{}\"", path, query, n, page.size, rel)
    };

    let total_pages = page.total_pages();
    let mut links = Vec::new();
    let next = page.number.saturating_add(1);
    if next < total_pages {
        links.push(link(next, "next"));
    }
    if page.number > 0 {
        links.push(link(page.number - 1, "prev"));
    }
    links.push(link(total_pages.saturating_sub(1), "last"));
    links.push(link(0, "first"));
    insert(headers, Some(axum::http::header::LINK), &links.join(","));
}
