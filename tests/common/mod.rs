#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use hr_backend::{app, AppConfig, AppState, MemorySearchIndex, MemoryStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const DEFAULT: &str = "AAAAAAAAAA";
pub const UPDATED: &str = "BBBBBBBBBB";
pub const MERGE_PATCH: &str = "application/merge-patch+json";

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub search: Arc<MemorySearchIndex>,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn id(&self) -> i64 {
        self.body["id"].as_i64().expect("response body has an id")
    }

    /// Ids of a list response, in order.
    pub fn ids(&self) -> Vec<i64> {
        self.body
            .as_array()
            .expect("list body")
            .iter()
            .map(|v| v["id"].as_i64().expect("item id"))
            .collect()
    }
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let search = Arc::new(MemorySearchIndex::new());
    let state = AppState::new(store.clone(), search.clone(), AppConfig::default());
    TestApp {
        store,
        search,
        router: app(state),
    }
}

impl TestApp {
    pub async fn send(&self, method: Method, uri: &str, content_type: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse { status, headers, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some("application/json"), Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some("application/json"), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Some(MERGE_PATCH), Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None, None).await
    }

    /// Create through the API and return the new id.
    pub async fn create(&self, path: &str, body: Value) -> i64 {
        let res = self.post(&format!("/api/{}", path), body).await;
        assert_eq!(res.status, StatusCode::CREATED, "create {}: {:?}", path, res.body);
        res.id()
    }

    /// `filter` selects exactly the entity `id`, and the count endpoint agrees.
    pub async fn should_be_found(&self, path: &str, filter: &str, id: i64) {
        let list = self.get(&format!("/api/{}?sort=id,desc&{}", path, filter)).await;
        assert_eq!(list.status, StatusCode::OK, "{} {:?}", filter, list.body);
        assert_eq!(list.ids(), vec![id], "filter {}", filter);
        let count = self.get(&format!("/api/{}/count?{}", path, filter)).await;
        assert_eq!(count.status, StatusCode::OK);
        assert_eq!(count.body, Value::from(1), "count {}", filter);
    }

    /// `filter` selects nothing, and the count endpoint agrees.
    pub async fn should_not_be_found(&self, path: &str, filter: &str) {
        let list = self.get(&format!("/api/{}?sort=id,desc&{}", path, filter)).await;
        assert_eq!(list.status, StatusCode::OK, "{} {:?}", filter, list.body);
        assert!(list.ids().is_empty(), "filter {} matched {:?}", filter, list.ids());
        let count = self.get(&format!("/api/{}/count?{}", path, filter)).await;
        assert_eq!(count.body, Value::from(0), "count {}", filter);
    }

    /// Every string operator on `field`, for the only entity of `path`, whose `field` holds [`DEFAULT`].
    pub async fn assert_string_filters(&self, path: &str, field: &str, id: i64) {
        self.should_be_found(path, &format!("{}.equals={}", field, DEFAULT), id).await;
        self.should_not_be_found(path, &format!("{}.equals={}", field, UPDATED)).await;
        self.should_be_found(path, &format!("{}.notEquals={}", field, UPDATED), id).await;
        self.should_not_be_found(path, &format!("{}.notEquals={}", field, DEFAULT)).await;
        self.should_be_found(path, &format!("{}.in={},{}", field, DEFAULT, UPDATED), id).await;
        self.should_not_be_found(path, &format!("{}.in={}", field, UPDATED)).await;
        self.should_be_found(path, &format!("{}.specified=true", field), id).await;
        self.should_not_be_found(path, &format!("{}.specified=false", field)).await;
        self.should_be_found(path, &format!("{}.contains=aaaa", field), id).await;
        self.should_not_be_found(path, &format!("{}.contains={}", field, UPDATED)).await;
        self.should_be_found(path, &format!("{}.doesNotContain={}", field, UPDATED), id).await;
        self.should_not_be_found(path, &format!("{}.doesNotContain={}", field, DEFAULT)).await;
    }

    /// Every range operator on the integer `field`, for the only entity of `path`, whose `field` holds `value`.
    pub async fn assert_long_filters(&self, path: &str, field: &str, id: i64, value: i64) {
        self.should_be_found(path, &format!("{}.equals={}", field, value), id).await;
        self.should_not_be_found(path, &format!("{}.equals={}", field, value + 1)).await;
        self.should_be_found(path, &format!("{}.notEquals={}", field, value + 1), id).await;
        self.should_not_be_found(path, &format!("{}.notEquals={}", field, value)).await;
        self.should_be_found(path, &format!("{}.in={},{}", field, value, value + 1), id).await;
        self.should_not_be_found(path, &format!("{}.in={}", field, value + 1)).await;
        self.should_be_found(path, &format!("{}.specified=true", field), id).await;
        self.should_not_be_found(path, &format!("{}.specified=false", field)).await;
        self.should_be_found(path, &format!("{}.greaterThanOrEqual={}", field, value), id).await;
        self.should_not_be_found(path, &format!("{}.greaterThanOrEqual={}", field, value + 1)).await;
        self.should_be_found(path, &format!("{}.lessThanOrEqual={}", field, value), id).await;
        self.should_not_be_found(path, &format!("{}.lessThanOrEqual={}", field, value - 1)).await;
        self.should_be_found(path, &format!("{}.greaterThan={}", field, value - 1), id).await;
        self.should_not_be_found(path, &format!("{}.greaterThan={}", field, value)).await;
        self.should_be_found(path, &format!("{}.lessThan={}", field, value + 1), id).await;
        self.should_not_be_found(path, &format!("{}.lessThan={}", field, value)).await;
    }
}
