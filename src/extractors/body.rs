//! JSON bodies kept as raw values so they can be validated before typed decoding.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde_json::Value;

pub const MERGE_PATCH_JSON: &str = "application/merge-patch+json";

/// `application/json` body.
#[derive(Clone, Debug)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(JsonRejection::MissingJsonContentType(r)) => Err(AppError::UnsupportedMediaType(r.body_text())),
            Err(r) => Err(AppError::Validation(r.body_text())),
        }
    }
}

/// `application/merge-patch+json` body; any other content type is rejected with 415.
#[derive(Clone, Debug)]
pub struct MergePatch(pub Value);

fn media_type(raw: &str) -> String {
    raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

#[async_trait]
impl<S> FromRequest<S> for MergePatch
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if media_type(&content_type) != MERGE_PATCH_JSON {
            return Err(AppError::UnsupportedMediaType(if content_type.is_empty() {
                "missing content type".into()
            } else {
                content_type
            }));
        }
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|r| AppError::Validation(r.body_text()))?;
        let value = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::Validation(format!("malformed JSON body: {}", e)))?;
        Ok(MergePatch(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http;

    fn patch(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = http::Request::builder().method("PATCH").uri("/api/countries/1");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn merge_patch_requires_its_media_type() {
        let err = MergePatch::from_request(patch(Some("application/json"), "{}"), &()).await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
        let err = MergePatch::from_request(patch(None, "{}"), &()).await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
    }

    #[tokio::test]
    async fn merge_patch_accepts_parameters() {
        let MergePatch(v) = MergePatch::from_request(
            patch(Some("application/merge-patch+json; charset=utf-8"), r#"{"id":1}"#),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(v["id"], 1);
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let err = MergePatch::from_request(patch(Some(MERGE_PATCH_JSON), "{"), &()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
