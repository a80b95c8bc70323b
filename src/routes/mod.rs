//! Router assembly.

mod common;
mod entity;

pub use common::common_routes;
pub use entity::{entity_routes, resource_routes};

use crate::error::ErrorAlert;
use crate::response;
use crate::state::AppState;
use axum::{extract::State, middleware::map_response_with_state, response::Response, Router};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Copy the alert carried by an error response into `X-{app}-error` / `X-{app}-params`.
async fn error_alert_headers(State(state): State<AppState>, mut res: Response) -> Response {
    if let Some(alert) = res.extensions().get::<ErrorAlert>().cloned() {
        response::failure_alert(res.headers_mut(), &state.config.app_name, alert.key, alert.entity);
    }
    res
}

/// Full application: operational routes, entity resources, alert headers, request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes())
        .merge(entity_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                .layer(map_response_with_state(state.clone(), error_alert_headers)),
        )
        .with_state(state)
}
