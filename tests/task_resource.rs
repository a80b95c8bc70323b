mod common;

use common::{test_app, DEFAULT};
use serde_json::json;

#[tokio::test]
async fn filter_by_title_and_description() {
    let app = test_app();
    let id = app.create("tasks", json!({"title": DEFAULT, "description": DEFAULT})).await;

    app.assert_string_filters("tasks", "title", id).await;
    app.assert_string_filters("tasks", "description", id).await;
    app.assert_long_filters("tasks", "id", id, id).await;
}

#[tokio::test]
async fn filter_by_job() {
    let app = test_app();
    let id = app.create("tasks", json!({"title": DEFAULT})).await;
    let job = app
        .create("jobs", json!({"jobTitle": DEFAULT, "tasks": [{"id": id}]}))
        .await;

    app.assert_long_filters("tasks", "jobId", id, job).await;
}
