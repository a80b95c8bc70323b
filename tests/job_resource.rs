mod common;

use axum::http::StatusCode;
use common::{test_app, DEFAULT, UPDATED};
use serde_json::json;

#[tokio::test]
async fn tasks_are_linked_and_projected() {
    let app = test_app();
    let task = app.create("tasks", json!({"title": DEFAULT, "description": DEFAULT})).await;

    let res = app
        .post("/api/jobs", json!({"jobTitle": DEFAULT, "tasks": [{"id": task}]}))
        .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["tasks"], json!([{"id": task, "title": DEFAULT}]));
    let stored = app.get(&format!("/api/jobs/{}", res.id())).await;
    assert_eq!(stored.body["tasks"], json!([{"id": task, "title": DEFAULT}]));
}

#[tokio::test]
async fn filter_by_task_from_both_sides() {
    let app = test_app();
    let task = app.create("tasks", json!({"title": DEFAULT})).await;
    let other = app.create("tasks", json!({"title": UPDATED})).await;
    let job = app
        .create("jobs", json!({"jobTitle": DEFAULT, "tasks": [{"id": task}]}))
        .await;

    app.should_be_found("jobs", &format!("taskId.equals={}", task), job).await;
    app.should_not_be_found("jobs", &format!("taskId.equals={}", other)).await;
    app.should_be_found("jobs", "taskId.specified=true", job).await;
    app.should_not_be_found("jobs", "taskId.specified=false").await;

    app.should_be_found("tasks", &format!("jobId.equals={}", job), task).await;
    app.should_be_found("tasks", "jobId.specified=false", other).await;
}

#[tokio::test]
async fn partial_update_without_tasks_keeps_them() {
    let app = test_app();
    let task = app.create("tasks", json!({"title": DEFAULT})).await;
    let job = app
        .create("jobs", json!({"jobTitle": DEFAULT, "minSalary": 1, "tasks": [{"id": task}]}))
        .await;

    let res = app
        .patch(&format!("/api/jobs/{}", job), json!({"id": job, "jobTitle": UPDATED}))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["jobTitle"], UPDATED);
    assert_eq!(res.body["minSalary"], 1);
    assert_eq!(res.body["tasks"], json!([{"id": task, "title": DEFAULT}]));
}

#[tokio::test]
async fn full_update_replaces_tasks() {
    let app = test_app();
    let task = app.create("tasks", json!({"title": DEFAULT})).await;
    let job = app
        .create("jobs", json!({"jobTitle": DEFAULT, "tasks": [{"id": task}]}))
        .await;

    let res = app.put(&format!("/api/jobs/{}", job), json!({"id": job, "jobTitle": UPDATED})).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["tasks"], json!([]));
    app.should_not_be_found("jobs", &format!("taskId.equals={}", task)).await;
}

#[tokio::test]
async fn delete_job_removes_links() {
    let app = test_app();
    let task = app.create("tasks", json!({"title": DEFAULT})).await;
    let job = app
        .create("jobs", json!({"jobTitle": DEFAULT, "tasks": [{"id": task}]}))
        .await;

    assert_eq!(app.delete(&format!("/api/jobs/{}", job)).await.status, StatusCode::NO_CONTENT);
    app.should_not_be_found("tasks", "jobId.specified=true").await;
    assert_eq!(app.search.remove_calls("jobs").await, vec![job]);
}

#[tokio::test]
async fn job_list_is_paginated() {
    let app = test_app();
    for _ in 0..3 {
        app.create("jobs", json!({"jobTitle": DEFAULT})).await;
    }
    let res = app.get("/api/jobs?size=2&page=1").await;
    assert_eq!(res.header("x-total-count"), Some("3"));
    assert_eq!(res.ids().len(), 1);
    let link = res.header("link").unwrap();
    assert!(link.contains("rel=\"prev\""));
    assert!(!link.contains("rel=\"next\""));
}

#[tokio::test]
async fn linked_task_cannot_be_deleted() {
    let app = test_app();
    let task = app.create("tasks", json!({"title": DEFAULT})).await;
    let job = app
        .create("jobs", json!({"jobTitle": DEFAULT, "tasks": [{"id": task}]}))
        .await;

    let res = app.delete(&format!("/api/tasks/{}", task)).await;

    assert_eq!(res.status, StatusCode::CONFLICT);
    assert!(app.search.remove_calls("tasks").await.is_empty());
    let stored = app.get(&format!("/api/jobs/{}", job)).await;
    assert_eq!(stored.body["tasks"], json!([{"id": task, "title": DEFAULT}]));
    app.should_be_found("jobs", &format!("taskId.equals={}", task), job).await;

    app.delete(&format!("/api/jobs/{}", job)).await;
    assert_eq!(app.delete(&format!("/api/tasks/{}", task)).await.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn filter_by_job_fields() {
    let app = test_app();
    let id = app
        .create("jobs", json!({"jobTitle": DEFAULT, "minSalary": 1, "maxSalary": 2}))
        .await;

    app.assert_string_filters("jobs", "jobTitle", id).await;
    app.assert_long_filters("jobs", "minSalary", id, 1).await;
    app.assert_long_filters("jobs", "maxSalary", id, 2).await;
    app.assert_long_filters("jobs", "id", id, id).await;
}

#[tokio::test]
async fn filter_by_employee() {
    let app = test_app();
    let employee = app.create("employees", json!({"firstName": DEFAULT})).await;
    let id = app
        .create("jobs", json!({"jobTitle": DEFAULT, "employee": {"id": employee}}))
        .await;

    app.assert_long_filters("jobs", "employeeId", id, employee).await;
}
