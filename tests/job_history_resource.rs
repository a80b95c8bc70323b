mod common;

use axum::http::StatusCode;
use common::{test_app, DEFAULT};
use serde_json::json;

const DEFAULT_DATE: &str = "1970-01-01T00:00:00Z";
const UPDATED_DATE: &str = "2024-05-01T10:00:00Z";

#[tokio::test]
async fn filter_by_end_date() {
    let app = test_app();
    let id = app
        .create("job-histories", json!({"startDate": DEFAULT_DATE, "endDate": UPDATED_DATE}))
        .await;

    app.should_be_found("job-histories", &format!("endDate.equals={}", UPDATED_DATE), id).await;
    app.should_not_be_found("job-histories", &format!("endDate.equals={}", DEFAULT_DATE)).await;
    app.should_be_found("job-histories", &format!("endDate.notEquals={}", DEFAULT_DATE), id).await;
    app.should_not_be_found("job-histories", &format!("endDate.notEquals={}", UPDATED_DATE)).await;
    app.should_be_found("job-histories", &format!("endDate.in={},{}", DEFAULT_DATE, UPDATED_DATE), id).await;
    app.should_not_be_found("job-histories", &format!("endDate.in={}", DEFAULT_DATE)).await;
    app.should_be_found("job-histories", "endDate.specified=true", id).await;
    app.should_not_be_found("job-histories", "endDate.specified=false").await;
    app.should_be_found("job-histories", &format!("endDate.greaterThanOrEqual={}", UPDATED_DATE), id).await;
    app.should_not_be_found("job-histories", "endDate.greaterThanOrEqual=2024-05-01T10:00:01Z").await;
    app.should_be_found("job-histories", &format!("endDate.lessThanOrEqual={}", UPDATED_DATE), id).await;
    app.should_not_be_found("job-histories", &format!("endDate.lessThanOrEqual={}", DEFAULT_DATE)).await;
    app.should_be_found("job-histories", &format!("endDate.greaterThan={}", DEFAULT_DATE), id).await;
    app.should_not_be_found("job-histories", &format!("endDate.greaterThan={}", UPDATED_DATE)).await;
    app.should_be_found("job-histories", "endDate.lessThan=2024-05-01T10:00:01Z", id).await;
    app.should_not_be_found("job-histories", &format!("endDate.lessThan={}", UPDATED_DATE)).await;

    let res = app.get("/api/job-histories?endDate.lessThan=tomorrow").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn filter_by_id() {
    let app = test_app();
    let id = app.create("job-histories", json!({"language": "ENGLISH"})).await;

    app.assert_long_filters("job-histories", "id", id, id).await;
}

#[tokio::test]
async fn filter_by_job_department_and_employee() {
    let app = test_app();
    let job = app.create("jobs", json!({"jobTitle": DEFAULT})).await;
    let department = app.create("departments", json!({"departmentName": DEFAULT})).await;
    let employee = app.create("employees", json!({"firstName": DEFAULT})).await;
    let id = app
        .create(
            "job-histories",
            json!({
                "language": "SPANISH",
                "job": {"id": job},
                "department": {"id": department},
                "employee": {"id": employee}
            }),
        )
        .await;

    app.assert_long_filters("job-histories", "jobId", id, job).await;
    app.assert_long_filters("job-histories", "departmentId", id, department).await;
    app.assert_long_filters("job-histories", "employeeId", id, employee).await;

    let res = app.get(&format!("/api/job-histories/{}", id)).await;
    assert_eq!(res.body["department"], json!({"id": department}));
}
