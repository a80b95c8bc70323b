mod common;

use axum::http::{Method, StatusCode};
use common::{test_app, DEFAULT, UPDATED};
use hr_backend::domain::COUNTRY;
use serde_json::json;

#[tokio::test]
async fn create_country() {
    let app = test_app();
    let before = app.store.row_count(&COUNTRY).await;

    let res = app.post("/api/countries", json!({"countryName": DEFAULT})).await;

    assert_eq!(res.status, StatusCode::CREATED);
    let id = res.id();
    assert_eq!(res.body["countryName"], DEFAULT);
    assert_eq!(res.header("location"), Some(format!("/api/countries/{}", id).as_str()));
    assert_eq!(res.header("x-hrapp-alert"), Some("hrApp.country.created"));
    assert_eq!(res.header("x-hrapp-params"), Some(id.to_string().as_str()));
    assert_eq!(res.header("x-search-mirror"), Some("ok"));
    assert_eq!(app.store.row_count(&COUNTRY).await, before + 1);
    assert_eq!(app.search.index_calls("countries").await, vec![id]);
}

#[tokio::test]
async fn create_country_with_existing_id() {
    let app = test_app();
    let before = app.store.row_count(&COUNTRY).await;

    let res = app.post("/api/countries", json!({"id": 1, "countryName": DEFAULT})).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.header("x-hrapp-error"), Some("error.idexists"));
    assert_eq!(res.header("x-hrapp-params"), Some("country"));
    assert_eq!(res.body["error"]["message"], "A new country cannot already have an ID");
    assert_eq!(app.store.row_count(&COUNTRY).await, before);
    assert!(app.search.calls().await.is_empty());
}

#[tokio::test]
async fn get_country() {
    let app = test_app();
    let id = app.create("countries", json!({"countryName": DEFAULT})).await;

    let res = app.get(&format!("/api/countries/{}", id)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({"id": id, "countryName": DEFAULT, "region": null}));

    let all = app.get("/api/countries?sort=id,desc").await;
    assert_eq!(all.ids(), vec![id]);
}

#[tokio::test]
async fn get_non_existing_country() {
    let app = test_app();
    assert_eq!(app.get("/api/countries/9999").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_existing_country() {
    let app = test_app();
    let id = app.create("countries", json!({"countryName": DEFAULT})).await;

    let res = app
        .put(&format!("/api/countries/{}", id), json!({"id": id, "countryName": UPDATED}))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.header("x-hrapp-alert"), Some("hrApp.country.updated"));
    assert_eq!(res.header("x-search-mirror"), Some("ok"));
    let stored = app.get(&format!("/api/countries/{}", id)).await;
    assert_eq!(stored.body["countryName"], UPDATED);
    assert_eq!(app.search.index_calls("countries").await, vec![id, id]);
}

#[tokio::test]
async fn put_with_mismatched_or_missing_id() {
    let app = test_app();
    let id = app.create("countries", json!({"countryName": DEFAULT})).await;
    let calls_before = app.search.calls().await.len();

    let res = app
        .put(&format!("/api/countries/{}", id), json!({"id": id + 1, "countryName": UPDATED}))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.header("x-hrapp-error"), Some("error.idinvalid"));

    let res = app.put(&format!("/api/countries/{}", id), json!({"countryName": UPDATED})).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.header("x-hrapp-error"), Some("error.idnull"));

    let res = app.put("/api/countries/9999", json!({"id": 9999, "countryName": UPDATED})).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.header("x-hrapp-error"), Some("error.idnotfound"));

    let stored = app.get(&format!("/api/countries/{}", id)).await;
    assert_eq!(stored.body["countryName"], DEFAULT);
    assert_eq!(app.search.calls().await.len(), calls_before);
}

#[tokio::test]
async fn partial_update_keeps_untouched_fields() {
    let app = test_app();
    let region = app.create("regions", json!({"regionName": DEFAULT})).await;
    let id = app
        .create("countries", json!({"countryName": DEFAULT, "region": {"id": region}}))
        .await;

    let res = app
        .patch(&format!("/api/countries/{}", id), json!({"id": id, "countryName": UPDATED}))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["countryName"], UPDATED);
    assert_eq!(res.body["region"], json!({"id": region}));
    assert_eq!(app.search.index_calls("countries").await, vec![id, id]);
}

#[tokio::test]
async fn partial_update_requires_merge_patch_content_type() {
    let app = test_app();
    let id = app.create("countries", json!({"countryName": DEFAULT})).await;

    let res = app
        .send(
            Method::PATCH,
            &format!("/api/countries/{}", id),
            Some("application/json"),
            Some(json!({"id": id, "countryName": UPDATED})),
        )
        .await;

    assert_eq!(res.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(app.get(&format!("/api/countries/{}", id)).await.body["countryName"], DEFAULT);
}

#[tokio::test]
async fn delete_country() {
    let app = test_app();
    let id = app.create("countries", json!({"countryName": DEFAULT})).await;
    let before = app.store.row_count(&COUNTRY).await;

    let res = app.delete(&format!("/api/countries/{}", id)).await;

    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert_eq!(res.header("x-hrapp-alert"), Some("hrApp.country.deleted"));
    assert_eq!(app.store.row_count(&COUNTRY).await, before - 1);
    assert_eq!(app.search.remove_calls("countries").await, vec![id]);
    assert!(app.search.document("countries", id).await.is_none());
}

#[tokio::test]
async fn search_country() {
    let app = test_app();
    let id = app.create("countries", json!({"countryName": DEFAULT})).await;
    app.create("countries", json!({"countryName": UPDATED})).await;

    let res = app.get(&format!("/api/_search/countries?query={}", DEFAULT)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.ids(), vec![id]);
    assert_eq!(res.body[0]["countryName"], DEFAULT);
}

#[tokio::test]
async fn mirror_failure_is_reported_but_write_stays() {
    let app = test_app();
    app.search.set_fail_writes(true);
    let before = app.store.row_count(&COUNTRY).await;

    let res = app.post("/api/countries", json!({"countryName": DEFAULT})).await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.header("x-search-mirror"), Some("failed"));
    assert_eq!(app.store.row_count(&COUNTRY).await, before + 1);
    assert_eq!(app.search.index_calls("countries").await, vec![res.id()]);
}

#[tokio::test]
async fn filter_by_country_name() {
    let app = test_app();
    let id = app.create("countries", json!({"countryName": DEFAULT})).await;

    app.should_be_found("countries", &format!("countryName.equals={}", DEFAULT), id).await;
    app.should_not_be_found("countries", &format!("countryName.equals={}", UPDATED)).await;

    app.should_be_found("countries", &format!("countryName.notEquals={}", UPDATED), id).await;
    app.should_not_be_found("countries", &format!("countryName.notEquals={}", DEFAULT)).await;

    app.should_be_found("countries", &format!("countryName.in={},{}", DEFAULT, UPDATED), id).await;
    app.should_not_be_found("countries", &format!("countryName.in={}", UPDATED)).await;

    app.should_be_found("countries", "countryName.specified=true", id).await;
    app.should_not_be_found("countries", "countryName.specified=false").await;

    app.should_be_found("countries", "countryName.contains=aaaa", id).await;
    app.should_not_be_found("countries", &format!("countryName.contains={}", UPDATED)).await;

    app.should_be_found("countries", &format!("countryName.doesNotContain={}", UPDATED), id).await;
    app.should_not_be_found("countries", &format!("countryName.doesNotContain={}", DEFAULT)).await;
}

#[tokio::test]
async fn null_column_only_matches_unspecified() {
    let app = test_app();
    let id = app.create("countries", json!({})).await;

    app.should_not_be_found("countries", &format!("countryName.notEquals={}", DEFAULT)).await;
    app.should_not_be_found("countries", &format!("countryName.doesNotContain={}", DEFAULT)).await;
    app.should_be_found("countries", "countryName.specified=false", id).await;
}

#[tokio::test]
async fn filter_by_region_and_locations() {
    let app = test_app();
    let region = app.create("regions", json!({"regionName": DEFAULT})).await;
    let id = app
        .create("countries", json!({"countryName": DEFAULT, "region": {"id": region}}))
        .await;

    app.should_be_found("countries", &format!("regionId.equals={}", region), id).await;
    app.should_not_be_found("countries", &format!("regionId.equals={}", region + 1)).await;

    app.should_not_be_found("countries", "locationId.specified=true").await;
    let location = app
        .create("locations", json!({"city": DEFAULT, "country": {"id": id}}))
        .await;
    app.should_be_found("countries", &format!("locationId.equals={}", location), id).await;
    app.should_be_found("countries", "locationId.specified=true", id).await;
    app.should_not_be_found("countries", "locationId.specified=false").await;

    app.should_be_found("regions", &format!("countryId.equals={}", id), region).await;
}

#[tokio::test]
async fn unknown_filter_is_rejected() {
    let app = test_app();
    let res = app.get("/api/countries?countryName.startsWith=A").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.header("x-hrapp-error"), Some("error.badfilter"));

    let res = app.get("/api/countries?population.equals=3").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app.get("/api/countries?regionId.equals=abc").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn filter_by_id() {
    let app = test_app();
    let id = app.create("countries", json!({"countryName": DEFAULT})).await;

    app.assert_long_filters("countries", "id", id, id).await;
}
