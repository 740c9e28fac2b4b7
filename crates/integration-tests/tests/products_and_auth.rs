//! Product page, recently viewed, reviews, login and logout.

use axum::http::StatusCode;
use cove_core::ProductId;
use cove_integration_tests::{
    TestApp, cookie_header, form_post, get, json_body, set_cookies,
};
use cove_storefront::bigcommerce::CacheTag;

#[tokio::test]
async fn test_product_page_records_recently_viewed() {
    let app = TestApp::new();

    let response = app.send(get("/product/77", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = cookie_header(&response);
    assert!(first.starts_with("recentlyViewedProducts="));

    let body = json_body(response).await;
    assert_eq!(body["name"], "Classic Tee");
    assert_eq!(body["options"][0]["displayName"], "Size");
    assert_eq!(body["options"][0]["values"][1]["label"], "Large");

    let response = app.send(get("/product/78", Some(&first))).await;
    let viewed = cookie_header(&response);

    let customer = app.sign_in().await;
    let response = app
        .send(get(
            "/account/recently-viewed",
            Some(&format!("{customer}; {viewed}")),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let ids: Vec<i64> = body
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|p| p["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![78, 77]);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let app = TestApp::new();
    let response = app.send(get("/product/5", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(set_cookies(&response).is_empty());
}

#[tokio::test]
async fn test_review_submission() {
    let app = TestApp::new();

    let response = app
        .send(form_post(
            "/product/77/reviews",
            "rating=5&author=Ada&email=ada%40example.com&title=Soft&text=Fits+well.",
            None,
        ))
        .await;
    let body = json_body(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"], "Review submitted successfully.");
    assert!(
        app.commerce
            .invalidated()
            .contains(&CacheTag::Product(ProductId::new(77)))
    );
}

#[tokio::test]
async fn test_review_validation_and_upstream_errors() {
    let app = TestApp::new();

    let response = app
        .send(form_post(
            "/product/77/reviews",
            "rating=9&author=Ada&email=ada%40example.com&title=Soft&text=Fits",
            None,
        ))
        .await;
    let body = json_body(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "rating must be between 1 and 5");
    assert!(app.commerce.calls().is_empty());

    app.commerce.reject_reviews("Title is too short");
    let response = app
        .send(form_post(
            "/product/77/reviews",
            "rating=3&name=Ada&email=ada%40example.com&subject=Ok&comments=Fine",
            None,
        ))
        .await;
    let body = json_body(response).await;
    assert_eq!(body["message"], "Title is too short");
}

#[tokio::test]
async fn test_login_failure_sets_no_cookie() {
    let app = TestApp::new();

    let response = app
        .send(form_post(
            "/login",
            "email=ada%40example.com&password=wrong",
            None,
        ))
        .await;
    assert!(set_cookies(&response).is_empty());

    let body = json_body(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Invalid email or password.");
}

#[tokio::test]
async fn test_login_then_logout() {
    let app = TestApp::new();

    let cookie = app.sign_in().await;
    assert!(cookie.starts_with("customer="));

    let response = app.send(form_post("/logout", "", Some(&cookie))).await;
    let cleared = set_cookies(&response);
    assert!(cleared.contains(&"customer=".to_string()));
    assert!(cleared.contains(&"cartId=".to_string()));
    assert!(app.commerce.calls().contains(&"logout".to_string()));
}
