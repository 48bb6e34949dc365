mod common;

use axum::http::StatusCode;
use common::{assert_failure, delete, get, post, put, test_app};
use serde_json::json;
use stockdesk::application::bootstrap::AppServices;
use stockdesk::application::shop::PurchaseRequest;
use stockdesk::config::Config;
use stockdesk::infrastructure::persistence::Database;
use tokio_test::{assert_err, assert_ok};

fn member(email: &str) -> serde_json::Value {
    json!({"email": email, "name": "Hong", "password": "pa55word", "phone": "010-1234-5678"})
}

#[tokio::test]
async fn test_member_product_purchase_flow() {
    let app = test_app().await;

    let (status, body) = post(&app, "/shop/api/members", member("hong@example.com")).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert!(body["body"].get("password").is_none());
    let member_id = body["body"]["id"].as_i64().unwrap();

    let (status, body) = post(
        &app,
        "/shop/api/products",
        json!({"name": "Mouse", "description": "Wireless", "price": "25.50", "stock": 5}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let product_id = body["body"]["id"].as_i64().unwrap();

    let (status, body) = post(
        &app,
        "/shop/api/purchases",
        json!({"memberId": member_id, "productId": product_id, "quantity": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["body"]["totalPrice"], "51.00");
    assert_eq!(body["body"]["memberName"], "Hong");

    let (_, body) = get(&app, &format!("/shop/api/products/{}", product_id)).await;
    assert_eq!(body["body"]["stock"], 3);

    let (_, body) = get(&app, &format!("/shop/api/members/{}/purchases", member_id)).await;
    assert_eq!(body["body"]["email"], "hong@example.com");
    assert_eq!(body["body"]["purchasedProducts"][0]["productName"], "Mouse");
    assert_eq!(body["body"]["purchasedProducts"][0]["description"], "Wireless");

    let (_, body) = get(&app, &format!("/shop/api/purchases/member/{}", member_id)).await;
    assert_eq!(body["body"].as_array().unwrap().len(), 1);

    let (status, body) = post(
        &app,
        "/shop/api/purchases",
        json!({"memberId": member_id, "productId": product_id, "quantity": 4}),
    )
    .await;
    assert_failure(status, &body, StatusCode::BAD_REQUEST, 2003);

    let (status, body) = delete(&app, &format!("/shop/api/members/{}", member_id)).await;
    assert_failure(status, &body, StatusCode::CONFLICT, 1004);
    let (status, body) = delete(&app, &format!("/shop/api/products/{}", product_id)).await;
    assert_failure(status, &body, StatusCode::CONFLICT, 1004);
}

#[tokio::test]
async fn test_member_login_and_updates() {
    let app = test_app().await;
    let (_, body) = post(&app, "/shop/api/members", member("a@example.com")).await;
    let member_id = body["body"]["id"].as_i64().unwrap();
    post(&app, "/shop/api/members", member("b@example.com")).await;

    let (status, body) = post(
        &app,
        "/shop/api/members/login",
        json!({"email": "a@example.com", "password": "pa55word"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["body"]["id"], member_id);

    let (status, wrong) = post(
        &app,
        "/shop/api/members/login",
        json!({"email": "a@example.com", "password": "nope"}),
    )
    .await;
    let wrong = assert_failure(status, &wrong, StatusCode::UNAUTHORIZED, 1005);
    let (status, unknown) = post(
        &app,
        "/shop/api/members/login",
        json!({"email": "z@example.com", "password": "pa55word"}),
    )
    .await;
    let unknown = assert_failure(status, &unknown, StatusCode::UNAUTHORIZED, 1005);
    assert_eq!(wrong, unknown);

    let (status, body) = put(&app, &format!("/shop/api/members/{}", member_id), member("b@example.com")).await;
    assert_failure(status, &body, StatusCode::CONFLICT, 1003);

    let (status, body) = post(&app, "/shop/api/members", member("broken")).await;
    assert_failure(status, &body, StatusCode::BAD_REQUEST, 1001);

    let (status, _) = delete(&app, &format!("/shop/api/members/{}", member_id)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = get(&app, &format!("/shop/api/members/{}", member_id)).await;
    assert_failure(status, &body, StatusCode::NOT_FOUND, 1002);
}

#[tokio::test]
async fn test_purchase_service_directly() {
    let db = Database::in_memory().await.unwrap();
    let services = AppServices::new(&db, &Config::default());

    let missing = services
        .purchases
        .create_purchase(PurchaseRequest {
            member_id: Some(1),
            product_id: Some(1),
            quantity: Some(1),
        })
        .await;
    assert_err!(missing);

    assert_ok!(services.purchases.list_purchases().await);
}

#[tokio::test]
async fn test_oversized_purchase_is_rejected_not_dropped() {
    let app = test_app().await;
    let (_, body) = post(&app, "/shop/api/members", member("big@example.com")).await;
    let member_id = body["body"]["id"].as_i64().unwrap();
    let (_, body) = post(
        &app,
        "/shop/api/products",
        json!({"name": "Yacht", "price": "1000000000000", "stock": i64::MAX}),
    )
    .await;
    let product_id = body["body"]["id"].as_i64().unwrap();

    let (status, body) = post(
        &app,
        "/shop/api/purchases",
        json!({"memberId": member_id, "productId": product_id, "quantity": i64::MAX}),
    )
    .await;
    assert_failure(status, &body, StatusCode::BAD_REQUEST, 1001);

    let (_, body) = get(&app, &format!("/shop/api/products/{}", product_id)).await;
    assert_eq!(body["body"]["stock"], i64::MAX);
    let (_, body) = get(&app, "/shop/api/purchases").await;
    assert_eq!(body["body"], json!([]));
}
