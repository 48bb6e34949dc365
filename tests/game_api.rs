mod common;

use axum::http::StatusCode;
use common::{assert_failure, get, post, put, send, test_app};
use serde_json::json;

async fn login(app: &axum::Router, player_id: &str, password: &str) -> String {
    let (status, body) = post(
        app,
        "/game/api/players/login",
        json!({"playerId": player_id, "playerPassword": password}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["body"]["accessToken"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_player_buys_and_sells_with_session() {
    let app = test_app().await;

    let (status, body) = post(
        &app,
        "/game/api/players",
        json!({"playerId": "alice", "playerPassword": "pass1234"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], 0);
    assert_eq!(body["body"]["playerMoney"], "10000");
    assert!(body["body"].get("password").is_none());

    let (status, body) = post(
        &app,
        "/game/api/stocks",
        json!({"stockName": "Apple", "stockPrice": "150"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let stock_id = body["body"]["id"].as_i64().unwrap();

    let token = login(&app, "alice", "pass1234").await;
    let order = json!({"stockId": stock_id, "quantity": 10});

    let (status, _) = send(&app, "POST", "/game/api/players/buy", Some(order.clone()), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/game/api/players/alice").await;
    assert_eq!(body["body"]["playerMoney"], "8500");
    assert_eq!(body["body"]["stocks"][0]["stockName"], "Apple");
    assert_eq!(body["body"]["stocks"][0]["quantity"], 10);

    let (status, body) = send(
        &app,
        "POST",
        "/game/api/players/sell",
        Some(json!({"stockId": stock_id, "quantity": 11})),
        Some(&token),
    )
    .await;
    assert_failure(status, &body, StatusCode::BAD_REQUEST, 2002);

    let (status, _) = send(&app, "POST", "/game/api/players/sell", Some(order), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/game/api/players/alice").await;
    assert_eq!(body["body"]["playerMoney"], "10000");
    assert_eq!(body["body"]["stocks"], json!([]));
}

#[tokio::test]
async fn test_orders_require_a_live_session() {
    let app = test_app().await;
    post(
        &app,
        "/game/api/players",
        json!({"playerId": "bob", "playerPassword": "pass1234"}),
    )
    .await;
    let order = json!({"stockId": 1, "quantity": 1});

    let (status, body) = post(&app, "/game/api/players/buy", order.clone()).await;
    assert_failure(status, &body, StatusCode::UNAUTHORIZED, 1005);

    let token = login(&app, "bob", "pass1234").await;
    let (status, _) = send(&app, "POST", "/game/api/players/logout", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", "/game/api/players/buy", Some(order), Some(&token)).await;
    assert_failure(status, &body, StatusCode::UNAUTHORIZED, 1005);

    let (status, body) = post(
        &app,
        "/game/api/players/login",
        json!({"playerId": "bob", "playerPassword": "wrong"}),
    )
    .await;
    assert_failure(status, &body, StatusCode::UNAUTHORIZED, 1005);
}

#[tokio::test]
async fn test_player_validation_and_duplicates() {
    let app = test_app().await;

    let (status, body) = post(
        &app,
        "/game/api/players",
        json!({"playerId": "ab", "playerPassword": "pw"}),
    )
    .await;
    let message = assert_failure(status, &body, StatusCode::BAD_REQUEST, 1001);
    assert!(message.starts_with("playerId: "));
    assert!(message.contains(", playerPassword: "));

    let credentials = json!({"playerId": "carol", "playerPassword": "pass1234"});
    post(&app, "/game/api/players", credentials.clone()).await;
    let (status, body) = post(&app, "/game/api/players", credentials).await;
    assert_failure(status, &body, StatusCode::CONFLICT, 1003);

    let (status, body) = get(&app, "/game/api/players/nobody").await;
    assert_failure(status, &body, StatusCode::NOT_FOUND, 1002);
}

#[tokio::test]
async fn test_paging_and_malformed_input() {
    let app = test_app().await;
    for id in ["p1", "p2", "p3"] {
        post(
            &app,
            "/game/api/players",
            json!({"playerId": format!("{}xx", id), "playerPassword": "pass1234"}),
        )
        .await;
    }

    let (status, body) = get(&app, "/game/api/players/list?offset=1&count=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["body"]["total"], 3);
    assert_eq!(body["body"]["count"], 1);
    assert_eq!(body["body"]["list"][0]["playerId"], "p3xx");

    let (status, body) = get(&app, "/game/api/players/list?offset=0&count=101").await;
    assert_failure(status, &body, StatusCode::BAD_REQUEST, 1001);

    let (status, body) = get(&app, "/game/api/players/list?offset=abc").await;
    assert_failure(status, &body, StatusCode::BAD_REQUEST, 1001);

    let (status, body) = get(&app, "/game/api/stocks/0").await;
    assert_failure(status, &body, StatusCode::BAD_REQUEST, 1001);

    let (status, body) = put(&app, "/game/api/players", json!({"playerId": "p1xx", "playerMoney": "-5"})).await;
    assert_failure(status, &body, StatusCode::BAD_REQUEST, 1001);

    let (status, body) = send(&app, "POST", "/game/api/stocks", None, None).await;
    assert_failure(status, &body, StatusCode::BAD_REQUEST, 1001);
}

#[tokio::test]
async fn test_health_is_outside_the_apis() {
    let app = test_app().await;
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "UP");
}

#[tokio::test]
async fn test_oversized_order_is_rejected_not_dropped() {
    let app = test_app().await;
    post(
        &app,
        "/game/api/players",
        json!({"playerId": "whale", "playerPassword": "pass1234"}),
    )
    .await;
    let (_, body) = post(
        &app,
        "/game/api/stocks",
        json!({"stockName": "Giant", "stockPrice": "1000000000000"}),
    )
    .await;
    let stock_id = body["body"]["id"].as_i64().unwrap();
    let token = login(&app, "whale", "pass1234").await;

    let (status, body) = send(
        &app,
        "POST",
        "/game/api/players/buy",
        Some(json!({"stockId": stock_id, "quantity": i64::MAX})),
        Some(&token),
    )
    .await;
    assert_failure(status, &body, StatusCode::BAD_REQUEST, 1001);

    let (_, body) = get(&app, "/game/api/players/whale").await;
    assert_eq!(body["body"]["playerMoney"], "10000");
    assert_eq!(body["body"]["stocks"], json!([]));
}
