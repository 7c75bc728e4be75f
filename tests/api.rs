use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use member_transfer::{
    app::{AppState, router},
    config::TransferStrategy,
    db,
    models::member::{Member, TransferResponse},
    services::{AcceptAll, DestinationGuard, RejectMember},
};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn test_app(strategy: TransferStrategy, guard: Arc<dyn DestinationGuard>) -> Router {
    let pool = db::create_pool("sqlite::memory:", 1).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    router(AppState::new(pool, strategy, guard))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn save(app: &Router, member_id: &str, money: i64) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/members",
            json!({ "member_id": member_id, "money": money }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn money_of(app: &Router, member_id: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/members/{member_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let member: Member = serde_json::from_value(body_json(response).await).unwrap();
    member.money
}

#[tokio::test]
async fn health_endpoint() {
    let app = test_app(TransferStrategy::Template, Arc::new(AcceptAll)).await;

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["pool"]["max_connections"], 1);
}

#[tokio::test]
async fn member_crud() {
    let app = test_app(TransferStrategy::Template, Arc::new(AcceptAll)).await;
    save(&app, "memberV100", 10000).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/members/memberV100",
            json!({ "money": 20000 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(money_of(&app, "memberV100").await, 20000);

    let response = app.clone().oneshot(get("/api/v1/members")).await.unwrap();
    assert_eq!(body_json(response).await.as_array().map(Vec::len), Some(1));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/members/memberV100")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get("/api/v1/members/memberV100"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "member_not_found");
}

#[tokio::test]
async fn duplicate_member_is_conflict() {
    let app = test_app(TransferStrategy::Template, Arc::new(AcceptAll)).await;
    save(&app, "myId", 0).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/members",
            json!({ "member_id": "myId", "money": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"]["code"], "duplicate_key");
}

#[tokio::test]
async fn transfer_under_every_strategy() {
    for strategy in [
        TransferStrategy::Manual,
        TransferStrategy::Managed,
        TransferStrategy::Template,
    ] {
        let app = test_app(strategy, Arc::new(AcceptAll)).await;
        save(&app, "memberA", 10000).await;
        save(&app, "memberB", 10000).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/transfers",
                json!({ "from_id": "memberA", "to_id": "memberB", "amount": 2000 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{strategy:?}");
        let transfer: TransferResponse =
            serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(transfer.from.money, 8000, "{strategy:?}");
        assert_eq!(transfer.to.money, 12000, "{strategy:?}");
    }
}

#[tokio::test]
async fn rejected_transfer_rolls_back() {
    let app = test_app(TransferStrategy::Managed, Arc::new(RejectMember::new("ex"))).await;
    save(&app, "memberA", 10000).await;
    save(&app, "ex", 10000).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/transfers",
            json!({ "from_id": "memberA", "to_id": "ex", "amount": 2000 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"]["code"], "transfer_rejected");
    assert_eq!(money_of(&app, "memberA").await, 10000);
    assert_eq!(money_of(&app, "ex").await, 10000);
}

#[tokio::test]
async fn transfer_with_invalid_amount_is_bad_request() {
    let app = test_app(TransferStrategy::Manual, Arc::new(AcceptAll)).await;
    save(&app, "memberA", 10000).await;
    save(&app, "memberB", 10000).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/transfers",
            json!({ "from_id": "memberA", "to_id": "memberB", "amount": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(money_of(&app, "memberA").await, 10000);
}
