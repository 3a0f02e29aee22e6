use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Method, Request, StatusCode, header},
    routing::get,
};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use super::{apply_layers, build_router};
use crate::config::Config;
use crate::services::auth::access_jwt::test_tokens::{SECRET, mint, valid};
use crate::state::AppState;

fn test_app() -> Router {
    let config = Config::for_tests(SECRET);
    build_router(AppState::from_config(&config), &config)
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

fn admin() -> String {
    bearer(&valid("admin-1", true))
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(authorization) = authorization {
        req = req.header(header::AUTHORIZATION, authorization);
    }
    let body = match body {
        Some(json) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn error_message(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap_or_default()
}

async fn create_user(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/v1/users/register",
        None,
        Some(json!({ "name": "Ana", "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/v1/users/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn public_listing_needs_no_credential() {
    let app = test_app();
    for uri in [
        "/api/v1/health",
        "/api/v1/categories",
        "/api/v1/products",
        "/api/v1/products/get/count",
        "/api/v1/products/get/featured/3",
    ] {
        let (status, _) = call(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn non_admin_cannot_create_product() {
    let app = test_app();
    let user = bearer(&valid("user-1", false));
    let (status, body) = call(&app, Method::POST, "/api/v1/products", Some(&user), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_message(&body), "insufficient privilege");
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = test_app();
    let expired = bearer(&mint(SECRET, "user-42", false, Duration::hours(-1)));
    let (status, body) = call(&app, Method::PUT, "/api/v1/users/42", Some(&expired), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&body), "credential invalid");
    assert_eq!(body["error"]["code"], "CREDENTIAL_EXPIRED");
}

#[tokio::test]
async fn wrong_scheme_counts_as_missing() {
    let app = test_app();
    let (status, body) =
        call(&app, Method::DELETE, "/api/v1/orders/7", Some("Token abc"), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&body), "authentication required");
}

#[tokio::test]
async fn forged_signature_is_rejected() {
    let app = test_app();
    let forged = bearer(&mint("not-the-server-secret", "admin-1", true, Duration::minutes(5)));
    let (status, body) = call(&app, Method::GET, "/api/v1/orders", Some(&forged), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "CREDENTIAL_INVALID");
}

async fn status_with_raw_authorization(app: &Router, uri: &str, raw: &'static [u8]) -> StatusCode {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, HeaderValue::from_bytes(raw).unwrap())
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(req).await.unwrap().status()
}

#[tokio::test]
async fn non_ascii_header_does_not_block_public_route() {
    let app = test_app();
    let status = status_with_raw_authorization(&app, "/api/v1/categories", b"Bearer \xff\xfe").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn non_ascii_header_is_rejected_on_protected_route() {
    let app = test_app();
    let status = status_with_raw_authorization(&app, "/api/v1/orders", b"Bearer \xff\xfe").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tab_separated_bearer_is_accepted() {
    let app = test_app();
    let header = format!("Bearer\t{}", valid("admin-1", true));
    let (status, _) = call(&app, Method::GET, "/api/v1/orders", Some(&header), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn rejected_write_has_no_side_effect() {
    let app = test_app();
    let user = bearer(&valid("user-1", false));
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/categories",
        Some(&user),
        Some(json!({ "name": "Phones" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, list) = call(&app, Method::GET, "/api/v1/categories", None, None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn gate_runs_before_handler_validation() {
    let app = test_app();

    // The handler would answer 400 for the bad id; the gate answers first.
    let (status, body) = call(&app, Method::DELETE, "/api/v1/products/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&body), "authentication required");

    let (status, body) =
        call(&app, Method::DELETE, "/api/v1/products/not-a-uuid", Some(&admin()), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_ID");
}

#[tokio::test]
async fn head_is_guarded_like_get() {
    let app = test_app();
    let user = bearer(&valid("user-1", false));
    let (status, _) = call(&app, Method::HEAD, "/api/v1/users", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_route_requires_credential_then_is_not_found() {
    let app = test_app();

    let (status, _) = call(&app, Method::GET, "/api/v1/nope", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let user = bearer(&valid("user-1", false));
    let (status, body) = call(&app, Method::GET, "/api/v1/nope", Some(&user), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn method_not_allowed_is_normalized() {
    let app = test_app();
    let (status, body) =
        call(&app, Method::PATCH, "/api/v1/categories", Some(&admin()), None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"]["code"], "METHOD_NOT_ALLOWED");
}

#[tokio::test]
async fn malformed_json_is_normalized() {
    let app = test_app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/categories")
        .header(header::AUTHORIZATION, admin())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\":"))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn handler_error_body_is_kept() {
    let app = test_app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/categories",
        Some(&admin()),
        Some(json!({ "name": "  " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_BODY");
    assert_eq!(error_message(&body), "name is required");
}

async fn exploding() -> &'static str {
    panic!("db password is hunter2")
}

#[tokio::test]
async fn panic_becomes_internal_error() {
    let config = Config::for_tests(SECRET);
    let state = AppState::from_config(&config);
    let router = Router::new().route("/api/v1/health", get(exploding));
    let app = apply_layers(router, state, &config);

    let (status, body) = call(&app, Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(&body), "internal error");
    assert!(!body.to_string().contains("hunter2"));
}

#[tokio::test]
async fn preflight_is_answered_without_credential() {
    let app = test_app();
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/orders")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn login_token_opens_own_profile_only() {
    let app = test_app();
    let ana = create_user(&app, "ana@example.com", "secret1").await;
    let bob = create_user(&app, "bob@example.com", "secret2").await;
    let token = bearer(&login(&app, "ana@example.com", "secret1").await);

    let (status, body) =
        call(&app, Method::GET, &format!("/api/v1/users/{ana}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ana@example.com");
    assert!(body.get("passwordHash").is_none());

    let (status, _) =
        call(&app, Method::GET, &format!("/api/v1/users/{bob}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = test_app();
    create_user(&app, "ana@example.com", "secret1").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/users/login",
        None,
        Some(json!({ "email": "ana@example.com", "password": "wrong-one" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_LOGIN");
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let app = test_app();
    create_user(&app, "ana@example.com", "secret1").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/users/register",
        None,
        Some(json!({ "name": "Ana 2", "email": "ANA@example.com", "password": "secret9" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn non_admin_cannot_grant_itself_admin() {
    let app = test_app();
    let ana = create_user(&app, "ana@example.com", "secret1").await;
    let token = bearer(&login(&app, "ana@example.com", "secret1").await);

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/v1/users/{ana}"),
        Some(&token),
        Some(json!({ "name": "Ana", "email": "ana@example.com", "isAdmin": true })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{body}");

    let (_, body) =
        call(&app, Method::GET, &format!("/api/v1/users/{ana}"), Some(&token), None).await;
    assert_eq!(body["isAdmin"], false);
}

#[tokio::test]
async fn order_is_owned_by_caller_and_priced_from_catalog() {
    let app = test_app();

    let (_, category) = call(
        &app,
        Method::POST,
        "/api/v1/categories",
        Some(&admin()),
        Some(json!({ "name": "Phones" })),
    )
    .await;
    let (status, product) = call(
        &app,
        Method::POST,
        "/api/v1/products",
        Some(&admin()),
        Some(json!({
            "name": "Pixel",
            "price": 250.0,
            "category": category["id"],
            "countInStock": 5,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{product}");

    let ana = create_user(&app, "ana@example.com", "secret1").await;
    let token = bearer(&login(&app, "ana@example.com", "secret1").await);

    let (status, order) = call(
        &app,
        Method::POST,
        "/api/v1/orders",
        Some(&token),
        Some(json!({
            "orderItems": [{ "product": product["id"], "quantity": 2 }],
            "shippingAddress1": "Main St 1",
            "city": "Lisbon",
            "zip": "1000",
            "country": "PT",
            "phone": "+351000000",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert_eq!(order["user"], ana);
    assert_eq!(order["totalPrice"], 500.0);

    let (status, _) = call(&app, Method::GET, "/api/v1/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, mine) = call(
        &app,
        Method::GET,
        &format!("/api/v1/orders/get/userorders/{ana}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().map(Vec::len), Some(1));

    let (status, sales) =
        call(&app, Method::GET, "/api/v1/orders/get/totalsales", Some(&admin()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sales["totalsales"], 500.0);
}
