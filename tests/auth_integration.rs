mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::{Pool, Postgres};
use tower::ServiceExt;

use stash::{
    auth::{
        dtos::{ErrorResponse, LoginResponse},
        jwt::JwtService,
    },
    repositories::{DuplicateEmail, UserRepository, UserRepositoryTrait},
};

fn signup_body() -> serde_json::Value {
    json!({
        "email": "alice@example.com",
        "password": "CorrectHorseBatteryStaple123"
    })
}

#[sqlx::test]
async fn test_signup_success(pool: Pool<Postgres>) {
    let app = helpers::test_app(pool);

    let response = app
        .oneshot(helpers::json_request("POST", "/v1/auth/signup", None, signup_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test]
async fn test_signup_duplicate_email(pool: Pool<Postgres>) {
    let app = helpers::test_app(pool);

    let response = app
        .clone()
        .oneshot(helpers::json_request("POST", "/v1/auth/signup", None, signup_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(helpers::json_request("POST", "/v1/auth/signup", None, signup_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let error_response: ErrorResponse = helpers::json_body(response).await;
    assert_eq!(error_response.error, "User already exists");
}

#[sqlx::test]
async fn test_second_insert_of_same_email_is_duplicate(pool: Pool<Postgres>) {
    let repo = UserRepository::new(pool);

    repo.create("alice@example.com", "hash-one").await.unwrap();
    let err = repo
        .create("alice@example.com", "hash-two")
        .await
        .unwrap_err();

    assert!(err.is::<DuplicateEmail>());
}

#[sqlx::test]
async fn test_login_success(pool: Pool<Postgres>) {
    let app = helpers::test_app(pool);

    let signup_response = app
        .clone()
        .oneshot(helpers::json_request("POST", "/v1/auth/signup", None, signup_body()))
        .await
        .unwrap();
    assert_eq!(signup_response.status(), StatusCode::CREATED);

    let login_response = app
        .oneshot(helpers::json_request("POST", "/v1/auth/login", None, signup_body()))
        .await
        .unwrap();
    assert_eq!(login_response.status(), StatusCode::OK);

    let login_response: LoginResponse = helpers::json_body(login_response).await;
    let claims = JwtService::new(helpers::JWT_SECRET)
        .verify_token(&login_response.token)
        .unwrap();
    assert!(claims.user_id().is_ok());
}

#[sqlx::test]
async fn test_login_invalid_credentials(pool: Pool<Postgres>) {
    let app = helpers::test_app(pool);

    let response = app
        .oneshot(helpers::json_request(
            "POST",
            "/v1/auth/login",
            None,
            json!({
                "email": "nonexistent@example.com",
                "password": "wrongpassword"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error_response: ErrorResponse = helpers::json_body(response).await;
    assert_eq!(error_response.error, "Invalid credentials");
}

#[sqlx::test]
async fn test_token_from_login_opens_item_routes(pool: Pool<Postgres>) {
    let app = helpers::test_app(pool);

    app.clone()
        .oneshot(helpers::json_request("POST", "/v1/auth/signup", None, signup_body()))
        .await
        .unwrap();
    let login: LoginResponse = helpers::json_body(
        app.clone()
            .oneshot(helpers::json_request("POST", "/v1/auth/login", None, signup_body()))
            .await
            .unwrap(),
    )
    .await;

    let response = app
        .oneshot(helpers::get_request(
            "/v1/items",
            &format!("Bearer {}", login.token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
