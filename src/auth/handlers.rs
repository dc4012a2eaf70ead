use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tokio::task;
use tracing::{error, info, instrument};

use crate::{
    app_state::AppState,
    auth::dtos::{ErrorResponse, LoginRequest, LoginResponse, SignupRequest},
    extract::JsonBody,
    passwords::Passwords,
    repositories::DuplicateEmail,
};

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

#[utoipa::path(
    post,
    path = "/v1/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Invalid email or password", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SignupRequest>,
) -> Response {
    if let Err(error) = payload.validate() {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response();
    }

    match state.user_repo.find_by_email(&payload.email).await {
        Ok(Some(_)) => return error_response(StatusCode::CONFLICT, "User already exists"),
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "user lookup failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error");
        }
    }

    let password = payload.password.clone();
    let pw_hash = match task::spawn_blocking(move || Passwords::default().hash(&password)).await {
        Ok(Ok(hash)) => hash,
        Ok(Err(e)) => {
            error!(error = %e, "password hashing failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password");
        }
        Err(e) => {
            error!(error = %e, "password hashing task failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password");
        }
    };

    match state.user_repo.create(&payload.email, &pw_hash).await {
        Ok(user) => {
            info!(user_id = %user.id, "user signed up");
            StatusCode::CREATED.into_response()
        }
        // Lost a race with a concurrent signup for the same email.
        Err(e) if e.is::<DuplicateEmail>() => {
            error_response(StatusCode::CONFLICT, "User already exists")
        }
        Err(e) => {
            error!(error = %e, "user insert failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user")
        }
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Bearer token issued", body = LoginResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Response {
    if let Err(error) = payload.validate() {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response();
    }

    let user = match state.user_repo.find_by_email(&payload.email).await {
        Ok(Some(user)) => user,
        Ok(None) => return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials"),
        Err(e) => {
            error!(error = %e, "user lookup failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error");
        }
    };

    let password = payload.password.clone();
    let pw_hash = user.pw_hash.clone();
    let verified =
        task::spawn_blocking(move || Passwords::default().verify(&password, &pw_hash)).await;
    match verified {
        Ok(Ok(true)) => {}
        Ok(Ok(false)) => return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials"),
        Ok(Err(e)) => {
            error!(error = %e, user_id = %user.id, "stored password hash is unreadable");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Password verification failed",
            );
        }
        Err(e) => {
            error!(error = %e, "password verification task failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Password verification failed",
            );
        }
    }

    match state.jwt.generate_token(user.id) {
        Ok(token) => (StatusCode::OK, Json(LoginResponse { token })).into_response(),
        Err(e) => {
            error!(error = %e, "token signing failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate token")
        }
    }
}
