use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    accounts::{
        dto::{LoginRequest, PublicUser, SignupRequest},
        errors::AccountError,
    },
    state::AppState,
};

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<PublicUser>, AccountError> {
    let Json(payload) = payload?;
    info!(email = %payload.email, "received signup request");
    let user = state.accounts.signup(payload).await?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<PublicUser>, AccountError> {
    let Json(payload) = payload?;
    info!(email = %payload.email, "login attempt");
    let user = state.accounts.login(payload).await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicUser>>, AccountError> {
    let users = state.accounts.list_users().await?;
    Ok(Json(users))
}
