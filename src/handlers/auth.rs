use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::PortalError;
use crate::models::{Role, User};
use crate::services::auth::{self, RegisterPayload};
use crate::state::AppState;

/// User record without the password field.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub created_at: NaiveDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserResponse,
}

// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<SessionResponse>, PortalError> {
    let store = state.store.lock().unwrap();
    let user = auth::register(&store, payload, Role::User, chrono::Utc::now().naive_utc())?;
    let token = state.sessions.create(&user.id);
    Ok(Json(SessionResponse {
        token,
        user: user.into(),
    }))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, PortalError> {
    let store = state.store.lock().unwrap();
    let user = auth::login(&store, &payload.email, &payload.password)?;
    let token = state.sessions.create(&user.id);
    Ok(Json(SessionResponse {
        token,
        user: user.into(),
    }))
}

// POST /api/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    if let Some(token) = super::bearer_token(&headers) {
        state.sessions.revoke(token);
    }
    Json(serde_json::json!({ "ok": true }))
}

// GET /api/auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, PortalError> {
    let store = state.store.lock().unwrap();
    let user = super::require_user(&state, &store, &headers)?;
    Ok(Json(user.into()))
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// POST /api/auth/password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, PortalError> {
    let store = state.store.lock().unwrap();
    let user = super::require_user(&state, &store, &headers)?;
    auth::change_own_password(
        &store,
        &user.id,
        &payload.current_password,
        &payload.new_password,
    )?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
