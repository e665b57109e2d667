pub mod admin;
pub mod auth;
pub mod bookings;
pub mod content;
pub mod health;
pub mod leads;
pub mod reviews;

use axum::http::HeaderMap;

use crate::errors::PortalError;
use crate::models::{Role, User};
use crate::services::auth as auth_service;
use crate::state::AppState;
use crate::store::RecordStore;

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

pub(crate) fn current_user(
    state: &AppState,
    store: &RecordStore,
    headers: &HeaderMap,
) -> Option<User> {
    let token = bearer_token(headers)?;
    let user_id = state.sessions.user_id_for(token)?;
    auth_service::find_user(store, &user_id)
}

/// Access control lives here, not in the ledger: handlers decide who may
/// call which mutation, the ledger only enforces scheduling invariants.
pub(crate) fn require_user(
    state: &AppState,
    store: &RecordStore,
    headers: &HeaderMap,
) -> Result<User, PortalError> {
    current_user(state, store, headers).ok_or(PortalError::Unauthorized)
}

pub(crate) fn require_admin(
    state: &AppState,
    store: &RecordStore,
    headers: &HeaderMap,
) -> Result<User, PortalError> {
    let user = require_user(state, store, headers)?;
    if user.role != Role::Admin {
        return Err(PortalError::Forbidden);
    }
    Ok(user)
}
