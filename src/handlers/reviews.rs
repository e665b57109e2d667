use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::errors::PortalError;
use crate::models::{NewReview, Review};
use crate::services::reviews;
use crate::state::AppState;

// GET /api/reviews
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<Review>> {
    let store = state.store.lock().unwrap();
    Json(reviews::list_reviews(&store))
}

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub car: String,
    pub rating: u8,
    pub text: String,
}

// POST /api/reviews
pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<Json<Review>, PortalError> {
    let store = state.store.lock().unwrap();
    let user = super::require_user(&state, &store, &headers)?;

    let review = reviews::create_review(
        &store,
        NewReview {
            user_id: user.id,
            user_name: user.name,
            car: payload.car,
            rating: payload.rating,
            text: payload.text,
        },
        chrono::Utc::now().naive_utc(),
    )?;
    Ok(Json(review))
}
