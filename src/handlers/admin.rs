use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::PortalError;
use crate::handlers::auth::UserResponse;
use crate::models::{
    Booking, BookingPatch, BookingStatus, NewBooking, NewReview, Review, ReviewPatch, Role,
    SiteContent, UserPatch,
};
use crate::services::auth::{self, RegisterPayload};
use crate::services::reviews;
use crate::state::AppState;
use crate::store::SITE_CONTENT_KEY;

// ── Bookings ──

#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
}

// GET /api/admin/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, PortalError> {
    let store = state.store.lock().unwrap();
    super::require_admin(&state, &store, &headers)?;

    let mut bookings = state.ledger.all_bookings(&store);
    if let Some(status) = query.status.as_deref() {
        let status = BookingStatus::parse(status);
        bookings.retain(|b| b.status == status);
    }
    Ok(Json(bookings))
}

#[derive(Deserialize)]
pub struct AdminCreateBookingRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub user_name: String,
    pub user_phone: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub car_brand: String,
    #[serde(default)]
    pub car_model: String,
    #[serde(default)]
    pub year: String,
    pub problem: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub status: Option<BookingStatus>,
}

// POST /api/admin/bookings — calendar-grid creation, with status override
// and optional linkage to an existing account.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<AdminCreateBookingRequest>,
) -> Result<Json<Booking>, PortalError> {
    let store = state.store.lock().unwrap();
    super::require_admin(&state, &store, &headers)?;

    let new_booking = NewBooking {
        user_id: payload
            .user_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| "admin-created".to_string()),
        user_name: payload.user_name,
        user_phone: payload.user_phone,
        user_email: payload.user_email,
        car_brand: payload.car_brand,
        car_model: payload.car_model,
        year: payload.year,
        problem: payload.problem,
        date: payload.date,
        time: payload.time,
        status: Some(payload.status.unwrap_or(BookingStatus::New)),
    };
    let booking = state.ledger.create_booking(
        &store,
        new_booking,
        chrono::Local::now().naive_local(),
    )?;
    Ok(Json(booking))
}

// PATCH /api/admin/bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(patch): Json<BookingPatch>,
) -> Result<Json<Booking>, PortalError> {
    let store = state.store.lock().unwrap();
    super::require_admin(&state, &store, &headers)?;
    let updated = state.ledger.update_booking(&store, &id, patch)?;
    Ok(Json(updated))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: BookingStatus,
}

// POST /api/admin/bookings/:id/status
pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<StatusRequest>,
) -> Result<Json<Booking>, PortalError> {
    let store = state.store.lock().unwrap();
    super::require_admin(&state, &store, &headers)?;
    let updated = state
        .ledger
        .update_booking_status(&store, &id, payload.status)?;
    Ok(Json(updated))
}

// DELETE /api/admin/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, PortalError> {
    let store = state.store.lock().unwrap();
    super::require_admin(&state, &store, &headers)?;
    let deleted = state.ledger.delete_booking(&store, &id)?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

// ── Calendar grid ──

#[derive(Deserialize)]
pub struct CalendarQuery {
    pub start: NaiveDate,
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_days() -> u32 {
    7
}

#[derive(Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub slots: Vec<CalendarSlot>,
}

#[derive(Serialize)]
pub struct CalendarSlot {
    pub time: String,
    pub booking: Option<Booking>,
}

// GET /api/admin/calendar?start=YYYY-MM-DD&days=7 — the week grid: every
// (date, slot) cell with the occupying booking, if any.
pub async fn calendar(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Vec<CalendarDay>>, PortalError> {
    let store = state.store.lock().unwrap();
    super::require_admin(&state, &store, &headers)?;

    let days = query.days.min(31);
    let bookings = state.ledger.bookings_in_range(&store, query.start, days);

    let grid = (0..days)
        .map(|offset| {
            let date = query.start + chrono::Duration::days(i64::from(offset));
            let slots = state
                .ledger
                .catalog()
                .labels()
                .iter()
                .map(|time| CalendarSlot {
                    time: time.clone(),
                    booking: bookings
                        .iter()
                        .find(|b| b.date == date && b.time == *time)
                        .cloned(),
                })
                .collect();
            CalendarDay { date, slots }
        })
        .collect();

    Ok(Json(grid))
}

// ── Users ──

// GET /api/admin/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserResponse>>, PortalError> {
    let store = state.store.lock().unwrap();
    super::require_admin(&state, &store, &headers)?;
    let users = auth::list_users(&store).into_iter().map(Into::into).collect();
    Ok(Json(users))
}

// PATCH /api/admin/users/:id
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<UserResponse>, PortalError> {
    let store = state.store.lock().unwrap();
    super::require_admin(&state, &store, &headers)?;
    let updated = auth::update_user(&store, &id, patch)?;
    Ok(Json(updated.into()))
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

// POST /api/admin/users/:id/password
pub async fn reset_user_password(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>, PortalError> {
    let store = state.store.lock().unwrap();
    super::require_admin(&state, &store, &headers)?;
    auth::reset_password(&store, &id, &payload.password)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

// POST /api/admin/superuser — create another administrator account
pub async fn create_superuser(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<UserResponse>, PortalError> {
    let store = state.store.lock().unwrap();
    super::require_admin(&state, &store, &headers)?;
    let user = auth::register(&store, payload, Role::Admin, chrono::Utc::now().naive_utc())?;
    Ok(Json(user.into()))
}

// ── Reviews ──

#[derive(Deserialize)]
pub struct AdminCreateReviewRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub user_name: String,
    pub car: String,
    pub rating: u8,
    pub text: String,
}

// POST /api/admin/reviews — on a customer's behalf
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<AdminCreateReviewRequest>,
) -> Result<Json<Review>, PortalError> {
    let store = state.store.lock().unwrap();
    super::require_admin(&state, &store, &headers)?;

    let review = reviews::create_review(
        &store,
        NewReview {
            user_id: payload
                .user_id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| "admin-created".to_string()),
            user_name: payload.user_name,
            car: payload.car,
            rating: payload.rating,
            text: payload.text,
        },
        chrono::Utc::now().naive_utc(),
    )?;
    Ok(Json(review))
}

// PATCH /api/admin/reviews/:id
pub async fn update_review(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(patch): Json<ReviewPatch>,
) -> Result<Json<Review>, PortalError> {
    let store = state.store.lock().unwrap();
    super::require_admin(&state, &store, &headers)?;
    let updated = reviews::update_review(&store, &id, patch)?;
    Ok(Json(updated))
}

// DELETE /api/admin/reviews/:id
pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, PortalError> {
    let store = state.store.lock().unwrap();
    super::require_admin(&state, &store, &headers)?;
    let deleted = reviews::delete_review(&store, &id)?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

// ── Site content ──

// PUT /api/admin/content — accepts a full or partial document; missing
// fields are backfilled from defaults before saving.
pub async fn update_content(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(value): Json<serde_json::Value>,
) -> Result<Json<SiteContent>, PortalError> {
    let store = state.store.lock().unwrap();
    super::require_admin(&state, &store, &headers)?;

    let content = SiteContent::from_stored(&value);
    store.save(SITE_CONTENT_KEY, &content)?;
    Ok(Json(content))
}

// POST /api/admin/content/reset
pub async fn reset_content(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SiteContent>, PortalError> {
    let store = state.store.lock().unwrap();
    super::require_admin(&state, &store, &headers)?;

    let content = SiteContent::default();
    store.save(SITE_CONTENT_KEY, &content)?;
    Ok(Json(content))
}
