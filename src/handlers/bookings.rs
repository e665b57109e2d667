use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::PortalError;
use crate::models::{Booking, BookingPatch, BookingStatus, NewBooking, Role};
use crate::services::notify::{format_lead_message, LeadSummary};
use crate::services::phone;
use crate::state::AppState;

fn now_local() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

// GET /api/slots?date=YYYY-MM-DD
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

#[derive(Serialize)]
pub struct SlotInfo {
    pub time: String,
    pub busy: bool,
    pub bookable: bool,
}

#[derive(Serialize)]
pub struct DaySlotsResponse {
    pub date: NaiveDate,
    pub slots: Vec<SlotInfo>,
}

pub async fn day_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<DaySlotsResponse>, PortalError> {
    let store = state.store.lock().unwrap();
    let now = now_local();
    let busy = state.ledger.busy_slots_for_date(&store, query.date);

    let slots = state
        .ledger
        .catalog()
        .labels()
        .iter()
        .map(|time| SlotInfo {
            time: time.clone(),
            busy: busy.iter().any(|b| b == time),
            bookable: state.ledger.is_slot_bookable(&store, query.date, time, now),
        })
        .collect();

    Ok(Json(DaySlotsResponse {
        date: query.date,
        slots,
    }))
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub car_brand: String,
    pub car_model: String,
    #[serde(default)]
    pub year: String,
    pub problem: String,
    pub date: NaiveDate,
    pub time: String,
}

#[derive(Serialize)]
pub struct BookingCreatedResponse {
    pub booking: Booking,
    /// False when the lead notification could not be delivered; the booking
    /// itself still stands.
    pub notified: bool,
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<BookingCreatedResponse>, PortalError> {
    if !phone::is_valid_phone(&payload.phone) {
        return Err(PortalError::Validation("invalid phone number".to_string()));
    }

    // The store lock is released before the notification call so the
    // best-effort delivery never holds up other mutations.
    let booking = {
        let store = state.store.lock().unwrap();
        let user = super::require_user(&state, &store, &headers)?;

        let new_booking = NewBooking {
            user_id: user.id,
            user_name: payload.name,
            user_phone: phone::format_phone(&payload.phone),
            user_email: user.email,
            car_brand: payload.car_brand,
            car_model: payload.car_model,
            year: payload.year,
            problem: payload.problem,
            date: payload.date,
            time: payload.time,
            status: None,
        };
        state.ledger.create_booking(&store, new_booking, now_local())?
    };

    let summary = LeadSummary {
        name: booking.user_name.clone(),
        phone: booking.user_phone.clone(),
        email: booking.user_email.clone(),
        car_brand: booking.car_brand.clone(),
        car_model: booking.car_model.clone(),
        year: booking.year.clone(),
        problem: booking.problem.clone(),
        preferred_date: booking.date.to_string(),
        preferred_time: booking.time.clone(),
    };
    let notified = match state.leads.send_lead(&format_lead_message(&summary)).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("lead notification failed: {e:#}");
            false
        }
    };

    Ok(Json(BookingCreatedResponse { booking, notified }))
}

// GET /api/bookings/mine
pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Booking>>, PortalError> {
    let store = state.store.lock().unwrap();
    let user = super::require_user(&state, &store, &headers)?;
    Ok(Json(state.ledger.bookings_for_user(&store, &user.id)))
}

// PATCH /api/bookings/:id — owner edit of a not-yet-started booking
pub async fn update_own_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(mut patch): Json<BookingPatch>,
) -> Result<Json<Booking>, PortalError> {
    let store = state.store.lock().unwrap();
    let user = super::require_user(&state, &store, &headers)?;

    let booking = state
        .ledger
        .get_booking(&store, &id)
        .ok_or_else(|| PortalError::NotFound(format!("booking {id}")))?;
    if booking.user_id != user.id {
        return Err(PortalError::Forbidden);
    }
    if booking.status != BookingStatus::New {
        return Err(PortalError::Validation(
            "only new bookings can be edited".to_string(),
        ));
    }

    // Owners reschedule and correct details; status changes go through the
    // cancel endpoint.
    patch.status = None;
    let updated = state.ledger.update_booking(&store, &id, patch)?;
    Ok(Json(updated))
}

// POST /api/bookings/:id/cancel
pub async fn cancel_own_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Booking>, PortalError> {
    let store = state.store.lock().unwrap();
    let user = super::require_user(&state, &store, &headers)?;

    let booking = state
        .ledger
        .get_booking(&store, &id)
        .ok_or_else(|| PortalError::NotFound(format!("booking {id}")))?;
    if booking.user_id != user.id && user.role != Role::Admin {
        return Err(PortalError::Forbidden);
    }
    if booking.status == BookingStatus::Done {
        return Err(PortalError::Validation(
            "a completed booking cannot be cancelled".to_string(),
        ));
    }

    let updated = state
        .ledger
        .update_booking_status(&store, &id, BookingStatus::Cancelled)?;
    Ok(Json(updated))
}

// DELETE /api/bookings/:id
pub async fn delete_own_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, PortalError> {
    let store = state.store.lock().unwrap();
    let user = super::require_user(&state, &store, &headers)?;

    // Deleting an id that is already gone is a no-op, not an error.
    if let Some(booking) = state.ledger.get_booking(&store, &id) {
        if booking.user_id != user.id && user.role != Role::Admin {
            return Err(PortalError::Forbidden);
        }
    }
    let deleted = state.ledger.delete_booking(&store, &id)?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
