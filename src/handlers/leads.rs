use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::PortalError;
use crate::services::notify::{format_lead_message, LeadSummary};
use crate::services::phone;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LeadRequest {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub car_brand: String,
    #[serde(default)]
    pub car_model: String,
    #[serde(default)]
    pub year: String,
    pub problem: String,
    #[serde(default)]
    pub preferred_date: String,
    #[serde(default)]
    pub preferred_time: String,
}

#[derive(Serialize)]
pub struct LeadResponse {
    pub ok: bool,
    pub notified: bool,
}

// POST /api/leads — no account required; forwards the request to the shop's
// messaging sink. Delivery failure is a soft warning, not an error.
pub async fn submit_lead(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LeadRequest>,
) -> Result<Json<LeadResponse>, PortalError> {
    if payload.name.trim().chars().count() < 2 {
        return Err(PortalError::Validation("name is required".to_string()));
    }
    if !phone::is_valid_phone(&payload.phone) {
        return Err(PortalError::Validation("invalid phone number".to_string()));
    }
    if payload.problem.trim().chars().count() < 5 {
        return Err(PortalError::Validation(
            "problem description is too short".to_string(),
        ));
    }

    let summary = LeadSummary {
        name: payload.name.trim().to_string(),
        phone: phone::format_phone(&payload.phone),
        email: payload.email,
        car_brand: payload.car_brand,
        car_model: payload.car_model,
        year: payload.year,
        problem: payload.problem.trim().to_string(),
        preferred_date: payload.preferred_date,
        preferred_time: payload.preferred_time,
    };

    let notified = match state.leads.send_lead(&format_lead_message(&summary)).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("lead notification failed: {e:#}");
            false
        }
    };

    Ok(Json(LeadResponse { ok: true, notified }))
}
