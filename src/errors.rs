use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("slot {slot} on {date} is already taken")]
    Conflict { date: NaiveDate, slot: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = match &self {
            PortalError::Storage(_) | PortalError::Serialize(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            PortalError::Validation(_) => StatusCode::BAD_REQUEST,
            PortalError::Conflict { .. } => StatusCode::CONFLICT,
            PortalError::NotFound(_) => StatusCode::NOT_FOUND,
            PortalError::Unauthorized => StatusCode::UNAUTHORIZED,
            PortalError::Forbidden => StatusCode::FORBIDDEN,
        };

        // Conflicts carry the contested slot so the UI can say which
        // time was just taken.
        let body = match &self {
            PortalError::Conflict { date, slot } => serde_json::json!({
                "error": self.to_string(),
                "date": date,
                "slot": slot,
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };

        (status, axum::Json(body)).into_response()
    }
}
