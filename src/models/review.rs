use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Minimum review body length after trimming.
pub const MIN_REVIEW_LEN: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub car: String,
    pub rating: u8,
    pub text: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub user_id: String,
    pub user_name: String,
    pub car: String,
    pub rating: u8,
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPatch {
    pub car: Option<String>,
    pub rating: Option<u8>,
    pub text: Option<String>,
}
