use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One appointment reservation. Customer fields are a snapshot taken at
/// creation time; later profile edits do not rewrite past bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_phone: String,
    pub user_email: String,
    pub car_brand: String,
    pub car_model: String,
    pub year: String,
    pub problem: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
}

impl Booking {
    /// A cancelled booking does not occupy its slot.
    pub fn occupies_slot(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    New,
    InProgress,
    Done,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::New => "new",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Done => "done",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "in_progress" => BookingStatus::InProgress,
            "done" => BookingStatus::Done,
            "cancelled" => BookingStatus::Cancelled,
            _ => BookingStatus::New,
        }
    }
}

/// Payload for creating a booking. `status` is an admin override; customer
/// submissions always start as `new`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub user_id: String,
    pub user_name: String,
    pub user_phone: String,
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

/// Field-by-field patch applied by `Ledger::update_booking`. Absent fields
/// keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingPatch {
    pub user_name: Option<String>,
    pub user_phone: Option<String>,
    pub user_email: Option<String>,
    pub car_brand: Option<String>,
    pub car_model: Option<String>,
    pub year: Option<String>,
    pub problem: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub status: Option<BookingStatus>,
}
