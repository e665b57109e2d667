use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::errors::PortalError;
use crate::models::{Booking, BookingPatch, BookingStatus, NewBooking};
use crate::services::slots::{minutes_now, minutes_of_day, SlotCatalog};
use crate::store::{RecordStore, BOOKINGS_KEY};

/// The sole authority for slot availability and booking mutation. Every
/// booking change must go through the ledger so the conflict check always
/// runs against the collection as it is at mutation time, not against a
/// snapshot the caller computed earlier.
#[derive(Debug, Clone)]
pub struct Ledger {
    catalog: SlotCatalog,
    lead_minutes: i64,
}

impl Ledger {
    pub fn new(catalog: SlotCatalog, lead_minutes: i64) -> Self {
        Self {
            catalog,
            lead_minutes,
        }
    }

    pub fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    /// Slot labels on `date` occupied by a non-cancelled booking, in
    /// catalog order.
    pub fn busy_slots_for_date(&self, store: &RecordStore, date: NaiveDate) -> Vec<String> {
        let bookings = self.load_bookings(store);
        let mut busy: Vec<String> = bookings
            .iter()
            .filter(|b| b.date == date && b.occupies_slot())
            .map(|b| b.time.clone())
            .collect();
        self.catalog.sort_in_catalog_order(&mut busy);
        busy
    }

    /// The single availability predicate. A slot is bookable iff the date
    /// is today or later, a same-day slot starts more than the lead buffer
    /// past `now`, and the slot is not already busy.
    pub fn is_slot_bookable(
        &self,
        store: &RecordStore,
        date: NaiveDate,
        slot: &str,
        now: NaiveDateTime,
    ) -> bool {
        if !self.catalog.contains(slot) {
            return false;
        }
        if self.slot_in_past(date, slot, now) {
            return false;
        }
        !self
            .busy_slots_for_date(store, date)
            .iter()
            .any(|s| s == slot)
    }

    fn slot_in_past(&self, date: NaiveDate, slot: &str, now: NaiveDateTime) -> bool {
        let today = now.date();
        if date < today {
            return true;
        }
        if date > today {
            return false;
        }
        let Ok(slot_minutes) = minutes_of_day(slot) else {
            return true;
        };
        i64::from(slot_minutes) <= i64::from(minutes_now(&now)) + self.lead_minutes
    }

    /// Creates a booking after re-checking availability against the current
    /// collection. Customer submissions (no status override) must target a
    /// bookable slot; admin-originated bookings only need the slot to be
    /// free of other non-cancelled bookings.
    pub fn create_booking(
        &self,
        store: &RecordStore,
        payload: NewBooking,
        now: NaiveDateTime,
    ) -> Result<Booking, PortalError> {
        let user_name = required(&payload.user_name, "name")?;
        let user_phone = required(&payload.user_phone, "phone")?;
        let problem = required(&payload.problem, "problem description")?;

        if !self.catalog.contains(&payload.time) {
            return Err(PortalError::Validation(format!(
                "{} is not a bookable time slot",
                payload.time
            )));
        }
        if payload.status.is_none() && self.slot_in_past(payload.date, &payload.time, now) {
            return Err(PortalError::Validation(
                "this time slot is no longer available".to_string(),
            ));
        }

        let mut bookings = self.load_bookings(store);
        let status = payload.status.unwrap_or(BookingStatus::New);
        let occupies = status != BookingStatus::Cancelled;
        if occupies && slot_taken(&bookings, payload.date, &payload.time, None) {
            return Err(PortalError::Conflict {
                date: payload.date,
                slot: payload.time,
            });
        }

        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            user_id: payload.user_id,
            user_name,
            user_phone,
            user_email: payload.user_email.trim().to_string(),
            car_brand: or_dash(&payload.car_brand),
            car_model: or_dash(&payload.car_model),
            year: or_dash(&payload.year),
            problem,
            date: payload.date,
            time: payload.time,
            status,
            created_at: now,
        };

        bookings.push(booking.clone());
        sort_by_schedule(&mut bookings);
        store.save(BOOKINGS_KEY, &bookings)?;
        tracing::info!(
            "created booking {} at {} {} ({})",
            booking.id,
            booking.date,
            booking.time,
            booking.status.as_str()
        );
        Ok(booking)
    }

    /// Applies a field patch. Rescheduling re-validates the no-double-booking
    /// invariant against the other bookings before committing.
    pub fn update_booking(
        &self,
        store: &RecordStore,
        id: &str,
        patch: BookingPatch,
    ) -> Result<Booking, PortalError> {
        let mut bookings = self.load_bookings(store);
        let index = bookings
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| PortalError::NotFound(format!("booking {id}")))?;

        let target_date = patch.date.unwrap_or(bookings[index].date);
        let target_time = patch.time.clone().unwrap_or_else(|| bookings[index].time.clone());
        if !self.catalog.contains(&target_time) {
            return Err(PortalError::Validation(format!(
                "{target_time} is not a bookable time slot"
            )));
        }

        let target_status = patch.status.unwrap_or(bookings[index].status);
        let occupies = target_status != BookingStatus::Cancelled;
        if occupies && slot_taken(&bookings, target_date, &target_time, Some(id)) {
            return Err(PortalError::Conflict {
                date: target_date,
                slot: target_time,
            });
        }

        let booking = &mut bookings[index];
        if let Some(name) = patch.user_name {
            booking.user_name = required(&name, "name")?;
        }
        if let Some(phone) = patch.user_phone {
            booking.user_phone = required(&phone, "phone")?;
        }
        if let Some(email) = patch.user_email {
            booking.user_email = email.trim().to_string();
        }
        if let Some(brand) = patch.car_brand {
            booking.car_brand = or_dash(&brand);
        }
        if let Some(model) = patch.car_model {
            booking.car_model = or_dash(&model);
        }
        if let Some(year) = patch.year {
            booking.year = or_dash(&year);
        }
        if let Some(problem) = patch.problem {
            booking.problem = required(&problem, "problem description")?;
        }
        booking.date = target_date;
        booking.time = target_time;
        booking.status = target_status;

        let updated = booking.clone();
        sort_by_schedule(&mut bookings);
        store.save(BOOKINGS_KEY, &bookings)?;
        Ok(updated)
    }

    /// Narrow update of the status field. Transitioning to `cancelled`
    /// immediately frees the slot; transitioning a cancelled booking back
    /// into an occupying status re-checks the slot first.
    pub fn update_booking_status(
        &self,
        store: &RecordStore,
        id: &str,
        status: BookingStatus,
    ) -> Result<Booking, PortalError> {
        let mut bookings = self.load_bookings(store);
        let index = bookings
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| PortalError::NotFound(format!("booking {id}")))?;

        if status != BookingStatus::Cancelled
            && slot_taken(&bookings, bookings[index].date, &bookings[index].time, Some(id))
        {
            return Err(PortalError::Conflict {
                date: bookings[index].date,
                slot: bookings[index].time.clone(),
            });
        }

        bookings[index].status = status;
        let updated = bookings[index].clone();
        store.save(BOOKINGS_KEY, &bookings)?;
        Ok(updated)
    }

    /// Hard delete. Deleting an id that is no longer present is a no-op.
    pub fn delete_booking(&self, store: &RecordStore, id: &str) -> Result<bool, PortalError> {
        let mut bookings = self.load_bookings(store);
        let before = bookings.len();
        bookings.retain(|b| b.id != id);
        if bookings.len() == before {
            return Ok(false);
        }
        store.save(BOOKINGS_KEY, &bookings)?;
        Ok(true)
    }

    /// A user's bookings, most recent schedule first.
    pub fn bookings_for_user(&self, store: &RecordStore, user_id: &str) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = self
            .load_bookings(store)
            .into_iter()
            .filter(|b| b.user_id == user_id)
            .collect();
        bookings.sort_by(|a, b| (b.date, &b.time).cmp(&(a.date, &a.time)));
        bookings
    }

    pub fn all_bookings(&self, store: &RecordStore) -> Vec<Booking> {
        self.load_bookings(store)
    }

    pub fn get_booking(&self, store: &RecordStore, id: &str) -> Option<Booking> {
        self.load_bookings(store).into_iter().find(|b| b.id == id)
    }

    /// Non-cancelled bookings with `start <= date < start + days`, for the
    /// admin calendar grid.
    pub fn bookings_in_range(
        &self,
        store: &RecordStore,
        start: NaiveDate,
        days: u32,
    ) -> Vec<Booking> {
        let end = start + chrono::Duration::days(i64::from(days));
        self.load_bookings(store)
            .into_iter()
            .filter(|b| b.date >= start && b.date < end && b.occupies_slot())
            .collect()
    }

    fn load_bookings(&self, store: &RecordStore) -> Vec<Booking> {
        store.load(BOOKINGS_KEY, vec![])
    }
}

fn slot_taken(bookings: &[Booking], date: NaiveDate, time: &str, exclude_id: Option<&str>) -> bool {
    bookings.iter().any(|b| {
        b.date == date
            && b.time == time
            && b.occupies_slot()
            && exclude_id.map_or(true, |id| b.id != id)
    })
}

fn sort_by_schedule(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| (a.date, &a.time).cmp(&(b.date, &b.time)));
}

fn required(value: &str, field: &str) -> Result<String, PortalError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PortalError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn or_dash(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "-".to_string()
    } else {
        trimmed.to_string()
    }
}
