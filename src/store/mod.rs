use anyhow::Context;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::PortalError;
use crate::models::{Review, Role, SiteContent, User};

pub const USERS_KEY: &str = "users";
pub const BOOKINGS_KEY: &str = "bookings";
pub const REVIEWS_KEY: &str = "reviews";
pub const SITE_CONTENT_KEY: &str = "site_content";

/// Durable keyed storage for whole collections. Each key holds one JSON
/// document that is loaded and replaced as a unit.
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    pub fn open(path: &str) -> anyhow::Result<Self> {
        let conn = Connection::open(path).context("failed to open database")?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             CREATE TABLE IF NOT EXISTS records (
                 key TEXT PRIMARY KEY,
                 value TEXT NOT NULL,
                 updated_at TEXT NOT NULL DEFAULT (datetime('now'))
             );",
        )
        .context("failed to initialize records table")?;

        Ok(Self { conn })
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::open(":memory:")
    }

    fn get_raw(&self, key: &str) -> Option<String> {
        let result = self.conn.query_row(
            "SELECT value FROM records WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(value) => Some(value),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                tracing::warn!("failed to read record {key}: {e}");
                None
            }
        }
    }

    /// Returns the stored value for `key`, or `fallback` when the key is
    /// absent or the stored data does not parse. Never errors; corrupt data
    /// degrades to the fallback with a warning.
    pub fn load<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let Some(raw) = self.get_raw(key) else {
            return fallback;
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("record {key} is unparseable, falling back to defaults: {e}");
                fallback
            }
        }
    }

    /// Serializes and persists `value` under `key`, replacing the whole
    /// document.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PortalError> {
        let raw = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO records (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, raw],
        )?;
        Ok(())
    }

    fn has_key(&self, key: &str) -> bool {
        self.get_raw(key).is_some()
    }

    /// First-run seeding. Idempotent: each key is seeded only while absent,
    /// and the administrator account is appended only if no user carries its
    /// email. Safe to call on every start.
    pub fn initialize(&self, admin_email: &str, admin_password: &str) -> anyhow::Result<()> {
        let mut users: Vec<User> = self.load(USERS_KEY, vec![]);
        let admin_email = admin_email.trim().to_lowercase();
        if !users.iter().any(|u| u.email == admin_email) {
            users.push(User {
                id: "superuser-default".to_string(),
                name: "Суперпользователь".to_string(),
                email: admin_email,
                phone: "+7 (999) 000-00-00".to_string(),
                password: admin_password.to_string(),
                role: Role::Admin,
                created_at: chrono::Utc::now().naive_utc(),
            });
            self.save(USERS_KEY, &users)
                .context("failed to seed administrator account")?;
            tracing::info!("seeded default administrator account");
        }

        if !self.has_key(REVIEWS_KEY) {
            self.save(REVIEWS_KEY, &seed_reviews())
                .context("failed to seed reviews")?;
        }

        if !self.has_key(BOOKINGS_KEY) {
            self.save(BOOKINGS_KEY, &Vec::<crate::models::Booking>::new())
                .context("failed to seed bookings")?;
        }

        if !self.has_key(SITE_CONTENT_KEY) {
            self.save(SITE_CONTENT_KEY, &SiteContent::default())
                .context("failed to seed site content")?;
        }

        Ok(())
    }

    /// Loads the site content document, backfilling any fields missing from
    /// stored data with the shipped defaults.
    pub fn load_site_content(&self) -> SiteContent {
        let stored = self.load(SITE_CONTENT_KEY, serde_json::Value::Null);
        if stored.is_null() {
            return SiteContent::default();
        }
        SiteContent::from_stored(&stored)
    }
}

fn seed_reviews() -> Vec<Review> {
    let date = |y, m, d| {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap_or_default()
            .and_hms_opt(10, 0, 0)
            .unwrap_or_default()
    };
    vec![
        Review {
            id: "review-seed-1".to_string(),
            user_id: "seed".to_string(),
            user_name: "Александр".to_string(),
            car: "Skoda Octavia".to_string(),
            rating: 5,
            text: "Быстро нашли проблему по электрике и устранили за один день. Четко по смете."
                .to_string(),
            created_at: date(2025, 12, 10),
        },
        Review {
            id: "review-seed-2".to_string(),
            user_id: "seed".to_string(),
            user_name: "Екатерина".to_string(),
            car: "KIA Sportage".to_string(),
            rating: 5,
            text: "Делала ТО и диагностику подвески. Все объяснили, сервисом довольна.".to_string(),
            created_at: date(2025, 12, 14),
        },
        Review {
            id: "review-seed-3".to_string(),
            user_id: "seed".to_string(),
            user_name: "Игорь".to_string(),
            car: "BMW 5".to_string(),
            rating: 4,
            text: "Кузовной ремонт сделали аккуратно, цвет попали идеально.".to_string(),
            created_at: date(2025, 12, 20),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Booking;

    fn setup_store() -> RecordStore {
        let store = RecordStore::open_in_memory().unwrap();
        store.initialize("superadmin@avtopapa.local", "admin12345").unwrap();
        store
    }

    #[test]
    fn test_initialize_seeds_collections() {
        let store = setup_store();

        let users: Vec<User> = store.load(USERS_KEY, vec![]);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::Admin);
        assert_eq!(users[0].email, "superadmin@avtopapa.local");

        let reviews: Vec<Review> = store.load(REVIEWS_KEY, vec![]);
        assert_eq!(reviews.len(), 3);

        let bookings: Vec<Booking> = store.load(BOOKINGS_KEY, vec![]);
        assert!(bookings.is_empty());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let store = setup_store();
        store.initialize("superadmin@avtopapa.local", "admin12345").unwrap();
        store.initialize("SUPERADMIN@AVTOPAPA.LOCAL", "other").unwrap();

        let users: Vec<User> = store.load(USERS_KEY, vec![]);
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_load_falls_back_on_missing_key() {
        let store = RecordStore::open_in_memory().unwrap();
        let value: Vec<String> = store.load("nope", vec!["fallback".to_string()]);
        assert_eq!(value, vec!["fallback"]);
    }

    #[test]
    fn test_load_falls_back_on_corrupt_data() {
        let store = RecordStore::open_in_memory().unwrap();
        store.save("broken", &"not a list").unwrap();
        let value: Vec<User> = store.load("broken", vec![]);
        assert!(value.is_empty());
    }

    #[test]
    fn test_save_replaces_whole_collection() {
        let store = RecordStore::open_in_memory().unwrap();
        store.save("list", &vec![1, 2, 3]).unwrap();
        store.save("list", &vec![9]).unwrap();
        let value: Vec<i64> = store.load("list", vec![]);
        assert_eq!(value, vec![9]);
    }

    #[test]
    fn test_site_content_merge_roundtrip() {
        let store = setup_store();

        // A stale document missing newer fields
        let partial = serde_json::json!({
            "hero": { "title": "Старый заголовок" },
            "booking": { "time_slots": ["10:00"] }
        });
        store.save(SITE_CONTENT_KEY, &partial).unwrap();

        let content = store.load_site_content();
        assert_eq!(content.hero.title, "Старый заголовок");
        assert_eq!(content.booking.time_slots, vec!["10:00"]);
        // Backfilled from defaults
        assert!(!content.request_form.car_brands.is_empty());
        assert!(!content.contacts.phones.is_empty());
    }
}
