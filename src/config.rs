use std::env;

/// Default slot grid: morning and afternoon blocks in 30-minute steps,
/// with the lunch break left out.
pub const DEFAULT_SLOT_GRID: &[&str] = &[
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "14:00", "14:30", "15:00", "15:30",
    "16:00", "16:30", "17:00", "17:30", "18:00",
];

pub const DEFAULT_LEAD_MINUTES: i64 = 30;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub slot_grid: Vec<String>,
    /// Same-day slots must start more than this many minutes from now.
    pub booking_lead_minutes: i64,
    pub admin_email: String,
    pub admin_password: String,
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "avtopapa.db".to_string()),
            slot_grid: env::var("SLOT_GRID")
                .ok()
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| DEFAULT_SLOT_GRID.iter().map(|s| s.to_string()).collect()),
            booking_lead_minutes: env::var("BOOKING_LEAD_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_LEAD_MINUTES),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "superadmin@avtopapa.local".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin12345".to_string()),
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            telegram_chat_id: env::var("TELEGRAM_CHAT_ID").unwrap_or_default(),
        }
    }
}
