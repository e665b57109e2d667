use std::sync::Mutex;

use crate::config::AppConfig;
use crate::services::auth::SessionManager;
use crate::services::ledger::Ledger;
use crate::services::notify::LeadSink;
use crate::store::RecordStore;

pub struct AppState {
    pub store: Mutex<RecordStore>,
    pub ledger: Ledger,
    pub sessions: SessionManager,
    pub config: AppConfig,
    pub leads: Box<dyn LeadSink>,
}
