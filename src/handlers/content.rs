use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::models::SiteContent;
use crate::state::AppState;

// GET /api/content — public, always a complete document (missing stored
// fields are backfilled from defaults).
pub async fn get_content(State(state): State<Arc<AppState>>) -> Json<SiteContent> {
    let store = state.store.lock().unwrap();
    Json(store.load_site_content())
}
