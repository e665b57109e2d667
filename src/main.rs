use std::sync::{Arc, Mutex};

use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use avtopapa_portal::config::AppConfig;
use avtopapa_portal::handlers;
use avtopapa_portal::services::auth::SessionManager;
use avtopapa_portal::services::ledger::Ledger;
use avtopapa_portal::services::notify::{LeadSink, NoopSink};
use avtopapa_portal::services::notify::telegram::TelegramSink;
use avtopapa_portal::services::slots::SlotCatalog;
use avtopapa_portal::state::AppState;
use avtopapa_portal::store::RecordStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let store = RecordStore::open(&config.database_url)?;
    store.initialize(&config.admin_email, &config.admin_password)?;

    let catalog = SlotCatalog::new(config.slot_grid.clone())?;
    let ledger = Ledger::new(catalog, config.booking_lead_minutes);

    let leads: Box<dyn LeadSink> =
        if config.telegram_bot_token.is_empty() || config.telegram_chat_id.is_empty() {
            tracing::info!("Telegram lead notifications disabled");
            Box::new(NoopSink)
        } else {
            tracing::info!("Telegram lead notifications enabled");
            Box::new(TelegramSink::new(
                config.telegram_bot_token.clone(),
                config.telegram_chat_id.clone(),
            ))
        };

    let state = Arc::new(AppState {
        store: Mutex::new(store),
        ledger,
        sessions: SessionManager::new(),
        config: config.clone(),
        leads,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/auth/password", post(handlers::auth::change_password))
        .route("/api/slots", get(handlers::bookings::day_slots))
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route("/api/bookings/mine", get(handlers::bookings::my_bookings))
        .route(
            "/api/bookings/:id",
            patch(handlers::bookings::update_own_booking)
                .delete(handlers::bookings::delete_own_booking),
        )
        .route(
            "/api/bookings/:id/cancel",
            post(handlers::bookings::cancel_own_booking),
        )
        .route(
            "/api/reviews",
            get(handlers::reviews::list).post(handlers::reviews::create),
        )
        .route("/api/content", get(handlers::content::get_content))
        .route("/api/leads", post(handlers::leads::submit_lead))
        .route(
            "/api/admin/bookings",
            get(handlers::admin::list_bookings).post(handlers::admin::create_booking),
        )
        .route(
            "/api/admin/bookings/:id",
            patch(handlers::admin::update_booking).delete(handlers::admin::delete_booking),
        )
        .route(
            "/api/admin/bookings/:id/status",
            post(handlers::admin::update_booking_status),
        )
        .route("/api/admin/calendar", get(handlers::admin::calendar))
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route(
            "/api/admin/users/:id",
            patch(handlers::admin::update_user),
        )
        .route(
            "/api/admin/users/:id/password",
            post(handlers::admin::reset_user_password),
        )
        .route(
            "/api/admin/superuser",
            post(handlers::admin::create_superuser),
        )
        .route("/api/admin/reviews", post(handlers::admin::create_review))
        .route(
            "/api/admin/reviews/:id",
            patch(handlers::admin::update_review).delete(handlers::admin::delete_review),
        )
        .route("/api/admin/content", put(handlers::admin::update_content))
        .route(
            "/api/admin/content/reset",
            post(handlers::admin::reset_content),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
