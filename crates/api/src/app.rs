use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use shared::token::TokenSigner;
use store::PlatformStore;

use crate::config::Config;
use crate::middleware::{require_admin_auth, require_organizer_auth};
use crate::routes::{admin, auth, health, organizer, public};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PlatformStore>,
    pub config: Arc<Config>,
    pub tokens: TokenSigner,
}

pub fn create_app(config: Config) -> Router {
    let store = Arc::new(PlatformStore::new(config.platform_config()));
    create_app_with_store(config, store)
}

/// Builds the router against an existing store. Tests use this to seed state
/// before mounting the app.
pub fn create_app_with_store(config: Config, store: Arc<PlatformStore>) -> Router {
    let config = Arc::new(config);
    let tokens = TokenSigner::new(
        &config.security.token_secret,
        config.security.token_expiry_secs,
    );

    let state = AppState {
        store,
        config: config.clone(),
        tokens,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Storefront and account creation, no authentication required
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::live))
        .route("/api/v1/raffles", get(public::list_raffles))
        .route("/api/v1/raffles/:code", get(public::get_raffle))
        .route(
            "/api/v1/raffles/:code/reservations",
            post(public::reserve_numbers),
        )
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/admin/setup", post(auth::admin_setup))
        .route("/api/v1/admin/login", post(auth::admin_login));

    // Organizer console (owner-scoped raffle management)
    let organizer_routes = Router::new()
        .route("/api/v1/raffles", post(organizer::create_raffle))
        .route("/api/v1/my/raffles", get(organizer::my_raffles))
        .route("/api/v1/my/raffles/:id/ledger", get(organizer::ledger))
        .route(
            "/api/v1/my/raffles/:id/numbers/:number/toggle-paid",
            post(organizer::toggle_paid),
        )
        .route(
            "/api/v1/my/raffles/:id/buyers/:purchase_key/mark-paid",
            post(organizer::mark_buyer_paid),
        )
        .route(
            "/api/v1/my/raffles/:id/buyers/:purchase_key/receipt",
            get(organizer::receipt),
        )
        .route("/api/v1/my/raffles/:id/draw", post(organizer::draw))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_organizer_auth,
        ));

    // Platform admin console
    let admin_routes = Router::new()
        .route("/api/v1/admin/password", post(admin::change_password))
        .route("/api/v1/admin/stats", get(admin::stats))
        .route("/api/v1/admin/raffles", get(admin::list_raffles))
        .route("/api/v1/admin/organizers", get(admin::list_organizers))
        .route(
            "/api/v1/admin/raffles/:id/confirm-fee",
            post(admin::confirm_fee),
        )
        .route(
            "/api/v1/admin/raffles/:id/deactivate",
            post(admin::deactivate_raffle),
        )
        .route("/api/v1/admin/raffles/:id", delete(admin::delete_raffle))
        .route(
            "/api/v1/admin/organizers/:id/block",
            post(admin::toggle_block_organizer),
        )
        .route(
            "/api/v1/admin/organizers/:id",
            delete(admin::delete_organizer),
        )
        .route("/api/v1/admin/config", get(admin::get_config))
        .route("/api/v1/admin/config", put(admin::update_config))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(organizer_routes)
        .merge(admin_routes)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
