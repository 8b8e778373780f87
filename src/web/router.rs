//! Router configuration.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    ajouter_piece_jointe, creer_statut, envoyer_message, lister_envoyes, lister_recus,
    lister_statuts, login, marquer_lu, marquer_non_lu, signup, telecharger_piece_jointe, AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};
use crate::config::WebConfig;

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    config: &WebConfig,
) -> Router {
    let utilisateur_routes = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login));

    let message_routes = Router::new()
        .route("/", post(envoyer_message))
        .route("/recu", get(lister_recus))
        .route("/envoyes", get(lister_envoyes))
        .route("/recu/lu", put(marquer_lu))
        .route("/recu/non-lu", put(marquer_non_lu));

    let piece_jointe_routes = Router::new().route(
        "/:id",
        get(telecharger_piece_jointe).post(ajouter_piece_jointe),
    );

    let status_routes = Router::new().route("/", get(lister_statuts).post(creer_statut));

    // Uploads can reach the configured limit; leave headroom for the
    // multipart framing and text fields
    let body_limit = app_state.store.max_size() as usize + 1024 * 1024;

    let jwt_state_for_middleware = jwt_state.clone();

    Router::new()
        .nest("/utilisateurs", utilisateur_routes)
        .nest("/messages", message_routes)
        .nest("/pieces-jointes", piece_jointe_routes)
        .nest("/status", status_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&config.cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
