//! Status catalog handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::status::{Statut, StatusCatalog};
use crate::web::dto::CreerStatutRequest;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /status - List all statuses.
pub async fn lister_statuts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Statut>>, ApiError> {
    let statuts = StatusCatalog::list(state.db.pool()).await?;
    Ok(Json(statuts))
}

/// POST /status - Create a status.
pub async fn creer_statut(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreerStatutRequest>,
) -> Result<(StatusCode, Json<Statut>), ApiError> {
    let statut = StatusCatalog::create(state.db.pool(), &req.etat)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                ApiError::bad_request("Ce statut existe déjà")
            } else {
                e.into()
            }
        })?;

    Ok((StatusCode::CREATED, Json(statut)))
}
