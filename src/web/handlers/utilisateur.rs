//! User handlers: signup and login.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

use crate::auth::{hash_password, verify_password};
use crate::db::{NewUser, UserRepository};
use crate::web::dto::{LoginRequest, SignupRequest, SignupResponse, TokenResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// POST /utilisateurs/signup - Create a user account.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    let repo = UserRepository::new(state.db.pool());

    // Check for an existing account first for a friendly message; the
    // UNIQUE constraint still catches concurrent signups below
    if repo.get_by_email(&req.email).await?.is_some() {
        return Err(ApiError::bad_request("Email déjà utilisé"));
    }

    let mdp_hash = hash_password(&req.mdp).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::internal("Une erreur interne s'est produite.")
    })?;

    let user = repo
        .create(&NewUser::new(&req.nom, &req.prenom, &req.email, mdp_hash))
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                ApiError::bad_request("Email déjà utilisé")
            } else {
                tracing::error!("User creation failed: {}", e);
                ApiError::internal("Une erreur interne s'est produite.")
            }
        })?;

    tracing::info!(user_id = user.id, "User registered");

    let response = SignupResponse {
        message: "Utilisateur créé avec succès".to_string(),
        utilisateur: user.as_correspondent(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /utilisateurs/login - Authenticate and issue a token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if req.email.is_empty() || req.mdp.is_empty() {
        return Err(ApiError::bad_request(
            "Les champs 'email' et 'mdp' sont requis.",
        ));
    }

    let repo = UserRepository::new(state.db.pool());

    let user = repo
        .get_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::bad_request("Utilisateur non trouvé"))?;

    verify_password(&req.mdp, &user.mdp)
        .map_err(|_| ApiError::bad_request("Mot de passe incorrect"))?;

    let token = state.issue_token(&user)?;

    Ok(Json(TokenResponse { token }))
}
