//! API handlers.

pub mod message;
pub mod piece_jointe;
pub mod status;
pub mod utilisateur;

pub use message::*;
pub use piece_jointe::*;
pub use status::*;
pub use utilisateur::*;

use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

use crate::attachment::AttachmentStore;
use crate::db::{Database, User};
use crate::web::error::ApiError;
use crate::web::middleware::JwtClaims;

/// Thread-safe database handle shared across handlers.
pub type SharedDatabase = Arc<Database>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: SharedDatabase,
    /// Attachment store.
    pub store: AttachmentStore,
    /// JWT encoding key.
    pub encoding_key: EncodingKey,
    /// Token expiry in seconds.
    pub token_expiry_secs: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        db: SharedDatabase,
        store: AttachmentStore,
        jwt_secret: &str,
        token_expiry_secs: u64,
    ) -> Self {
        Self {
            db,
            store,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            token_expiry_secs,
        }
    }

    /// Issue a bearer token asserting the user's identity.
    pub fn issue_token(&self, user: &User) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = JwtClaims {
            sub: user.id,
            email: user.email.clone(),
            iat: now,
            exp: now + self.token_expiry_secs,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            ApiError::internal("Impossible de générer le token")
        })
    }
}
