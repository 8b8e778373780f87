//! Request DTOs.

use serde::Deserialize;
use validator::Validate;

/// Signup request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Last name.
    #[validate(length(min = 1, message = "Le champ 'nom' est requis."))]
    pub nom: String,
    /// First name.
    #[validate(length(min = 1, message = "Le champ 'prenom' est requis."))]
    pub prenom: String,
    /// Email address.
    #[validate(email(message = "Le champ 'email' doit être une adresse valide."))]
    pub email: String,
    /// Password (clear text, hashed before storage).
    #[validate(length(min = 1, message = "Le champ 'mdp' est requis."))]
    pub mdp: String,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Password.
    pub mdp: String,
}

/// Message send request (JSON variant).
#[derive(Debug, Deserialize)]
pub struct EnvoyerMessageRequest {
    /// Subject (optional).
    #[serde(default)]
    pub objet: Option<String>,
    /// Body.
    pub corps: String,
    /// Recipient emails.
    pub destinataires: Vec<String>,
}

/// Read/unread toggle request.
#[derive(Debug, Deserialize)]
pub struct SetReadStateRequest {
    /// ID of the received message to update.
    #[serde(rename = "messageId")]
    pub message_id: i64,
}

/// Status creation request.
#[derive(Debug, Deserialize)]
pub struct CreerStatutRequest {
    /// State label.
    pub etat: String,
}
