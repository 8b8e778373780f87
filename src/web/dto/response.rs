//! Response DTOs.

use serde::Serialize;

use crate::attachment::Attachment;
use crate::db::Correspondent;
use crate::message::{ReceivedMessage, SentMessage};

// ============================================================================
// Users
// ============================================================================

/// Signup response.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    /// Confirmation message.
    pub message: String,
    /// The created user.
    pub utilisateur: Correspondent,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Bearer token.
    pub token: String,
}

// ============================================================================
// Messages
// ============================================================================

/// Attachment metadata as embedded in message payloads.
#[derive(Debug, Serialize)]
pub struct PieceJointeDto {
    /// Attachment ID.
    pub id: i64,
    /// Original filename.
    pub nom_fichier: String,
    /// Size in bytes.
    pub taille: i64,
    /// Storage path.
    pub chemin_de_stockage: String,
}

impl From<Attachment> for PieceJointeDto {
    fn from(a: Attachment) -> Self {
        Self {
            id: a.id,
            nom_fichier: a.nom_fichier,
            taille: a.taille,
            chemin_de_stockage: a.chemin_de_stockage,
        }
    }
}

/// A received message.
#[derive(Debug, Serialize)]
pub struct MessageRecuDto {
    /// Message ID.
    pub id: i64,
    /// Subject.
    pub objet: Option<String>,
    /// Body.
    pub corps: String,
    /// Send timestamp (RFC 3339).
    pub date_envoi: String,
    /// Read-status label.
    pub statut: String,
    /// Sender.
    pub expediteur: Correspondent,
    /// Attachments.
    pub piecejointe: Vec<PieceJointeDto>,
}

impl From<ReceivedMessage> for MessageRecuDto {
    fn from(m: ReceivedMessage) -> Self {
        Self {
            id: m.id,
            objet: m.objet,
            corps: m.corps,
            date_envoi: m.date_envoi.to_rfc3339(),
            statut: m.statut,
            expediteur: m.expediteur,
            piecejointe: m.pieces_jointes.into_iter().map(Into::into).collect(),
        }
    }
}

/// A sent message, with its recipient list.
#[derive(Debug, Serialize)]
pub struct MessageEnvoyeDto {
    /// Message ID.
    pub id: i64,
    /// Subject.
    pub objet: Option<String>,
    /// Body.
    pub corps: String,
    /// Send timestamp (RFC 3339).
    pub date_envoi: String,
    /// Recipients.
    pub destinataires: Vec<Correspondent>,
    /// Attachments.
    pub piecejointe: Vec<PieceJointeDto>,
}

impl From<SentMessage> for MessageEnvoyeDto {
    fn from(m: SentMessage) -> Self {
        Self {
            id: m.id,
            objet: m.objet,
            corps: m.corps,
            date_envoi: m.date_envoi.to_rfc3339(),
            destinataires: m.destinataires,
            piecejointe: m.pieces_jointes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Send response: confirmation plus the created message.
#[derive(Debug, Serialize)]
pub struct MessageCreatedResponse {
    /// Confirmation message.
    pub message: String,
    /// The created message.
    pub data: MessageEnvoyeDto,
}

/// Plain confirmation response.
#[derive(Debug, Serialize)]
pub struct ConfirmationResponse {
    /// Confirmation message.
    pub message: String,
}

// ============================================================================
// Attachments
// ============================================================================

/// Attachment creation response.
#[derive(Debug, Serialize)]
pub struct PieceJointeCreatedResponse {
    /// Confirmation message.
    pub message: String,
    /// The created attachment.
    pub data: PieceJointeDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_message_envoye_dto_from_sent() {
        let now = Utc::now();
        let sent = SentMessage {
            id: 1,
            objet: None,
            corps: "Bonjour".to_string(),
            date_envoi: now,
            destinataires: vec![Correspondent {
                id: 2,
                nom: "Doe".to_string(),
                prenom: "Jane".to_string(),
                email: "jane@x.com".to_string(),
            }],
            pieces_jointes: vec![Attachment {
                id: 3,
                nom_fichier: "a.pdf".to_string(),
                taille: 10,
                chemin_de_stockage: "uploads/1-a.pdf".to_string(),
                message_id: 1,
            }],
        };

        let dto = MessageEnvoyeDto::from(sent);
        assert_eq!(dto.id, 1);
        assert_eq!(dto.date_envoi, now.to_rfc3339());
        assert_eq!(dto.destinataires[0].email, "jane@x.com");
        assert_eq!(dto.piecejointe[0].nom_fichier, "a.pdf");

        // objet serializes as an explicit null
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("objet").unwrap().is_null());
    }
}
