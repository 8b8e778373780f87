//! Message entity types.

use chrono::{DateTime, Utc};

use crate::attachment::Attachment;
use crate::db::Correspondent;
use crate::status::{ETAT_LU, ETAT_NON_LU};

/// New message for creation.
#[derive(Debug, Clone)]
pub struct NewMessage {
    /// Subject (optional).
    pub objet: Option<String>,
    /// Body.
    pub corps: String,
    /// Send timestamp.
    pub date_envoi: DateTime<Utc>,
    /// Sender user ID.
    pub expediteur_id: i64,
    /// Initial read-status ID.
    pub statut_id: i64,
}

/// A received message, denormalized for listing: sender, status label and
/// attachments resolved.
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    /// Message ID.
    pub id: i64,
    /// Subject.
    pub objet: Option<String>,
    /// Body.
    pub corps: String,
    /// Send timestamp.
    pub date_envoi: DateTime<Utc>,
    /// Read-status label ("non lu" / "lu").
    pub statut: String,
    /// Sender identity.
    pub expediteur: Correspondent,
    /// Attachments.
    pub pieces_jointes: Vec<Attachment>,
}

/// A sent message, denormalized for listing: recipients and attachments
/// resolved.
#[derive(Debug, Clone)]
pub struct SentMessage {
    /// Message ID.
    pub id: i64,
    /// Subject.
    pub objet: Option<String>,
    /// Body.
    pub corps: String,
    /// Send timestamp.
    pub date_envoi: DateTime<Utc>,
    /// Recipient identities.
    pub destinataires: Vec<Correspondent>,
    /// Attachments.
    pub pieces_jointes: Vec<Attachment>,
}

/// Target read state for the read/unread toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    /// Message has been read.
    Lu,
    /// Message has not been read.
    NonLu,
}

impl ReadState {
    /// The catalog label for this state.
    pub fn etat(&self) -> &'static str {
        match self {
            ReadState::Lu => ETAT_LU,
            ReadState::NonLu => ETAT_NON_LU,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_state_labels() {
        assert_eq!(ReadState::Lu.etat(), "lu");
        assert_eq!(ReadState::NonLu.etat(), "non lu");
    }
}
