//! Message workflow: send, list, read-state transitions.

use chrono::Utc;
use sqlx::SqlitePool;

use super::repository::MessageRepository;
use super::types::{NewMessage, ReadState, ReceivedMessage, SentMessage};
use crate::attachment::{AttachmentStore, NewAttachment};
use crate::db::UserRepository;
use crate::status::{StatusCatalog, ETAT_NON_LU};
use crate::{MessagerieError, Result};

/// An outgoing message, recipients identified by email.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    /// Subject (optional).
    pub objet: Option<String>,
    /// Body.
    pub corps: String,
    /// Recipient emails.
    pub destinataires: Vec<String>,
}

/// An uploaded file, as received from the HTTP layer.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename.
    pub nom_fichier: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// File contents.
    pub contenu: Vec<u8>,
}

/// Parse the raw `destinataires` field of a multipart send.
///
/// The field carries a JSON-encoded array of email strings; anything else
/// (malformed JSON, a non-array, an empty array) is rejected.
pub fn parse_destinataires(raw: &str) -> Result<Vec<String>> {
    let destinataires: Vec<String> = serde_json::from_str(raw).map_err(|_| {
        MessagerieError::Validation(
            "Le champ 'destinataires' doit être un tableau JSON valide.".to_string(),
        )
    })?;

    if destinataires.is_empty() {
        return Err(MessagerieError::Validation(
            "Le champ 'destinataires' doit être un tableau non vide.".to_string(),
        ));
    }

    Ok(destinataires)
}

/// Orchestrates the message workflows on top of the repositories, the
/// status catalog and the attachment store.
pub struct MessageService;

impl MessageService {
    /// Send a message.
    ///
    /// Validates the body and recipient list, resolves every recipient
    /// email in one batched lookup (rejecting the whole send when any is
    /// unknown, reporting the full unresolved set), stores the uploaded
    /// files, then persists the message, its deliveries and its attachment
    /// rows in a single transaction.
    pub async fn send(
        pool: &SqlitePool,
        store: &AttachmentStore,
        expediteur_id: i64,
        outgoing: OutgoingMessage,
        fichiers: Vec<UploadedFile>,
    ) -> Result<SentMessage> {
        if outgoing.corps.trim().is_empty() {
            return Err(MessagerieError::Validation(
                "Le champ 'corps' est requis et ne peut pas être vide.".to_string(),
            ));
        }
        if outgoing.destinataires.is_empty() {
            return Err(MessagerieError::Validation(
                "Le champ 'destinataires' doit être un tableau non vide.".to_string(),
            ));
        }

        // Resolve all recipient emails at once
        let users = UserRepository::new(pool)
            .find_by_emails(&outgoing.destinataires)
            .await?;

        let unresolved: Vec<String> = outgoing
            .destinataires
            .iter()
            .filter(|email| !users.iter().any(|u| &u.email == *email))
            .cloned()
            .collect();
        if !unresolved.is_empty() {
            return Err(MessagerieError::UnknownRecipients(unresolved));
        }

        StatusCatalog::ensure_seeded(pool).await?;
        let statut_id = StatusCatalog::lookup(pool, ETAT_NON_LU).await?;

        // Write uploads to disk; each file is validated by the store
        let mut attachments = Vec::with_capacity(fichiers.len());
        for fichier in &fichiers {
            let stored = store.store(&fichier.contenu, &fichier.nom_fichier, &fichier.mime_type)?;
            attachments.push(NewAttachment::new(
                &fichier.nom_fichier,
                stored.taille as i64,
                stored.chemin_de_stockage,
            ));
        }

        let destinataire_ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        let message = NewMessage {
            objet: outgoing.objet,
            corps: outgoing.corps,
            date_envoi: Utc::now(),
            expediteur_id,
            statut_id,
        };

        let message_id =
            MessageRepository::create(pool, &message, &destinataire_ids, &attachments).await?;

        MessageRepository::get_sent_by_id(pool, message_id)
            .await?
            .ok_or_else(|| MessagerieError::NotFound("message".to_string()))
    }

    /// List messages received by a user.
    pub async fn list_received(pool: &SqlitePool, user_id: i64) -> Result<Vec<ReceivedMessage>> {
        MessageRepository::list_received(pool, user_id).await
    }

    /// List messages sent by a user.
    pub async fn list_sent(pool: &SqlitePool, user_id: i64) -> Result<Vec<SentMessage>> {
        MessageRepository::list_sent(pool, user_id).await
    }

    /// Toggle the read state of a received message.
    ///
    /// The caller must be a recipient; otherwise the message is reported
    /// as not found, without revealing whether it exists. The status is a
    /// field of the message itself, so the change is visible to every
    /// recipient.
    pub async fn set_read_state(
        pool: &SqlitePool,
        user_id: i64,
        message_id: i64,
        state: ReadState,
    ) -> Result<()> {
        if !MessageRepository::is_recipient(pool, message_id, user_id).await? {
            return Err(MessagerieError::NotFound("message".to_string()));
        }

        StatusCatalog::ensure_seeded(pool).await?;
        let statut_id = StatusCatalog::lookup(pool, state.etat()).await?;

        MessageRepository::set_status(pool, message_id, statut_id).await?;
        Ok(())
    }
}
