//! Attachment metadata repository.

use sqlx::SqlitePool;

use super::types::{Attachment, NewAttachment};
use crate::Result;

/// Repository for attachment metadata.
pub struct AttachmentRepository;

impl AttachmentRepository {
    /// Create attachment metadata for an existing message.
    pub async fn create(
        pool: &SqlitePool,
        attachment: &NewAttachment,
        message_id: i64,
    ) -> Result<Attachment> {
        let result = sqlx::query(
            "INSERT INTO pieces_jointes (nom_fichier, taille, chemin_de_stockage, message_id)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&attachment.nom_fichier)
        .bind(attachment.taille)
        .bind(&attachment.chemin_de_stockage)
        .bind(message_id)
        .execute(pool)
        .await?;

        Ok(Attachment {
            id: result.last_insert_rowid(),
            nom_fichier: attachment.nom_fichier.clone(),
            taille: attachment.taille,
            chemin_de_stockage: attachment.chemin_de_stockage.clone(),
            message_id,
        })
    }

    /// Get attachment metadata by ID.
    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Attachment>> {
        let result = sqlx::query_as::<_, Attachment>(
            "SELECT id, nom_fichier, taille, chemin_de_stockage, message_id
             FROM pieces_jointes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(result)
    }

    /// List attachments of a message.
    pub async fn list_by_message(pool: &SqlitePool, message_id: i64) -> Result<Vec<Attachment>> {
        let attachments = sqlx::query_as::<_, Attachment>(
            "SELECT id, nom_fichier, taille, chemin_de_stockage, message_id
             FROM pieces_jointes WHERE message_id = ? ORDER BY id",
        )
        .bind(message_id)
        .fetch_all(pool)
        .await?;

        Ok(attachments)
    }
}
