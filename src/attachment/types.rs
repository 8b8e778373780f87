//! Attachment entity types.

/// Attachment metadata, tied to a message. The bytes live on disk at
/// `chemin_de_stockage`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Attachment {
    /// Attachment ID.
    pub id: i64,
    /// Original filename, as uploaded.
    pub nom_fichier: String,
    /// Size in bytes.
    pub taille: i64,
    /// Path of the stored file.
    pub chemin_de_stockage: String,
    /// Owning message ID.
    pub message_id: i64,
}

/// New attachment metadata for creation.
#[derive(Debug, Clone)]
pub struct NewAttachment {
    /// Original filename.
    pub nom_fichier: String,
    /// Size in bytes.
    pub taille: i64,
    /// Path of the stored file.
    pub chemin_de_stockage: String,
}

impl NewAttachment {
    /// Create new attachment metadata.
    pub fn new(
        nom_fichier: impl Into<String>,
        taille: i64,
        chemin_de_stockage: impl Into<String>,
    ) -> Self {
        Self {
            nom_fichier: nom_fichier.into(),
            taille,
            chemin_de_stockage: chemin_de_stockage.into(),
        }
    }
}
