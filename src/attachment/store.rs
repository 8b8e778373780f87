//! On-disk attachment storage.
//!
//! Stored names are a millisecond-timestamp prefix combined with a
//! sanitized version of the original filename, so concurrent uploads of
//! the same file never collide on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::{MessagerieError, Result};

/// MIME types accepted for uploads.
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "application/pdf"];

/// A file written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Path of the stored file, as persisted in attachment metadata.
    pub chemin_de_stockage: String,
    /// Size in bytes.
    pub taille: u64,
}

/// Attachment store writing uploaded files to a content directory.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    base_dir: PathBuf,
    max_size: u64,
}

impl AttachmentStore {
    /// Create a new store rooted at `base_dir`, rejecting files larger
    /// than `max_size` bytes. The directory is created on demand.
    pub fn new(base_dir: impl Into<PathBuf>, max_size: u64) -> Self {
        Self {
            base_dir: base_dir.into(),
            max_size,
        }
    }

    /// Base directory of this store.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Maximum accepted file size in bytes.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Store uploaded bytes.
    ///
    /// Rejects MIME types outside the allow-list and contents over the
    /// size limit before anything touches the disk.
    pub fn store(&self, content: &[u8], original_name: &str, mime_type: &str) -> Result<StoredFile> {
        if !ALLOWED_MIME_TYPES.contains(&mime_type) {
            return Err(MessagerieError::UnsupportedFileType(mime_type.to_string()));
        }

        let size = content.len() as u64;
        if size > self.max_size {
            return Err(MessagerieError::FileTooLarge {
                size,
                max: self.max_size,
            });
        }

        fs::create_dir_all(&self.base_dir)?;

        let stored_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_filename(original_name)
        );
        let path = self.base_dir.join(stored_name);
        fs::write(&path, content)?;

        Ok(StoredFile {
            chemin_de_stockage: path.to_string_lossy().into_owned(),
            taille: size,
        })
    }

    /// Load stored bytes back from disk.
    pub fn load(&self, chemin_de_stockage: &str) -> Result<Vec<u8>> {
        match fs::read(chemin_de_stockage) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(MessagerieError::NotFound(
                format!("fichier {chemin_de_stockage}"),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

/// Sanitize an original filename for on-disk storage.
///
/// Characters outside `[A-Za-z0-9._-]` are replaced with underscores.
fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        "fichier".to_string()
    } else {
        sanitized
    }
}
