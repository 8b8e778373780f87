//! Attachments: metadata persistence and on-disk storage.

mod repository;
mod store;
mod types;

pub use repository::AttachmentRepository;
pub use store::{AttachmentStore, StoredFile, ALLOWED_MIME_TYPES};
pub use types::{Attachment, NewAttachment};
