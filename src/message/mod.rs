//! Messages: entities, persistence and the send/read workflow.

mod repository;
mod service;
mod types;

pub use repository::MessageRepository;
pub use service::{parse_destinataires, MessageService, OutgoingMessage, UploadedFile};
pub use types::{NewMessage, ReadState, ReceivedMessage, SentMessage};
