//! Messagerie - internal messaging backend.
//!
//! A thin HTTP layer over a relational schema: user signup/login, sending
//! messages with optional file attachments, listing received/sent
//! messages, and toggling read status.

pub mod attachment;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod message;
pub mod status;
pub mod web;

pub use attachment::{Attachment, AttachmentRepository, AttachmentStore};
pub use auth::{hash_password, verify_password, PasswordError};
pub use config::Config;
pub use db::{Correspondent, Database, NewUser, User, UserRepository};
pub use error::{MessagerieError, Result};
pub use message::{MessageRepository, MessageService, ReadState};
pub use status::{StatusCatalog, Statut, ETAT_LU, ETAT_NON_LU};
pub use web::WebServer;
