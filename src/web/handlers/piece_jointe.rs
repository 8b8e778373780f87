//! Attachment handlers: attach a file to an existing message, download.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::attachment::{AttachmentRepository, NewAttachment};
use crate::message::MessageRepository;
use crate::web::dto::{PieceJointeCreatedResponse, PieceJointeDto};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// Generate a safe Content-Disposition header value for downloads.
///
/// Control characters are stripped (they would allow header injection),
/// quotes and backslashes are replaced, and non-ASCII names get an RFC
/// 5987 `filename*` variant.
fn content_disposition_header(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// POST /pieces-jointes/:messageId - Attach a file to an existing message.
///
/// Expects a multipart form with a single `file` part.
pub async fn ajouter_piece_jointe(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Path(message_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<PieceJointeCreatedResponse>), ApiError> {
    if !MessageRepository::exists(state.db.pool(), message_id).await? {
        return Err(ApiError::not_found("Message non trouvé"));
    }

    let mut nom_fichier: Option<String> = None;
    let mut mime_type = "application/octet-stream".to_string();
    let mut contenu: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Requête multipart invalide")
    })? {
        match field.name().unwrap_or("") {
            "file" | "files" => {
                nom_fichier = field.file_name().map(|s| s.to_string());
                if let Some(ct) = field.content_type() {
                    mime_type = ct.to_string();
                }
                contenu = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| {
                            tracing::debug!("Failed to read file content: {}", e);
                            ApiError::bad_request("Impossible de lire le fichier")
                        })?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    let nom_fichier =
        nom_fichier.ok_or_else(|| ApiError::bad_request("Aucun fichier n'a été uploadé."))?;
    let contenu =
        contenu.ok_or_else(|| ApiError::bad_request("Aucun fichier n'a été uploadé."))?;

    let stored = state.store.store(&contenu, &nom_fichier, &mime_type)?;

    let attachment = AttachmentRepository::create(
        state.db.pool(),
        &NewAttachment::new(&nom_fichier, stored.taille as i64, stored.chemin_de_stockage),
        message_id,
    )
    .await?;

    tracing::info!(
        attachment_id = attachment.id,
        message_id,
        "Attachment added"
    );

    let response = PieceJointeCreatedResponse {
        message: "Pièce jointe ajoutée avec succès".to_string(),
        data: PieceJointeDto::from(attachment),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /pieces-jointes/:id - Download an attachment.
///
/// Streams the stored bytes back with the original filename as the
/// suggested download name.
pub async fn telecharger_piece_jointe(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<Response<Body>, ApiError> {
    let attachment = AttachmentRepository::get_by_id(state.db.pool(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pièce jointe non trouvée"))?;

    let content = state
        .store
        .load(&attachment.chemin_de_stockage)
        .map_err(|e| match e {
            crate::MessagerieError::NotFound(_) => ApiError::not_found("Pièce jointe non trouvée"),
            other => {
                tracing::error!("Failed to load attachment: {}", other);
                ApiError::internal("Une erreur interne s'est produite.")
            }
        })?;

    let content_type = mime_guess::from_path(&attachment.nom_fichier)
        .first_or_octet_stream()
        .to_string();

    let response = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&attachment.nom_fichier),
        )
        .header(header::CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Une erreur interne s'est produite.")
        })?;

    Ok(response)
}
