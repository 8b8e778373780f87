//! Message handlers: send, list received/sent, read-state toggles.

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::message::{
    parse_destinataires, MessageService, OutgoingMessage, ReadState, UploadedFile,
};
use crate::web::dto::{
    ConfirmationResponse, EnvoyerMessageRequest, MessageCreatedResponse, MessageEnvoyeDto,
    MessageRecuDto, SetReadStateRequest,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /messages - Send a message, as JSON or multipart/form-data.
///
/// The multipart variant carries the recipient list as a JSON-encoded
/// array in the `destinataires` field, plus any number of file parts
/// (field name `file` or `files`).
pub async fn envoyer_message(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    req: Request,
) -> Result<(StatusCode, Json<MessageCreatedResponse>), ApiError> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("multipart/form-data"))
        .unwrap_or(false);

    let (outgoing, fichiers) = if is_multipart {
        let multipart = Multipart::from_request(req, &())
            .await
            .map_err(|_| ApiError::bad_request("Requête multipart invalide"))?;
        collect_multipart_message(multipart).await?
    } else {
        let Json(body) = Json::<EnvoyerMessageRequest>::from_request(req, &())
            .await
            .map_err(|_| ApiError::bad_request("Corps de requête JSON invalide"))?;
        (
            OutgoingMessage {
                objet: body.objet,
                corps: body.corps,
                destinataires: body.destinataires,
            },
            Vec::new(),
        )
    };

    let sent = MessageService::send(
        state.db.pool(),
        &state.store,
        claims.sub,
        outgoing,
        fichiers,
    )
    .await?;

    tracing::info!(
        message_id = sent.id,
        recipients = sent.destinataires.len(),
        attachments = sent.pieces_jointes.len(),
        "Message sent"
    );

    let response = MessageCreatedResponse {
        message: "Message envoyé avec succès".to_string(),
        data: MessageEnvoyeDto::from(sent),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Collect the text fields and file parts of a multipart send.
async fn collect_multipart_message(
    mut multipart: Multipart,
) -> Result<(OutgoingMessage, Vec<UploadedFile>), ApiError> {
    let mut objet: Option<String> = None;
    let mut corps: Option<String> = None;
    let mut destinataires_raw: Option<String> = None;
    let mut fichiers = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Requête multipart invalide")
    })? {
        match field.name().unwrap_or("") {
            "objet" => {
                objet = Some(read_text(field, "objet").await?);
            }
            "corps" => {
                corps = Some(read_text(field, "corps").await?);
            }
            "destinataires" => {
                destinataires_raw = Some(read_text(field, "destinataires").await?);
            }
            "file" | "files" => {
                let nom_fichier = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| ApiError::bad_request("Fichier sans nom"))?;
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let contenu = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        tracing::debug!("Failed to read file content: {}", e);
                        ApiError::bad_request("Impossible de lire le fichier")
                    })?
                    .to_vec();

                fichiers.push(UploadedFile {
                    nom_fichier,
                    mime_type,
                    contenu,
                });
            }
            _ => {}
        }
    }

    let corps = corps.ok_or_else(|| {
        ApiError::bad_request("Le champ 'corps' est requis et ne peut pas être vide.")
    })?;
    let destinataires_raw = destinataires_raw.ok_or_else(|| {
        ApiError::bad_request("Le champ 'destinataires' est requis (sous forme de chaîne JSON).")
    })?;
    let destinataires = parse_destinataires(&destinataires_raw)?;

    Ok((
        OutgoingMessage {
            objet,
            corps,
            destinataires,
        },
        fichiers,
    ))
}

/// Read a text field of a multipart form.
async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|_| ApiError::bad_request(format!("Le champ '{name}' est illisible.")))
}

/// GET /messages/recu - List messages received by the caller.
pub async fn lister_recus(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<MessageRecuDto>>, ApiError> {
    let messages = MessageService::list_received(state.db.pool(), claims.sub).await?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// GET /messages/envoyes - List messages sent by the caller.
pub async fn lister_envoyes(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<MessageEnvoyeDto>>, ApiError> {
    let messages = MessageService::list_sent(state.db.pool(), claims.sub).await?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// PUT /messages/recu/lu - Mark a received message as read.
pub async fn marquer_lu(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(req): Json<SetReadStateRequest>,
) -> Result<Json<ConfirmationResponse>, ApiError> {
    set_read_state(&state, claims.sub, req.message_id, ReadState::Lu).await?;

    Ok(Json(ConfirmationResponse {
        message: "Message marqué comme lu avec succès".to_string(),
    }))
}

/// PUT /messages/recu/non-lu - Mark a received message as unread.
pub async fn marquer_non_lu(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(req): Json<SetReadStateRequest>,
) -> Result<Json<ConfirmationResponse>, ApiError> {
    set_read_state(&state, claims.sub, req.message_id, ReadState::NonLu).await?;

    Ok(Json(ConfirmationResponse {
        message: "Message marqué comme non lu avec succès".to_string(),
    }))
}

async fn set_read_state(
    state: &AppState,
    user_id: i64,
    message_id: i64,
    read_state: ReadState,
) -> Result<(), ApiError> {
    MessageService::set_read_state(state.db.pool(), user_id, message_id, read_state)
        .await
        .map_err(|e| match e {
            // Hide whether the message exists at all
            crate::MessagerieError::NotFound(_) => {
                ApiError::not_found("Message non trouvé ou accès non autorisé")
            }
            other => other.into(),
        })
}
