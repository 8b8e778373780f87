//! Web API message tests.
//!
//! Integration tests for sending, listing and read-state toggles.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};

use common::{create_test_app, signup_and_login};

// ============================================================================
// Send (JSON)
// ============================================================================

#[tokio::test]
async fn test_send_message_success() {
    let app = create_test_app().await;

    let token = signup_and_login(&app.server, "Doe", "Jane", "jane@x.com", "mdp12345").await;
    signup_and_login(&app.server, "Smith", "John", "john@x.com", "mdp12345").await;

    let response = app
        .server
        .post("/messages")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({
            "objet": "Bonjour",
            "corps": "Comment ça va ?",
            "destinataires": ["john@x.com"]
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["message"], "Message envoyé avec succès");
    assert_eq!(body["data"]["objet"], "Bonjour");
    assert_eq!(body["data"]["corps"], "Comment ça va ?");

    let destinataires = body["data"]["destinataires"].as_array().unwrap();
    assert_eq!(destinataires.len(), 1);
    assert_eq!(destinataires[0]["email"], "john@x.com");
}

#[tokio::test]
async fn test_send_message_multiple_recipients() {
    let app = create_test_app().await;

    let token = signup_and_login(&app.server, "Doe", "Jane", "jane@x.com", "mdp12345").await;
    signup_and_login(&app.server, "Smith", "John", "john@x.com", "mdp12345").await;
    signup_and_login(&app.server, "Brown", "Carol", "carol@x.com", "mdp12345").await;

    let response = app
        .server
        .post("/messages")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({
            "corps": "À tous",
            "destinataires": ["john@x.com", "carol@x.com"]
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["data"]["destinataires"].as_array().unwrap().len(), 2);
    // No subject given: serialized as null
    assert!(body["data"]["objet"].is_null());
}

#[tokio::test]
async fn test_send_message_unresolved_recipients() {
    let app = create_test_app().await;

    let token = signup_and_login(&app.server, "Doe", "Jane", "jane@x.com", "mdp12345").await;
    signup_and_login(&app.server, "Smith", "John", "john@x.com", "mdp12345").await;

    let response = app
        .server
        .post("/messages")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({
            "corps": "Bonjour",
            "destinataires": ["john@x.com", "nouser@x.com"]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(
        body["error"]["message"],
        "Certains emails n'existent pas dans le système"
    );
    // The full set of unresolved emails is reported
    let unresolved = body["error"]["details"]["destinataires"].as_array().unwrap();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0], "nouser@x.com");

    // Atomicity: the rejected send left nothing behind
    let sent = app
        .server
        .get("/messages/envoyes")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;
    assert_eq!(sent.json::<Value>().as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_send_message_empty_corps() {
    let app = create_test_app().await;

    let token = signup_and_login(&app.server, "Doe", "Jane", "jane@x.com", "mdp12345").await;

    let response = app
        .server
        .post("/messages")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({
            "corps": "   ",
            "destinataires": ["jane@x.com"]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_send_message_empty_recipient_list() {
    let app = create_test_app().await;

    let token = signup_and_login(&app.server, "Doe", "Jane", "jane@x.com", "mdp12345").await;

    let response = app
        .server
        .post("/messages")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({
            "corps": "Bonjour",
            "destinataires": []
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_send_message_unauthorized() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/messages")
        .json(&json!({
            "corps": "Bonjour",
            "destinataires": ["jane@x.com"]
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_send_message_invalid_token() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/messages")
        .add_header(AUTHORIZATION, "Bearer not-a-valid-token")
        .json(&json!({
            "corps": "Bonjour",
            "destinataires": ["jane@x.com"]
        }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

// ============================================================================
// Send (multipart)
// ============================================================================

#[tokio::test]
async fn test_send_message_multipart_with_attachment() {
    let app = create_test_app().await;

    let token = signup_and_login(&app.server, "Doe", "Jane", "jane@x.com", "mdp12345").await;
    signup_and_login(&app.server, "Smith", "John", "john@x.com", "mdp12345").await;

    let form = MultipartForm::new()
        .add_text("objet", "Photo")
        .add_text("corps", "Voici la photo.")
        .add_text("destinataires", r#"["john@x.com"]"#)
        .add_part(
            "files",
            Part::bytes(b"\x89PNG fake image".to_vec())
                .file_name("photo.png")
                .mime_type("image/png"),
        );

    let response = app
        .server
        .post("/messages")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .multipart(form)
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    let pieces = body["data"]["piecejointe"].as_array().unwrap();
    assert_eq!(pieces.len(), 1);
    assert_eq!(pieces[0]["nom_fichier"], "photo.png");
    assert_eq!(pieces[0]["taille"], 15);
}

#[tokio::test]
async fn test_send_message_multipart_malformed_destinataires() {
    let app = create_test_app().await;

    let token = signup_and_login(&app.server, "Doe", "Jane", "jane@x.com", "mdp12345").await;

    let form = MultipartForm::new()
        .add_text("corps", "Bonjour")
        .add_text("destinataires", "pas-du-json");

    let response = app
        .server
        .post("/messages")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("tableau JSON valide"));
}

#[tokio::test]
async fn test_send_message_multipart_unsupported_file_type() {
    let app = create_test_app().await;

    let token = signup_and_login(&app.server, "Doe", "Jane", "jane@x.com", "mdp12345").await;
    signup_and_login(&app.server, "Smith", "John", "john@x.com", "mdp12345").await;

    let form = MultipartForm::new()
        .add_text("corps", "Bonjour")
        .add_text("destinataires", r#"["john@x.com"]"#)
        .add_part(
            "files",
            Part::bytes(b"#!/bin/sh".to_vec())
                .file_name("script.sh")
                .mime_type("text/x-shellscript"),
        );

    let response = app
        .server
        .post("/messages")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Type de fichier non autorisé");
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_list_received_empty() {
    let app = create_test_app().await;

    let token = signup_and_login(&app.server, "Doe", "Jane", "jane@x.com", "mdp12345").await;

    let response = app
        .server
        .get("/messages/recu")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>().as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_received() {
    let app = create_test_app().await;

    let jane = signup_and_login(&app.server, "Doe", "Jane", "jane@x.com", "mdp12345").await;
    let john = signup_and_login(&app.server, "Smith", "John", "john@x.com", "mdp12345").await;

    app.server
        .post("/messages")
        .add_header(AUTHORIZATION, format!("Bearer {}", jane))
        .json(&json!({
            "objet": "Salut",
            "corps": "Premier message",
            "destinataires": ["john@x.com"]
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = app
        .server
        .get("/messages/recu")
        .add_header(AUTHORIZATION, format!("Bearer {}", john))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    let messages = body.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["objet"], "Salut");
    assert_eq!(messages[0]["statut"], "non lu");
    assert_eq!(messages[0]["expediteur"]["email"], "jane@x.com");

    // The sender's inbox is untouched
    let jane_inbox = app
        .server
        .get("/messages/recu")
        .add_header(AUTHORIZATION, format!("Bearer {}", jane))
        .await;
    assert_eq!(jane_inbox.json::<Value>().as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_sent() {
    let app = create_test_app().await;

    let jane = signup_and_login(&app.server, "Doe", "Jane", "jane@x.com", "mdp12345").await;
    signup_and_login(&app.server, "Smith", "John", "john@x.com", "mdp12345").await;

    for i in 1..=3 {
        app.server
            .post("/messages")
            .add_header(AUTHORIZATION, format!("Bearer {}", jane))
            .json(&json!({
                "corps": format!("Message {i}"),
                "destinataires": ["john@x.com"]
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = app
        .server
        .get("/messages/envoyes")
        .add_header(AUTHORIZATION, format!("Bearer {}", jane))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    let messages = body.as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["destinataires"][0]["email"], "john@x.com");
}

#[tokio::test]
async fn test_list_requires_auth() {
    let app = create_test_app().await;

    app.server
        .get("/messages/recu")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .get("/messages/envoyes")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Read-state toggles
// ============================================================================

async fn send_one(app: &common::TestApp, from_token: &str, to_email: &str) -> i64 {
    let response = app
        .server
        .post("/messages")
        .add_header(AUTHORIZATION, format!("Bearer {}", from_token))
        .json(&json!({
            "corps": "Bonjour",
            "destinataires": [to_email]
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_mark_read_then_unread() {
    let app = create_test_app().await;

    let jane = signup_and_login(&app.server, "Doe", "Jane", "jane@x.com", "mdp12345").await;
    let john = signup_and_login(&app.server, "Smith", "John", "john@x.com", "mdp12345").await;

    let message_id = send_one(&app, &jane, "john@x.com").await;

    let response = app
        .server
        .put("/messages/recu/lu")
        .add_header(AUTHORIZATION, format!("Bearer {}", john))
        .json(&json!({ "messageId": message_id }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["message"],
        "Message marqué comme lu avec succès"
    );

    let inbox = app
        .server
        .get("/messages/recu")
        .add_header(AUTHORIZATION, format!("Bearer {}", john))
        .await;
    assert_eq!(inbox.json::<Value>()[0]["statut"], "lu");

    app.server
        .put("/messages/recu/non-lu")
        .add_header(AUTHORIZATION, format!("Bearer {}", john))
        .json(&json!({ "messageId": message_id }))
        .await
        .assert_status_ok();

    let inbox = app
        .server
        .get("/messages/recu")
        .add_header(AUTHORIZATION, format!("Bearer {}", john))
        .await;
    assert_eq!(inbox.json::<Value>()[0]["statut"], "non lu");
}

#[tokio::test]
async fn test_mark_read_shared_between_recipients() {
    let app = create_test_app().await;

    let jane = signup_and_login(&app.server, "Doe", "Jane", "jane@x.com", "mdp12345").await;
    let john = signup_and_login(&app.server, "Smith", "John", "john@x.com", "mdp12345").await;
    let carol = signup_and_login(&app.server, "Brown", "Carol", "carol@x.com", "mdp12345").await;

    let response = app
        .server
        .post("/messages")
        .add_header(AUTHORIZATION, format!("Bearer {}", jane))
        .json(&json!({
            "corps": "À tous",
            "destinataires": ["john@x.com", "carol@x.com"]
        }))
        .await;
    let message_id = response.json::<Value>()["data"]["id"].as_i64().unwrap();

    // John marks the message read
    app.server
        .put("/messages/recu/lu")
        .add_header(AUTHORIZATION, format!("Bearer {}", john))
        .json(&json!({ "messageId": message_id }))
        .await
        .assert_status_ok();

    // The status lives on the message itself, so Carol sees it read too
    let carol_inbox = app
        .server
        .get("/messages/recu")
        .add_header(AUTHORIZATION, format!("Bearer {}", carol))
        .await;
    assert_eq!(carol_inbox.json::<Value>()[0]["statut"], "lu");
}

#[tokio::test]
async fn test_mark_read_not_recipient() {
    let app = create_test_app().await;

    let jane = signup_and_login(&app.server, "Doe", "Jane", "jane@x.com", "mdp12345").await;
    signup_and_login(&app.server, "Smith", "John", "john@x.com", "mdp12345").await;
    let carol = signup_and_login(&app.server, "Brown", "Carol", "carol@x.com", "mdp12345").await;

    let message_id = send_one(&app, &jane, "john@x.com").await;

    // Carol is not a recipient: not found, never a different error
    let response = app
        .server
        .put("/messages/recu/lu")
        .add_header(AUTHORIZATION, format!("Bearer {}", carol))
        .json(&json!({ "messageId": message_id }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Message non trouvé ou accès non autorisé"
    );

    // Same answer for a message that does not exist at all
    let response = app
        .server
        .put("/messages/recu/lu")
        .add_header(AUTHORIZATION, format!("Bearer {}", carol))
        .json(&json!({ "messageId": 99999 }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Message non trouvé ou accès non autorisé"
    );
}
