//! Test helpers for Web API tests.
//!
//! Provides a TestServer factory with an in-memory database and a
//! temporary uploads directory, plus signup/login helpers.

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use messagerie::attachment::AttachmentStore;
use messagerie::config::WebConfig;
use messagerie::web::handlers::AppState;
use messagerie::web::middleware::JwtState;
use messagerie::web::router::{create_health_router, create_router};
use messagerie::Database;

/// JWT secret used by the test server.
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only";

/// A running test application.
///
/// The uploads directory lives as long as this struct.
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<Database>,
    pub uploads: TempDir,
}

/// Create a test server with an in-memory database and a temporary
/// uploads directory.
pub async fn create_test_app() -> TestApp {
    create_test_app_with_max_upload(100 * 1024 * 1024).await
}

/// Create a test server with a custom upload size limit.
pub async fn create_test_app_with_max_upload(max_upload_bytes: u64) -> TestApp {
    let db = Arc::new(
        Database::open_in_memory()
            .await
            .expect("Failed to create test database"),
    );

    let uploads = TempDir::new().expect("Failed to create uploads dir");
    let store = AttachmentStore::new(uploads.path(), max_upload_bytes);

    let app_state = Arc::new(AppState::new(db.clone(), store, TEST_JWT_SECRET, 3600));
    let jwt_state = Arc::new(JwtState::new(TEST_JWT_SECRET));

    let web_config = WebConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_token_expiry_secs: 3600,
        cors_origins: vec![],
    };

    let router =
        create_router(app_state, jwt_state, &web_config).merge(create_health_router());

    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        db,
        uploads,
    }
}

/// Register a user and return the response body.
pub async fn signup(server: &TestServer, nom: &str, prenom: &str, email: &str, mdp: &str) -> Value {
    let response = server
        .post("/utilisateurs/signup")
        .json(&json!({
            "nom": nom,
            "prenom": prenom,
            "email": email,
            "mdp": mdp
        }))
        .await;

    response.json::<Value>()
}

/// Log a user in and return the bearer token.
pub async fn login(server: &TestServer, email: &str, mdp: &str) -> String {
    let response = server
        .post("/utilisateurs/login")
        .json(&json!({
            "email": email,
            "mdp": mdp
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    body["token"].as_str().expect("token in response").to_string()
}

/// Register a user and log them in, returning the bearer token.
pub async fn signup_and_login(
    server: &TestServer,
    nom: &str,
    prenom: &str,
    email: &str,
    mdp: &str,
) -> String {
    signup(server, nom, prenom, email, mdp).await;
    login(server, email, mdp).await
}
