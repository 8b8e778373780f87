//! Web server.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use super::handlers::{AppState, SharedDatabase};
use super::middleware::JwtState;
use super::router::{create_health_router, create_router};
use crate::attachment::AttachmentStore;
use crate::config::Config;
use crate::{MessagerieError, Result};

/// Web server for the messaging API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// JWT state.
    jwt_state: Arc<JwtState>,
    /// Web configuration.
    web_config: crate::config::WebConfig,
}

impl WebServer {
    /// Create a new web server from the full configuration.
    pub fn new(config: &Config, db: SharedDatabase) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| MessagerieError::Config(format!("invalid listen address: {e}")))?;

        let store = AttachmentStore::new(
            &config.uploads.storage_path,
            config.uploads.max_upload_size_bytes(),
        );

        let app_state = Arc::new(AppState::new(
            db,
            store,
            &config.web.jwt_secret,
            config.web.jwt_token_expiry_secs,
        ));

        let jwt_state = Arc::new(JwtState::new(&config.web.jwt_secret));

        Ok(Self {
            addr,
            app_state,
            jwt_state,
            web_config: config.web.clone(),
        })
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn build_router(&self) -> axum::Router {
        create_router(
            self.app_state.clone(),
            self.jwt_state.clone(),
            &self.web_config,
        )
        .merge(create_health_router())
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the actual bound
    /// address. Useful for testing with port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn create_test_config(uploads_dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.web.jwt_secret = "test-secret-key".to_string();
        config.uploads.storage_path = uploads_dir.to_string_lossy().into_owned();
        config
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let uploads = tempfile::TempDir::new().unwrap();
        let config = create_test_config(uploads.path());
        let db = Database::open_in_memory().await.unwrap();

        let server = WebServer::new(&config, Arc::new(db)).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_web_server_invalid_address() {
        let uploads = tempfile::TempDir::new().unwrap();
        let mut config = create_test_config(uploads.path());
        config.server.host = "not an address".to_string();
        let db = Database::open_in_memory().await.unwrap();

        assert!(WebServer::new(&config, Arc::new(db)).is_err());
    }

    #[tokio::test]
    async fn test_web_server_run_with_addr() {
        let uploads = tempfile::TempDir::new().unwrap();
        let config = create_test_config(uploads.path());
        let db = Database::open_in_memory().await.unwrap();

        let server = WebServer::new(&config, Arc::new(db)).unwrap();
        let addr = server.run_with_addr().await.unwrap();
        assert_ne!(addr.port(), 0);
    }
}
