//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use market_api::{create_app, create_app_state};
use market_common::{
    AppConfig, AppSettings, CorsConfig, DatabaseConfig, Environment, IdConfig, JwtConfig,
    NotifierConfig, RateLimitConfig, ServerConfig, StorageConfig,
};
use reqwest::{Client, Response};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a test server against the `DATABASE_URL` database.
    ///
    /// Returns `None` when no database is configured, so callers can skip.
    pub async fn start() -> Result<Option<Self>> {
        let _ = dotenvy::dotenv();
        let Some(config) = test_config() else {
            eprintln!("Skipping: DATABASE_URL not set");
            return Ok(None);
        };

        // Create app state against the test database
        let state = create_app_state(config).await?;
        let app = create_app(state);

        // Bind to an ephemeral port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Wait for the server to accept connections
        tokio::time::sleep(Duration::from_millis(100)).await;

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Some(Self {
            addr,
            client,
            _handle: handle,
        }))
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Response> {
        let mut request = self.client.get(format!("{}{path}", self.base_url()));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    /// Make a POST request with a JSON body
    pub async fn post<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        token: Option<&str>,
    ) -> Result<Response> {
        let mut request = self
            .client
            .post(format!("{}{path}", self.base_url()))
            .json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    /// Make a PATCH request with a JSON body
    pub async fn patch<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        token: Option<&str>,
    ) -> Result<Response> {
        let mut request = self
            .client
            .patch(format!("{}{path}", self.base_url()))
            .json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<Response> {
        let mut request = self.client.delete(format!("{}{path}", self.base_url()));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }
}

/// Build a config pointing at the test database; `None` without
/// `DATABASE_URL`.
fn test_config() -> Option<AppConfig> {
    let database_url = std::env::var("DATABASE_URL").ok()?;

    Some(AppConfig {
        app: AppSettings {
            name: "market-server-test".to_string(),
            env: Environment::Development,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: database_url,
            max_connections: 5,
            min_connections: 1,
        },
        jwt: JwtConfig {
            secret: "integration-test-secret-key".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604_800,
        },
        rate_limit: RateLimitConfig {
            // Generous so tests never trip the limiter
            requests_per_second: 1000,
            burst: 1000,
        },
        cors: CorsConfig::default(),
        storage: StorageConfig {
            upload_dir: std::env::temp_dir()
                .join("market-test-uploads")
                .to_string_lossy()
                .into_owned(),
            base_url: "http://localhost:5000".to_string(),
            max_file_size_mb: 10,
        },
        notifier: NotifierConfig::default(),
        id_gen: IdConfig { worker_id: 1 },
    })
}
