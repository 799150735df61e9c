//! Media storage collaborator
//!
//! The contract: accept a file, return a durable URL. Only the URL string
//! is ever persisted. The default implementation writes to local disk and
//! serves through the static /uploads route.

use std::path::PathBuf;

use async_trait::async_trait;
use market_common::StorageConfig;
use tracing::instrument;
use uuid::Uuid;

/// Media storage errors
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Media storage contract
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store a file and return its durable public URL
    async fn store(
        &self,
        original_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, MediaError>;
}

/// Local-disk media store
pub struct LocalMediaStore {
    upload_dir: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    /// Create a store from configuration
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            upload_dir: PathBuf::from(&config.upload_dir),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Directory files are written to
    pub fn upload_dir(&self) -> &PathBuf {
        &self.upload_dir
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn store(
        &self,
        original_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, MediaError> {
        if !content_type.starts_with("image/") && !content_type.starts_with("video/") {
            return Err(MediaError::UnsupportedType(content_type.to_string()));
        }

        let extension = std::path::Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.chars().all(char::is_alphanumeric))
            .unwrap_or("bin");

        let filename = format!("{}.{extension}", Uuid::new_v4());

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::write(self.upload_dir.join(&filename), bytes).await?;

        Ok(format!("{}/uploads/{filename}", self.base_url))
    }
}
