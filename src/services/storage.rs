//! Binary data store for attachments and thumbnails.
//!
//! Handles S3 deletes for stored blobs. Supports both AWS S3 and MinIO for
//! development.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use secrecy::ExposeSecret;
use tracing::{debug, info};

use crate::config::StorageSettings;
use crate::error::{AppError, AppResult};

/// Removes stored binary blobs.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Delete the blob stored under `key`. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// S3 storage client wrapper.
#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
}

impl Storage {
    /// Create a new S3 storage client from configuration.
    pub async fn new(config: &StorageSettings) -> AppResult<Self> {
        let credentials = Credentials::new(
            &config.access_key,
            config.secret_key.expose_secret(),
            None,
            None,
            "report-portal",
        );

        let region = Region::new(config.region.clone());

        let mut s3_config_builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials)
            .force_path_style(true); // Required for MinIO

        // Use custom endpoint for MinIO in development
        if let Some(ref endpoint) = config.endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(s3_config_builder.build());

        let storage = Self {
            client,
            bucket: config.bucket.clone(),
        };

        storage.verify_bucket().await?;

        info!("S3 storage initialized: bucket={}", config.bucket);

        Ok(storage)
    }

    /// Ensure the bucket is reachable. Attachments are written by the ingestion
    /// service, so a missing bucket is a configuration error here.
    async fn verify_bucket(&self) -> AppResult<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| {
                AppError::Storage(format!(
                    "Failed to access bucket '{}': {}",
                    self.bucket,
                    e.into_service_error()
                ))
            })?;
        Ok(())
    }
}

#[async_trait]
impl DataStore for Storage {
    async fn delete(&self, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AppError::Storage(format!(
                    "Failed to delete '{}' from S3: {}",
                    key,
                    e.into_service_error()
                ))
            })?;

        debug!("Deleted blob {}", key);
        Ok(())
    }
}
