//! MinIO/S3-compatible storage backend
//!
//! Uses the rust-s3 crate with path-style addressing so it works
//! against MinIO as well as AWS.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use crate::core::config::S3Config;
use crate::core::error::AppError;
use crate::modules::storage::ObjectStorage;

pub struct S3StorageClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
}

impl S3StorageClient {
    pub fn new(config: &S3Config, bucket_name: &str) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create S3 credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(bucket_name, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to open S3 bucket: {}", e)))?;

        // http://endpoint/bucket instead of http://bucket.endpoint
        bucket.set_path_style();

        info!(
            "S3 storage configured for endpoint: {}, bucket: {}",
            config.endpoint, bucket_name
        );

        Ok(Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            public_endpoint: config.public_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Create the bucket if it is missing; existing buckets are left alone
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        let result = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(_) => {
                info!("Bucket '{}' created", self.bucket.name());
                Ok(())
            }
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
                Ok(())
            }
        }
    }

    fn url_prefix(endpoint: &str, bucket: &str) -> String {
        format!("{}/{}/", endpoint, bucket)
    }
}

#[async_trait]
impl ObjectStorage for S3StorageClient {
    fn backend_tag(&self) -> &'static str {
        "s3"
    }

    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        // Refuse to overwrite: complaint image keys are unique by construction
        if let Ok((_, 200..=299)) = self.bucket.head_object(key).await {
            return Err(AppError::Conflict(format!(
                "Object '{}' already exists",
                key
            )));
        }

        let response = self
            .bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to upload '{}': {}", key, e)))?;

        if !(200..300).contains(&response.status_code()) {
            return Err(AppError::Internal(format!(
                "Failed to upload '{}': status {}",
                key,
                response.status_code()
            )));
        }

        debug!("Uploaded '{}' to bucket '{}'", key, self.bucket.name());
        Ok(())
    }

    fn public_url(&self, key: &str) -> Result<String, AppError> {
        Ok(format!(
            "{}{}",
            Self::url_prefix(&self.public_endpoint, &self.bucket.name()),
            key
        ))
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete '{}': {}", key, e)))?;

        if !(200..300).contains(&response.status_code()) {
            return Err(AppError::Internal(format!(
                "Failed to delete '{}': status {}",
                key,
                response.status_code()
            )));
        }

        debug!("Deleted '{}' from bucket '{}'", key, self.bucket.name());
        Ok(())
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        let bucket = self.bucket.name();
        [&self.public_endpoint, &self.endpoint]
            .into_iter()
            .map(|endpoint| Self::url_prefix(endpoint, &bucket))
            .find_map(|prefix| url.strip_prefix(prefix.as_str()).map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> S3StorageClient {
        let config = S3Config {
            endpoint: "http://minio:9000".to_string(),
            public_endpoint: "https://cdn.cityzen.test".to_string(),
            access_key: "key".to_string(),
            secret_key: "secret".to_string(),
            region: "us-east-1".to_string(),
        };
        S3StorageClient::new(&config, "cityzen-media").unwrap()
    }

    #[test]
    fn test_public_url_uses_public_endpoint() {
        let url = client().public_url("complaint_images/a_1_b.jpg").unwrap();
        assert_eq!(
            url,
            "https://cdn.cityzen.test/cityzen-media/complaint_images/a_1_b.jpg"
        );
    }

    #[test]
    fn test_key_from_url_accepts_both_endpoints() {
        let client = client();
        assert_eq!(
            client.key_from_url("https://cdn.cityzen.test/cityzen-media/complaint_images/x.jpg"),
            Some("complaint_images/x.jpg".to_string())
        );
        assert_eq!(
            client.key_from_url("http://minio:9000/cityzen-media/complaint_images/x.jpg"),
            Some("complaint_images/x.jpg".to_string())
        );
        assert_eq!(client.key_from_url("https://elsewhere/x.jpg"), None);
    }
}
