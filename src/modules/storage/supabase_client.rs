//! Supabase Storage backend (REST API over reqwest)

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::core::config::SupabaseConfig;
use crate::core::error::AppError;
use crate::modules::storage::ObjectStorage;

pub struct SupabaseStorageClient {
    client: Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStorageClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(config: &SupabaseConfig, bucket: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
            bucket: bucket.to_string(),
        })
    }

    /// Percent-encode each path segment, keeping the separators
    fn encode_key(key: &str) -> String {
        key.split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            Self::encode_key(key)
        )
    }

    fn public_prefix(&self) -> String {
        format!(
            "{}/storage/v1/object/public/{}/",
            self.base_url, self.bucket
        )
    }

    async fn error_body(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        format!("{} - {}", status, body)
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorageClient {
    fn backend_tag(&self) -> &'static str {
        "supabase"
    }

    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        let response = self
            .client
            .post(self.object_url(key))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to upload '{}': {}", key, e)))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Failed to upload '{}': {}",
                key,
                Self::error_body(response).await
            )));
        }

        debug!("Uploaded '{}' to bucket '{}'", key, self.bucket);
        Ok(())
    }

    fn public_url(&self, key: &str) -> Result<String, AppError> {
        Ok(format!("{}{}", self.public_prefix(), Self::encode_key(key)))
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let response = self
            .client
            .delete(self.object_url(key))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete '{}': {}", key, e)))?;

        match response.status() {
            status if status.is_success() => {
                debug!("Deleted '{}' from bucket '{}'", key, self.bucket);
                Ok(())
            }
            StatusCode::NOT_FOUND => Ok(()),
            _ => Err(AppError::Internal(format!(
                "Failed to delete '{}': {}",
                key,
                Self::error_body(response).await
            ))),
        }
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        let encoded = url.strip_prefix(self.public_prefix().as_str())?;
        urlencoding::decode(encoded).ok().map(|key| key.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SupabaseStorageClient {
        let config = SupabaseConfig {
            url: "https://project.supabase.co/".to_string(),
            service_key: "service-key".to_string(),
        };
        SupabaseStorageClient::new(&config, "cityzen-media").unwrap()
    }

    #[test]
    fn test_public_url_encodes_file_names() {
        let url = client()
            .public_url("complaint_images/abc_1700000000000_my road.jpg")
            .unwrap();
        assert_eq!(
            url,
            "https://project.supabase.co/storage/v1/object/public/cityzen-media/complaint_images/abc_1700000000000_my%20road.jpg"
        );
    }

    #[test]
    fn test_key_from_url_round_trips_public_url() {
        let client = client();
        let key = "complaint_images/abc_1_my road.jpg";
        let url = client.public_url(key).unwrap();

        assert_eq!(client.key_from_url(&url), Some(key.to_string()));
        assert_eq!(client.key_from_url("https://other.host/x.jpg"), None);
    }
}
