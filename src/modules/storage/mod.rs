//! Object storage for complaint photos
//!
//! `ObjectStorage` is implemented by the Supabase Storage REST client and
//! by an S3/MinIO client; the backend is chosen by `STORAGE_BACKEND`.

#[cfg(test)]
mod memory;
mod object_storage;
mod s3_client;
mod supabase_client;

use std::sync::Arc;

use crate::core::config::{StorageBackend, StorageConfig};
use crate::core::error::AppError;

#[cfg(test)]
pub use memory::MemoryStorage;
pub use object_storage::ObjectStorage;
pub use s3_client::S3StorageClient;
pub use supabase_client::SupabaseStorageClient;

/// Build the configured storage backend
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn ObjectStorage>, AppError> {
    match config.backend {
        StorageBackend::Supabase => {
            let supabase = config.supabase.as_ref().ok_or_else(|| {
                AppError::Internal("Supabase storage selected but not configured".to_string())
            })?;
            Ok(Arc::new(SupabaseStorageClient::new(
                supabase,
                &config.bucket,
            )?))
        }
        StorageBackend::S3 => {
            let client = S3StorageClient::new(&config.s3, &config.bucket)?;
            client.ensure_bucket_exists().await?;
            Ok(Arc::new(client))
        }
    }
}
