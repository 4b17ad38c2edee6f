use async_trait::async_trait;

use crate::core::error::AppError;

/// Object store that holds complaint photos.
///
/// Keys are bucket-relative paths such as `complaint_images/<id>_<millis>_<name>`.
/// Uploads never overwrite an existing object.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Short name used in logs ("supabase", "s3", "memory")
    fn backend_tag(&self) -> &'static str;

    /// Store `data` under `key` with the given content type.
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    /// Public URL for a stored object.
    fn public_url(&self, key: &str) -> Result<String, AppError>;

    /// Remove an object.
    async fn delete(&self, key: &str) -> Result<(), AppError>;

    /// Recover the object key from a URL previously returned by `public_url`.
    fn key_from_url(&self, url: &str) -> Option<String>;
}
