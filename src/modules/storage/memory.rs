use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::core::error::AppError;
use crate::modules::storage::ObjectStorage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// In-process object store with optional fault injection.
#[derive(Default)]
pub struct MemoryStorage {
    pub objects: Mutex<BTreeMap<String, StoredObject>>,
    pub upload_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    /// 1-based upload attempt that fails
    pub fail_on_upload: Option<usize>,
}

impl MemoryStorage {
    pub const BASE_URL: &'static str = "memory://cityzen-media/";

    pub fn failing_on_upload(attempt: usize) -> Self {
        Self {
            fail_on_upload: Some(attempt),
            ..Self::default()
        }
    }

    pub async fn keys(&self) -> Vec<String> {
        self.objects.lock().await.keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        let attempt = self.upload_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_upload == Some(attempt) {
            return Err(AppError::Internal(format!(
                "Failed to upload '{}': storage unavailable",
                key
            )));
        }

        let mut objects = self.objects.lock().await;
        if objects.contains_key(key) {
            return Err(AppError::Conflict(format!("Object '{}' already exists", key)));
        }
        objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, key: &str) -> Result<String, AppError> {
        Ok(format!("{}{}", Self::BASE_URL, key))
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.objects.lock().await.remove(key);
        Ok(())
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(Self::BASE_URL).map(str::to_string)
    }
}
