#[cfg(test)]
mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::complaints::models::{
    Complaint, ComplaintDetails, ComplaintFilter, ComplaintImage, ComplaintStatus, CreateComplaint,
};
use crate::shared::types::PaginationQuery;

#[cfg(test)]
pub use memory::MemoryComplaintRepository;
pub use postgres::PgComplaintRepository;

/// Complaint persistence
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Open a unit of work for creating one complaint with its images
    async fn begin(&self) -> Result<Box<dyn ComplaintTransaction>>;

    /// Newest first; returns the page together with the total match count
    async fn list(
        &self,
        filter: &ComplaintFilter,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ComplaintDetails>, i64)>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ComplaintDetails>>;

    /// `None` notes keep the stored notes. Returns `None` when the complaint does not exist.
    async fn update_status(
        &self,
        id: Uuid,
        status: ComplaintStatus,
        status_notes: Option<&str>,
    ) -> Result<Option<Complaint>>;

    /// Deletes the complaint with its images and assignments. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Writes staged inside one database transaction.
///
/// Dropping without `commit` discards every write.
#[async_trait]
pub trait ComplaintTransaction: Send {
    async fn insert_complaint(&mut self, data: &CreateComplaint) -> Result<Complaint>;

    async fn insert_image(&mut self, complaint_id: Uuid, image_url: &str)
        -> Result<ComplaintImage>;

    async fn assign_authorities(&mut self, complaint_id: Uuid, authority_ids: &[i32])
        -> Result<()>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}
