use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::complaints::models::{
    Complaint, ComplaintCategory, ComplaintDetails, ComplaintFilter, ComplaintImage,
    ComplaintStatus, CreateComplaint,
};
use crate::features::complaints::repositories::{ComplaintRepository, ComplaintTransaction};
use crate::shared::types::PaginationQuery;

#[derive(Default)]
struct State {
    complaints: Vec<Complaint>,
    images: Vec<ComplaintImage>,
    assignments: Vec<(Uuid, i32)>,
}

/// Complaint store backed by a mutex, with transactions that only apply on commit
#[derive(Clone)]
pub struct MemoryComplaintRepository {
    state: Arc<Mutex<State>>,
    categories: Arc<HashMap<i32, ComplaintCategory>>,
}

impl Default for MemoryComplaintRepository {
    fn default() -> Self {
        let categories = [
            (1, "Roads & Transport"),
            (2, "Garbage & Waste Management"),
            (3, "Streetlights & Electrical"),
            (4, "Water Supply & Drains"),
            (5, "Buildings & Infrastructure"),
            (6, "Environment & Public Spaces"),
        ]
        .into_iter()
        .map(|(id, name)| {
            (
                id,
                ComplaintCategory {
                    id,
                    name: name.to_string(),
                    description: None,
                },
            )
        })
        .collect();

        Self {
            state: Arc::new(Mutex::new(State::default())),
            categories: Arc::new(categories),
        }
    }
}

impl MemoryComplaintRepository {
    /// Insert a committed complaint directly, bypassing the transaction
    pub async fn seed(&self, data: CreateComplaint, created_at: DateTime<Utc>) -> Complaint {
        let complaint = new_complaint(&data, created_at);
        self.state.lock().await.complaints.push(complaint.clone());
        complaint
    }

    pub async fn complaint_count(&self) -> usize {
        self.state.lock().await.complaints.len()
    }

    pub async fn image_count(&self) -> usize {
        self.state.lock().await.images.len()
    }

    pub async fn assignment_count(&self) -> usize {
        self.state.lock().await.assignments.len()
    }

    fn details(&self, state: &State, complaint: &Complaint) -> ComplaintDetails {
        ComplaintDetails {
            complaint: complaint.clone(),
            category: self.categories.get(&complaint.category_id).cloned(),
            images: state
                .images
                .iter()
                .filter(|i| i.complaint_id == complaint.id)
                .cloned()
                .collect(),
            authority_ids: state
                .assignments
                .iter()
                .filter(|(c, _)| *c == complaint.id)
                .map(|(_, a)| *a)
                .collect(),
        }
    }
}

fn new_complaint(data: &CreateComplaint, created_at: DateTime<Utc>) -> Complaint {
    Complaint {
        id: Uuid::now_v7(),
        title: data.title.clone(),
        description: data.description.clone(),
        latitude: data.latitude,
        longitude: data.longitude,
        citizen_uid: data.citizen_uid.clone(),
        category_id: data.category_id,
        current_status: ComplaintStatus::Pending,
        status_notes: None,
        created_at,
        updated_at: created_at,
    }
}

#[async_trait]
impl ComplaintRepository for MemoryComplaintRepository {
    async fn begin(&self) -> Result<Box<dyn ComplaintTransaction>> {
        Ok(Box::new(MemoryComplaintTransaction {
            state: self.state.clone(),
            staged: State::default(),
        }))
    }

    async fn list(
        &self,
        filter: &ComplaintFilter,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ComplaintDetails>, i64)> {
        let state = self.state.lock().await;
        let mut matching: Vec<&Complaint> =
            state.complaints.iter().filter(|c| filter.matches(c)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(pagination.limit() as usize)
            .map(|c| self.details(&state, c))
            .collect();

        Ok((page, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ComplaintDetails>> {
        let state = self.state.lock().await;
        Ok(state
            .complaints
            .iter()
            .find(|c| c.id == id)
            .map(|c| self.details(&state, c)))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ComplaintStatus,
        status_notes: Option<&str>,
    ) -> Result<Option<Complaint>> {
        let mut state = self.state.lock().await;
        Ok(state.complaints.iter_mut().find(|c| c.id == id).map(|c| {
            c.current_status = status;
            if let Some(notes) = status_notes {
                c.status_notes = Some(notes.to_string());
            }
            c.updated_at = Utc::now();
            c.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().await;
        let before = state.complaints.len();
        state.complaints.retain(|c| c.id != id);
        state.images.retain(|i| i.complaint_id != id);
        state.assignments.retain(|(c, _)| *c != id);
        Ok(state.complaints.len() < before)
    }
}

pub struct MemoryComplaintTransaction {
    state: Arc<Mutex<State>>,
    staged: State,
}

#[async_trait]
impl ComplaintTransaction for MemoryComplaintTransaction {
    async fn insert_complaint(&mut self, data: &CreateComplaint) -> Result<Complaint> {
        let complaint = new_complaint(data, Utc::now());
        self.staged.complaints.push(complaint.clone());
        Ok(complaint)
    }

    async fn insert_image(
        &mut self,
        complaint_id: Uuid,
        image_url: &str,
    ) -> Result<ComplaintImage> {
        let image = ComplaintImage {
            id: Uuid::now_v7(),
            complaint_id,
            image_url: image_url.to_string(),
            processed_image_url: None,
            created_at: Utc::now(),
        };
        self.staged.images.push(image.clone());
        Ok(image)
    }

    async fn assign_authorities(
        &mut self,
        complaint_id: Uuid,
        authority_ids: &[i32],
    ) -> Result<()> {
        for id in authority_ids {
            if !self.staged.assignments.contains(&(complaint_id, *id)) {
                self.staged.assignments.push((complaint_id, *id));
            }
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let staged = self.staged;
        let mut state = self.state.lock().await;
        state.complaints.extend(staged.complaints);
        state.images.extend(staged.images);
        state.assignments.extend(staged.assignments);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
