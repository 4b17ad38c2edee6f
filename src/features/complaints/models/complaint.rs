use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::complaints::models::ComplaintImage;

/// Complaint lifecycle status matching the `complaint_status` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "complaint_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Closed,
    Rejected,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 5] = [
        ComplaintStatus::Pending,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::Closed,
        ComplaintStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Closed => "closed",
            ComplaintStatus::Rejected => "rejected",
        }
    }

    /// "Invalid status" message listing every accepted value
    pub fn invalid_status_message() -> String {
        let allowed: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
        format!("Invalid status. Must be one of: {}", allowed.join(", "))
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(Self::invalid_status_message)
    }
}

/// Database model for complaint
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Complaint {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub citizen_uid: String,
    pub category_id: i32,
    pub current_status: ComplaintStatus,
    pub status_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new complaint (always starts as pending)
#[derive(Debug, Clone)]
pub struct CreateComplaint {
    pub title: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub citizen_uid: String,
    pub category_id: i32,
}

/// Category columns joined onto a complaint
#[derive(Debug, Clone, PartialEq)]
pub struct ComplaintCategory {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// Complaint together with its category, images and assigned authorities
#[derive(Debug, Clone, PartialEq)]
pub struct ComplaintDetails {
    pub complaint: Complaint,
    pub category: Option<ComplaintCategory>,
    pub images: Vec<ComplaintImage>,
    pub authority_ids: Vec<i32>,
}

/// Filters for listing complaints
#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub status: Option<ComplaintStatus>,
    pub category_id: Option<i32>,
    pub citizen_uid: Option<String>,
}

impl ComplaintFilter {
    pub fn matches(&self, complaint: &Complaint) -> bool {
        self.status.is_none_or(|s| complaint.current_status == s)
            && self.category_id.is_none_or(|c| complaint.category_id == c)
            && self
                .citizen_uid
                .as_deref()
                .is_none_or(|uid| complaint.citizen_uid == uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_every_variant() {
        for status in ComplaintStatus::ALL {
            assert_eq!(status.as_str().parse::<ComplaintStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        let err = "archived".parse::<ComplaintStatus>().unwrap_err();
        assert_eq!(
            err,
            "Invalid status. Must be one of: pending, in_progress, resolved, closed, rejected"
        );
        assert!("Pending".parse::<ComplaintStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ComplaintStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }
}
