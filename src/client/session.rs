use crate::features::complaints::models::ComplaintStatus;
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::UserRole;

/// What a signed-in user sees, chosen once from their role
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleView {
    Citizen(CitizenView),
    Authority(AuthorityView),
    Admin(AdminView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitizenView {
    pub firebase_uid: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityView {
    pub firebase_uid: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminView {
    pub firebase_uid: String,
}

impl RoleView {
    pub fn for_user(user: &UserResponseDto) -> Self {
        let firebase_uid = user.firebase_uid.clone();
        match user.role {
            UserRole::Citizen => Self::Citizen(CitizenView { firebase_uid }),
            UserRole::Authority => Self::Authority(AuthorityView { firebase_uid }),
            UserRole::Admin => Self::Admin(AdminView { firebase_uid }),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Citizen(_) => "My Complaints",
            Self::Authority(_) => "Authority Dashboard",
            Self::Admin(_) => "Admin Dashboard",
        }
    }

    /// Only citizens file complaints
    pub fn can_submit_complaints(&self) -> bool {
        matches!(self, Self::Citizen(_))
    }

    /// Statuses this view may set through `PATCH /api/complaints/{id}/status`
    pub fn assignable_statuses(&self) -> &'static [ComplaintStatus] {
        match self {
            Self::Citizen(_) => &[],
            Self::Authority(_) => &[
                ComplaintStatus::InProgress,
                ComplaintStatus::Resolved,
                ComplaintStatus::Closed,
            ],
            Self::Admin(_) => &ComplaintStatus::ALL,
        }
    }

    /// Listing endpoint backing the view's home screen
    pub fn complaints_path(&self) -> String {
        match self {
            Self::Citizen(view) => format!(
                "/api/complaints/citizen/{}",
                urlencoding::encode(&view.firebase_uid)
            ),
            Self::Authority(_) | Self::Admin(_) => "/api/complaints".to_string(),
        }
    }
}
