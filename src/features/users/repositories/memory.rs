use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::core::error::{AppError, Result};
use crate::features::users::models::{NewUser, RoleProfile, User};
use crate::features::users::repositories::UserRepository;

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<HashMap<String, (User, RoleProfile)>>,
}

impl MemoryUserRepository {
    pub async fn profile_of(&self, firebase_uid: &str) -> Option<RoleProfile> {
        self.users
            .lock()
            .await
            .get(firebase_uid)
            .map(|(_, profile)| profile.clone())
    }

    pub async fn count(&self) -> usize {
        self.users.lock().await.len()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create_profile(&self, new_user: &NewUser) -> Result<User> {
        let mut users = self.users.lock().await;
        let duplicate = users.contains_key(&new_user.firebase_uid)
            || users.values().any(|(u, _)| u.email == new_user.email);
        if duplicate {
            return Err(AppError::Conflict(
                "A profile with this Firebase UID or email already exists.".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            firebase_uid: new_user.firebase_uid.clone(),
            email: new_user.email.clone(),
            full_name: new_user.full_name.clone(),
            role: new_user.profile.role(),
            created_at: now,
            updated_at: now,
        };
        users.insert(
            user.firebase_uid.clone(),
            (user.clone(), new_user.profile.clone()),
        );
        Ok(user)
    }

    async fn find_by_uid(&self, firebase_uid: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .get(firebase_uid)
            .map(|(user, _)| user.clone()))
    }
}
