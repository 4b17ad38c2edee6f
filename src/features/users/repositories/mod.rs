#[cfg(test)]
mod memory;
mod postgres;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::users::models::{NewUser, User};

#[cfg(test)]
pub use memory::MemoryUserRepository;
pub use postgres::PgUserRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the user row and its role side row atomically.
    ///
    /// A duplicate uid or email yields `AppError::Conflict`.
    async fn create_profile(&self, user: &NewUser) -> Result<User>;

    async fn find_by_uid(&self, firebase_uid: &str) -> Result<Option<User>>;
}
