use super::entity::{NewUser, ProfileChanges, Role, User};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
    /// Fails with `Conflict` when the email is taken.
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;
    /// Newest first.
    async fn list(&self) -> Result<Vec<User>, DomainError>;
    async fn update_role(&self, id: Uuid, role: Role) -> Result<Option<User>, DomainError>;
    async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> Result<Option<User>, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), DomainError>;
}
