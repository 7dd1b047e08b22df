use super::dto::{SignupRequest, UpdateProfileRequest};
use crate::domain::{
    shared::errors::DomainError,
    user::{
        entity::{NewUser, ProfileChanges, Role, User, normalize_email},
        repository::UserRepository,
    },
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Account lifecycle: signup, credential checks, profile and role changes.
pub struct AccountsUseCase {
    users: Arc<dyn UserRepository>,
    hash_cost: u32,
}

impl AccountsUseCase {
    pub fn new(users: Arc<dyn UserRepository>, hash_cost: u32) -> Self {
        Self { users, hash_cost }
    }

    fn hash(&self, password: &str) -> Result<String, DomainError> {
        bcrypt::hash(password, self.hash_cost).map_err(DomainError::infrastructure)
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<User, DomainError> {
        let request = SignupRequest {
            name: request.name.trim().to_string(),
            email: normalize_email(&request.email),
            password: request.password,
        };
        request.validate()?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(DomainError::Conflict("User with this email already exists".into()));
        }

        let user = self
            .users
            .create(&NewUser {
                email: request.email,
                password_hash: self.hash(&request.password)?,
                role: Role::Analyst,
                name: request.name,
            })
            .await?;
        tracing::info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Verifies credentials and stamps `last_login`. Unknown email and wrong
    /// password are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str, now: DateTime<Utc>) -> Result<User, DomainError> {
        let mut user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let valid = bcrypt::verify(password, &user.password_hash).unwrap_or(false);
        if !valid {
            tracing::warn!(user_id = %user.id, "Rejected login with wrong password");
            return Err(DomainError::Unauthorized);
        }

        self.users.touch_last_login(user.id, now).await?;
        user.last_login = Some(now);
        Ok(user)
    }

    pub async fn update_profile(&self, user_id: Uuid, request: UpdateProfileRequest) -> Result<User, DomainError> {
        let mut changes = ProfileChanges {
            name: request
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            password_hash: None,
        };

        if let Some(new_password) = request.new_password.filter(|p| !p.is_empty()) {
            let user = self
                .users
                .find_by_id(user_id)
                .await?
                .ok_or_else(|| DomainError::NotFound("user".into()))?;
            let current = request.current_password.unwrap_or_default();
            if !bcrypt::verify(&current, &user.password_hash).unwrap_or(false) {
                return Err(DomainError::Unauthorized);
            }
            if new_password.len() < 4 {
                return Err(DomainError::ValidationError(
                    "Password must be at least 4 characters".into(),
                ));
            }
            changes.password_hash = Some(self.hash(&new_password)?);
        }

        if changes.is_empty() {
            return Err(DomainError::ValidationError("Nothing to update".into()));
        }

        self.users
            .update_profile(user_id, &changes)
            .await?
            .ok_or_else(|| DomainError::NotFound("user".into()))
    }

    pub async fn change_role(&self, user_id: Uuid, role: Role) -> Result<User, DomainError> {
        self.users
            .update_role(user_id, role)
            .await?
            .ok_or_else(|| DomainError::NotFound("user".into()))
    }

    pub async fn delete(&self, acting_user: Uuid, target: Uuid) -> Result<(), DomainError> {
        if acting_user == target {
            return Err(DomainError::ValidationError("Cannot delete your own account".into()));
        }
        if !self.users.delete(target).await? {
            return Err(DomainError::NotFound("user".into()));
        }
        Ok(())
    }
}
