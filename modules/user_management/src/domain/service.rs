use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::contract::model::{NewUser, User};
use crate::domain::error::DomainError;
use crate::domain::store::{Record, RecordStore, StoreError};
use crate::domain::validation::validate_user_fields;

/// Domain service with business rules for user management.
/// Depends only on the store port, not on infra types.
///
/// Writing activity logs is the caller's job; this service never touches them.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn RecordStore<User>>,
}

impl UserService {
    pub fn new(store: Arc<dyn RecordStore<User>>) -> Self {
        Self { store }
    }

    #[instrument(name = "user_management.users.get_all", skip(self))]
    pub async fn get_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.store.get_all().await?)
    }

    #[instrument(name = "user_management.users.filter_by_active", skip(self))]
    pub async fn filter_by_active(&self, is_active: bool) -> Result<Vec<User>, DomainError> {
        let users = self.store.get_all().await?;
        Ok(users
            .into_iter()
            .filter(|u| u.is_active == is_active)
            .collect())
    }

    #[instrument(name = "user_management.users.filter_by_id", skip(self), fields(user_id = id))]
    pub async fn filter_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let users = self.store.get_all().await?;
        Ok(users.into_iter().find(|u| u.id == id))
    }

    #[instrument(
        name = "user_management.users.add_user",
        skip(self, new_user),
        fields(email = %new_user.email)
    )]
    pub async fn add_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Adding user");

        validate_user_fields(&new_user.forename, &new_user.surname, &new_user.email)?;

        let users = self.store.get_all().await?;
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(DomainError::email_already_exists(new_user.email));
        }

        let email = new_user.email.clone();
        let user = self
            .store
            .create(new_user.into_record())
            .await
            .map_err(|e| unique_email_or(e, &email))?;

        info!(user_id = user.id, "User added");
        Ok(user)
    }

    /// Full replace of every mutable field of the user with `user.id`.
    #[instrument(
        name = "user_management.users.update_user",
        skip(self, user),
        fields(user_id = user.id)
    )]
    pub async fn update_user(&self, user: User) -> Result<User, DomainError> {
        info!("Updating user");

        validate_user_fields(&user.forename, &user.surname, &user.email)?;

        let users = self.store.get_all().await?;
        let mut existing = users
            .iter()
            .find(|u| u.id == user.id)
            .cloned()
            .ok_or_else(|| DomainError::user_not_found(user.id))?;

        if users
            .iter()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(DomainError::email_already_exists(user.email));
        }

        existing.forename = user.forename;
        existing.surname = user.surname;
        existing.email = user.email;
        existing.is_active = user.is_active;
        existing.date_of_birth = user.date_of_birth;

        let email = existing.email.clone();
        self.store
            .update(existing.clone())
            .await
            .map_err(|e| match e {
                StoreError::NotFound { id, .. } => DomainError::user_not_found(id),
                other => unique_email_or(other, &email),
            })?;

        info!("User updated");
        Ok(existing)
    }

    #[instrument(name = "user_management.users.delete_user", skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, id: i64) -> Result<bool, DomainError> {
        info!("Deleting user");

        let user = self
            .filter_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        let removed = self.store.delete(&user).await?;
        if !removed {
            debug!("Store reported nothing removed; user vanished concurrently");
        }
        Ok(removed)
    }
}

/// A unique violation on the email key means another writer won the race.
fn unique_email_or(err: StoreError, email: &str) -> DomainError {
    match err {
        StoreError::UniqueViolation { kind, field } if kind == User::KIND && field == "email" => {
            DomainError::email_already_exists(email)
        }
        other => DomainError::Store(other),
    }
}
