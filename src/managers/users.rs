use std::sync::Arc;

use uuid::Uuid;

use crate::domain::new_user::NewUser;
use crate::domain::user::User;
use crate::managers::ManagerError;
use crate::storage::{Storage, StorageError};

pub struct UserManager {
    storage: Arc<dyn Storage>,
}

impl UserManager {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    #[tracing::instrument(
        name = "Creating a new user",
        skip(self, new_user),
        fields(
            user_email = %new_user.email,
            user_name = %new_user.name.as_ref()
        )
    )]
    pub async fn create(&self, new_user: NewUser) -> Result<User, ManagerError> {
        if self
            .storage
            .get_user_by_email(&new_user.email)
            .await?
            .is_some()
        {
            tracing::warn!("Email {} is already used", new_user.email);
            return Err(email_conflict(&new_user));
        }

        let user = self.storage.save_user(new_user.into_record(None)).await?;

        tracing::info!("User created with id {}", user.id);

        Ok(user)
    }

    #[tracing::instrument(name = "Getting a user", skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<User, ManagerError> {
        self.storage
            .get_user(id)
            .await?
            .ok_or_else(|| user_not_found(id))
    }

    #[tracing::instrument(
        name = "Updating a user",
        skip(self, changes),
        fields(
            user_email = %changes.email,
            user_name = %changes.name.as_ref()
        )
    )]
    pub async fn update(&self, id: Uuid, changes: NewUser) -> Result<User, ManagerError> {
        if self.storage.get_user(id).await?.is_none() {
            return Err(user_not_found(id));
        }

        if let Some(owner) = self.storage.get_user_by_email(&changes.email).await? {
            if owner.id != id {
                tracing::warn!("Email {} belongs to user {}", changes.email, owner.id);
                return Err(email_conflict(&changes));
            }
        }

        // The user may have been deleted since the lookup above
        let user = self
            .storage
            .save_user(changes.into_record(Some(id)))
            .await
            .map_err(|err| match err {
                StorageError::NotFound => user_not_found(id),
                err => err.into(),
            })?;

        Ok(user)
    }

    /// Removes the user if present. Its subscriptions are left in place.
    #[tracing::instrument(name = "Deleting a user", skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ManagerError> {
        self.storage.delete_user(id).await?;

        Ok(())
    }
}

fn user_not_found(id: Uuid) -> ManagerError {
    tracing::warn!("User with id {} not found", id);
    ManagerError::NotFound(format!("User with id {}", id))
}

fn email_conflict(user: &NewUser) -> ManagerError {
    ManagerError::Conflict(format!(
        "Email {} is already used by another user",
        user.email
    ))
}
