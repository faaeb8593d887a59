pub mod subscriptions;
pub mod users;

pub use subscriptions::SubscriptionManager;
pub use users::UserManager;

use crate::storage::StorageError;

#[derive(thiserror::Error)]
pub enum ManagerError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Failed to access the storage.")]
    Storage(#[source] StorageError),
}

impl std::fmt::Debug for ManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManagerError::Storage(err) => write!(f, "{}\nCaused by:\n\t({:?})", self, err),
            _ => write!(f, "{}", self),
        }
    }
}

impl From<StorageError> for ManagerError {
    fn from(err: StorageError) -> Self {
        match err {
            // Lost a race against a concurrent write of the same email
            StorageError::UniqueViolation => {
                ManagerError::Conflict(String::from("Email is already used by another user"))
            }
            StorageError::NotFound => ManagerError::NotFound(String::from("Record")),
            err => ManagerError::Storage(err),
        }
    }
}
