//! Persistence port used by the managers.
//!
//! Managers receive an `Arc<dyn Storage>` at construction time; `PgStorage` backs the running
//! service and `InMemoryStorage` gives the same semantics without a database.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::subscription::{PopularService, Subscription, SubscriptionRecord};
use crate::domain::user::{User, UserRecord};
use crate::domain::user_email::UserEmail;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStorage;
pub use postgres::PgStorage;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError>;

    async fn get_user_by_email(&self, email: &UserEmail) -> Result<Option<User>, StorageError>;

    /// Inserts the user when it has no id (assigning one), otherwise overwrites the stored row.
    /// Fails with `StorageError::NotFound` when no row has that id.
    async fn save_user(&self, user: UserRecord) -> Result<User, StorageError>;

    /// Deleting an absent user is a no-op.
    async fn delete_user(&self, id: Uuid) -> Result<(), StorageError>;

    async fn get_subscription(&self, id: Uuid) -> Result<Option<Subscription>, StorageError>;

    /// Subscriptions owned by `user_id`, in insertion order.
    async fn find_subscriptions_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Subscription>, StorageError>;

    /// Inserts the subscription when it has no id (assigning one), otherwise overwrites its
    /// service name and start date, failing with `StorageError::NotFound` when no row has that
    /// id. The owner of a stored subscription is never changed.
    async fn save_subscription(
        &self,
        subscription: SubscriptionRecord,
    ) -> Result<Subscription, StorageError>;

    /// Deleting an absent subscription is a no-op.
    async fn delete_subscription(&self, id: Uuid) -> Result<(), StorageError>;

    /// Service names grouped by number of subscriptions, largest groups first and ties
    /// ordered by service name, truncated to `limit` entries.
    async fn top_service_names(&self, limit: i64) -> Result<Vec<PopularService>, StorageError>;
}

#[derive(thiserror::Error)]
pub enum StorageError {
    #[error("A stored row already uses this unique value.")]
    UniqueViolation,
    #[error("No stored row has this id.")]
    NotFound,
    #[error("Failed to execute a database query.")]
    Database(#[source] sqlx::Error),
    #[error("Stored row is not valid: {0}")]
    Corrupted(String),
}

impl std::fmt::Debug for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Database(err) => write!(f, "{}\nCaused by:\n\t({})", self, err),
            _ => write!(f, "{}", self),
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        // 23505 is postgres' unique_violation
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                return StorageError::UniqueViolation;
            }
        }

        StorageError::Database(err)
    }
}
