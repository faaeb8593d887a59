use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::service_name::ServiceName;
use crate::domain::subscription::{PopularService, Subscription, SubscriptionRecord};
use crate::domain::user::{User, UserRecord};
use crate::domain::user_email::UserEmail;
use crate::storage::{Storage, StorageError};

/// Process-local `Storage`. Every operation runs under a single lock, which gives the same
/// per-row atomicity as the database and no more.
#[derive(Default)]
pub struct InMemoryStorage {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    subscriptions: Vec<Subscription>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        let tables = self.tables.lock().await;

        Ok(tables.users.iter().find(|user| user.id == id).cloned())
    }

    async fn get_user_by_email(&self, email: &UserEmail) -> Result<Option<User>, StorageError> {
        let tables = self.tables.lock().await;

        Ok(tables
            .users
            .iter()
            .find(|user| &user.email == email)
            .cloned())
    }

    async fn save_user(&self, user: UserRecord) -> Result<User, StorageError> {
        let mut tables = self.tables.lock().await;
        let position = match user.id {
            Some(id) => Some(
                tables
                    .users
                    .iter()
                    .position(|stored| stored.id == id)
                    .ok_or(StorageError::NotFound)?,
            ),
            None => None,
        };
        let id = user.id.unwrap_or_else(Uuid::new_v4);

        // Mirrors the UNIQUE constraint on users.email
        if tables
            .users
            .iter()
            .any(|stored| stored.email == user.email && stored.id != id)
        {
            return Err(StorageError::UniqueViolation);
        }

        let saved = User {
            id,
            name: user.name,
            email: user.email,
        };

        match position {
            Some(index) => tables.users[index] = saved.clone(),
            None => tables.users.push(saved.clone()),
        }

        Ok(saved)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StorageError> {
        let mut tables = self.tables.lock().await;

        tables.users.retain(|user| user.id != id);

        Ok(())
    }

    async fn get_subscription(&self, id: Uuid) -> Result<Option<Subscription>, StorageError> {
        let tables = self.tables.lock().await;

        Ok(tables
            .subscriptions
            .iter()
            .find(|subscription| subscription.id == id)
            .cloned())
    }

    async fn find_subscriptions_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Subscription>, StorageError> {
        let tables = self.tables.lock().await;

        Ok(tables
            .subscriptions
            .iter()
            .filter(|subscription| subscription.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn save_subscription(
        &self,
        subscription: SubscriptionRecord,
    ) -> Result<Subscription, StorageError> {
        let mut tables = self.tables.lock().await;
        match subscription.id {
            Some(id) => {
                let stored = tables
                    .subscriptions
                    .iter_mut()
                    .find(|stored| stored.id == id)
                    .ok_or(StorageError::NotFound)?;
                stored.service_name = subscription.service_name;
                stored.start_date = subscription.start_date;

                Ok(stored.clone())
            }
            None => {
                let saved = Subscription {
                    id: Uuid::new_v4(),
                    user_id: subscription.user_id,
                    service_name: subscription.service_name,
                    start_date: subscription.start_date,
                };

                tables.subscriptions.push(saved.clone());

                Ok(saved)
            }
        }
    }

    async fn delete_subscription(&self, id: Uuid) -> Result<(), StorageError> {
        let mut tables = self.tables.lock().await;

        tables
            .subscriptions
            .retain(|subscription| subscription.id != id);

        Ok(())
    }

    async fn top_service_names(&self, limit: i64) -> Result<Vec<PopularService>, StorageError> {
        let tables = self.tables.lock().await;
        let mut counts: HashMap<&ServiceName, i64> = HashMap::new();

        for subscription in &tables.subscriptions {
            *counts.entry(&subscription.service_name).or_insert(0) += 1;
        }

        let mut popular: Vec<PopularService> = counts
            .into_iter()
            .map(|(service_name, count)| PopularService {
                service_name: service_name.clone(),
                count,
            })
            .collect();

        popular.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.service_name.as_ref().cmp(b.service_name.as_ref()))
        });
        popular.truncate(usize::try_from(limit).unwrap_or(0));

        Ok(popular)
    }
}
