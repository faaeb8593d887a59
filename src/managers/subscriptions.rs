use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::new_subscription::NewSubscription;
use crate::domain::subscription::{PopularService, Subscription, SubscriptionRecord};
use crate::managers::ManagerError;
use crate::storage::Storage;

/// How many services the popularity ranking returns.
pub const TOP_SUBSCRIPTIONS_LIMIT: i64 = 3;

pub struct SubscriptionManager {
    storage: Arc<dyn Storage>,
}

impl SubscriptionManager {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    #[tracing::instrument(
        name = "Adding a subscription",
        skip(self, new_subscription),
        fields(service_name = %new_subscription.service_name.as_ref())
    )]
    pub async fn add(
        &self,
        user_id: Uuid,
        new_subscription: NewSubscription,
    ) -> Result<Subscription, ManagerError> {
        self.ensure_user_exists(user_id).await?;

        let record = SubscriptionRecord {
            id: None,
            user_id,
            service_name: new_subscription.service_name,
            start_date: new_subscription
                .start_date
                .unwrap_or_else(|| Utc::now().date_naive()),
        };
        let subscription = self.storage.save_subscription(record).await?;

        tracing::info!("Subscription added with id {}", subscription.id);

        Ok(subscription)
    }

    #[tracing::instrument(name = "Listing the subscriptions of a user", skip(self))]
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Subscription>, ManagerError> {
        self.ensure_user_exists(user_id).await?;

        let subscriptions = self.storage.find_subscriptions_by_user(user_id).await?;

        tracing::info!("Found {} subscriptions", subscriptions.len());

        Ok(subscriptions)
    }

    #[tracing::instrument(name = "Deleting a subscription", skip(self))]
    pub async fn delete(&self, user_id: Uuid, subscription_id: Uuid) -> Result<(), ManagerError> {
        let subscription = self
            .storage
            .get_subscription(subscription_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Subscription with id {} not found", subscription_id);
                ManagerError::NotFound(format!("Subscription with id {}", subscription_id))
            })?;

        if subscription.user_id != user_id {
            tracing::warn!(
                "Subscription with id {} belongs to user {}",
                subscription_id,
                subscription.user_id
            );
            return Err(ManagerError::Forbidden(format!(
                "Subscription with id {} does not belong to user with id {}",
                subscription_id, user_id
            )));
        }

        self.storage.delete_subscription(subscription_id).await?;

        Ok(())
    }

    #[tracing::instrument(name = "Ranking the most popular services", skip(self))]
    pub async fn top_popular(&self) -> Result<Vec<PopularService>, ManagerError> {
        let popular = self
            .storage
            .top_service_names(TOP_SUBSCRIPTIONS_LIMIT)
            .await?;

        for entry in &popular {
            tracing::debug!("{} has {} subscriptions", entry.service_name.as_ref(), entry.count);
        }

        Ok(popular)
    }

    async fn ensure_user_exists(&self, user_id: Uuid) -> Result<(), ManagerError> {
        match self.storage.get_user(user_id).await? {
            Some(_) => Ok(()),
            None => {
                tracing::warn!("User with id {} not found", user_id);
                Err(ManagerError::NotFound(format!("User with id {}", user_id)))
            }
        }
    }
}
