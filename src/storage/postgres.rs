use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::service_name::ServiceName;
use crate::domain::subscription::{PopularService, Subscription, SubscriptionRecord};
use crate::domain::user::{User, UserRecord};
use crate::domain::user_email::UserEmail;
use crate::domain::user_name::UserName;
use crate::storage::{Storage, StorageError};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
}

#[derive(sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    user_id: Uuid,
    service_name: String,
    start_date: NaiveDate,
}

#[derive(sqlx::FromRow)]
struct PopularServiceRow {
    service_name: String,
    count: i64,
}

impl TryFrom<UserRow> for User {
    type Error = StorageError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: UserName::parse(row.name).map_err(StorageError::Corrupted)?,
            email: UserEmail::parse(row.email).map_err(StorageError::Corrupted)?,
        })
    }
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = StorageError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            id: row.id,
            user_id: row.user_id,
            service_name: ServiceName::parse(row.service_name).map_err(StorageError::Corrupted)?,
            start_date: row.start_date,
        })
    }
}

impl TryFrom<PopularServiceRow> for PopularService {
    type Error = StorageError;

    fn try_from(row: PopularServiceRow) -> Result<Self, Self::Error> {
        Ok(PopularService {
            service_name: ServiceName::parse(row.service_name).map_err(StorageError::Corrupted)?,
            count: row.count,
        })
    }
}

/// `Storage` backed by the `users` and `subscriptions` postgres tables.
#[derive(Clone)]
pub struct PgStorage {
    db_pool: PgPool,
}

impl PgStorage {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl Storage for PgStorage {
    #[tracing::instrument(name = "Fetch a user by id", skip(self))]
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        sqlx::query_as::<_, UserRow>("SELECT id, name, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    #[tracing::instrument(name = "Fetch a user by email", skip(self, email), fields(user_email = %email))]
    async fn get_user_by_email(&self, email: &UserEmail) -> Result<Option<User>, StorageError> {
        sqlx::query_as::<_, UserRow>("SELECT id, name, email FROM users WHERE email = $1")
            .bind(email.as_ref())
            .fetch_optional(&self.db_pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    #[tracing::instrument(name = "Save a user into the database", skip(self, user))]
    async fn save_user(&self, user: UserRecord) -> Result<User, StorageError> {
        let row = match user.id {
            None => {
                sqlx::query_as::<_, UserRow>(
                    r#"
                    INSERT INTO users (id, name, email)
                    VALUES ($1, $2, $3)
                    RETURNING id, name, email
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(user.name.as_ref())
                .bind(user.email.as_ref())
                .fetch_one(&self.db_pool)
                .await?
            }
            Some(id) => sqlx::query_as::<_, UserRow>(
                r#"
                UPDATE users SET name = $2, email = $3
                WHERE id = $1
                RETURNING id, name, email
                "#,
            )
            .bind(id)
            .bind(user.name.as_ref())
            .bind(user.email.as_ref())
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(StorageError::NotFound)?,
        };

        User::try_from(row)
    }

    #[tracing::instrument(name = "Delete a user from the database", skip(self))]
    async fn delete_user(&self, id: Uuid) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        Ok(())
    }

    #[tracing::instrument(name = "Fetch a subscription by id", skip(self))]
    async fn get_subscription(&self, id: Uuid) -> Result<Option<Subscription>, StorageError> {
        sqlx::query_as::<_, SubscriptionRow>(
            "SELECT id, user_id, service_name, start_date FROM subscriptions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .map(Subscription::try_from)
        .transpose()
    }

    #[tracing::instrument(name = "Fetch the subscriptions of a user", skip(self))]
    async fn find_subscriptions_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Subscription>, StorageError> {
        sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, user_id, service_name, start_date
            FROM subscriptions
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?
        .into_iter()
        .map(Subscription::try_from)
        .collect()
    }

    #[tracing::instrument(name = "Save a subscription into the database", skip(self, subscription))]
    async fn save_subscription(
        &self,
        subscription: SubscriptionRecord,
    ) -> Result<Subscription, StorageError> {
        let row = match subscription.id {
            None => {
                sqlx::query_as::<_, SubscriptionRow>(
                    r#"
                    INSERT INTO subscriptions (id, user_id, service_name, start_date)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, user_id, service_name, start_date
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(subscription.user_id)
                .bind(subscription.service_name.as_ref())
                .bind(subscription.start_date)
                .fetch_one(&self.db_pool)
                .await?
            }
            // user_id is left untouched: the owner never changes
            Some(id) => sqlx::query_as::<_, SubscriptionRow>(
                r#"
                UPDATE subscriptions SET service_name = $2, start_date = $3
                WHERE id = $1
                RETURNING id, user_id, service_name, start_date
                "#,
            )
            .bind(id)
            .bind(subscription.service_name.as_ref())
            .bind(subscription.start_date)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(StorageError::NotFound)?,
        };

        Subscription::try_from(row)
    }

    #[tracing::instrument(name = "Delete a subscription from the database", skip(self))]
    async fn delete_subscription(&self, id: Uuid) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        Ok(())
    }

    #[tracing::instrument(name = "Count subscriptions grouped by service name", skip(self))]
    async fn top_service_names(&self, limit: i64) -> Result<Vec<PopularService>, StorageError> {
        sqlx::query_as::<_, PopularServiceRow>(
            r#"
            SELECT service_name, COUNT(*) AS count
            FROM subscriptions
            GROUP BY service_name
            ORDER BY count DESC, service_name ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db_pool)
        .await?
        .into_iter()
        .map(PopularService::try_from)
        .collect()
    }
}
