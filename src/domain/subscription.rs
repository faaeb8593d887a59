use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::service_name::ServiceName;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_name: ServiceName,
    pub start_date: NaiveDate,
}

/// A subscription as handed to the storage layer. `user_id` is never rewritten once stored.
#[derive(Debug, Clone)]
pub struct SubscriptionRecord {
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    pub service_name: ServiceName,
    pub start_date: NaiveDate,
}

/// One row of the popularity aggregate: how many subscriptions name a given service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopularService {
    pub service_name: ServiceName,
    pub count: i64,
}
