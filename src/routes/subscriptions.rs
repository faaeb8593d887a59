use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::new_subscription::{NewSubscription, NewSubscriptionBody};
use crate::domain::subscription::PopularService;
use crate::managers::SubscriptionManager;
use crate::routes::ApiError;

/// Entry of `GET /subscriptions/top`. It has the shape of a subscription but only carries the
/// service name; the other fields are always null.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSubscription {
    pub id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub service_name: String,
    pub start_date: Option<NaiveDate>,
}

impl From<PopularService> for TopSubscription {
    fn from(popular: PopularService) -> Self {
        TopSubscription {
            id: None,
            user_id: None,
            service_name: popular.service_name.as_ref().to_owned(),
            start_date: None,
        }
    }
}

#[tracing::instrument(
    name = "Adding a subscription handler",
    skip(body, subscription_manager),
    fields(service_name = %body.service_name)
)]
pub async fn handle_add_subscription(
    path: web::Path<Uuid>,
    body: web::Json<NewSubscriptionBody>,
    subscription_manager: web::Data<SubscriptionManager>,
) -> Result<HttpResponse, ApiError> {
    let new_subscription: NewSubscription = body.try_into().map_err(|err| {
        tracing::error!("Validation error: {:?}", err);
        ApiError::ValidationError(err)
    })?;
    let subscription = subscription_manager
        .add(path.into_inner(), new_subscription)
        .await?;

    Ok(HttpResponse::Created().json(subscription))
}

#[tracing::instrument(name = "Listing subscriptions handler", skip(subscription_manager))]
pub async fn handle_list_subscriptions(
    path: web::Path<Uuid>,
    subscription_manager: web::Data<SubscriptionManager>,
) -> Result<HttpResponse, ApiError> {
    let subscriptions = subscription_manager.list_for_user(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(subscriptions))
}

#[tracing::instrument(name = "Deleting a subscription handler", skip(subscription_manager))]
pub async fn handle_delete_subscription(
    path: web::Path<(Uuid, Uuid)>,
    subscription_manager: web::Data<SubscriptionManager>,
) -> Result<HttpResponse, ApiError> {
    let (user_id, subscription_id) = path.into_inner();

    subscription_manager.delete(user_id, subscription_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument(name = "Top subscriptions handler", skip(subscription_manager))]
pub async fn handle_top_subscriptions(
    subscription_manager: web::Data<SubscriptionManager>,
) -> Result<HttpResponse, ApiError> {
    let top: Vec<TopSubscription> = subscription_manager
        .top_popular()
        .await?
        .into_iter()
        .map(TopSubscription::from)
        .collect();

    Ok(HttpResponse::Ok().json(top))
}
