use actix_web::web;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::service_name::ServiceName;

pub struct NewSubscription {
    pub service_name: ServiceName,
    /// Today's date is used when absent.
    pub start_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscriptionBody {
    pub service_name: String,
    pub start_date: Option<NaiveDate>,
}

impl TryFrom<web::Json<NewSubscriptionBody>> for NewSubscription {
    type Error = String;

    fn try_from(body: web::Json<NewSubscriptionBody>) -> Result<Self, Self::Error> {
        let body = body.into_inner();
        let service_name = ServiceName::parse(body.service_name)?;

        Ok(NewSubscription {
            service_name,
            start_date: body.start_date,
        })
    }
}
