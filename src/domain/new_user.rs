use actix_web::web;
use serde::Deserialize;

use crate::domain::user::UserRecord;
use crate::domain::user_email::UserEmail;
use crate::domain::user_name::UserName;

/// Validated name and email, used both to create and to update a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: UserEmail,
    pub name: UserName,
}

#[derive(Deserialize)]
pub struct NewUserBody {
    pub name: String,
    pub email: String,
}

impl NewUser {
    pub fn into_record(self, id: Option<uuid::Uuid>) -> UserRecord {
        UserRecord {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

impl TryFrom<web::Json<NewUserBody>> for NewUser {
    type Error = String;

    fn try_from(body: web::Json<NewUserBody>) -> Result<Self, Self::Error> {
        let body = body.into_inner();
        let name = UserName::parse(body.name)?;
        let email = UserEmail::parse(body.email)?;

        Ok(NewUser { email, name })
    }
}
