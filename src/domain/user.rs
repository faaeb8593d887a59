use uuid::Uuid;

use crate::domain::user_email::UserEmail;
use crate::domain::user_name::UserName;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: UserName,
    pub email: UserEmail,
}

/// A user as handed to the storage layer. `id` is `None` until the store assigns one.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Option<Uuid>,
    pub name: UserName,
    pub email: UserEmail,
}
