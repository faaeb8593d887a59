mod health_check;
mod subscriptions;
mod users;

pub use health_check::*;
pub use subscriptions::*;
pub use users::*;

use actix_web::http::StatusCode;
use actix_web::ResponseError;

use crate::managers::ManagerError;

#[derive(thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    ManagerError(#[from] ManagerError),
}

impl std::fmt::Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::ValidationError(_) => write!(f, "{}", self),
            ApiError::ManagerError(err) => write!(f, "{:?}", err),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::ManagerError(ManagerError::NotFound(_)) => StatusCode::NOT_FOUND,
            // A subscription owned by someone else is reported as if it did not exist
            ApiError::ManagerError(ManagerError::Forbidden(_)) => StatusCode::NOT_FOUND,
            ApiError::ManagerError(ManagerError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::ManagerError(ManagerError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
