use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::domain::new_user::{NewUser, NewUserBody};
use crate::managers::UserManager;
use crate::routes::ApiError;

#[tracing::instrument(
    name = "Creating a new user handler",
    skip(body, user_manager),
    fields(
        user_email = %body.email,
        user_name = %body.name
    )
)]
pub async fn handle_create_user(
    body: web::Json<NewUserBody>,
    user_manager: web::Data<UserManager>,
) -> Result<HttpResponse, ApiError> {
    let new_user: NewUser = body.try_into().map_err(|err| {
        tracing::error!("Validation error: {:?}", err);
        ApiError::ValidationError(err)
    })?;
    let user = user_manager.create(new_user).await?;

    Ok(HttpResponse::Created().json(user))
}

#[tracing::instrument(name = "Getting a user handler", skip(user_manager))]
pub async fn handle_get_user(
    path: web::Path<Uuid>,
    user_manager: web::Data<UserManager>,
) -> Result<HttpResponse, ApiError> {
    let user = user_manager.get(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(user))
}

#[tracing::instrument(
    name = "Updating a user handler",
    skip(body, user_manager),
    fields(
        user_email = %body.email,
        user_name = %body.name
    )
)]
pub async fn handle_update_user(
    path: web::Path<Uuid>,
    body: web::Json<NewUserBody>,
    user_manager: web::Data<UserManager>,
) -> Result<HttpResponse, ApiError> {
    let changes: NewUser = body.try_into().map_err(|err| {
        tracing::error!("Validation error: {:?}", err);
        ApiError::ValidationError(err)
    })?;
    let user = user_manager.update(path.into_inner(), changes).await?;

    Ok(HttpResponse::Ok().json(user))
}

#[tracing::instrument(name = "Deleting a user handler", skip(user_manager))]
pub async fn handle_delete_user(
    path: web::Path<Uuid>,
    user_manager: web::Data<UserManager>,
) -> Result<HttpResponse, ApiError> {
    user_manager.delete(path.into_inner()).await?;

    Ok(HttpResponse::Ok().finish())
}
