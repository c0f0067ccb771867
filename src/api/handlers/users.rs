use crate::api::error::ApiResult;
use crate::api::extractor::{Caller, PathParam, Payload};
use crate::app::AppServices;
use crate::domains::favorite::types::{Favorite, NewFavorite};
use crate::domains::user::types::{UpdateUser, UserResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

pub async fn list(State(app): State<AppServices>, Caller(auth): Caller) -> ApiResult<Json<Vec<UserResponse>>> {
    Ok(Json(app.users.list_users(&auth).await?))
}

pub async fn get(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    Ok(Json(app.users.get_user(id, &auth).await?))
}

pub async fn update(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
    Payload(update): Payload<UpdateUser>,
) -> ApiResult<Json<UserResponse>> {
    Ok(Json(app.users.update_user(id, update, &auth).await?))
}

pub async fn delete(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    app.users.delete_user(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/:id/favorites
pub async fn list_favorites(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(user_id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<Favorite>>> {
    Ok(Json(app.favorites.list_favorites(user_id, &auth).await?))
}

/// POST /users/:id/favorites
pub async fn add_favorite(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(user_id): PathParam<Uuid>,
    Payload(new): Payload<NewFavorite>,
) -> ApiResult<(StatusCode, Json<Favorite>)> {
    let favorite = app.favorites.add_favorite(user_id, new, &auth).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// DELETE /users/:id/favorites/:item_id
pub async fn remove_favorite(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam((user_id, item_id)): PathParam<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    app.favorites.remove_favorite(user_id, item_id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}
