use crate::api::error::ApiResult;
use crate::api::extractor::{Caller, PathParam, Payload};
use crate::app::AppServices;
use crate::domains::notification::types::{NewNotification, Notification, UpdateNotification};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: u64,
}

pub async fn create(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    Payload(new): Payload<NewNotification>,
) -> ApiResult<(StatusCode, Json<Notification>)> {
    let notification = app.notifications.create_notification(new, &auth).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

/// GET /notifications: the caller's inbox
pub async fn list_mine(State(app): State<AppServices>, Caller(auth): Caller) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(app.notifications.list_my_notifications(false, &auth).await?))
}

pub async fn list_mine_unread(
    State(app): State<AppServices>,
    Caller(auth): Caller,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(app.notifications.list_my_notifications(true, &auth).await?))
}

pub async fn mark_mine_read(State(app): State<AppServices>, Caller(auth): Caller) -> ApiResult<Json<MarkedRead>> {
    let updated = app.notifications.mark_all_my_notifications_read(&auth).await?;
    Ok(Json(MarkedRead { updated }))
}

/// GET /notifications/all: every account's notifications
pub async fn list_all(State(app): State<AppServices>, Caller(auth): Caller) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(app.notifications.list_notifications(&auth).await?))
}

pub async fn list_by_user(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(user_id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(app.notifications.list_user_notifications(user_id, false, &auth).await?))
}

pub async fn list_unread_by_user(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(user_id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(app.notifications.list_user_notifications(user_id, true, &auth).await?))
}

pub async fn mark_user_read(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(user_id): PathParam<Uuid>,
) -> ApiResult<Json<MarkedRead>> {
    let updated = app.notifications.mark_all_user_notifications_read(user_id, &auth).await?;
    Ok(Json(MarkedRead { updated }))
}

pub async fn get(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<Notification>> {
    Ok(Json(app.notifications.get_notification(id, &auth).await?))
}

/// PATCH /notifications/:id/read
pub async fn mark_read(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<Notification>> {
    Ok(Json(app.notifications.mark_notification_read(id, &auth).await?))
}

pub async fn update(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
    Payload(update): Payload<UpdateNotification>,
) -> ApiResult<Json<Notification>> {
    Ok(Json(app.notifications.update_notification(id, update, &auth).await?))
}

pub async fn delete(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    app.notifications.delete_notification(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}
