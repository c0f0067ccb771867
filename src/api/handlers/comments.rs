use crate::api::error::ApiResult;
use crate::api::extractor::{Caller, PathParam, Payload};
use crate::app::AppServices;
use crate::domains::comment::types::{Comment, NewComment, UpdateComment};
use crate::domains::permission::ParentRef;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

pub async fn create(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    Payload(new): Payload<NewComment>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = app.comments.create_comment(new, &auth).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// POST /foundation-detail/comment
pub async fn create_on_foundation(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    Payload(new): Payload<NewComment>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = app.comments.create_foundation_comment(new, &auth).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list(State(app): State<AppServices>, Caller(auth): Caller) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(app.comments.list_comments(&auth).await?))
}

pub async fn list_by_user(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(user_id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(app.comments.list_user_comments(user_id, &auth).await?))
}

pub async fn list_by_donation(State(app): State<AppServices>, PathParam(id): PathParam<Uuid>) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(app.comments.list_target_comments(ParentRef::Donation(id)).await?))
}

pub async fn list_by_social_action(
    State(app): State<AppServices>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(app.comments.list_target_comments(ParentRef::SocialAction(id)).await?))
}

pub async fn list_by_foundation(
    State(app): State<AppServices>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(app.comments.list_target_comments(ParentRef::Foundation(id)).await?))
}

pub async fn get(State(app): State<AppServices>, PathParam(id): PathParam<Uuid>) -> ApiResult<Json<Comment>> {
    Ok(Json(app.comments.get_comment(id).await?))
}

pub async fn update(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
    Payload(update): Payload<UpdateComment>,
) -> ApiResult<Json<Comment>> {
    Ok(Json(app.comments.update_comment(id, update, &auth).await?))
}

pub async fn delete(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    app.comments.delete_comment(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}
