use crate::api::error::ApiResult;
use crate::api::extractor::{Caller, PathParam, Payload};
use crate::app::AppServices;
use crate::domains::participation::types::ParticipationRequest;
use crate::domains::social_action::types::{
    ApplyToSocialAction, NewSocialAction, SocialAction, UpdateSocialAction,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

pub async fn create(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    Payload(new): Payload<NewSocialAction>,
) -> ApiResult<(StatusCode, Json<SocialAction>)> {
    let action = app.social_actions.create_social_action(new, &auth).await?;
    Ok((StatusCode::CREATED, Json(action)))
}

pub async fn list(State(app): State<AppServices>) -> ApiResult<Json<Vec<SocialAction>>> {
    Ok(Json(app.social_actions.list_social_actions().await?))
}

pub async fn list_upcoming(State(app): State<AppServices>) -> ApiResult<Json<Vec<SocialAction>>> {
    Ok(Json(app.social_actions.list_upcoming().await?))
}

pub async fn list_active(State(app): State<AppServices>) -> ApiResult<Json<Vec<SocialAction>>> {
    Ok(Json(app.social_actions.list_active().await?))
}

pub async fn list_by_foundation(
    State(app): State<AppServices>,
    PathParam(foundation_id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<SocialAction>>> {
    Ok(Json(app.social_actions.list_by_foundation(foundation_id).await?))
}

pub async fn get(State(app): State<AppServices>, PathParam(id): PathParam<Uuid>) -> ApiResult<Json<SocialAction>> {
    Ok(Json(app.social_actions.get_social_action(id).await?))
}

pub async fn update(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
    Payload(update): Payload<UpdateSocialAction>,
) -> ApiResult<Json<SocialAction>> {
    Ok(Json(app.social_actions.update_social_action(id, update, &auth).await?))
}

pub async fn delete(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    app.social_actions.delete_social_action(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /social-actions/:id/apply
pub async fn apply(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
    Payload(application): Payload<ApplyToSocialAction>,
) -> ApiResult<(StatusCode, Json<ParticipationRequest>)> {
    let request = app.social_actions.apply(id, application, &auth).await?;
    Ok((StatusCode::CREATED, Json(request)))
}
