use crate::api::error::{ApiError, ApiResult};
use crate::api::extractor::{Caller, PathParam, Payload, QueryParams};
use crate::app::AppServices;
use crate::domains::participation::types::{
    NewParticipationRequest, ParticipationRequest, UpdateParticipationRequest,
};
use crate::errors::{DomainError, ValidationError};
use crate::types::RequestStatus;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct ApplicationFilter {
    pub status: Option<String>,
}

pub async fn create(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    Payload(new): Payload<NewParticipationRequest>,
) -> ApiResult<(StatusCode, Json<ParticipationRequest>)> {
    let request = app.participation.create_request(new, &auth).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn list(State(app): State<AppServices>, Caller(auth): Caller) -> ApiResult<Json<Vec<ParticipationRequest>>> {
    Ok(Json(app.participation.list_requests(&auth).await?))
}

pub async fn list_by_user(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(user_id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<ParticipationRequest>>> {
    Ok(Json(app.participation.list_user_requests(user_id, &auth).await?))
}

pub async fn list_by_social_action(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(social_action_id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<ParticipationRequest>>> {
    Ok(Json(app.participation.list_social_action_requests(social_action_id, &auth).await?))
}

/// GET /opportunities/:id/applications?status=
pub async fn list_applications(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(social_action_id): PathParam<Uuid>,
    QueryParams(filter): QueryParams<ApplicationFilter>,
) -> ApiResult<Json<Vec<ParticipationRequest>>> {
    let status = match filter.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(RequestStatus::from_str(raw).ok_or_else(|| {
            ApiError::from(DomainError::Validation(ValidationError::invalid_value(
                "status",
                "must be 'pending', 'accepted' or 'rejected'",
            )))
        })?),
    };
    Ok(Json(app.participation.list_applications(social_action_id, status, &auth).await?))
}

/// GET /opportunities/:id/pending-applications, GET /participation-requests/social-action/:id/pending
pub async fn list_pending(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(social_action_id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<ParticipationRequest>>> {
    Ok(Json(app.participation.list_pending(social_action_id, &auth).await?))
}

pub async fn get(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<ParticipationRequest>> {
    Ok(Json(app.participation.get_request(id, &auth).await?))
}

pub async fn update(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
    Payload(update): Payload<UpdateParticipationRequest>,
) -> ApiResult<Json<ParticipationRequest>> {
    Ok(Json(app.participation.update_status(id, update, &auth).await?))
}

pub async fn delete(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    app.participation.delete_request(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}
