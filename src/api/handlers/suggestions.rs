use crate::api::error::ApiResult;
use crate::api::extractor::{Caller, PathParam, Payload};
use crate::app::AppServices;
use crate::domains::suggestion::types::{NewSuggestion, Suggestion, UpdateSuggestion};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

pub async fn create(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    Payload(new): Payload<NewSuggestion>,
) -> ApiResult<(StatusCode, Json<Suggestion>)> {
    let suggestion = app.suggestions.create_suggestion(new, &auth).await?;
    Ok((StatusCode::CREATED, Json(suggestion)))
}

pub async fn list(State(app): State<AppServices>, Caller(auth): Caller) -> ApiResult<Json<Vec<Suggestion>>> {
    Ok(Json(app.suggestions.list_suggestions(&auth).await?))
}

pub async fn list_unprocessed(
    State(app): State<AppServices>,
    Caller(auth): Caller,
) -> ApiResult<Json<Vec<Suggestion>>> {
    Ok(Json(app.suggestions.list_unprocessed(&auth).await?))
}

pub async fn list_by_user(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(user_id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<Suggestion>>> {
    Ok(Json(app.suggestions.list_user_suggestions(user_id, &auth).await?))
}

pub async fn get(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<Suggestion>> {
    Ok(Json(app.suggestions.get_suggestion(id, &auth).await?))
}

/// PATCH /suggestions/:id/process
pub async fn process(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<Suggestion>> {
    Ok(Json(app.suggestions.process_suggestion(id, &auth).await?))
}

pub async fn update(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
    Payload(update): Payload<UpdateSuggestion>,
) -> ApiResult<Json<Suggestion>> {
    Ok(Json(app.suggestions.update_suggestion(id, update, &auth).await?))
}

pub async fn delete(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    app.suggestions.delete_suggestion(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}
