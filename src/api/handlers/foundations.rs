use crate::api::error::ApiResult;
use crate::api::extractor::{Caller, PathParam, Payload};
use crate::app::AppServices;
use crate::domains::foundation::types::{Foundation, NewFoundation, UpdateFoundation};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

pub async fn create(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    Payload(new): Payload<NewFoundation>,
) -> ApiResult<(StatusCode, Json<Foundation>)> {
    let foundation = app.foundations.create_foundation(new, &auth).await?;
    Ok((StatusCode::CREATED, Json(foundation)))
}

pub async fn list(State(app): State<AppServices>) -> ApiResult<Json<Vec<Foundation>>> {
    Ok(Json(app.foundations.list_foundations().await?))
}

pub async fn get(State(app): State<AppServices>, PathParam(id): PathParam<Uuid>) -> ApiResult<Json<Foundation>> {
    Ok(Json(app.foundations.get_foundation(id).await?))
}

/// GET /foundations/user/:user_id
pub async fn get_by_user(State(app): State<AppServices>, PathParam(user_id): PathParam<Uuid>) -> ApiResult<Json<Foundation>> {
    Ok(Json(app.foundations.get_foundation_by_user(user_id).await?))
}

pub async fn update(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
    Payload(update): Payload<UpdateFoundation>,
) -> ApiResult<Json<Foundation>> {
    Ok(Json(app.foundations.update_foundation(id, update, &auth).await?))
}

pub async fn delete(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    app.foundations.delete_foundation(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}
