use crate::api::error::ApiResult;
use crate::api::extractor::{Caller, PathParam, Payload};
use crate::app::AppServices;
use crate::domains::donation::types::{Donation, NewDonation, UpdateDonation};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

pub async fn create(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    Payload(new): Payload<NewDonation>,
) -> ApiResult<(StatusCode, Json<Donation>)> {
    let donation = app.donations.create_donation(new, &auth).await?;
    Ok((StatusCode::CREATED, Json(donation)))
}

pub async fn list(State(app): State<AppServices>, Caller(auth): Caller) -> ApiResult<Json<Vec<Donation>>> {
    Ok(Json(app.donations.list_donations(&auth).await?))
}

pub async fn list_by_user(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(user_id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<Donation>>> {
    Ok(Json(app.donations.list_user_donations(user_id, &auth).await?))
}

pub async fn list_by_foundation(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(foundation_id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<Donation>>> {
    Ok(Json(app.donations.list_foundation_donations(foundation_id, &auth).await?))
}

pub async fn get(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<Donation>> {
    Ok(Json(app.donations.get_donation(id, &auth).await?))
}

pub async fn update(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
    Payload(update): Payload<UpdateDonation>,
) -> ApiResult<Json<Donation>> {
    Ok(Json(app.donations.update_donation(id, update, &auth).await?))
}

pub async fn delete(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    app.donations.delete_donation(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}
