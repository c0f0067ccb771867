use crate::api::error::ApiResult;
use crate::api::extractor::{Caller, PathParam, Payload};
use crate::app::AppServices;
use crate::domains::permission::ParentRef;
use crate::domains::rating::types::{NewRating, Rating, UpdateRating};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

pub async fn create(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    Payload(new): Payload<NewRating>,
) -> ApiResult<(StatusCode, Json<Rating>)> {
    let rating = app.ratings.create_rating(new, &auth).await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

pub async fn list(State(app): State<AppServices>) -> ApiResult<Json<Vec<Rating>>> {
    Ok(Json(app.ratings.list_ratings().await?))
}

pub async fn list_by_user(State(app): State<AppServices>, PathParam(user_id): PathParam<Uuid>) -> ApiResult<Json<Vec<Rating>>> {
    Ok(Json(app.ratings.list_user_ratings(user_id).await?))
}

pub async fn list_by_donation(State(app): State<AppServices>, PathParam(id): PathParam<Uuid>) -> ApiResult<Json<Vec<Rating>>> {
    Ok(Json(app.ratings.list_target_ratings(ParentRef::Donation(id)).await?))
}

pub async fn list_by_social_action(
    State(app): State<AppServices>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<Rating>>> {
    Ok(Json(app.ratings.list_target_ratings(ParentRef::SocialAction(id)).await?))
}

/// Bare number, 0 when nobody rated yet
pub async fn donation_average(State(app): State<AppServices>, PathParam(id): PathParam<Uuid>) -> ApiResult<Json<f64>> {
    Ok(Json(app.ratings.average_rating(ParentRef::Donation(id)).await?))
}

pub async fn social_action_average(State(app): State<AppServices>, PathParam(id): PathParam<Uuid>) -> ApiResult<Json<f64>> {
    Ok(Json(app.ratings.average_rating(ParentRef::SocialAction(id)).await?))
}

pub async fn get(State(app): State<AppServices>, PathParam(id): PathParam<Uuid>) -> ApiResult<Json<Rating>> {
    Ok(Json(app.ratings.get_rating(id).await?))
}

pub async fn update(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
    Payload(update): Payload<UpdateRating>,
) -> ApiResult<Json<Rating>> {
    Ok(Json(app.ratings.update_rating(id, update, &auth).await?))
}

pub async fn delete(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    app.ratings.delete_rating(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}
