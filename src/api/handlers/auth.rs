use crate::api::error::ApiResult;
use crate::api::extractor::Payload;
use crate::app::AppServices;
use crate::auth::LoginResult;
use crate::domains::user::types::{Credentials, NewUser, UserResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

/// POST /register, POST /users
pub async fn register(
    State(app): State<AppServices>,
    Payload(new_user): Payload<NewUser>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = app.users.create_user(new_user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /auth/login
pub async fn login(
    State(app): State<AppServices>,
    Payload(credentials): Payload<Credentials>,
) -> ApiResult<Json<LoginResult>> {
    Ok(Json(app.auth.login(credentials).await?))
}
