use crate::api::error::ApiResult;
use crate::api::extractor::{Caller, PathParam, Payload};
use crate::app::AppServices;
use crate::domains::certificate::types::{
    Certificate, CertificateDownload, NewCertificate, ParticipationCertificateRequest, UpdateCertificate,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

pub async fn create(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    Payload(new): Payload<NewCertificate>,
) -> ApiResult<(StatusCode, Json<Certificate>)> {
    let certificate = app.certificates.create_certificate(new, &auth).await?;
    Ok((StatusCode::CREATED, Json(certificate)))
}

/// POST /certificates/participation
pub async fn create_for_participation(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    Payload(request): Payload<ParticipationCertificateRequest>,
) -> ApiResult<(StatusCode, Json<Certificate>)> {
    let certificate = app.certificates.generate_participation_certificate(request, &auth).await?;
    Ok((StatusCode::CREATED, Json(certificate)))
}

pub async fn list(State(app): State<AppServices>, Caller(auth): Caller) -> ApiResult<Json<Vec<Certificate>>> {
    Ok(Json(app.certificates.list_certificates(&auth).await?))
}

pub async fn list_by_user(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(user_id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<Certificate>>> {
    Ok(Json(app.certificates.list_user_certificates(user_id, &auth).await?))
}

pub async fn get(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<Certificate>> {
    Ok(Json(app.certificates.get_certificate(id, &auth).await?))
}

/// GET /api/certificates/:id/download
pub async fn download(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<CertificateDownload>> {
    Ok(Json(app.certificates.download_certificate(id, &auth).await?))
}

pub async fn update(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
    Payload(update): Payload<UpdateCertificate>,
) -> ApiResult<Json<Certificate>> {
    Ok(Json(app.certificates.update_certificate(id, update, &auth).await?))
}

pub async fn delete(
    State(app): State<AppServices>,
    Caller(auth): Caller,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    app.certificates.delete_certificate(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}
