use crate::errors::DomainResult;
use crate::validation::{Validate, ValidationBuilder};
use crate::domains::core::parse::{parse_datetime, parse_uuid};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub issue_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCertificate {
    pub user_id: Uuid,
    pub description: String,
}

impl Validate for NewCertificate {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("user_id", Some(self.user_id))
            .not_nil()
            .validate()?;

        ValidationBuilder::new("description", Some(self.description.clone()))
            .required()
            .not_blank()
            .max_length(500)
            .validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCertificate {
    pub description: Option<String>,
}

impl Validate for UpdateCertificate {
    fn validate(&self) -> DomainResult<()> {
        if let Some(description) = &self.description {
            ValidationBuilder::new("description", Some(description.clone()))
                .not_blank()
                .max_length(500)
                .validate()?;
        }
        Ok(())
    }
}

/// Request for a certificate proving participation in a social action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipationCertificateRequest {
    pub user_id: Uuid,
    pub social_action_id: Uuid,
}

/// What a client needs to fetch the printable certificate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateDownload {
    #[serde(flatten)]
    pub certificate: Certificate,
    pub download_url: String,
    pub message: String,
}

impl From<Certificate> for CertificateDownload {
    fn from(certificate: Certificate) -> Self {
        Self {
            download_url: format!("/api/certificates/{}/pdf", certificate.id),
            message: "Certificate ready for download".to_string(),
            certificate,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CertificateRow {
    pub id: String,
    pub user_id: String,
    pub description: String,
    pub issue_date: String,
}

impl CertificateRow {
    pub fn into_entity(self) -> DomainResult<Certificate> {
        Ok(Certificate {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            description: self.description,
            issue_date: parse_datetime(&self.issue_date)?,
        })
    }
}
