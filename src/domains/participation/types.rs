use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::validation::{Validate, ValidationBuilder};
use crate::types::RequestStatus;
use crate::domains::core::parse::{parse_datetime, parse_uuid};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use sqlx::FromRow;

/// An account asking to take part in a social action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipationRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub social_action_id: Uuid,
    pub status: RequestStatus,
    pub message: Option<String>,
    pub request_date: DateTime<Utc>,
}

impl ParticipationRequest {
    pub fn is_accepted(&self) -> bool {
        self.status == RequestStatus::Accepted
    }
}

fn parse_status(field: &str, raw: &str) -> DomainResult<RequestStatus> {
    RequestStatus::from_str(raw).ok_or_else(|| {
        DomainError::Validation(ValidationError::invalid_value(
            field,
            "must be 'pending', 'accepted' or 'rejected'",
        ))
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewParticipationRequest {
    pub user_id: Uuid,
    pub social_action_id: Uuid,
    /// Initial status; only honored for administrators, everyone else starts pending
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl NewParticipationRequest {
    pub fn requested_status(&self) -> DomainResult<Option<RequestStatus>> {
        self.status.as_deref().map(|s| parse_status("status", s)).transpose()
    }
}

impl Validate for NewParticipationRequest {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("user_id", Some(self.user_id))
            .not_nil()
            .validate()?;

        ValidationBuilder::new("social_action_id", Some(self.social_action_id))
            .not_nil()
            .validate()?;

        if let Some(message) = &self.message {
            ValidationBuilder::new("message", Some(message.clone()))
                .max_length(1000)
                .validate()?;
        }

        self.requested_status().map(|_| ())
    }
}

/// Status change decided by the owning foundation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateParticipationRequest {
    pub status: String,
}

impl UpdateParticipationRequest {
    pub fn new_status(&self) -> DomainResult<RequestStatus> {
        parse_status("status", &self.status)
    }
}

impl Validate for UpdateParticipationRequest {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("status", Some(self.status.clone()))
            .required()
            .one_of(RequestStatus::all_variants(), Some("must be 'pending', 'accepted' or 'rejected'"))
            .validate()
    }
}

/// Fields written when a request is stored
#[derive(Debug, Clone)]
pub struct ParticipationRecord {
    pub user_id: Uuid,
    pub social_action_id: Uuid,
    pub status: RequestStatus,
    pub message: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ParticipationRequestRow {
    pub id: String,
    pub user_id: String,
    pub social_action_id: String,
    pub status: String,
    pub message: Option<String>,
    pub request_date: String,
}

impl ParticipationRequestRow {
    pub fn into_entity(self) -> DomainResult<ParticipationRequest> {
        Ok(ParticipationRequest {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            social_action_id: parse_uuid(&self.social_action_id)?,
            status: RequestStatus::from_str(&self.status)
                .ok_or_else(|| DomainError::Internal(format!("Invalid request status: {}", self.status)))?,
            message: self.message,
            request_date: parse_datetime(&self.request_date)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_values_are_checked() {
        let update = UpdateParticipationRequest { status: "accepted".to_string() };
        assert!(update.validate().is_ok());
        assert_eq!(update.new_status().unwrap(), RequestStatus::Accepted);

        let bogus = UpdateParticipationRequest { status: "maybe".to_string() };
        assert!(bogus.validate().is_err());

        let new = NewParticipationRequest {
            user_id: Uuid::new_v4(),
            social_action_id: Uuid::new_v4(),
            status: Some("approved".to_string()),
            message: None,
        };
        assert!(new.validate().is_err());
    }
}
