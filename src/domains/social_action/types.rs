use crate::errors::{DomainResult, ValidationError};
use crate::validation::{Validate, ValidationBuilder};
use crate::domains::core::parse::{parse_datetime, parse_uuid};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use sqlx::FromRow;

/// A volunteering opportunity published by a foundation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialAction {
    pub id: Uuid,
    pub foundation_id: Uuid,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl SocialAction {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && now <= self.end_date
    }
}

/// `end_date` has to fall strictly after `start_date`
pub fn validate_schedule(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> DomainResult<()> {
    ValidationBuilder::new("end_date", Some(end_date))
        .after(start_date)
        .validate()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSocialAction {
    pub foundation_id: Uuid,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl Validate for NewSocialAction {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("foundation_id", Some(self.foundation_id))
            .not_nil()
            .validate()?;

        ValidationBuilder::new("description", Some(self.description.clone()))
            .required()
            .not_blank()
            .validate()?;

        validate_schedule(self.start_date, self.end_date)
    }
}

/// Partial update; the publishing foundation never changes
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateSocialAction {
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl UpdateSocialAction {
    /// Checks the dates the action would end up with after this update.
    pub fn validate_against(&self, current: &SocialAction) -> DomainResult<()> {
        self.validate()?;
        validate_schedule(
            self.start_date.unwrap_or(current.start_date),
            self.end_date.unwrap_or(current.end_date),
        )
    }
}

impl Validate for UpdateSocialAction {
    fn validate(&self) -> DomainResult<()> {
        if let Some(description) = &self.description {
            ValidationBuilder::new("description", Some(description.clone()))
                .not_blank()
                .validate()?;
        }
        Ok(())
    }
}

/// Body of an application to an opportunity
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApplyToSocialAction {
    #[serde(default)]
    pub message: Option<String>,
}

impl Validate for ApplyToSocialAction {
    fn validate(&self) -> DomainResult<()> {
        match &self.message {
            Some(message) if message.chars().count() > 1000 => {
                Err(ValidationError::max_length("message", 1000).into())
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SocialActionRow {
    pub id: String,
    pub foundation_id: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub created_at: String,
}

impl SocialActionRow {
    pub fn into_entity(self) -> DomainResult<SocialAction> {
        Ok(SocialAction {
            id: parse_uuid(&self.id)?,
            foundation_id: parse_uuid(&self.foundation_id)?,
            description: self.description,
            start_date: parse_datetime(&self.start_date)?,
            end_date: parse_datetime(&self.end_date)?,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn end_must_follow_start() {
        let start = Utc::now();
        let new = |end| NewSocialAction {
            foundation_id: Uuid::new_v4(),
            description: "Beach cleanup".to_string(),
            start_date: start,
            end_date: end,
        };
        assert!(new(start + Duration::hours(3)).validate().is_ok());
        assert!(new(start).validate().is_err());
        assert!(new(start - Duration::days(1)).validate().is_err());
    }

    #[test]
    fn partial_update_checks_resulting_dates() {
        let now = Utc::now();
        let current = SocialAction {
            id: Uuid::new_v4(),
            foundation_id: Uuid::new_v4(),
            description: "Tutoring".to_string(),
            start_date: now,
            end_date: now + Duration::days(2),
            created_at: now,
        };
        let push_start = UpdateSocialAction { start_date: Some(now + Duration::days(3)), ..Default::default() };
        assert!(push_start.validate_against(&current).is_err());

        let extend = UpdateSocialAction { end_date: Some(now + Duration::days(5)), ..Default::default() };
        assert!(extend.validate_against(&current).is_ok());
        assert!(current.is_active_at(now + Duration::hours(1)));
    }
}
