use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::validation::{exactly_one_of, Validate, ValidationBuilder};
use crate::domains::core::parse::{parse_datetime, parse_optional_uuid, parse_uuid};
use crate::domains::permission::ParentRef;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use sqlx::FromRow;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// A 1-5 score on exactly one donation or social action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub donation_id: Option<Uuid>,
    pub social_action_id: Option<Uuid>,
    pub rating: i64,
    pub rating_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRating {
    pub user_id: Uuid,
    #[serde(default)]
    pub donation_id: Option<Uuid>,
    #[serde(default)]
    pub social_action_id: Option<Uuid>,
    pub rating: i64,
}

impl NewRating {
    pub fn target(&self) -> DomainResult<ParentRef> {
        exactly_one_of(&[
            ("donation_id", self.donation_id.is_some()),
            ("social_action_id", self.social_action_id.is_some()),
        ])?;

        self.donation_id
            .map(ParentRef::Donation)
            .or_else(|| self.social_action_id.map(ParentRef::SocialAction))
            .ok_or_else(|| DomainError::Validation(ValidationError::relationship("a rating needs a target")))
    }
}

impl Validate for NewRating {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("user_id", Some(self.user_id))
            .not_nil()
            .validate()?;

        self.target()?;

        ValidationBuilder::new("rating", Some(self.rating))
            .range(MIN_RATING, MAX_RATING)
            .validate()
    }
}

/// Only the score can change; the rated entity stays fixed
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateRating {
    pub rating: Option<i64>,
}

impl Validate for UpdateRating {
    fn validate(&self) -> DomainResult<()> {
        if let Some(rating) = self.rating {
            ValidationBuilder::new("rating", Some(rating))
                .range(MIN_RATING, MAX_RATING)
                .validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RatingRow {
    pub id: String,
    pub user_id: String,
    pub donation_id: Option<String>,
    pub social_action_id: Option<String>,
    pub rating: i64,
    pub rating_date: String,
}

impl RatingRow {
    pub fn into_entity(self) -> DomainResult<Rating> {
        Ok(Rating {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            donation_id: parse_optional_uuid(&self.donation_id)?,
            social_action_id: parse_optional_uuid(&self.social_action_id)?,
            rating: self.rating,
            rating_date: parse_datetime(&self.rating_date)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_and_target_rules() {
        let rating = |score, donation_id: Option<Uuid>, social_action_id: Option<Uuid>| NewRating {
            user_id: Uuid::new_v4(),
            donation_id,
            social_action_id,
            rating: score,
        };
        let id = Some(Uuid::new_v4());

        assert!(rating(5, id, None).validate().is_ok());
        assert!(rating(0, id, None).validate().is_err());
        assert!(rating(6, None, id).validate().is_err());
        assert!(rating(3, None, None).validate().is_err());
        assert!(rating(3, id, id).validate().is_err());

        assert!(UpdateRating { rating: Some(9) }.validate().is_err());
    }
}
