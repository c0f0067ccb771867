use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::validation::{exactly_one_of, Validate, ValidationBuilder};
use crate::domains::core::parse::{parse_datetime, parse_optional_uuid, parse_uuid};
use crate::domains::permission::ParentRef;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use sqlx::FromRow;

/// A comment on exactly one of a donation, a social action or a foundation.
///
/// The target columns are nulled if the target is deleted later on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub donation_id: Option<Uuid>,
    pub social_action_id: Option<Uuid>,
    pub foundation_id: Option<Uuid>,
    pub text: String,
    pub comment_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub user_id: Uuid,
    #[serde(default)]
    pub donation_id: Option<Uuid>,
    #[serde(default)]
    pub social_action_id: Option<Uuid>,
    #[serde(default)]
    pub foundation_id: Option<Uuid>,
    pub text: String,
}

impl NewComment {
    /// The single commented entity; zero or several targets is a validation error.
    pub fn target(&self) -> DomainResult<ParentRef> {
        exactly_one_of(&[
            ("donation_id", self.donation_id.is_some()),
            ("social_action_id", self.social_action_id.is_some()),
            ("foundation_id", self.foundation_id.is_some()),
        ])?;

        [
            self.donation_id.map(ParentRef::Donation),
            self.social_action_id.map(ParentRef::SocialAction),
            self.foundation_id.map(ParentRef::Foundation),
        ]
        .into_iter()
        .flatten()
        .next()
        .ok_or_else(|| DomainError::Validation(ValidationError::relationship("a comment needs a target")))
    }
}

impl Validate for NewComment {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("user_id", Some(self.user_id))
            .not_nil()
            .validate()?;

        self.target()?;

        ValidationBuilder::new("text", Some(self.text.clone()))
            .required()
            .not_blank()
            .max_length(2000)
            .validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateComment {
    pub text: Option<String>,
}

impl Validate for UpdateComment {
    fn validate(&self) -> DomainResult<()> {
        if let Some(text) = &self.text {
            ValidationBuilder::new("text", Some(text.clone()))
                .not_blank()
                .max_length(2000)
                .validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: String,
    pub user_id: String,
    pub donation_id: Option<String>,
    pub social_action_id: Option<String>,
    pub foundation_id: Option<String>,
    pub text: String,
    pub comment_date: String,
}

impl CommentRow {
    pub fn into_entity(self) -> DomainResult<Comment> {
        Ok(Comment {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            donation_id: parse_optional_uuid(&self.donation_id)?,
            social_action_id: parse_optional_uuid(&self.social_action_id)?,
            foundation_id: parse_optional_uuid(&self.foundation_id)?,
            text: self.text,
            comment_date: parse_datetime(&self.comment_date)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment() -> NewComment {
        NewComment {
            user_id: Uuid::new_v4(),
            donation_id: None,
            social_action_id: None,
            foundation_id: None,
            text: "Great work".to_string(),
        }
    }

    #[test]
    fn exactly_one_target() {
        let none = comment();
        assert!(matches!(
            none.validate(),
            Err(DomainError::Validation(ValidationError::Relationship(_)))
        ));

        let mut two = comment();
        two.donation_id = Some(Uuid::new_v4());
        two.foundation_id = Some(Uuid::new_v4());
        assert!(two.validate().is_err());

        let mut one = comment();
        let id = Uuid::new_v4();
        one.social_action_id = Some(id);
        assert_eq!(one.target().unwrap(), ParentRef::SocialAction(id));
        assert!(one.validate().is_ok());
    }

    #[test]
    fn text_is_required() {
        let mut blank = comment();
        blank.foundation_id = Some(Uuid::new_v4());
        blank.text = "  ".to_string();
        assert!(blank.validate().is_err());
    }
}
