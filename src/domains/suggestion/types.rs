use crate::errors::DomainResult;
use crate::validation::{Validate, ValidationBuilder};
use crate::domains::core::parse::{parse_datetime, parse_uuid};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use sqlx::FromRow;

const MAX_CONTENT_LENGTH: usize = 2000;
const PREVIEW_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub processed: bool,
    pub created_at: DateTime<Utc>,
}

impl Suggestion {
    /// Leading characters of the content, with an ellipsis when cut
    pub fn preview(&self) -> String {
        let mut preview: String = self.content.chars().take(PREVIEW_LENGTH).collect();
        if self.content.chars().count() > PREVIEW_LENGTH {
            preview.push_str("...");
        }
        preview
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSuggestion {
    pub user_id: Uuid,
    pub content: String,
}

impl Validate for NewSuggestion {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("user_id", Some(self.user_id))
            .not_nil()
            .validate()?;

        ValidationBuilder::new("content", Some(self.content.clone()))
            .required()
            .not_blank()
            .max_length(MAX_CONTENT_LENGTH)
            .validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateSuggestion {
    pub content: Option<String>,
    pub processed: Option<bool>,
}

impl Validate for UpdateSuggestion {
    fn validate(&self) -> DomainResult<()> {
        if let Some(content) = &self.content {
            ValidationBuilder::new("content", Some(content.clone()))
                .not_blank()
                .max_length(MAX_CONTENT_LENGTH)
                .validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SuggestionRow {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub processed: i64,
    pub created_at: String,
}

impl SuggestionRow {
    pub fn into_entity(self) -> DomainResult<Suggestion> {
        Ok(Suggestion {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            content: self.content,
            processed: self.processed != 0,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(content: &str) -> Suggestion {
        Suggestion {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            content: content.to_string(),
            processed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn preview_cuts_long_content() {
        assert_eq!(suggestion("Short idea").preview(), "Short idea");

        let long = "x".repeat(60);
        let preview = suggestion(&long).preview();
        assert_eq!(preview, format!("{}...", "x".repeat(50)));

        // exactly at the limit is left alone
        assert_eq!(suggestion(&"y".repeat(50)).preview(), "y".repeat(50));
    }

    #[test]
    fn content_is_required() {
        let new = |content: &str| NewSuggestion { user_id: Uuid::new_v4(), content: content.to_string() };
        assert!(new("More evening events").validate().is_ok());
        assert!(new("   ").validate().is_err());
        assert!(UpdateSuggestion { content: Some(String::new()), processed: None }.validate().is_err());
    }
}
