use crate::errors::DomainResult;
use crate::validation::{Validate, ValidationBuilder};
use crate::domains::core::parse::{parse_datetime, parse_uuid};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub read: bool,
    pub notification_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub message: String,
}

impl Validate for NewNotification {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("user_id", Some(self.user_id))
            .not_nil()
            .validate()?;

        ValidationBuilder::new("message", Some(self.message.clone()))
            .required()
            .not_blank()
            .validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateNotification {
    pub message: Option<String>,
    pub read: Option<bool>,
}

impl Validate for UpdateNotification {
    fn validate(&self) -> DomainResult<()> {
        if let Some(message) = &self.message {
            ValidationBuilder::new("message", Some(message.clone()))
                .not_blank()
                .validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: String,
    pub user_id: String,
    pub message: String,
    pub read: i64,
    pub notification_date: String,
}

impl NotificationRow {
    pub fn into_entity(self) -> DomainResult<Notification> {
        Ok(Notification {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            message: self.message,
            read: self.read != 0,
            notification_date: parse_datetime(&self.notification_date)?,
        })
    }
}
