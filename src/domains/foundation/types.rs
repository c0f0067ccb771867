use crate::errors::DomainResult;
use crate::validation::{Validate, ValidationBuilder};
use crate::domains::core::parse::{parse_datetime, parse_uuid};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use sqlx::FromRow;

/// Public profile of an organization; one per foundation-type account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Foundation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub legal_name: String,
    pub address: String,
    pub phone: String,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFoundation {
    pub user_id: Uuid,
    pub legal_name: String,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub website: Option<String>,
}

impl Validate for NewFoundation {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("user_id", Some(self.user_id))
            .not_nil()
            .validate()?;

        ValidationBuilder::new("legal_name", Some(self.legal_name.clone()))
            .required()
            .not_blank()
            .max_length(200)
            .validate()?;

        ValidationBuilder::new("address", Some(self.address.clone()))
            .required()
            .not_blank()
            .validate()?;

        ValidationBuilder::new("phone", Some(self.phone.clone()))
            .required()
            .not_blank()
            .validate()?;

        if let Some(website) = &self.website {
            ValidationBuilder::new("website", Some(website.clone()))
                .url()
                .validate()?;
        }

        Ok(())
    }
}

/// Partial update; `user_id` is not part of it and never changes
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateFoundation {
    pub legal_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

impl Validate for UpdateFoundation {
    fn validate(&self) -> DomainResult<()> {
        if let Some(legal_name) = &self.legal_name {
            ValidationBuilder::new("legal_name", Some(legal_name.clone()))
                .not_blank()
                .max_length(200)
                .validate()?;
        }
        if let Some(address) = &self.address {
            ValidationBuilder::new("address", Some(address.clone()))
                .not_blank()
                .validate()?;
        }
        if let Some(phone) = &self.phone {
            ValidationBuilder::new("phone", Some(phone.clone()))
                .not_blank()
                .validate()?;
        }
        if let Some(website) = &self.website {
            ValidationBuilder::new("website", Some(website.clone()))
                .url()
                .validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct FoundationRow {
    pub id: String,
    pub user_id: String,
    pub legal_name: String,
    pub address: String,
    pub phone: String,
    pub website: Option<String>,
    pub created_at: String,
}

impl FoundationRow {
    pub fn into_entity(self) -> DomainResult<Foundation> {
        Ok(Foundation {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            legal_name: self.legal_name,
            address: self.address,
            phone: self.phone,
            website: self.website,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}
