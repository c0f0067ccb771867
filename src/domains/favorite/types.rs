use crate::errors::{DomainError, DomainResult};
use crate::validation::{Validate, ValidationBuilder};
use crate::types::FavoriteType;
use crate::domains::core::parse::{parse_datetime, parse_uuid};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use sqlx::FromRow;

/// An item an account bookmarked: a foundation or an opportunity (social action)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub item_type: FavoriteType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFavorite {
    pub item_id: Uuid,
    pub item_type: String,
}

impl NewFavorite {
    pub fn favorite_type(&self) -> DomainResult<FavoriteType> {
        FavoriteType::from_str(&self.item_type).ok_or_else(|| {
            DomainError::Validation(crate::errors::ValidationError::invalid_value(
                "item_type",
                "must be 'foundation' or 'opportunity'",
            ))
        })
    }
}

impl Validate for NewFavorite {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("item_id", Some(self.item_id))
            .not_nil()
            .validate()?;

        ValidationBuilder::new("item_type", Some(self.item_type.clone()))
            .required()
            .one_of(FavoriteType::all_variants(), Some("must be 'foundation' or 'opportunity'"))
            .validate()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct FavoriteRow {
    pub id: String,
    pub user_id: String,
    pub item_id: String,
    pub item_type: String,
    pub created_at: String,
}

impl FavoriteRow {
    pub fn into_entity(self) -> DomainResult<Favorite> {
        Ok(Favorite {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            item_id: parse_uuid(&self.item_id)?,
            item_type: FavoriteType::from_str(&self.item_type)
                .ok_or_else(|| DomainError::Internal(format!("Invalid favorite type: {}", self.item_type)))?,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}
