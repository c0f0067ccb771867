use crate::errors::DomainResult;
use crate::validation::{Validate, ValidationBuilder};
use crate::domains::core::parse::{parse_datetime, parse_decimal, parse_uuid};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

/// Fractional digits an amount may carry
pub const AMOUNT_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub foundation_id: Uuid,
    pub amount: Decimal,
    pub donation_date: DateTime<Utc>,
}

/// Accepts `12.5` as well as `"12.5"`; JSON numbers are read from their
/// literal text so no binary float rounding gets in.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let text = match &raw {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.trim().to_string(),
        other => return Err(serde::de::Error::custom(format!("invalid amount: {}", other))),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| serde::de::Error::custom(format!("invalid amount: {}", text)))
}

fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize_amount")] Decimal);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(d)| d))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDonation {
    pub user_id: Uuid,
    pub foundation_id: Uuid,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Decimal,
}

impl Validate for NewDonation {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("user_id", Some(self.user_id))
            .not_nil()
            .validate()?;

        ValidationBuilder::new("foundation_id", Some(self.foundation_id))
            .not_nil()
            .validate()?;

        ValidationBuilder::new("amount", Some(self.amount))
            .positive()
            .max_scale(AMOUNT_SCALE)
            .validate()
    }
}

/// Only the amount of a donation can change
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateDonation {
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub amount: Option<Decimal>,
}

impl Validate for UpdateDonation {
    fn validate(&self) -> DomainResult<()> {
        if let Some(amount) = self.amount {
            ValidationBuilder::new("amount", Some(amount))
                .positive()
                .max_scale(AMOUNT_SCALE)
                .validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DonationRow {
    pub id: String,
    pub user_id: String,
    pub foundation_id: String,
    pub amount: String,
    pub donation_date: String,
}

impl DonationRow {
    pub fn into_entity(self) -> DomainResult<Donation> {
        Ok(Donation {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            foundation_id: parse_uuid(&self.foundation_id)?,
            amount: parse_decimal(&self.amount)?,
            donation_date: parse_datetime(&self.donation_date)?,
        })
    }
}
