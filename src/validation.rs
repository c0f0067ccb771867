use crate::errors::{ValidationError, DomainResult, DomainError};
use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;
use uuid::Uuid;

/// A trait that DTOs implement for shape validation before they reach a repository.
pub trait Validate {
    /// Validates the entity and returns an error if validation fails.
    fn validate(&self) -> DomainResult<()>;
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
    })
}

fn url_regex() -> &'static Regex {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    URL_REGEX.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("url pattern compiles"))
}

/// Struct for configuring validations in a fluent style
#[derive(Default)]
pub struct ValidationBuilder<T> {
    field_name: String,
    value: Option<T>,
    errors: Vec<ValidationError>,
}

/// Generic validation implementations
impl<T> ValidationBuilder<T> {
    pub fn new(field_name: &str, value: Option<T>) -> Self {
        Self {
            field_name: field_name.to_string(),
            value,
            errors: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self
    where T: Default + PartialEq {
        if self.value.is_none() || self.value == Some(T::default()) {
            self.errors.push(ValidationError::required(&self.field_name));
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> DomainResult<()> {
        match self.errors.into_iter().next() {
            None => Ok(()),
            Some(first) => Err(DomainError::Validation(first)),
        }
    }
}

/// String-specific validations
impl ValidationBuilder<String> {
    /// Rejects values that are empty once surrounding whitespace is removed.
    pub fn not_blank(mut self) -> Self {
        if let Some(value) = &self.value {
            if value.trim().is_empty() {
                self.errors.push(ValidationError::required(&self.field_name));
            }
        }
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        if let Some(value) = &self.value {
            if value.chars().count() < min {
                self.errors.push(ValidationError::min_length(&self.field_name, min));
            }
        }
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        if let Some(value) = &self.value {
            if value.chars().count() > max {
                self.errors.push(ValidationError::max_length(&self.field_name, max));
            }
        }
        self
    }

    pub fn matches_pattern(mut self, pattern: &Regex, message: &str) -> Self {
        if let Some(value) = &self.value {
            if !pattern.is_match(value) {
                self.errors.push(ValidationError::format(&self.field_name, message));
            }
        }
        self
    }

    pub fn email(self) -> Self {
        self.matches_pattern(email_regex(), "must be a valid email address")
    }

    pub fn url(self) -> Self {
        self.matches_pattern(url_regex(), "must be a valid http(s) URL")
    }

    pub fn one_of(mut self, allowed_values: &[&str], message: Option<&str>) -> Self {
        if let Some(value) = &self.value {
            if !allowed_values.contains(&value.as_str()) {
                let reason = message.unwrap_or("must be one of the allowed values");
                self.errors.push(ValidationError::invalid_value(&self.field_name, reason));
            }
        }
        self
    }
}

/// Numeric validations
impl<T> ValidationBuilder<T>
where T: PartialOrd + Clone + std::fmt::Display
{
    pub fn range(mut self, min: T, max: T) -> Self {
        if let Some(value) = &self.value {
            if value < &min || value > &max {
                self.errors.push(ValidationError::range(
                    &self.field_name,
                    min.to_string(),
                    max.to_string()
                ));
            }
        }
        self
    }
}

impl ValidationBuilder<Decimal> {
    pub fn positive(mut self) -> Self {
        if let Some(value) = &self.value {
            if value <= &Decimal::ZERO {
                self.errors.push(ValidationError::invalid_value(
                    &self.field_name,
                    "must be greater than zero"
                ));
            }
        }
        self
    }

    /// Caps the number of fractional digits, matching a DECIMAL(p, scale) column.
    pub fn max_scale(mut self, scale: u32) -> Self {
        if let Some(value) = &self.value {
            if value.normalize().scale() > scale {
                self.errors.push(ValidationError::format(
                    &self.field_name,
                    &format!("must have at most {} decimal places", scale)
                ));
            }
        }
        self
    }
}

/// DateTime validation helpers
impl ValidationBuilder<DateTime<Utc>> {
    pub fn after(mut self, date: DateTime<Utc>) -> Self {
        if let Some(value) = &self.value {
            if value <= &date {
                self.errors.push(ValidationError::invalid_value(
                    &self.field_name,
                    &format!("must be after {}", date.to_rfc3339())
                ));
            }
        }
        self
    }
}

/// UUID validation helpers
impl ValidationBuilder<Uuid> {
    pub fn not_nil(mut self) -> Self {
        if let Some(value) = &self.value {
            if *value == Uuid::nil() {
                self.errors.push(ValidationError::invalid_value(
                    &self.field_name,
                    "cannot be a nil UUID"
                ));
            }
        }
        self
    }
}

/// Checks that exactly one of several mutually exclusive reference fields is set.
///
/// `targets` pairs each field name with whether it carries a value.
pub fn exactly_one_of(targets: &[(&str, bool)]) -> DomainResult<()> {
    let set = targets.iter().filter(|(_, present)| *present).count();
    if set == 1 {
        return Ok(());
    }
    let names: Vec<&str> = targets.iter().map(|(name, _)| *name).collect();
    let reason = if set == 0 {
        format!("one of {} must be provided", names.join(", "))
    } else {
        format!("only one of {} may be provided", names.join(", "))
    };
    Err(DomainError::Validation(ValidationError::relationship(&reason)))
}
