//! Validation and normalization of the onboarding form.

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::repos::addresses::NewAddress;

pub const DEFAULT_COUNTRY: &str = "US";

/// Raw onboarding payload. Every field is optional here so that missing
/// fields surface as validation messages rather than parse failures.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSubmission {
    pub name: Option<String>,
    /// `YYYY-MM-DD`
    pub birthday: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OnboardingError {
    #[error("Birthday is required")]
    MissingBirthday,

    #[error("Address line 1 is required")]
    MissingLine1,

    #[error("City is required")]
    MissingCity,

    #[error("State is required")]
    MissingState,

    #[error("Postal code is required")]
    MissingPostalCode,

    #[error("Birthday must be a valid date")]
    InvalidBirthday,
}

/// A submission that passed validation, with every string normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingProfile {
    /// `None` leaves the stored name untouched.
    pub name: Option<String>,
    pub birthday: NaiveDate,
    pub address: NewAddress,
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Only the padded `YYYY-MM-DD` form is accepted. chrono alone would also
/// take unpadded or signed fields.
fn parse_birthday(value: &str) -> Result<NaiveDate, OnboardingError> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(OnboardingError::InvalidBirthday);
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| OnboardingError::InvalidBirthday)
}

impl OnboardingSubmission {
    /// Check required fields in form order, then the birthday format.
    /// The first failure is returned.
    pub fn validate(&self) -> Result<OnboardingProfile, OnboardingError> {
        let birthday = present(&self.birthday).ok_or(OnboardingError::MissingBirthday)?;
        let line1 = present(&self.line1).ok_or(OnboardingError::MissingLine1)?;
        let city = present(&self.city).ok_or(OnboardingError::MissingCity)?;
        let state = present(&self.state).ok_or(OnboardingError::MissingState)?;
        let postal_code = present(&self.postal_code).ok_or(OnboardingError::MissingPostalCode)?;

        let birthday = parse_birthday(birthday)?;

        Ok(OnboardingProfile {
            name: present(&self.name).map(str::to_string),
            birthday,
            address: NewAddress {
                line1: line1.to_string(),
                line2: present(&self.line2).map(str::to_string),
                city: city.to_string(),
                state: state.to_uppercase(),
                postal_code: postal_code.to_string(),
                country: present(&self.country)
                    .unwrap_or(DEFAULT_COUNTRY)
                    .to_uppercase(),
            },
        })
    }
}
