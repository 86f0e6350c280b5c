//! Editable personal details attached to an account.

use super::{AccountDomainError, ParseGenderError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const NAME_MAX: usize = 50;
const BIO_MAX: usize = 1000;

/// Self-declared gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Gender {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl TryFrom<&str> for Gender {
    type Error = ParseGenderError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "male" | "мужской" => Ok(Self::Male),
            "female" | "женский" => Ok(Self::Female),
            _ => Err(ParseGenderError(value.to_owned())),
        }
    }
}

/// Optional profile fields. Blank text is stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    first_name: Option<String>,
    last_name: Option<String>,
    bio: Option<String>,
    phone: Option<String>,
    avatar: Option<String>,
    date_of_birth: Option<NaiveDate>,
    gender: Option<Gender>,
}

impl UserProfile {
    /// Creates an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first name.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::FieldTooLong`] above 50 characters.
    pub fn with_first_name(mut self, value: Option<String>) -> Result<Self, AccountDomainError> {
        self.first_name = bounded("first_name", value, NAME_MAX)?;
        Ok(self)
    }

    /// Sets the last name.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::FieldTooLong`] above 50 characters.
    pub fn with_last_name(mut self, value: Option<String>) -> Result<Self, AccountDomainError> {
        self.last_name = bounded("last_name", value, NAME_MAX)?;
        Ok(self)
    }

    /// Sets the biography.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::FieldTooLong`] above 1000 characters.
    pub fn with_bio(mut self, value: Option<String>) -> Result<Self, AccountDomainError> {
        self.bio = bounded("bio", value, BIO_MAX)?;
        Ok(self)
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone(mut self, value: Option<String>) -> Self {
        self.phone = non_blank(value);
        self
    }

    /// Sets the avatar path.
    #[must_use]
    pub fn with_avatar(mut self, value: Option<String>) -> Self {
        self.avatar = non_blank(value);
        self
    }

    /// Sets the date of birth.
    #[must_use]
    pub const fn with_date_of_birth(mut self, value: Option<NaiveDate>) -> Self {
        self.date_of_birth = value;
        self
    }

    /// Sets the gender.
    #[must_use]
    pub const fn with_gender(mut self, value: Option<Gender>) -> Self {
        self.gender = value;
        self
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Returns the biography.
    #[must_use]
    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    /// Returns the phone number.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Returns the avatar path.
    #[must_use]
    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    /// Returns the date of birth.
    #[must_use]
    pub const fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
    }

    /// Returns the gender.
    #[must_use]
    pub const fn gender(&self) -> Option<Gender> {
        self.gender
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

fn bounded(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, AccountDomainError> {
    let cleaned = non_blank(value);
    if cleaned.as_ref().is_some_and(|text| text.chars().count() > max) {
        return Err(AccountDomainError::FieldTooLong { field, max });
    }
    Ok(cleaned)
}
