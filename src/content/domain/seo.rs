//! Search-engine metadata for articles and pages.

use super::text::{optional, truncate_with_ellipsis};
use super::ContentDomainError;
use serde::{Deserialize, Serialize};

/// Raw metadata as typed into the admin form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoInput {
    /// `<title>` override.
    pub title: Option<String>,
    /// `<meta name="description">` text.
    pub description: Option<String>,
    /// Comma-separated keywords.
    pub keywords: Option<String>,
}

/// Validated metadata with a resolved title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoMeta {
    title: String,
    description: Option<String>,
    keywords: Option<String>,
}

impl SeoMeta {
    /// Maximum title length in characters.
    pub const TITLE_MAX: usize = 60;
    /// Maximum description length in characters.
    pub const DESCRIPTION_MAX: usize = 160;
    /// Maximum keywords length in characters.
    pub const KEYWORDS_MAX: usize = 255;

    /// Validates form input. A blank title is derived from `fallback_title`,
    /// shortened to fit.
    ///
    /// # Errors
    ///
    /// Returns [`ContentDomainError::FieldTooLong`] when an explicit value
    /// exceeds its limit.
    pub fn resolve(input: &SeoInput, fallback_title: &str) -> Result<Self, ContentDomainError> {
        let explicit_title = optional("meta title", input.title.as_deref(), Self::TITLE_MAX)?;
        Ok(Self {
            title: explicit_title
                .unwrap_or_else(|| truncate_with_ellipsis(fallback_title, Self::TITLE_MAX)),
            description: optional(
                "meta description",
                input.description.as_deref(),
                Self::DESCRIPTION_MAX,
            )?,
            keywords: optional("meta keywords", input.keywords.as_deref(), Self::KEYWORDS_MAX)?,
        })
    }

    /// Reconstructs metadata from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        title: String,
        description: Option<String>,
        keywords: Option<String>,
    ) -> Self {
        Self {
            title,
            description,
            keywords,
        }
    }

    /// Returns the resolved title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the keywords.
    #[must_use]
    pub fn keywords(&self) -> Option<&str> {
        self.keywords.as_deref()
    }
}
