//! Task categories shown on the posting form and the public board.

use super::{CatalogDomainError, CategoryId, required_text};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A task category with a display icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
    icon: String,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCategoryData {
    /// Persisted identifier.
    pub id: CategoryId,
    /// Persisted display name.
    pub name: String,
    /// Persisted icon path or CSS class.
    pub icon: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Creates a category.
    ///
    /// `icon` is an image path or an icon-font class name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyField`] when either value is blank.
    pub fn new(name: &str, icon: &str, clock: &impl Clock) -> Result<Self, CatalogDomainError> {
        Ok(Self {
            id: CategoryId::new(),
            name: required_text("name", name)?,
            icon: required_text("icon", icon)?,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a category from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCategoryData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            icon: data.icon,
            created_at: data.created_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> CategoryId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the icon.
    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the name and icon.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyField`] when either value is blank;
    /// the category is left untouched.
    pub fn update(&mut self, name: &str, icon: &str) -> Result<(), CatalogDomainError> {
        let new_name = required_text("name", name)?;
        let new_icon = required_text("icon", icon)?;
        self.name = new_name;
        self.icon = new_icon;
        Ok(())
    }
}
