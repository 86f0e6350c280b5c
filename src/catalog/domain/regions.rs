//! The static list of regions cities may belong to.
//!
//! Regions are read from a JSON array of names. A missing or malformed file
//! is not fatal: the catalog degrades to [`FALLBACK_REGION`] and logs a
//! warning, so a fresh checkout still boots.

use super::CatalogDomainError;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Region file shipped with the repository.
pub const DEFAULT_REGIONS_PATH: &str = "data/regions.json";

/// Sole region used when the region file cannot be loaded.
pub const FALLBACK_REGION: &str = "Республика Крым";

/// A region name known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    /// Wraps a region name read back from storage.
    ///
    /// Stored cities were validated when written, so no catalog lookup
    /// happens here.
    #[must_use]
    pub const fn from_persisted(name: String) -> Self {
        Self(name)
    }

    /// Returns the region name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised while reading a region file.
#[derive(Debug, Clone, Error)]
pub enum RegionCatalogError {
    /// The path has no file name component.
    #[error("region path '{0}' does not name a file")]
    NotAFile(Utf8PathBuf),

    /// The file could not be opened or read.
    #[error("failed to read region file '{path}': {source}")]
    Io {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: Arc<std::io::Error>,
    },

    /// The file is not a JSON array of strings.
    #[error("failed to parse region file '{path}': {source}")]
    Parse {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        source: Arc<serde_json::Error>,
    },

    /// The file lists no regions.
    #[error("region file '{0}' lists no regions")]
    Empty(Utf8PathBuf),
}

/// Ordered list of region names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCatalog {
    names: Vec<String>,
}

impl RegionCatalog {
    /// Builds a catalog from names, trimming them and dropping blanks and
    /// repeats while keeping the original order.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let trimmed = name.as_ref().trim();
            if !trimmed.is_empty() && !unique.iter().any(|known| known == trimmed) {
                unique.push(trimmed.to_owned());
            }
        }
        Self { names: unique }
    }

    /// Returns the single-region fallback catalog.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new([FALLBACK_REGION])
    }

    /// Reads a catalog from a JSON array file.
    ///
    /// # Errors
    ///
    /// Returns [`RegionCatalogError`] when the file cannot be read, is not a
    /// JSON array of strings, or lists no regions.
    pub fn load(path: &Utf8Path) -> Result<Self, RegionCatalogError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| RegionCatalogError::NotAFile(path.to_owned()))?;
        let parent = path
            .parent()
            .filter(|dir| !dir.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));

        let io_error = |err: std::io::Error| RegionCatalogError::Io {
            path: path.to_owned(),
            source: Arc::new(err),
        };
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;
        let raw = dir.read_to_string(file_name).map_err(io_error)?;

        let names: Vec<String> =
            serde_json::from_str(&raw).map_err(|err| RegionCatalogError::Parse {
                path: path.to_owned(),
                source: Arc::new(err),
            })?;
        let catalog = Self::new(names);
        if catalog.names.is_empty() {
            return Err(RegionCatalogError::Empty(path.to_owned()));
        }
        Ok(catalog)
    }

    /// Reads a catalog, falling back to [`RegionCatalog::fallback`] on any
    /// error.
    #[must_use]
    pub fn load_or_fallback(path: &Utf8Path) -> Self {
        match Self::load(path) {
            Ok(catalog) => {
                tracing::debug!(path = %path, regions = catalog.names.len(), "region catalog loaded");
                catalog
            }
            Err(err) => {
                tracing::warn!(error = %err, "region catalog unavailable, using fallback");
                Self::fallback()
            }
        }
    }

    /// Returns the region names in file order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns `true` when `name` is a known region.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|known| known == name.trim())
    }

    /// Validates a region name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::UnknownRegion`] for names outside the
    /// catalog.
    pub fn resolve(&self, name: &str) -> Result<Region, CatalogDomainError> {
        let trimmed = name.trim();
        if self.contains(trimmed) {
            Ok(Region(trimmed.to_owned()))
        } else {
            Err(CatalogDomainError::UnknownRegion(trimmed.to_owned()))
        }
    }
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self::fallback()
    }
}
