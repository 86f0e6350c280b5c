//! URL slugs for cities, article categories, articles and static pages.
//!
//! Slug generation is a port: deployments may plug in a richer
//! transliteration service. [`BasicSlugifier`] covers Latin and Russian
//! Cyrillic input, which is what the marketplace content uses.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum slug length, matching the `VARCHAR(255)` slug columns.
const MAX_SLUG_LENGTH: usize = 255;

/// Converts free text into a URL slug candidate.
pub trait Slugifier: Send + Sync {
    /// Returns a lowercase, hyphen-separated rendering of `text`.
    ///
    /// The result may be empty when `text` has no sluggable characters.
    /// Implementations should keep it within 255 characters; longer output
    /// is shortened by [`Slug::generate`].
    fn slugify(&self, text: &str) -> String;
}

/// Default slugifier with built-in Russian transliteration.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicSlugifier;

impl Slugifier for BasicSlugifier {
    fn slugify(&self, text: &str) -> String {
        let mut slug = String::with_capacity(text.len());
        let mut separator_pending = false;

        for ch in text.chars().flat_map(char::to_lowercase) {
            let fragment = if ch.is_ascii_alphanumeric() {
                Some(Fragment::Char(ch))
            } else {
                transliterate(ch).map(Fragment::Str)
            };

            match fragment {
                Some(Fragment::Str("")) => {}
                Some(piece) => {
                    if separator_pending && !slug.is_empty() {
                        slug.push('-');
                    }
                    separator_pending = false;
                    match piece {
                        Fragment::Char(c) => slug.push(c),
                        Fragment::Str(s) => slug.push_str(s),
                    }
                }
                None => separator_pending = true,
            }
        }

        let kept = fit_to_length(&slug, MAX_SLUG_LENGTH).len();
        slug.truncate(kept);
        slug
    }
}

/// Shortens `slug` to at most `limit` characters.
///
/// The cut falls on the last `-` inside the limit when there is one, so
/// words stay whole. Trailing hyphens are dropped.
fn fit_to_length(slug: &str, limit: usize) -> &str {
    let Some((cut, _)) = slug.char_indices().nth(limit) else {
        return slug;
    };
    let Some((head, rest)) = slug.split_at_checked(cut) else {
        return slug;
    };
    let whole_words = if rest.starts_with('-') {
        head
    } else {
        head.rsplit_once('-').map_or(head, |(words, _)| words)
    };
    let trimmed = whole_words.trim_end_matches('-');
    if trimmed.is_empty() {
        head.trim_end_matches('-')
    } else {
        trimmed
    }
}

enum Fragment {
    Char(char),
    Str(&'static str),
}

/// Maps a lowercase Cyrillic letter to its Latin rendering.
const fn transliterate(ch: char) -> Option<&'static str> {
    let latin = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'э' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Errors returned while validating slugs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SlugError {
    /// The slug is empty, usually because the source text had no letters.
    #[error("slug must not be empty")]
    Empty,

    /// The slug contains characters outside `[a-z0-9-]`.
    #[error("slug '{0}' may only contain lowercase letters, digits and hyphens")]
    InvalidCharacters(String),

    /// The slug exceeds the storage limit.
    #[error("slug exceeds {MAX_SLUG_LENGTH} characters")]
    TooLong,
}

/// Validated URL slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Creates a validated slug. Input is trimmed and lowercased first.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError`] when the value is empty, too long, or contains
    /// characters outside `[a-z0-9-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, SlugError> {
        let raw = value.into();
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(SlugError::Empty);
        }
        if normalized.chars().count() > MAX_SLUG_LENGTH {
            return Err(SlugError::TooLong);
        }
        let is_valid = normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !is_valid {
            return Err(SlugError::InvalidCharacters(raw));
        }
        Ok(Self(normalized))
    }

    /// Slugifies `text` and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Empty`] when `text` has nothing to slugify.
    /// Output longer than 255 characters is shortened rather than rejected.
    pub fn generate(slugifier: &dyn Slugifier, text: &str) -> Result<Self, SlugError> {
        let rendered = slugifier.slugify(text);
        Self::new(fit_to_length(rendered.trim(), MAX_SLUG_LENGTH))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Yields `base`, then `base-1`, `base-2`, ... for uniqueness probing.
///
/// When `base-N` would not fit in 255 characters the base is shortened
/// first, so every candidate is a valid [`Slug`].
#[derive(Debug, Clone)]
pub struct SlugCandidates {
    base: Slug,
    counter: u32,
}

impl SlugCandidates {
    /// Starts probing from `base`.
    #[must_use]
    pub const fn new(base: Slug) -> Self {
        Self { base, counter: 0 }
    }
}

impl Iterator for SlugCandidates {
    type Item = Slug;

    fn next(&mut self) -> Option<Self::Item> {
        let candidate = if self.counter == 0 {
            self.base.clone()
        } else {
            let suffix = format!("-{}", self.counter);
            let room = MAX_SLUG_LENGTH.saturating_sub(suffix.len());
            let stem = fit_to_length(self.base.as_str(), room);
            Slug::new(format!("{stem}{suffix}")).ok()?
        };
        self.counter = self.counter.checked_add(1)?;
        Some(candidate)
    }
}
