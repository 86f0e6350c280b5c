//! Text helpers shared by articles and pages.

use super::ContentDomainError;

/// Length of an excerpt derived from article content.
pub const EXCERPT_LENGTH: usize = 200;

const ELLIPSIS: &str = "...";

/// Trims `value` and rejects blanks and values over `max` characters.
pub(super) fn required(
    field: &'static str,
    value: &str,
    max: Option<usize>,
) -> Result<String, ContentDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ContentDomainError::EmptyField { field });
    }
    check_length(field, trimmed, max)?;
    Ok(trimmed.to_owned())
}

/// Trims `value`, mapping blanks to `None` and rejecting values over `max`.
pub(super) fn optional(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ContentDomainError> {
    match value.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => {
            check_length(field, text, Some(max))?;
            Ok(Some(text.to_owned()))
        }
        None => Ok(None),
    }
}

fn check_length(field: &'static str, value: &str, max: Option<usize>) -> Result<(), ContentDomainError> {
    match max {
        Some(limit) if value.chars().count() > limit => {
            Err(ContentDomainError::FieldTooLong { field, max: limit })
        }
        _ => Ok(()),
    }
}

/// Shortens `text` to at most `max` characters, ending in `...` when cut.
///
/// ```
/// use taskboard::content::domain::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("short", 60), "short");
/// assert_eq!(truncate_with_ellipsis("abcdefgh", 6), "abc...");
/// ```
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut shortened: String = text.chars().take(keep).collect();
    shortened.push_str(ELLIPSIS);
    shortened
}

/// Removes everything between `<` and the next `>`.
///
/// An unterminated `<` is kept as text.
#[must_use]
pub fn strip_html_tags(html: &str) -> String {
    let mut plain = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        let (before, tag_and_after) = rest.split_at(open);
        plain.push_str(before);
        match tag_and_after.find('>') {
            Some(close) => {
                let (_, after) = tag_and_after.split_at(close.saturating_add(1));
                rest = after;
            }
            None => {
                plain.push_str(tag_and_after);
                rest = "";
            }
        }
    }
    plain.push_str(rest);
    plain
}

/// Builds an excerpt from HTML content.
#[must_use]
pub fn derive_excerpt(content: &str) -> String {
    let plain = strip_html_tags(content);
    truncate_with_ellipsis(plain.trim(), EXCERPT_LENGTH)
}
