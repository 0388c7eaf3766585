//! URL slugs for tenants.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Characters that survive slugification: ASCII word characters, whitespace, hyphens.
static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_\s-]").expect("Invalid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

static HYPHENS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("Invalid regex"));

static SLUG_FORMAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("Invalid regex"));

/// Derive a slug from a human-readable name.
///
/// Lowercases, drops everything except ASCII word characters, whitespace and
/// hyphens, turns whitespace runs into a single hyphen, collapses repeated
/// hyphens and trims hyphens from both ends. Total and idempotent.
///
/// ```
/// use tavola_core::slugify;
///
/// assert_eq!(slugify("Pizzeria Rossi!!"), "pizzeria-rossi");
/// assert_eq!(slugify("  Bar -- Centrale "), "bar-centrale");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    let stripped = DISALLOWED_RE.replace_all(&lower, "");
    let hyphenated = WHITESPACE_RE.replace_all(&stripped, "-");
    let collapsed = HYPHENS_RE.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_owned()
}

/// Whether `slug` is lowercase alphanumeric groups joined by single hyphens.
#[must_use]
pub fn is_valid_slug_format(slug: &str) -> bool {
    SLUG_FORMAT_RE.is_match(slug)
}

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input string is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input is not lowercase alphanumerics separated by single hyphens.
    #[error("invalid slug format: {0}")]
    InvalidFormat(String),
}

/// A validated tenant slug such as `bar-centrale`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Parse a `Slug` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or does not match
    /// `^[a-z0-9]+(-[a-z0-9]+)*$`.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        if !is_valid_slug_format(s) {
            return Err(SlugError::InvalidFormat(s.to_owned()));
        }
        Ok(Self(s.to_owned()))
    }

    /// Slugify a display name and validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing slug-worthy is left of the name, or if it
    /// keeps an underscore (valid for [`slugify`] but not for a slug).
    pub fn from_name(name: &str) -> Result<Self, SlugError> {
        Self::parse(&slugify(name))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
