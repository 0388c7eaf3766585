//! Tenant directory and URL resolution.
//!
//! A visit is scoped to a tenant by the URL it was opened with. Three URL
//! shapes are recognised, tried in this order:
//!
//! 1. Query parameter: `https://tavola.app/?merchant=bar-centrale`
//! 2. First path segment: `https://tavola.app/bar-centrale/menu`
//! 3. Subdomain: `https://bar-centrale.tavola.app/`
//!
//! The first source naming a known slug wins. Sources are not cross-checked:
//! `/pizzeria-rossi?merchant=bar-centrale` resolves to Bar Centrale.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;
use tracing::instrument;
use url::Url;

use tavola_core::{Slug, Tenant, TenantId};

/// Tenants shipped with the binary, used when no tenant file is configured.
const BUILTIN_TENANTS: &str = include_str!("../data/tenants.json");

/// Default query parameter carrying a tenant slug.
pub const DEFAULT_TENANT_PARAM: &str = "merchant";

/// Default query parameter carrying a table number.
pub const DEFAULT_TABLE_PARAM: &str = "table";

/// Errors loading a tenant list.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read tenant file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid tenant list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate tenant slug: {0}")]
    DuplicateSlug(Slug),
    #[error("duplicate tenant id: {0}")]
    DuplicateId(TenantId),
}

// =============================================================================
// Directory
// =============================================================================

/// The static list of known tenants.
#[derive(Debug, Clone)]
pub struct TenantDirectory {
    tenants: Vec<Tenant>,
}

impl TenantDirectory {
    /// Build a directory from a tenant list.
    ///
    /// # Errors
    ///
    /// Returns an error if two tenants share a slug or an ID.
    pub fn new(tenants: Vec<Tenant>) -> Result<Self, DirectoryError> {
        let mut slugs = HashSet::new();
        let mut ids = HashSet::new();
        for tenant in &tenants {
            if !slugs.insert(&tenant.slug) {
                return Err(DirectoryError::DuplicateSlug(tenant.slug.clone()));
            }
            if !ids.insert(&tenant.id) {
                return Err(DirectoryError::DuplicateId(tenant.id.clone()));
            }
        }
        Ok(Self { tenants })
    }

    /// The tenant list compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded list is malformed.
    pub fn builtin() -> Result<Self, DirectoryError> {
        Self::from_json(BUILTIN_TENANTS)
    }

    /// Parse a JSON array of tenants.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, a slug is invalid, or a
    /// slug or ID repeats.
    pub fn from_json(json: &str) -> Result<Self, DirectoryError> {
        let tenants: Vec<Tenant> = serde_json::from_str(json)?;
        Self::new(tenants)
    }

    /// Load a JSON array of tenants from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_file(path: &Path) -> Result<Self, DirectoryError> {
        let json = std::fs::read_to_string(path).map_err(|source| DirectoryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let directory = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), tenants = directory.len(), "Tenant list loaded");
        Ok(directory)
    }

    /// Tenant with exactly this slug.
    #[must_use]
    pub fn by_slug(&self, slug: &str) -> Option<&Tenant> {
        self.tenants.iter().find(|t| t.slug.as_str() == slug)
    }

    /// Tenant with this ID.
    #[must_use]
    pub fn by_id(&self, id: &TenantId) -> Option<&Tenant> {
        self.tenants.iter().find(|t| &t.id == id)
    }

    /// All tenants in list order.
    pub fn iter(&self) -> impl Iterator<Item = &Tenant> {
        self.tenants.iter()
    }

    /// Number of tenants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    /// Whether the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Names of the query parameters the resolver reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverParams {
    pub tenant_param: String,
    pub table_param: String,
}

impl Default for ResolverParams {
    fn default() -> Self {
        Self {
            tenant_param: DEFAULT_TENANT_PARAM.to_owned(),
            table_param: DEFAULT_TABLE_PARAM.to_owned(),
        }
    }
}

/// Which part of the URL named the tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantSource {
    QueryParam,
    PathSegment,
    Subdomain,
}

impl std::fmt::Display for TenantSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QueryParam => write!(f, "query parameter"),
            Self::PathSegment => write!(f, "path segment"),
            Self::Subdomain => write!(f, "subdomain"),
        }
    }
}

/// A tenant found in a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub tenant: &'a Tenant,
    pub source: TenantSource,
}

/// Resolves tenants and tables from URLs against a [`TenantDirectory`].
#[derive(Debug, Clone)]
pub struct TenantResolver {
    directory: TenantDirectory,
    params: ResolverParams,
}

impl TenantResolver {
    /// Create a resolver.
    #[must_use]
    pub const fn new(directory: TenantDirectory, params: ResolverParams) -> Self {
        Self { directory, params }
    }

    /// The underlying directory.
    #[must_use]
    pub const fn directory(&self) -> &TenantDirectory {
        &self.directory
    }

    /// The query parameter names in use.
    #[must_use]
    pub const fn params(&self) -> &ResolverParams {
        &self.params
    }

    /// Find the tenant a URL points at.
    ///
    /// Tries the tenant query parameter, then the first path segment, then
    /// the leading hostname label (only when the host has more than two
    /// labels). Returns the first candidate that is a known slug.
    #[must_use]
    #[instrument(level = "debug", skip_all, fields(url = %url))]
    pub fn resolve_from_url(&self, url: &Url) -> Option<Resolution<'_>> {
        let candidates = [
            (TenantSource::QueryParam, query_value(url, &self.params.tenant_param)),
            (TenantSource::PathSegment, first_path_segment(url)),
            (TenantSource::Subdomain, subdomain(url)),
        ];

        let resolution = candidates.into_iter().find_map(|(source, candidate)| {
            let tenant = self.directory.by_slug(candidate.as_deref()?)?;
            Some(Resolution { tenant, source })
        });

        match &resolution {
            Some(r) => tracing::debug!(tenant = %r.tenant.slug, source = %r.source, "Tenant resolved"),
            None => tracing::debug!("No tenant in URL"),
        }
        resolution
    }

    /// Table number from the table query parameter.
    ///
    /// Absent, empty, or not an unsigned integer yields `None`.
    #[must_use]
    pub fn resolve_table_number(&self, url: &Url) -> Option<u32> {
        query_value(url, &self.params.table_param)?
            .trim()
            .parse()
            .ok()
    }

    /// Whether no known tenant uses `slug`.
    #[must_use]
    pub fn is_slug_available(&self, slug: &str) -> bool {
        self.directory.by_slug(slug).is_none()
    }
}

/// First value of query parameter `param`.
fn query_value(url: &Url, param: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
}

/// First path segment, if non-empty.
fn first_path_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
}

/// Leading label of a domain host with more than two labels.
fn subdomain(url: &Url) -> Option<String> {
    let host = url.domain()?;
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() > 2 {
        labels.first().map(|label| (*label).to_owned())
    } else {
        None
    }
}

/// Parse a URL, resolving relative input (`/bar-centrale`, `?table=5`) against `base`.
///
/// # Errors
///
/// Returns `url::ParseError` if the input is not a valid URL reference.
pub fn parse_url(raw: &str, base: &Url) -> Result<Url, url::ParseError> {
    Url::options().base_url(Some(base)).parse(raw)
}
