//! Tenant (restaurant) records.

use serde::{Deserialize, Serialize};

use super::{Slug, TenantId};

/// Lifecycle status of a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    /// Onboarded and taking orders.
    #[default]
    Active,
    /// Signed up, onboarding not finished.
    Pending,
    /// Disabled by a superadmin.
    Suspended,
}

impl std::fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Pending => write!(f, "pending"),
            Self::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for TenantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "pending" => Ok(Self::Pending),
            "suspended" => Ok(Self::Suspended),
            _ => Err(format!("invalid tenant status: {s}")),
        }
    }
}

/// A registered restaurant or merchant.
///
/// Tenants are immutable once loaded; nothing in Tavola creates or edits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub slug: Slug,
    pub name: String,
    #[serde(default)]
    pub status: TenantStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
}

impl Tenant {
    /// Create a tenant with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<TenantId>, slug: Slug, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug,
            name: name.into(),
            status: TenantStatus::default(),
            description: None,
            address: None,
            cuisine: None,
        }
    }

    /// Whether the tenant currently accepts orders.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == TenantStatus::Active
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_minimal_tenant() {
        let tenant: Tenant = serde_json::from_value(json!({
            "id": "m1",
            "slug": "pizzeria-rossi",
            "name": "Pizzeria Rossi"
        }))
        .unwrap();
        assert_eq!(tenant.id.as_str(), "m1");
        assert_eq!(tenant.status, TenantStatus::Active);
        assert!(tenant.is_active());
    }

    #[test]
    fn test_deserialize_rejects_bad_slug() {
        let result = serde_json::from_value::<Tenant>(json!({
            "id": "m1",
            "slug": "Pizzeria Rossi",
            "name": "Pizzeria Rossi"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_status_roundtrip_text() {
        for status in [
            TenantStatus::Active,
            TenantStatus::Pending,
            TenantStatus::Suspended,
        ] {
            assert_eq!(status.to_string().parse::<TenantStatus>().unwrap(), status);
        }
        assert!("closed".parse::<TenantStatus>().is_err());
    }
}
