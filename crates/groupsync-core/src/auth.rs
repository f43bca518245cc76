use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::EnumParseError;

/// Authenticated caller, resolved by the service from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageSystem,
    ManageGroups,
}

impl Permission {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ManageSystem => "manage_system",
            Self::ManageGroups => "manage_groups",
        }
    }
}

impl std::str::FromStr for Permission {
    type Err = EnumParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "manage_system" => Ok(Self::ManageSystem),
            "manage_groups" => Ok(Self::ManageGroups),
            _ => Err(EnumParseError::new("permission", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LicenseFeature {
    Ldap,
    LdapGroups,
    Saml,
}

impl LicenseFeature {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ldap => "ldap",
            Self::LdapGroups => "ldap_groups",
            Self::Saml => "saml",
        }
    }
}

impl std::str::FromStr for LicenseFeature {
    type Err = EnumParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ldap" => Ok(Self::Ldap),
            "ldap_groups" => Ok(Self::LdapGroups),
            "saml" => Ok(Self::Saml),
            _ => Err(EnumParseError::new("license_feature", value)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LicenseFeatures {
    #[serde(default)]
    pub ldap: bool,
    #[serde(default)]
    pub ldap_groups: bool,
    #[serde(default)]
    pub saml: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct License {
    pub id: String,
    #[serde(default)]
    pub features: LicenseFeatures,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl License {
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// An expired license enables nothing.
    #[must_use]
    pub fn has_feature(&self, feature: LicenseFeature) -> bool {
        if self.is_expired_at(Utc::now()) {
            return false;
        }
        match feature {
            LicenseFeature::Ldap => self.features.ldap,
            LicenseFeature::LdapGroups => self.features.ldap_groups,
            LicenseFeature::Saml => self.features.saml,
        }
    }
}
