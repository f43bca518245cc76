use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of resource a group can be synced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum GroupSyncableType {
    Team,
    Channel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GroupSource {
    #[default]
    Ldap,
    Saml,
}

#[derive(Debug)]
pub struct EnumParseError {
    enum_name: &'static str,
    value: String,
}

impl EnumParseError {
    pub(crate) fn new(enum_name: &'static str, value: impl Into<String>) -> Self {
        Self {
            enum_name,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for EnumParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} value: {}", self.enum_name, self.value)
    }
}

impl std::error::Error for EnumParseError {}

impl GroupSyncableType {
    pub const ALL: [Self; 2] = [Self::Team, Self::Channel];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Team => "Team",
            Self::Channel => "Channel",
        }
    }

    /// Name of the path parameter carrying the syncable id.
    #[must_use]
    pub const fn param_name(&self) -> &'static str {
        match self {
            Self::Team => "team_id",
            Self::Channel => "channel_id",
        }
    }

    #[must_use]
    pub const fn route_segment(&self) -> &'static str {
        match self {
            Self::Team => "teams",
            Self::Channel => "channels",
        }
    }

    /// `Team|Channel`, used when naming an expected payload shape.
    #[must_use]
    pub fn alternatives() -> String {
        Self::ALL
            .iter()
            .map(Self::as_str)
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl std::fmt::Display for GroupSyncableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GroupSyncableType {
    type Err = EnumParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Team" => Ok(Self::Team),
            "Channel" => Ok(Self::Channel),
            _ => Err(EnumParseError::new("group_syncable_type", value)),
        }
    }
}

impl GroupSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ldap => "ldap",
            Self::Saml => "saml",
        }
    }
}

impl std::str::FromStr for GroupSource {
    type Err = EnumParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ldap" => Ok(Self::Ldap),
            "saml" => Ok(Self::Saml),
            _ => Err(EnumParseError::new("group_source", value)),
        }
    }
}
