//! Actor roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownVariant;

/// Portal role of an authenticated actor.
///
/// Wire format: lowercase string (`superadmin`, `partner`, `customer`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Partner,
    Customer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Superadmin, Role::Partner, Role::Customer];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Superadmin => "superadmin",
            Self::Partner => "partner",
            Self::Customer => "customer",
        }
    }

    pub fn is_superadmin(self) -> bool {
        matches!(self, Self::Superadmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Self::Superadmin),
            "partner" => Ok(Self::Partner),
            "customer" => Ok(Self::Customer),
            other => Err(UnknownVariant::new("role", other)),
        }
    }
}

/// Account status of the user behind an actor. Only `Active` accounts may act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl FromStr for AccountStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(UnknownVariant::new("account status", other)),
        }
    }
}
