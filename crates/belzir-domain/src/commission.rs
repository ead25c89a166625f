//! Commission vocabulary.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionKind {
    Purchase,
    Lease,
}

impl CommissionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Lease => "lease",
        }
    }
}

impl FromStr for CommissionKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "purchase" => Ok(Self::Purchase),
            "lease" => Ok(Self::Lease),
            other => Err(UnknownVariant::new("commission kind", other)),
        }
    }
}
