//! Employee lifecycle vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownVariant;

/// Lifecycle status of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Onboarding,
    Active,
    Offboarding,
    Leave,
    Archived,
}

impl EmployeeStatus {
    pub const ALL: [EmployeeStatus; 5] = [
        EmployeeStatus::Onboarding,
        EmployeeStatus::Active,
        EmployeeStatus::Offboarding,
        EmployeeStatus::Leave,
        EmployeeStatus::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Onboarding => "onboarding",
            Self::Active => "active",
            Self::Offboarding => "offboarding",
            Self::Leave => "leave",
            Self::Archived => "archived",
        }
    }

    /// Whether a device may be assigned to an employee in this status.
    pub fn accepts_device(self) -> bool {
        !matches!(self, Self::Archived | Self::Offboarding)
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "onboarding" => Ok(Self::Onboarding),
            "active" => Ok(Self::Active),
            "offboarding" => Ok(Self::Offboarding),
            "leave" => Ok(Self::Leave),
            "archived" => Ok(Self::Archived),
            other => Err(UnknownVariant::new("employee status", other)),
        }
    }
}

/// How the device for a new employee is acquired, chosen at onboarding step 2.
///
/// Wire format: `u8` (1 = inventory, 2 = purchase, 3 = lease, 4 = independent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AcquisitionOption {
    /// Select a device from the customer's own or the pooled inventory.
    Inventory = 1,
    /// Buy a device from the Belzir catalog.
    Purchase = 2,
    /// Lease a device through Belzir or a third party.
    Lease = 3,
    /// Customer buys or leases independently.
    Independent = 4,
}

impl AcquisitionOption {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::Inventory),
            2 => Some(Self::Purchase),
            3 => Some(Self::Lease),
            4 => Some(Self::Independent),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for AcquisitionOption {
    type Error = UnknownVariant;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Self::from_u8(v).ok_or_else(|| UnknownVariant::new("acquisition option", &v.to_string()))
    }
}

impl From<AcquisitionOption> for u8 {
    fn from(option: AcquisitionOption) -> Self {
        option.as_u8()
    }
}
