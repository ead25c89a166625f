use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use belzir_auth_types::identity::Actor;
use belzir_domain::commission::CommissionKind;
use belzir_domain::device::{DeviceOs, DeviceStatus, OwnerType};
use belzir_domain::employee::{AcquisitionOption, EmployeeStatus};
use belzir_domain::record::RecordStatus;
use belzir_domain::role::Role;

/// Reseller partner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    pub status: RecordStatus,
    /// Fraction (0..=1) of the base commission amount credited to this partner.
    pub commission_rate: f64,
    #[serde(serialize_with = "belzir_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "belzir_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

/// Customer organization owned by one partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: Uuid,
    pub partner_id: Uuid,
    pub name: String,
    pub status: RecordStatus,
    #[serde(serialize_with = "belzir_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "belzir_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

/// Employee of a customer together with its lifecycle fields.
///
/// At most one of `onboarding_step` / `offboarding_step` is set, and only while
/// `status` is the matching workflow status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub location: String,
    pub job_title: Option<String>,
    pub department: Option<String>,
    #[serde(serialize_with = "belzir_core::serde::to_rfc3339_ms_opt")]
    pub start_date: Option<DateTime<Utc>>,
    pub status: EmployeeStatus,
    pub onboarding_step: Option<u8>,
    pub offboarding_step: Option<u8>,
    pub device_acquisition_option: Option<AcquisitionOption>,
    pub device_id: Option<Uuid>,
    pub setup_approved: bool,
    pub device_approved: bool,
    pub account_disabled: bool,
    #[serde(serialize_with = "belzir_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "belzir_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

/// Inventory device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub id: Uuid,
    pub name: String,
    pub os: DeviceOs,
    pub owner_type: OwnerType,
    /// Set iff `owner_type` is `Customer`.
    pub customer_id: Option<Uuid>,
    pub status: DeviceStatus,
    /// Set iff `status` is `Assigned`.
    pub assigned_employee_id: Option<Uuid>,
    pub cyber_protection_enabled: bool,
    pub encryption_enabled: bool,
    #[serde(serialize_with = "belzir_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "belzir_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl Device {
    pub fn is_pooled(&self) -> bool {
        self.owner_type == OwnerType::Belzir
    }

    pub fn is_owned_by(&self, customer_id: Uuid) -> bool {
        self.owner_type == OwnerType::Customer && self.customer_id == Some(customer_id)
    }

    /// Available and not held by anyone.
    pub fn is_free(&self) -> bool {
        self.status == DeviceStatus::Available && self.assigned_employee_id.is_none()
    }

    pub fn assigned_to(&self, employee_id: Uuid) -> Self {
        Self {
            status: DeviceStatus::Assigned,
            assigned_employee_id: Some(employee_id),
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    pub fn released(&self) -> Self {
        Self {
            status: DeviceStatus::Available,
            assigned_employee_id: None,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }
}

/// Commission credited to a partner. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commission {
    pub id: Uuid,
    pub partner_id: Uuid,
    pub customer_id: Uuid,
    pub employee_id: Uuid,
    pub device_id: Option<Uuid>,
    pub kind: CommissionKind,
    pub amount: i64,
    #[serde(serialize_with = "belzir_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

/// One audit trail record. `actor_*` are `None` for system actions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub actor_user_id: Option<Uuid>,
    pub actor_role: Option<Role>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
    pub meta: Option<serde_json::Value>,
    #[serde(serialize_with = "belzir_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        actor: Option<&Actor>,
        action: &str,
        entity_type: &str,
        entity_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            actor_user_id: actor.map(|a| a.user_id),
            actor_role: actor.map(|a| a.role),
            action: action.to_owned(),
            entity_type: entity_type.to_owned(),
            entity_id,
            before: None,
            after: None,
            meta: None,
            created_at: Utc::now(),
        }
    }

    pub fn before<T: Serialize>(mut self, snapshot: &T) -> Self {
        self.before = serde_json::to_value(snapshot).ok();
        self
    }

    pub fn after<T: Serialize>(mut self, snapshot: &T) -> Self {
        self.after = serde_json::to_value(snapshot).ok();
        self
    }

    pub fn meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Portal-wide settings singleton.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSettings {
    pub company_name: String,
    pub support_email: String,
    pub default_partner_commission_rate: f64,
    pub maintenance_mode: bool,
    #[serde(serialize_with = "belzir_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            company_name: "Belzir".to_owned(),
            support_email: "support@belzir.dev".to_owned(),
            default_partner_commission_rate: 0.05,
            maintenance_mode: false,
            updated_at: Utc::now(),
        }
    }
}

/// One side of a device/employee link change, applied by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceMove {
    /// Conditional: fails unless the device is still available and unheld.
    Claim { device_id: Uuid, employee_id: Uuid },
    /// Conditional on `employee_id` still holding the device; a miss is ignored.
    Release { device_id: Uuid, employee_id: Uuid },
    /// Unconditional return to available; repair only.
    Reset { device_id: Uuid },
}

impl DeviceMove {
    pub fn device_id(&self) -> Uuid {
        match *self {
            Self::Claim { device_id, .. }
            | Self::Release { device_id, .. }
            | Self::Reset { device_id } => device_id,
        }
    }
}

/// Everything one lifecycle step persists, applied as a single atomic unit.
#[derive(Debug, Clone, Default)]
pub struct LifecycleWrite {
    pub employee: Option<Employee>,
    pub device_moves: Vec<DeviceMove>,
    pub commission: Option<Commission>,
}

/// Per-customer rollup for the partner dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSummary {
    pub customer_id: Uuid,
    pub customer_name: String,
    pub employees_by_status: std::collections::BTreeMap<String, u64>,
    pub commission_total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerDashboard {
    pub partner_id: Uuid,
    pub customers: Vec<CustomerSummary>,
    pub employees_by_status: std::collections::BTreeMap<String, u64>,
    pub commission_total: i64,
}
