//! Authorization gate.
//!
//! Two declarative tables: which roles may invoke an action, and which
//! employee fields each role may write. Anything not listed is denied.

use belzir_auth_types::identity::Actor;
use belzir_domain::employee::EmployeeStatus;
use belzir_domain::role::Role;

use crate::domain::lifecycle::check_toggle;
use crate::error::PortalError;

use Role::{Customer, Partner, Superadmin};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    EmployeeRead,
    EmployeeCreate,
    EmployeeUpdate,
    EmployeeDelete,
    OnboardingStep2,
    OnboardingComplete,
    OffboardingStart,
    OffboardingReceiveDevice,
    OffboardingComplete,
    DeviceRead,
    DeviceCreate,
    DeviceUpdate,
    DeviceAssign,
    DeviceUnassign,
    DeviceDelete,
    PartnerManage,
    PartnerSelfView,
    CustomerManage,
    CommissionRead,
    CommissionSelfView,
    CommissionDelete,
    AuditRead,
    SettingsRead,
    SettingsUpdate,
}

const ALL: &[Role] = &[Superadmin, Partner, Customer];

const ACTION_ROLES: &[(Action, &[Role])] = &[
    (Action::EmployeeRead, ALL),
    (Action::EmployeeCreate, ALL),
    (Action::EmployeeUpdate, ALL),
    (Action::EmployeeDelete, &[Superadmin]),
    (Action::OnboardingStep2, &[Customer]),
    (Action::OnboardingComplete, &[Superadmin]),
    (Action::OffboardingStart, &[Customer, Partner]),
    (Action::OffboardingReceiveDevice, &[Customer, Superadmin]),
    (Action::OffboardingComplete, &[Customer, Superadmin]),
    (Action::DeviceRead, ALL),
    (Action::DeviceCreate, &[Customer, Superadmin]),
    (Action::DeviceUpdate, &[Customer, Superadmin]),
    (Action::DeviceAssign, &[Customer, Superadmin]),
    (Action::DeviceUnassign, &[Customer, Superadmin]),
    (Action::DeviceDelete, &[Customer, Superadmin]),
    (Action::PartnerManage, &[Superadmin]),
    (Action::PartnerSelfView, &[Partner]),
    (Action::CustomerManage, &[Superadmin]),
    (Action::CommissionRead, &[Superadmin]),
    (Action::CommissionSelfView, &[Partner]),
    (Action::CommissionDelete, &[Superadmin]),
    (Action::AuditRead, &[Superadmin]),
    (Action::SettingsRead, &[Superadmin]),
    (Action::SettingsUpdate, &[Superadmin]),
];

pub fn allowed_roles(action: Action) -> &'static [Role] {
    ACTION_ROLES
        .iter()
        .find(|(a, _)| *a == action)
        .map(|(_, roles)| *roles)
        .unwrap_or(&[])
}

/// Fails with `Forbidden` unless the actor's role may invoke `action`.
pub fn authorize(actor: &Actor, action: Action) -> Result<(), PortalError> {
    if allowed_roles(action).contains(&actor.role) {
        Ok(())
    } else {
        Err(PortalError::Forbidden)
    }
}

/// Writable employee fields, grouped by how they are guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeField {
    /// Name, email, location, job title, department, start date.
    Identity,
    Status,
    OnboardingStep,
    OffboardingStep,
    AccountDisabled,
    DeviceId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Free,
    /// Only the active <-> leave toggle, checked against the current status.
    StatusToggle,
    Denied,
}

const FIELD_RULES: &[(Role, EmployeeField, FieldRule)] = &[
    (Superadmin, EmployeeField::Identity, FieldRule::Free),
    (Superadmin, EmployeeField::Status, FieldRule::Free),
    (Superadmin, EmployeeField::OnboardingStep, FieldRule::Free),
    (Superadmin, EmployeeField::OffboardingStep, FieldRule::Free),
    (Superadmin, EmployeeField::AccountDisabled, FieldRule::Free),
    (Superadmin, EmployeeField::DeviceId, FieldRule::Free),
    (Partner, EmployeeField::Identity, FieldRule::Free),
    (Partner, EmployeeField::Status, FieldRule::StatusToggle),
    (Customer, EmployeeField::Identity, FieldRule::Free),
    (Customer, EmployeeField::Status, FieldRule::StatusToggle),
];

pub fn field_rule(role: Role, field: EmployeeField) -> FieldRule {
    FIELD_RULES
        .iter()
        .find(|(r, f, _)| *r == role && *f == field)
        .map(|(_, _, rule)| *rule)
        .unwrap_or(FieldRule::Denied)
}

/// Check a write of `field` by `role` against an employee currently in `current`.
///
/// `next_status` is only consulted for [`EmployeeField::Status`].
pub fn check_field(
    role: Role,
    field: EmployeeField,
    current: EmployeeStatus,
    next_status: Option<EmployeeStatus>,
) -> Result<(), PortalError> {
    match field_rule(role, field) {
        FieldRule::Free => Ok(()),
        FieldRule::Denied => Err(PortalError::Forbidden),
        FieldRule::StatusToggle => match next_status {
            Some(next) => check_toggle(current, next),
            None => Ok(()),
        },
    }
}
