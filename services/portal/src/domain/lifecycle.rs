//! Employee lifecycle state machine.
//!
//! Every function here is pure: it checks the current state of an
//! [`Employee`] and mutates it in place, or fails with `InvalidTransition`
//! naming the state it expected. Persistence and device moves are the
//! caller's job.

use chrono::Utc;
use uuid::Uuid;

use belzir_domain::employee::{AcquisitionOption, EmployeeStatus};

use crate::domain::types::Employee;
use crate::error::PortalError;

pub const MAX_ONBOARDING_STEP: u8 = 2;
pub const MAX_OFFBOARDING_STEP: u8 = 3;

/// The status-dependent part of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleFields {
    pub status: EmployeeStatus,
    pub onboarding_step: Option<u8>,
    pub offboarding_step: Option<u8>,
    pub account_disabled: bool,
}

impl LifecycleFields {
    pub fn of(employee: &Employee) -> Self {
        Self {
            status: employee.status,
            onboarding_step: employee.onboarding_step,
            offboarding_step: employee.offboarding_step,
            account_disabled: employee.account_disabled,
        }
    }

    pub fn write_to(self, employee: &mut Employee) {
        employee.status = self.status;
        employee.onboarding_step = self.onboarding_step;
        employee.offboarding_step = self.offboarding_step;
        employee.account_disabled = self.account_disabled;
    }

    /// At most one step is set, and only for the matching workflow status.
    pub fn is_consistent(&self) -> bool {
        let onboarding_ok = match self.status {
            EmployeeStatus::Onboarding => self
                .onboarding_step
                .is_some_and(|s| (1..=MAX_ONBOARDING_STEP).contains(&s)),
            _ => self.onboarding_step.is_none(),
        };
        let offboarding_ok = match self.status {
            EmployeeStatus::Offboarding => self
                .offboarding_step
                .is_some_and(|s| (1..=MAX_OFFBOARDING_STEP).contains(&s)),
            _ => self.offboarding_step.is_none(),
        };
        onboarding_ok && offboarding_ok
    }
}

/// Values a caller set explicitly; anything left `None` takes the status default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusOverrides {
    pub onboarding_step: Option<u8>,
    pub offboarding_step: Option<u8>,
    pub account_disabled: Option<bool>,
}

/// Derive the consistent lifecycle fields for `status`.
///
/// - `onboarding`: offboarding step cleared, onboarding step defaults to 1.
/// - `offboarding`: onboarding step cleared, offboarding step defaults to 1,
///   account disabled by default.
/// - `active` / `leave`: both steps cleared.
/// - `archived`: both steps cleared, account disabled by default.
pub fn normalize_for_status(
    status: EmployeeStatus,
    overrides: StatusOverrides,
) -> Result<LifecycleFields, PortalError> {
    let check = |step: Option<u8>, max: u8, name: &str| match step {
        Some(s) if !(1..=max).contains(&s) => Err(PortalError::validation(format!(
            "{name} must be between 1 and {max}"
        ))),
        _ => Ok(step),
    };
    let onboarding_step = check(overrides.onboarding_step, MAX_ONBOARDING_STEP, "onboarding_step")?;
    let offboarding_step =
        check(overrides.offboarding_step, MAX_OFFBOARDING_STEP, "offboarding_step")?;

    let fields = match status {
        EmployeeStatus::Onboarding => LifecycleFields {
            status,
            onboarding_step: Some(onboarding_step.unwrap_or(1)),
            offboarding_step: None,
            account_disabled: overrides.account_disabled.unwrap_or(false),
        },
        EmployeeStatus::Offboarding => LifecycleFields {
            status,
            onboarding_step: None,
            offboarding_step: Some(offboarding_step.unwrap_or(1)),
            account_disabled: overrides.account_disabled.unwrap_or(true),
        },
        EmployeeStatus::Active | EmployeeStatus::Leave => LifecycleFields {
            status,
            onboarding_step: None,
            offboarding_step: None,
            account_disabled: overrides.account_disabled.unwrap_or(false),
        },
        EmployeeStatus::Archived => LifecycleFields {
            status,
            onboarding_step: None,
            offboarding_step: None,
            account_disabled: overrides.account_disabled.unwrap_or(true),
        },
    };
    Ok(fields)
}

/// Status changes open to partner and customer actors.
const TOGGLES: [(EmployeeStatus, EmployeeStatus); 2] = [
    (EmployeeStatus::Active, EmployeeStatus::Leave),
    (EmployeeStatus::Leave, EmployeeStatus::Active),
];

/// Check a non-superadmin status change. Re-sending the current status is a no-op.
pub fn check_toggle(current: EmployeeStatus, next: EmployeeStatus) -> Result<(), PortalError> {
    if current == next || TOGGLES.contains(&(current, next)) {
        return Ok(());
    }
    Err(PortalError::invalid_transition(format!(
        "cannot change status from {current} to {next}; only active <-> leave is allowed"
    )))
}

// ── Onboarding ───────────────────────────────────────────────────────────────

/// The choices submitted at onboarding step 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step2Choice {
    pub option: AcquisitionOption,
    pub device_id: Option<Uuid>,
    pub device_approved: bool,
    pub setup_approved: bool,
}

pub fn submit_onboarding_step2(
    employee: &mut Employee,
    choice: &Step2Choice,
) -> Result<(), PortalError> {
    if employee.status != EmployeeStatus::Onboarding || employee.onboarding_step != Some(1) {
        return Err(PortalError::invalid_transition(
            "expected status=onboarding and onboarding_step=1",
        ));
    }
    employee.device_acquisition_option = Some(choice.option);
    employee.device_approved = choice.device_approved;
    employee.setup_approved = choice.setup_approved;
    employee.onboarding_step = Some(2);
    if let Some(device_id) = choice.device_id {
        employee.device_id = Some(device_id);
    }
    employee.updated_at = Utc::now();
    Ok(())
}

pub fn complete_onboarding(employee: &mut Employee) -> Result<(), PortalError> {
    if employee.status != EmployeeStatus::Onboarding || employee.onboarding_step != Some(2) {
        return Err(PortalError::invalid_transition(
            "expected status=onboarding and onboarding_step=2",
        ));
    }
    if !employee.device_approved || !employee.setup_approved {
        return Err(PortalError::invalid_transition(
            "expected device_approved and setup_approved",
        ));
    }
    employee.status = EmployeeStatus::Active;
    employee.onboarding_step = None;
    employee.updated_at = Utc::now();
    Ok(())
}

// ── Offboarding ──────────────────────────────────────────────────────────────

/// Starts offboarding and disables the account immediately.
pub fn start_offboarding(employee: &mut Employee) -> Result<(), PortalError> {
    if employee.status != EmployeeStatus::Active {
        return Err(PortalError::invalid_transition("expected status=active"));
    }
    employee.status = EmployeeStatus::Offboarding;
    employee.onboarding_step = None;
    employee.offboarding_step = Some(1);
    employee.account_disabled = true;
    employee.updated_at = Utc::now();
    Ok(())
}

/// Advances to step 2 and detaches the held device. Returns the device to release.
pub fn receive_device(employee: &mut Employee) -> Result<Option<Uuid>, PortalError> {
    if employee.status != EmployeeStatus::Offboarding
        || employee.offboarding_step != Some(1)
        || !employee.account_disabled
    {
        return Err(PortalError::invalid_transition(
            "expected status=offboarding, offboarding_step=1 and account_disabled",
        ));
    }
    employee.offboarding_step = Some(2);
    employee.updated_at = Utc::now();
    Ok(employee.device_id.take())
}

/// Finishes offboarding as `archived`, or back to `active` when `archive` is false.
///
/// `account_disabled` is left as is in both cases.
pub fn complete_offboarding(employee: &mut Employee, archive: bool) -> Result<(), PortalError> {
    if employee.status != EmployeeStatus::Offboarding
        || employee.offboarding_step != Some(2)
        || !employee.account_disabled
    {
        return Err(PortalError::invalid_transition(
            "expected status=offboarding, offboarding_step=2 and account_disabled",
        ));
    }
    employee.status = if archive {
        EmployeeStatus::Archived
    } else {
        EmployeeStatus::Active
    };
    // Step 3 is terminal; the step field is cleared once status leaves offboarding.
    employee.offboarding_step = None;
    employee.updated_at = Utc::now();
    Ok(())
}
