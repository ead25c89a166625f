//! Out-of-band repair of device/employee links and lifecycle fields.
//!
//! Not part of any request path; run through `tools/reconcile`.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use belzir_domain::device::DeviceStatus;

use crate::domain::lifecycle::{LifecycleFields, StatusOverrides, normalize_for_status};
use crate::domain::repository::{AuditRepository, DeviceRepository, EmployeeRepository};
use crate::domain::scope::Visibility;
use crate::domain::types::{AuditEntry, Device, DeviceMove, Employee, LifecycleWrite};
use crate::error::PortalError;
use crate::usecase::audit::record;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub dry_run: bool,
    pub devices_scanned: usize,
    pub employees_scanned: usize,
    /// Devices returned to available because nobody points back at them.
    pub devices_released: Vec<Uuid>,
    /// Employees whose `device_id` was dropped.
    pub employees_cleared: Vec<Uuid>,
    /// Employees whose steps or status-dependent fields were normalized.
    pub employees_normalized: Vec<Uuid>,
}

impl ReconcileReport {
    pub fn repairs(&self) -> usize {
        self.devices_released.len() + self.employees_cleared.len() + self.employees_normalized.len()
    }
}

/// A device is consistent when it is either free, or assigned to an existing
/// employee whose `device_id` points back at it.
fn device_is_consistent(device: &Device, employees: &HashMap<Uuid, &Employee>) -> bool {
    match (device.status, device.assigned_employee_id) {
        (DeviceStatus::Available, None) => true,
        (DeviceStatus::Assigned, Some(holder)) => employees
            .get(&holder)
            .is_some_and(|e| e.device_id == Some(device.id)),
        _ => false,
    }
}

fn repair_move(device: &Device) -> DeviceMove {
    match (device.status, device.assigned_employee_id) {
        (DeviceStatus::Assigned, Some(employee_id)) => DeviceMove::Release {
            device_id: device.id,
            employee_id,
        },
        _ => DeviceMove::Reset {
            device_id: device.id,
        },
    }
}

/// Normalized lifecycle fields, when the stored ones break the step invariant.
fn normalized_fields(employee: &Employee) -> Option<LifecycleFields> {
    let current = LifecycleFields::of(employee);
    if current.is_consistent() {
        return None;
    }
    let keep_access = StatusOverrides {
        account_disabled: Some(employee.account_disabled),
        ..Default::default()
    };
    let fields = normalize_for_status(
        employee.status,
        StatusOverrides {
            onboarding_step: employee.onboarding_step,
            offboarding_step: employee.offboarding_step,
            ..keep_access
        },
    )
    .or_else(|_| normalize_for_status(employee.status, keep_access))
    .ok()?;
    Some(fields)
}

pub struct ReconcileUseCase<E: EmployeeRepository, D: DeviceRepository, A: AuditRepository> {
    pub employees: E,
    pub devices: D,
    pub audit: A,
}

impl<E: EmployeeRepository, D: DeviceRepository, A: AuditRepository> ReconcileUseCase<E, D, A> {
    pub async fn execute(&self, dry_run: bool) -> Result<ReconcileReport, PortalError> {
        let employees = self.employees.list(&Visibility::All).await?;
        let devices = self.devices.list(&Visibility::All).await?;

        let mut report = ReconcileReport {
            dry_run,
            devices_scanned: devices.len(),
            employees_scanned: employees.len(),
            ..Default::default()
        };

        // Devices first: a released device must not count as a valid target below.
        let by_employee: HashMap<Uuid, &Employee> = employees.iter().map(|e| (e.id, e)).collect();
        let mut healthy: HashMap<Uuid, &Device> = HashMap::new();
        for device in &devices {
            if device_is_consistent(device, &by_employee) {
                healthy.insert(device.id, device);
                continue;
            }
            tracing::warn!(
                device_id = %device.id,
                status = %device.status,
                assigned_employee_id = ?device.assigned_employee_id,
                dry_run,
                "device has no matching back-reference, releasing"
            );
            report.devices_released.push(device.id);
            if dry_run {
                continue;
            }
            self.employees
                .apply(&LifecycleWrite {
                    employee: None,
                    device_moves: vec![repair_move(device)],
                    commission: None,
                })
                .await?;
            record(
                &self.audit,
                AuditEntry::new(None, "reconcile.device.release", "device", Some(device.id))
                    .before(device)
                    .after(&device.released()),
            )
            .await;
        }

        for employee in &employees {
            let dangling = employee.device_id.is_some_and(|device_id| {
                healthy
                    .get(&device_id)
                    .is_none_or(|d| d.assigned_employee_id != Some(employee.id))
            });
            let normalized = normalized_fields(employee);
            if !dangling && normalized.is_none() {
                continue;
            }

            let mut repaired = employee.clone();
            if dangling {
                tracing::warn!(
                    employee_id = %employee.id,
                    device_id = ?employee.device_id,
                    dry_run,
                    "employee points at a device it does not hold, clearing"
                );
                report.employees_cleared.push(employee.id);
                repaired.device_id = None;
            }
            if let Some(fields) = normalized {
                tracing::warn!(
                    employee_id = %employee.id,
                    status = %employee.status,
                    dry_run,
                    "employee lifecycle fields inconsistent, normalizing"
                );
                report.employees_normalized.push(employee.id);
                fields.write_to(&mut repaired);
            }
            if dry_run {
                continue;
            }

            repaired.updated_at = Utc::now();
            self.employees
                .apply(&LifecycleWrite {
                    employee: Some(repaired.clone()),
                    ..Default::default()
                })
                .await?;
            let mut repairs = Vec::new();
            if dangling {
                repairs.push("clear_device");
            }
            if normalized.is_some() {
                repairs.push("normalize");
            }
            record(
                &self.audit,
                AuditEntry::new(None, "reconcile.employee.repair", "employee", Some(employee.id))
                    .before(employee)
                    .after(&repaired)
                    .meta(json!({ "repairs": repairs })),
            )
            .await;
        }

        tracing::info!(
            dry_run,
            repairs = report.repairs(),
            devices_scanned = report.devices_scanned,
            employees_scanned = report.employees_scanned,
            "reconciliation finished"
        );
        Ok(report)
    }
}
