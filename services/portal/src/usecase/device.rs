use chrono::Utc;
use uuid::Uuid;

use belzir_auth_types::identity::Actor;
use belzir_domain::device::{DeviceOs, DeviceStatus, OwnerType};
use belzir_domain::role::Role;

use crate::domain::capability::{Action, authorize};
use crate::domain::repository::{
    AuditRepository, CustomerRepository, DeviceRepository, EmployeeRepository,
};
use crate::domain::scope::Visibility;
use crate::domain::types::{AuditEntry, Device, DeviceMove, Employee, LifecycleWrite};
use crate::error::PortalError;
use crate::usecase::audit::record;
use crate::usecase::employee::visible_employee;
use crate::usecase::scope::resolve_visibility;

/// Load a device the actor can see; anything else is `NotFound`.
pub(crate) async fn visible_device<D: DeviceRepository>(
    devices: &D,
    visibility: &Visibility,
    id: Uuid,
) -> Result<Device, PortalError> {
    devices
        .find_by_id(id)
        .await?
        .filter(|d| visibility.sees_device(d))
        .ok_or(PortalError::NotFound("device"))
}

/// Preconditions of Assign, and the moves that carry it out: the employee's
/// previous device (if any) is released before the new one is claimed.
pub fn plan_assign(device: &Device, employee: &Employee) -> Result<Vec<DeviceMove>, PortalError> {
    if !device.is_free() {
        return Err(PortalError::invalid_transition(
            "expected device status=available",
        ));
    }
    if !employee.status.accepts_device() {
        return Err(PortalError::invalid_transition(format!(
            "cannot assign a device to an employee in status {}",
            employee.status
        )));
    }
    let mut moves = Vec::with_capacity(2);
    if let Some(previous) = employee.device_id.filter(|id| *id != device.id) {
        moves.push(DeviceMove::Release {
            device_id: previous,
            employee_id: employee.id,
        });
    }
    moves.push(DeviceMove::Claim {
        device_id: device.id,
        employee_id: employee.id,
    });
    Ok(moves)
}

/// Audit the device side of a release. `before` is `None` when the device row
/// was already missing.
pub(crate) async fn record_release<A: AuditRepository>(
    audit: &A,
    actor: Option<&Actor>,
    action: &str,
    device_id: Uuid,
    before: Option<&Device>,
) {
    let mut entry = AuditEntry::new(actor, action, "device", Some(device_id));
    if let Some(before) = before {
        entry = entry.before(before).after(&before.released());
    }
    record(audit, entry).await;
}

// ── ListDevices ──────────────────────────────────────────────────────────────

pub struct ListDevicesUseCase<C: CustomerRepository, D: DeviceRepository> {
    pub customers: C,
    pub devices: D,
}

impl<C: CustomerRepository, D: DeviceRepository> ListDevicesUseCase<C, D> {
    pub async fn execute(&self, actor: &Actor) -> Result<Vec<Device>, PortalError> {
        authorize(actor, Action::DeviceRead)?;
        let visibility = resolve_visibility(&self.customers, actor).await?;
        self.devices.list(&visibility).await
    }
}

// ── CreateDevice ─────────────────────────────────────────────────────────────

pub struct CreateDeviceInput {
    pub name: String,
    pub os: Option<DeviceOs>,
    /// Superadmin only: create a customer-owned device instead of a pooled one.
    pub customer_id: Option<Uuid>,
    pub cyber_protection_enabled: bool,
    pub encryption_enabled: bool,
}

pub struct CreateDeviceUseCase<C: CustomerRepository, D: DeviceRepository, A: AuditRepository> {
    pub customers: C,
    pub devices: D,
    pub audit: A,
}

impl<C: CustomerRepository, D: DeviceRepository, A: AuditRepository>
    CreateDeviceUseCase<C, D, A>
{
    pub async fn execute(
        &self,
        actor: &Actor,
        input: CreateDeviceInput,
    ) -> Result<Device, PortalError> {
        authorize(actor, Action::DeviceCreate)?;
        let visibility = resolve_visibility(&self.customers, actor).await?;

        let name = input.name.trim();
        if name.is_empty() {
            return Err(PortalError::validation("name is required"));
        }

        let owner = match visibility.own_customer() {
            Some(own) => {
                if input.customer_id.is_some_and(|id| id != own) {
                    return Err(PortalError::Forbidden);
                }
                Some(own)
            }
            None => match input.customer_id {
                Some(customer_id) => {
                    self.customers
                        .find_by_id(customer_id)
                        .await?
                        .filter(|c| !c.status.is_deleted())
                        .ok_or_else(|| PortalError::validation("customer not found"))?;
                    Some(customer_id)
                }
                None => None,
            },
        };

        let now = Utc::now();
        let device = Device {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            os: input.os.unwrap_or_default(),
            owner_type: if owner.is_some() {
                OwnerType::Customer
            } else {
                OwnerType::Belzir
            },
            customer_id: owner,
            status: DeviceStatus::Available,
            assigned_employee_id: None,
            cyber_protection_enabled: input.cyber_protection_enabled,
            encryption_enabled: input.encryption_enabled,
            created_at: now,
            updated_at: now,
        };
        self.devices.create(&device).await?;
        record(
            &self.audit,
            AuditEntry::new(Some(actor), "device.create", "device", Some(device.id)).after(&device),
        )
        .await;
        Ok(device)
    }
}

// ── UpdateDevice ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateDeviceInput {
    pub name: Option<String>,
    pub os: Option<DeviceOs>,
    /// Accepted only when equal to the current status.
    pub status: Option<DeviceStatus>,
    pub cyber_protection_enabled: Option<bool>,
    pub encryption_enabled: Option<bool>,
}

pub struct UpdateDeviceUseCase<C: CustomerRepository, D: DeviceRepository, A: AuditRepository> {
    pub customers: C,
    pub devices: D,
    pub audit: A,
}

impl<C: CustomerRepository, D: DeviceRepository, A: AuditRepository>
    UpdateDeviceUseCase<C, D, A>
{
    pub async fn execute(
        &self,
        actor: &Actor,
        device_id: Uuid,
        input: UpdateDeviceInput,
    ) -> Result<Device, PortalError> {
        authorize(actor, Action::DeviceUpdate)?;
        let visibility = resolve_visibility(&self.customers, actor).await?;
        let before = visible_device(&self.devices, &visibility, device_id).await?;

        if let Some(own) = visibility.own_customer() {
            if !before.is_owned_by(own) {
                return Err(PortalError::Forbidden);
            }
        }
        if input.status.is_some_and(|s| s != before.status) {
            return Err(PortalError::invalid_transition(
                "device status changes only through assign and unassign",
            ));
        }

        let mut device = before.clone();
        if let Some(name) = input.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(PortalError::validation("name must not be empty"));
            }
            device.name = name.to_owned();
        }
        if let Some(os) = input.os {
            device.os = os;
        }
        if let Some(v) = input.cyber_protection_enabled {
            device.cyber_protection_enabled = v;
        }
        if let Some(v) = input.encryption_enabled {
            device.encryption_enabled = v;
        }
        device.updated_at = Utc::now();

        self.devices.update_details(&device).await?;
        record(
            &self.audit,
            AuditEntry::new(Some(actor), "device.update", "device", Some(device.id))
                .before(&before)
                .after(&device),
        )
        .await;
        Ok(device)
    }
}

// ── AssignDevice ─────────────────────────────────────────────────────────────

pub struct AssignDeviceUseCase<
    C: CustomerRepository,
    E: EmployeeRepository,
    D: DeviceRepository,
    A: AuditRepository,
> {
    pub customers: C,
    pub employees: E,
    pub devices: D,
    pub audit: A,
}

impl<C: CustomerRepository, E: EmployeeRepository, D: DeviceRepository, A: AuditRepository>
    AssignDeviceUseCase<C, E, D, A>
{
    pub async fn execute(
        &self,
        actor: &Actor,
        device_id: Uuid,
        employee_id: Uuid,
    ) -> Result<Device, PortalError> {
        authorize(actor, Action::DeviceAssign)?;
        let visibility = resolve_visibility(&self.customers, actor).await?;
        let device = visible_device(&self.devices, &visibility, device_id).await?;
        let employee = visible_employee(&self.employees, &visibility, employee_id).await?;

        let moves = plan_assign(&device, &employee)?;
        let previous = match employee.device_id.filter(|id| *id != device.id) {
            Some(id) => Some((id, self.devices.find_by_id(id).await?)),
            None => None,
        };

        let mut updated = employee.clone();
        updated.device_id = Some(device.id);
        updated.updated_at = Utc::now();

        self.employees
            .apply(&LifecycleWrite {
                employee: Some(updated.clone()),
                device_moves: moves,
                commission: None,
            })
            .await?;

        tracing::info!(%device_id, %employee_id, "device assigned");

        if let Some((previous_id, previous)) = previous {
            record_release(
                &self.audit,
                Some(actor),
                "device.unassign",
                previous_id,
                previous.as_ref(),
            )
            .await;
        }
        let assigned = device.assigned_to(employee.id);
        record(
            &self.audit,
            AuditEntry::new(Some(actor), "device.assign", "device", Some(device.id))
                .before(&device)
                .after(&assigned),
        )
        .await;
        record(
            &self.audit,
            AuditEntry::new(
                Some(actor),
                "employee.device.assign",
                "employee",
                Some(employee.id),
            )
            .before(&employee)
            .after(&updated),
        )
        .await;
        Ok(assigned)
    }
}

// ── UnassignDevice ───────────────────────────────────────────────────────────

pub struct UnassignDeviceUseCase<
    C: CustomerRepository,
    E: EmployeeRepository,
    D: DeviceRepository,
    A: AuditRepository,
> {
    pub customers: C,
    pub employees: E,
    pub devices: D,
    pub audit: A,
}

impl<C: CustomerRepository, E: EmployeeRepository, D: DeviceRepository, A: AuditRepository>
    UnassignDeviceUseCase<C, E, D, A>
{
    pub async fn execute(&self, actor: &Actor, device_id: Uuid) -> Result<Device, PortalError> {
        authorize(actor, Action::DeviceUnassign)?;
        let visibility = resolve_visibility(&self.customers, actor).await?;
        let device = visible_device(&self.devices, &visibility, device_id).await?;

        let holder_id = match (device.status, device.assigned_employee_id) {
            (DeviceStatus::Assigned, Some(holder_id)) => holder_id,
            _ => {
                return Err(PortalError::invalid_transition(
                    "expected device status=assigned",
                ));
            }
        };

        // The holder may be gone; the device side is released regardless.
        let holder = self.employees.find_by_id(holder_id).await?;
        if holder.as_ref().is_some_and(|e| !visibility.sees_employee(e)) {
            return Err(PortalError::NotFound("device"));
        }
        let cleared = holder
            .as_ref()
            .filter(|e| e.device_id == Some(device.id))
            .map(|e| Employee {
                device_id: None,
                updated_at: Utc::now(),
                ..e.clone()
            });

        self.employees
            .apply(&LifecycleWrite {
                employee: cleared.clone(),
                device_moves: vec![DeviceMove::Release {
                    device_id: device.id,
                    employee_id: holder_id,
                }],
                commission: None,
            })
            .await?;

        tracing::info!(%device_id, employee_id = %holder_id, "device unassigned");

        let released = device.released();
        record(
            &self.audit,
            AuditEntry::new(Some(actor), "device.unassign", "device", Some(device.id))
                .before(&device)
                .after(&released),
        )
        .await;
        if let Some(holder) = holder {
            let after = cleared.unwrap_or_else(|| holder.clone());
            record(
                &self.audit,
                AuditEntry::new(
                    Some(actor),
                    "employee.device.unassign",
                    "employee",
                    Some(holder.id),
                )
                .before(&holder)
                .after(&after),
            )
            .await;
        }
        Ok(released)
    }
}

// ── DeleteDevice ─────────────────────────────────────────────────────────────

pub struct DeleteDeviceUseCase<C: CustomerRepository, D: DeviceRepository, A: AuditRepository> {
    pub customers: C,
    pub devices: D,
    pub audit: A,
}

impl<C: CustomerRepository, D: DeviceRepository, A: AuditRepository>
    DeleteDeviceUseCase<C, D, A>
{
    pub async fn execute(&self, actor: &Actor, device_id: Uuid) -> Result<(), PortalError> {
        authorize(actor, Action::DeviceDelete)?;
        let visibility = resolve_visibility(&self.customers, actor).await?;
        let device = visible_device(&self.devices, &visibility, device_id).await?;

        if actor.role == Role::Customer {
            let own = visibility.own_customer().ok_or(PortalError::Forbidden)?;
            if !device.is_owned_by(own) {
                return Err(PortalError::Forbidden);
            }
        }

        let conflict = || PortalError::Conflict("cannot delete assigned device".to_owned());
        if !device.is_free() {
            return Err(conflict());
        }
        if !self.devices.delete_available(device.id).await? {
            return Err(conflict());
        }

        record(
            &self.audit,
            AuditEntry::new(Some(actor), "device.delete", "device", Some(device.id)).before(&device),
        )
        .await;
        Ok(())
    }
}
