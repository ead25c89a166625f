use chrono::{DateTime, Utc};
use uuid::Uuid;

use belzir_auth_types::identity::Actor;
use belzir_domain::employee::EmployeeStatus;
use belzir_domain::record::RecordStatus;
use belzir_domain::role::Role;

use crate::domain::capability::{Action, EmployeeField, authorize, check_field};
use crate::domain::lifecycle::{StatusOverrides, normalize_for_status};
use crate::domain::repository::{
    AuditRepository, CustomerRepository, DeviceRepository, EmployeeRepository,
};
use crate::domain::scope::Visibility;
use crate::domain::types::{AuditEntry, Device, DeviceMove, Employee, LifecycleWrite};
use crate::error::PortalError;
use crate::usecase::audit::record;
use crate::usecase::device::record_release;
use crate::usecase::scope::resolve_visibility;

/// Load an employee the actor can see; anything else is `NotFound`.
pub(crate) async fn visible_employee<E: EmployeeRepository>(
    employees: &E,
    visibility: &Visibility,
    id: Uuid,
) -> Result<Employee, PortalError> {
    employees
        .find_by_id(id)
        .await?
        .filter(|e| visibility.sees_employee(e))
        .ok_or(PortalError::NotFound("employee"))
}

fn required(value: &str, field: &str) -> Result<String, PortalError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PortalError::validation(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

fn normalize_email(email: &str) -> Result<String, PortalError> {
    let email = required(email, "email")?.to_lowercase();
    if !email.contains('@') {
        return Err(PortalError::validation("email is invalid"));
    }
    Ok(email)
}

// ── ListEmployees ────────────────────────────────────────────────────────────

pub struct ListEmployeesUseCase<C: CustomerRepository, E: EmployeeRepository> {
    pub customers: C,
    pub employees: E,
}

impl<C: CustomerRepository, E: EmployeeRepository> ListEmployeesUseCase<C, E> {
    pub async fn execute(&self, actor: &Actor) -> Result<Vec<Employee>, PortalError> {
        authorize(actor, Action::EmployeeRead)?;
        let visibility = resolve_visibility(&self.customers, actor).await?;
        self.employees.list(&visibility).await
    }
}

// ── GetEmployee ──────────────────────────────────────────────────────────────

pub struct GetEmployeeUseCase<C: CustomerRepository, E: EmployeeRepository> {
    pub customers: C,
    pub employees: E,
}

impl<C: CustomerRepository, E: EmployeeRepository> GetEmployeeUseCase<C, E> {
    pub async fn execute(&self, actor: &Actor, id: Uuid) -> Result<Employee, PortalError> {
        authorize(actor, Action::EmployeeRead)?;
        let visibility = resolve_visibility(&self.customers, actor).await?;
        visible_employee(&self.employees, &visibility, id).await
    }
}

// ── CreateEmployee ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct CreateEmployeeInput {
    /// Required for partner and superadmin actors.
    pub customer_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub location: String,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    // Superadmin only.
    pub status: Option<EmployeeStatus>,
    pub onboarding_step: Option<u8>,
    pub offboarding_step: Option<u8>,
    pub account_disabled: Option<bool>,
}

impl CreateEmployeeInput {
    fn sets_workflow_fields(&self) -> bool {
        self.status.is_some()
            || self.onboarding_step.is_some()
            || self.offboarding_step.is_some()
            || self.account_disabled.is_some()
    }
}

pub struct CreateEmployeeUseCase<C: CustomerRepository, E: EmployeeRepository, A: AuditRepository>
{
    pub customers: C,
    pub employees: E,
    pub audit: A,
}

impl<C: CustomerRepository, E: EmployeeRepository, A: AuditRepository>
    CreateEmployeeUseCase<C, E, A>
{
    pub async fn execute(
        &self,
        actor: &Actor,
        input: CreateEmployeeInput,
    ) -> Result<Employee, PortalError> {
        authorize(actor, Action::EmployeeCreate)?;
        let visibility = resolve_visibility(&self.customers, actor).await?;

        if actor.role != Role::Superadmin && input.sets_workflow_fields() {
            return Err(PortalError::validation(
                "only superadmin may set status, steps or account_disabled",
            ));
        }

        let customer_id = match visibility.own_customer() {
            Some(own) => {
                if input.customer_id.is_some_and(|id| id != own) {
                    return Err(PortalError::Forbidden);
                }
                own
            }
            None => input
                .customer_id
                .ok_or_else(|| PortalError::validation("customer_id is required"))?,
        };
        if !visibility.sees_customer(customer_id) {
            return Err(PortalError::Forbidden);
        }
        let customer = self
            .customers
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| PortalError::validation("customer not found"))?;
        if customer.status != RecordStatus::Active {
            return Err(PortalError::validation("customer is inactive or deleted"));
        }

        let fields = normalize_for_status(
            input.status.unwrap_or(EmployeeStatus::Onboarding),
            StatusOverrides {
                onboarding_step: input.onboarding_step,
                offboarding_step: input.offboarding_step,
                account_disabled: input.account_disabled,
            },
        )?;

        let now = Utc::now();
        let mut employee = Employee {
            id: Uuid::now_v7(),
            customer_id,
            first_name: required(&input.first_name, "first_name")?,
            last_name: required(&input.last_name, "last_name")?,
            email: normalize_email(&input.email)?,
            location: required(&input.location, "location")?,
            job_title: input.job_title,
            department: input.department,
            start_date: input.start_date,
            status: fields.status,
            onboarding_step: None,
            offboarding_step: None,
            device_acquisition_option: None,
            device_id: None,
            setup_approved: false,
            device_approved: false,
            account_disabled: false,
            created_at: now,
            updated_at: now,
        };
        fields.write_to(&mut employee);

        self.employees.create(&employee).await?;
        tracing::info!(employee_id = %employee.id, %customer_id, "employee created");
        record(
            &self.audit,
            AuditEntry::new(Some(actor), "employee.create", "employee", Some(employee.id))
                .after(&employee),
        )
        .await;
        Ok(employee)
    }
}

// ── UpdateEmployee ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateEmployeeInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub status: Option<EmployeeStatus>,
    pub onboarding_step: Option<u8>,
    pub offboarding_step: Option<u8>,
    pub account_disabled: Option<bool>,
    /// `Some(None)` detaches the current device.
    pub device_id: Option<Option<Uuid>>,
}

impl UpdateEmployeeInput {
    fn touched_fields(&self) -> Vec<EmployeeField> {
        let mut fields = Vec::new();
        if self.first_name.is_some()
            || self.last_name.is_some()
            || self.email.is_some()
            || self.location.is_some()
            || self.job_title.is_some()
            || self.department.is_some()
            || self.start_date.is_some()
        {
            fields.push(EmployeeField::Identity);
        }
        if self.status.is_some() {
            fields.push(EmployeeField::Status);
        }
        if self.onboarding_step.is_some() {
            fields.push(EmployeeField::OnboardingStep);
        }
        if self.offboarding_step.is_some() {
            fields.push(EmployeeField::OffboardingStep);
        }
        if self.account_disabled.is_some() {
            fields.push(EmployeeField::AccountDisabled);
        }
        if self.device_id.is_some() {
            fields.push(EmployeeField::DeviceId);
        }
        fields
    }
}

pub struct UpdateEmployeeUseCase<
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
    UpdateEmployeeUseCase<C, E, D, A>
{
    pub async fn execute(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateEmployeeInput,
    ) -> Result<Employee, PortalError> {
        authorize(actor, Action::EmployeeUpdate)?;
        let visibility = resolve_visibility(&self.customers, actor).await?;
        let before = visible_employee(&self.employees, &visibility, id).await?;

        for field in input.touched_fields() {
            check_field(actor.role, field, before.status, input.status)?;
        }

        let mut employee = before.clone();
        if let Some(v) = &input.first_name {
            employee.first_name = required(v, "first_name")?;
        }
        if let Some(v) = &input.last_name {
            employee.last_name = required(v, "last_name")?;
        }
        if let Some(v) = &input.email {
            employee.email = normalize_email(v)?;
        }
        if let Some(v) = &input.location {
            employee.location = required(v, "location")?;
        }
        if input.job_title.is_some() {
            employee.job_title = input.job_title.clone();
        }
        if input.department.is_some() {
            employee.department = input.department.clone();
        }
        if input.start_date.is_some() {
            employee.start_date = input.start_date;
        }

        let touches_lifecycle = input.status.is_some()
            || input.onboarding_step.is_some()
            || input.offboarding_step.is_some()
            || input.account_disabled.is_some();
        if touches_lifecycle && actor.role != Role::Superadmin {
            // Already limited to the active <-> leave toggle; nothing else moves.
            if let Some(next) = input.status {
                employee.status = next;
            }
        } else if touches_lifecycle {
            // Defaults for account_disabled only apply when the status itself is set.
            let account_disabled = match input.status {
                Some(_) => input.account_disabled,
                None => input.account_disabled.or(Some(before.account_disabled)),
            };
            let fields = normalize_for_status(
                input.status.unwrap_or(before.status),
                StatusOverrides {
                    onboarding_step: input.onboarding_step.or(before.onboarding_step),
                    offboarding_step: input.offboarding_step.or(before.offboarding_step),
                    account_disabled,
                },
            )?;
            fields.write_to(&mut employee);
        }

        let mut moves = Vec::new();
        let mut claimed: Option<Device> = None;
        let mut released: Option<(Uuid, Option<Device>)> = None;
        if let Some(requested) = input.device_id {
            if requested != before.device_id {
                if let Some(old) = before.device_id {
                    moves.push(DeviceMove::Release {
                        device_id: old,
                        employee_id: before.id,
                    });
                    released = Some((old, self.devices.find_by_id(old).await?));
                }
                if let Some(new) = requested {
                    let device = self
                        .devices
                        .find_by_id(new)
                        .await?
                        .ok_or_else(|| PortalError::validation("device not found"))?;
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
                    moves.push(DeviceMove::Claim {
                        device_id: new,
                        employee_id: before.id,
                    });
                    claimed = Some(device);
                }
                employee.device_id = requested;
            }
        }

        employee.updated_at = Utc::now();
        self.employees
            .apply(&LifecycleWrite {
                employee: Some(employee.clone()),
                device_moves: moves,
                commission: None,
            })
            .await?;

        if before.status != employee.status {
            tracing::info!(
                employee_id = %employee.id,
                from = %before.status,
                to = %employee.status,
                "employee status changed"
            );
        }

        record(
            &self.audit,
            AuditEntry::new(Some(actor), "employee.update", "employee", Some(employee.id))
                .before(&before)
                .after(&employee),
        )
        .await;
        if let Some((old, device)) = released {
            record_release(&self.audit, Some(actor), "device.unassign", old, device.as_ref())
                .await;
        }
        if let Some(device) = claimed {
            record(
                &self.audit,
                AuditEntry::new(Some(actor), "device.assign", "device", Some(device.id))
                    .before(&device)
                    .after(&device.assigned_to(employee.id)),
            )
            .await;
        }
        Ok(employee)
    }
}

// ── DeleteEmployee ───────────────────────────────────────────────────────────

pub struct DeleteEmployeeUseCase<E: EmployeeRepository, D: DeviceRepository, A: AuditRepository> {
    pub employees: E,
    pub devices: D,
    pub audit: A,
}

impl<E: EmployeeRepository, D: DeviceRepository, A: AuditRepository>
    DeleteEmployeeUseCase<E, D, A>
{
    pub async fn execute(&self, actor: &Actor, id: Uuid) -> Result<(), PortalError> {
        authorize(actor, Action::EmployeeDelete)?;
        let employee = self
            .employees
            .find_by_id(id)
            .await?
            .ok_or(PortalError::NotFound("employee"))?;

        let held = match employee.device_id {
            Some(device_id) => Some((device_id, self.devices.find_by_id(device_id).await?)),
            None => None,
        };
        let releases: Vec<DeviceMove> = held
            .iter()
            .map(|(device_id, _)| DeviceMove::Release {
                device_id: *device_id,
                employee_id: employee.id,
            })
            .collect();

        if !self.employees.remove(employee.id, &releases).await? {
            return Err(PortalError::NotFound("employee"));
        }
        tracing::info!(employee_id = %employee.id, "employee deleted");

        record(
            &self.audit,
            AuditEntry::new(Some(actor), "employee.delete", "employee", Some(employee.id))
                .before(&employee),
        )
        .await;
        if let Some((device_id, device)) = held {
            record_release(&self.audit, Some(actor), "device.unassign", device_id, device.as_ref())
                .await;
        }
        Ok(())
    }
}
