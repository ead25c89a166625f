use uuid::Uuid;

use belzir_auth_types::identity::Actor;

use crate::domain::capability::{Action, authorize};
use crate::domain::lifecycle::{complete_offboarding, receive_device, start_offboarding};
use crate::domain::repository::{
    AuditRepository, CustomerRepository, DeviceRepository, EmployeeRepository,
};
use crate::domain::types::{AuditEntry, DeviceMove, Employee, LifecycleWrite};
use crate::error::PortalError;
use crate::usecase::audit::record;
use crate::usecase::device::record_release;
use crate::usecase::employee::visible_employee;
use crate::usecase::scope::resolve_visibility;

fn step_meta(step: u8) -> serde_json::Value {
    serde_json::json!({ "workflow": "offboarding", "step": step })
}

// ── StartOffboarding ─────────────────────────────────────────────────────────

pub struct StartOffboardingUseCase<C: CustomerRepository, E: EmployeeRepository, A: AuditRepository>
{
    pub customers: C,
    pub employees: E,
    pub audit: A,
}

impl<C: CustomerRepository, E: EmployeeRepository, A: AuditRepository>
    StartOffboardingUseCase<C, E, A>
{
    pub async fn execute(&self, actor: &Actor, employee_id: Uuid) -> Result<Employee, PortalError> {
        authorize(actor, Action::OffboardingStart)?;
        let visibility = resolve_visibility(&self.customers, actor).await?;
        let before = visible_employee(&self.employees, &visibility, employee_id).await?;

        let mut employee = before.clone();
        start_offboarding(&mut employee)?;

        self.employees
            .apply(&LifecycleWrite {
                employee: Some(employee.clone()),
                ..Default::default()
            })
            .await?;
        tracing::info!(employee_id = %employee.id, "offboarding started, account disabled");

        record(
            &self.audit,
            AuditEntry::new(
                Some(actor),
                "employee.offboarding.start",
                "employee",
                Some(employee.id),
            )
            .before(&before)
            .after(&employee)
            .meta(step_meta(1)),
        )
        .await;
        Ok(employee)
    }
}

// ── ReceiveDevice ────────────────────────────────────────────────────────────

pub struct ReceiveDeviceUseCase<
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
    ReceiveDeviceUseCase<C, E, D, A>
{
    pub async fn execute(&self, actor: &Actor, employee_id: Uuid) -> Result<Employee, PortalError> {
        authorize(actor, Action::OffboardingReceiveDevice)?;
        let visibility = resolve_visibility(&self.customers, actor).await?;
        let before = visible_employee(&self.employees, &visibility, employee_id).await?;

        let mut employee = before.clone();
        let returned = receive_device(&mut employee)?;

        let device = match returned {
            Some(device_id) => self.devices.find_by_id(device_id).await?,
            None => None,
        };
        let device_moves = returned
            .map(|device_id| DeviceMove::Release {
                device_id,
                employee_id: employee.id,
            })
            .into_iter()
            .collect();

        self.employees
            .apply(&LifecycleWrite {
                employee: Some(employee.clone()),
                device_moves,
                commission: None,
            })
            .await?;
        tracing::info!(employee_id = %employee.id, device_id = ?returned, "device received");

        record(
            &self.audit,
            AuditEntry::new(
                Some(actor),
                "employee.offboarding.step2.receiveDevice",
                "employee",
                Some(employee.id),
            )
            .before(&before)
            .after(&employee)
            .meta(step_meta(2)),
        )
        .await;
        if let Some(device_id) = returned {
            record_release(&self.audit, Some(actor), "device.unassign", device_id, device.as_ref())
                .await;
        }
        Ok(employee)
    }
}

// ── CompleteOffboarding ──────────────────────────────────────────────────────

pub struct CompleteOffboardingUseCase<
    C: CustomerRepository,
    E: EmployeeRepository,
    A: AuditRepository,
> {
    pub customers: C,
    pub employees: E,
    pub audit: A,
}

impl<C: CustomerRepository, E: EmployeeRepository, A: AuditRepository>
    CompleteOffboardingUseCase<C, E, A>
{
    pub async fn execute(
        &self,
        actor: &Actor,
        employee_id: Uuid,
        archive: bool,
    ) -> Result<Employee, PortalError> {
        authorize(actor, Action::OffboardingComplete)?;
        let visibility = resolve_visibility(&self.customers, actor).await?;
        let before = visible_employee(&self.employees, &visibility, employee_id).await?;

        let mut employee = before.clone();
        complete_offboarding(&mut employee, archive)?;

        self.employees
            .apply(&LifecycleWrite {
                employee: Some(employee.clone()),
                ..Default::default()
            })
            .await?;
        tracing::info!(employee_id = %employee.id, archive, "offboarding completed");

        let mut meta = step_meta(3);
        meta["archive"] = serde_json::Value::Bool(archive);
        record(
            &self.audit,
            AuditEntry::new(
                Some(actor),
                "employee.offboarding.step3.complete",
                "employee",
                Some(employee.id),
            )
            .before(&before)
            .after(&employee)
            .meta(meta),
        )
        .await;
        Ok(employee)
    }
}
