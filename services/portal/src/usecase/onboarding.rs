use uuid::Uuid;

use belzir_auth_types::identity::Actor;
use belzir_domain::employee::AcquisitionOption;

use crate::domain::capability::{Action, authorize};
use crate::domain::commission::{derive_commission, rule_for_option};
use crate::domain::lifecycle::{Step2Choice, complete_onboarding, submit_onboarding_step2};
use crate::domain::repository::{
    AuditRepository, CustomerRepository, DeviceRepository, EmployeeRepository,
    PartnerRepository,
};
use crate::domain::types::{AuditEntry, Commission, DeviceMove, Employee, LifecycleWrite};
use crate::error::PortalError;
use crate::usecase::audit::record;
use crate::usecase::device::record_release;
use crate::usecase::employee::visible_employee;
use crate::usecase::scope::resolve_visibility;

// ── OnboardingStep2 ──────────────────────────────────────────────────────────

pub struct OnboardingStep2Input {
    pub option: AcquisitionOption,
    pub device_id: Option<Uuid>,
    pub device_approved: bool,
    pub setup_approved: bool,
    /// The purchase or lease goes through the customer's partner.
    pub via_partner: bool,
}

pub struct OnboardingStep2UseCase<
    P: PartnerRepository,
    C: CustomerRepository,
    E: EmployeeRepository,
    D: DeviceRepository,
    A: AuditRepository,
> {
    pub partners: P,
    pub customers: C,
    pub employees: E,
    pub devices: D,
    pub audit: A,
}

impl<
    P: PartnerRepository,
    C: CustomerRepository,
    E: EmployeeRepository,
    D: DeviceRepository,
    A: AuditRepository,
> OnboardingStep2UseCase<P, C, E, D, A>
{
    pub async fn execute(
        &self,
        actor: &Actor,
        employee_id: Uuid,
        input: OnboardingStep2Input,
    ) -> Result<Employee, PortalError> {
        authorize(actor, Action::OnboardingStep2)?;
        let visibility = resolve_visibility(&self.customers, actor).await?;
        let own_customer = visibility
            .own_customer()
            .ok_or(PortalError::ScopeMissing("customer_id"))?;
        let before = visible_employee(&self.employees, &visibility, employee_id).await?;

        let mut employee = before.clone();
        submit_onboarding_step2(
            &mut employee,
            &Step2Choice {
                option: input.option,
                device_id: input.device_id,
                device_approved: input.device_approved,
                setup_approved: input.setup_approved,
            },
        )?;

        let mut moves = Vec::new();
        let mut claimed = None;
        let mut released = None;
        if let Some(device_id) = input.device_id {
            let device = self
                .devices
                .find_by_id(device_id)
                .await?
                .ok_or_else(|| PortalError::validation("device not found"))?;
            if !device.is_free() {
                return Err(PortalError::invalid_transition(
                    "expected device status=available",
                ));
            }
            if !device.is_pooled() && !device.is_owned_by(own_customer) {
                return Err(PortalError::validation(
                    "device must be pooled or owned by the customer",
                ));
            }
            if let Some(previous) = before.device_id.filter(|id| *id != device_id) {
                moves.push(DeviceMove::Release {
                    device_id: previous,
                    employee_id: before.id,
                });
                released = Some((previous, self.devices.find_by_id(previous).await?));
            }
            moves.push(DeviceMove::Claim {
                device_id,
                employee_id: before.id,
            });
            claimed = Some(device);
        }

        let commission = self
            .commission_for(&employee, input.option, input.via_partner)
            .await?;

        self.employees
            .apply(&LifecycleWrite {
                employee: Some(employee.clone()),
                device_moves: moves,
                commission: commission.clone(),
            })
            .await?;

        tracing::info!(
            employee_id = %employee.id,
            option = input.option.as_u8(),
            device_id = ?input.device_id,
            commission = commission.as_ref().map(|c| c.amount),
            "onboarding step 2 submitted"
        );

        record(
            &self.audit,
            AuditEntry::new(
                Some(actor),
                "employee.onboarding.step2",
                "employee",
                Some(employee.id),
            )
            .before(&before)
            .after(&employee)
            .meta(serde_json::json!({
                "workflow": "onboarding",
                "step": 2,
                "device_acquisition_option": input.option,
                "via_partner": input.via_partner,
            })),
        )
        .await;
        if let Some((previous, device)) = released {
            record_release(&self.audit, Some(actor), "device.unassign", previous, device.as_ref())
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
        if let Some(commission) = &commission {
            record(
                &self.audit,
                AuditEntry::new(
                    Some(actor),
                    "commission.create",
                    "commission",
                    Some(commission.id),
                )
                .after(commission),
            )
            .await;
        }
        Ok(employee)
    }

    async fn commission_for(
        &self,
        employee: &Employee,
        option: AcquisitionOption,
        via_partner: bool,
    ) -> Result<Option<Commission>, PortalError> {
        if !via_partner || rule_for_option(option).is_none() {
            return Ok(None);
        }
        let Some(customer) = self.customers.find_by_id(employee.customer_id).await? else {
            tracing::warn!(employee_id = %employee.id, "customer missing, no commission derived");
            return Ok(None);
        };
        let Some(partner) = self.partners.find_by_id(customer.partner_id).await? else {
            tracing::warn!(
                customer_id = %customer.id,
                partner_id = %customer.partner_id,
                "partner missing, no commission derived"
            );
            return Ok(None);
        };
        Ok(derive_commission(
            &partner,
            &customer,
            employee,
            option,
            via_partner,
        ))
    }
}

// ── CompleteOnboarding ───────────────────────────────────────────────────────

pub struct CompleteOnboardingUseCase<E: EmployeeRepository, A: AuditRepository> {
    pub employees: E,
    pub audit: A,
}

impl<E: EmployeeRepository, A: AuditRepository> CompleteOnboardingUseCase<E, A> {
    pub async fn execute(&self, actor: &Actor, employee_id: Uuid) -> Result<Employee, PortalError> {
        authorize(actor, Action::OnboardingComplete)?;
        let before = self
            .employees
            .find_by_id(employee_id)
            .await?
            .ok_or(PortalError::NotFound("employee"))?;

        let mut employee = before.clone();
        complete_onboarding(&mut employee)?;

        self.employees
            .apply(&LifecycleWrite {
                employee: Some(employee.clone()),
                ..Default::default()
            })
            .await?;
        tracing::info!(employee_id = %employee.id, "onboarding completed");

        record(
            &self.audit,
            AuditEntry::new(
                Some(actor),
                "employee.onboarding.step3.complete",
                "employee",
                Some(employee.id),
            )
            .before(&before)
            .after(&employee)
            .meta(serde_json::json!({ "workflow": "onboarding", "step": 3 })),
        )
        .await;
        Ok(employee)
    }
}
