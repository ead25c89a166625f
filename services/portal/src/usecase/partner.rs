use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use belzir_auth_types::identity::Actor;
use belzir_domain::record::RecordStatus;

use crate::domain::capability::{Action, authorize};
use crate::domain::repository::{
    AuditRepository, CommissionFilter, CommissionRepository, CustomerRepository,
    EmployeeRepository, PartnerRepository, SettingsRepository,
};
use crate::domain::scope::Visibility;
use crate::domain::types::{AuditEntry, Customer, CustomerSummary, Partner, PartnerDashboard};
use crate::error::PortalError;
use crate::usecase::audit::record;
use crate::usecase::settings::check_rate;

async fn live_partner<P: PartnerRepository>(partners: &P, id: Uuid) -> Result<Partner, PortalError> {
    partners
        .find_by_id(id)
        .await?
        .filter(|p| !p.status.is_deleted())
        .ok_or(PortalError::NotFound("partner"))
}

fn partner_name(name: &str) -> Result<String, PortalError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PortalError::validation("name is required"));
    }
    Ok(name.to_owned())
}

// ── ListPartners ─────────────────────────────────────────────────────────────

pub struct ListPartnersUseCase<P: PartnerRepository> {
    pub repo: P,
}

impl<P: PartnerRepository> ListPartnersUseCase<P> {
    pub async fn execute(&self, actor: &Actor) -> Result<Vec<Partner>, PortalError> {
        authorize(actor, Action::PartnerManage)?;
        self.repo.list_live().await
    }
}

// ── CreatePartner ────────────────────────────────────────────────────────────

pub struct CreatePartnerInput {
    pub name: String,
    /// Falls back to the settings default when absent.
    pub commission_rate: Option<f64>,
}

pub struct CreatePartnerUseCase<P: PartnerRepository, S: SettingsRepository, A: AuditRepository> {
    pub repo: P,
    pub settings: S,
    pub audit: A,
}

impl<P: PartnerRepository, S: SettingsRepository, A: AuditRepository>
    CreatePartnerUseCase<P, S, A>
{
    pub async fn execute(
        &self,
        actor: &Actor,
        input: CreatePartnerInput,
    ) -> Result<Partner, PortalError> {
        authorize(actor, Action::PartnerManage)?;
        let name = partner_name(&input.name)?;
        let commission_rate = match input.commission_rate {
            Some(rate) => check_rate(rate, "commission_rate")?,
            None => self.settings.get().await?.default_partner_commission_rate,
        };

        let now = Utc::now();
        let partner = Partner {
            id: Uuid::now_v7(),
            name,
            status: RecordStatus::Active,
            commission_rate,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&partner).await?;
        record(
            &self.audit,
            AuditEntry::new(Some(actor), "partner.create", "partner", Some(partner.id))
                .after(&partner),
        )
        .await;
        Ok(partner)
    }
}

// ── UpdatePartner ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdatePartnerInput {
    pub name: Option<String>,
    pub commission_rate: Option<f64>,
    /// `active` or `inactive`; deletion goes through [`DeletePartnerUseCase`].
    pub status: Option<RecordStatus>,
}

pub struct UpdatePartnerUseCase<P: PartnerRepository, A: AuditRepository> {
    pub repo: P,
    pub audit: A,
}

impl<P: PartnerRepository, A: AuditRepository> UpdatePartnerUseCase<P, A> {
    pub async fn execute(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdatePartnerInput,
    ) -> Result<Partner, PortalError> {
        authorize(actor, Action::PartnerManage)?;
        let before = live_partner(&self.repo, id).await?;

        let mut partner = before.clone();
        if let Some(name) = &input.name {
            partner.name = partner_name(name)?;
        }
        if let Some(rate) = input.commission_rate {
            partner.commission_rate = check_rate(rate, "commission_rate")?;
        }
        if let Some(status) = input.status {
            if status.is_deleted() {
                return Err(PortalError::validation("use DELETE to remove a partner"));
            }
            partner.status = status;
        }
        partner.updated_at = Utc::now();

        self.repo.update(&partner).await?;
        record(
            &self.audit,
            AuditEntry::new(Some(actor), "partner.update", "partner", Some(partner.id))
                .before(&before)
                .after(&partner),
        )
        .await;
        Ok(partner)
    }
}

// ── DeletePartner ────────────────────────────────────────────────────────────

pub struct DeletePartnerUseCase<P: PartnerRepository, A: AuditRepository> {
    pub repo: P,
    pub audit: A,
}

impl<P: PartnerRepository, A: AuditRepository> DeletePartnerUseCase<P, A> {
    /// Soft delete: the row stays for commission and audit history.
    pub async fn execute(&self, actor: &Actor, id: Uuid) -> Result<(), PortalError> {
        authorize(actor, Action::PartnerManage)?;
        let before = live_partner(&self.repo, id).await?;
        let partner = Partner {
            status: RecordStatus::Deleted,
            updated_at: Utc::now(),
            ..before.clone()
        };
        self.repo.update(&partner).await?;
        record(
            &self.audit,
            AuditEntry::new(Some(actor), "partner.delete", "partner", Some(id))
                .before(&before)
                .after(&partner),
        )
        .await;
        Ok(())
    }
}

// ── ListMyCustomers ──────────────────────────────────────────────────────────

pub struct ListMyCustomersUseCase<C: CustomerRepository> {
    pub customers: C,
}

impl<C: CustomerRepository> ListMyCustomersUseCase<C> {
    pub async fn execute(&self, actor: &Actor) -> Result<Vec<Customer>, PortalError> {
        authorize(actor, Action::PartnerSelfView)?;
        let partner_id = actor
            .partner_id
            .ok_or(PortalError::ScopeMissing("partner_id"))?;
        self.customers.list_live(Some(partner_id)).await
    }
}

// ── PartnerDashboard ─────────────────────────────────────────────────────────

pub struct PartnerDashboardUseCase<
    C: CustomerRepository,
    E: EmployeeRepository,
    M: CommissionRepository,
> {
    pub customers: C,
    pub employees: E,
    pub commissions: M,
}

impl<C: CustomerRepository, E: EmployeeRepository, M: CommissionRepository>
    PartnerDashboardUseCase<C, E, M>
{
    pub async fn execute(&self, actor: &Actor) -> Result<PartnerDashboard, PortalError> {
        authorize(actor, Action::PartnerSelfView)?;
        let partner_id = actor
            .partner_id
            .ok_or(PortalError::ScopeMissing("partner_id"))?;

        let customers = self.customers.list_live(Some(partner_id)).await?;
        let visibility = Visibility::Partner {
            partner_id,
            customer_ids: customers.iter().map(|c| c.id).collect(),
        };
        let employees = self.employees.list(&visibility).await?;
        let commissions = self
            .commissions
            .list(CommissionFilter {
                partner_id: Some(partner_id),
                customer_id: None,
            })
            .await?;

        let mut employees_by_status = BTreeMap::new();
        let summaries = customers
            .iter()
            .map(|customer| {
                let mut by_status = BTreeMap::new();
                for e in employees.iter().filter(|e| e.customer_id == customer.id) {
                    *by_status.entry(e.status.as_str().to_owned()).or_insert(0) += 1;
                    *employees_by_status
                        .entry(e.status.as_str().to_owned())
                        .or_insert(0) += 1;
                }
                CustomerSummary {
                    customer_id: customer.id,
                    customer_name: customer.name.clone(),
                    employees_by_status: by_status,
                    commission_total: commissions
                        .iter()
                        .filter(|c| c.customer_id == customer.id)
                        .map(|c| c.amount)
                        .sum(),
                }
            })
            .collect();

        Ok(PartnerDashboard {
            partner_id,
            customers: summaries,
            employees_by_status,
            commission_total: commissions.iter().map(|c| c.amount).sum(),
        })
    }
}
