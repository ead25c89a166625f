use chrono::Utc;
use uuid::Uuid;

use belzir_auth_types::identity::Actor;
use belzir_domain::record::RecordStatus;

use crate::domain::capability::{Action, authorize};
use crate::domain::repository::{AuditRepository, CustomerRepository, PartnerRepository};
use crate::domain::types::{AuditEntry, Customer};
use crate::error::PortalError;
use crate::usecase::audit::record;

async fn require_partner<P: PartnerRepository>(partners: &P, id: Uuid) -> Result<(), PortalError> {
    partners
        .find_by_id(id)
        .await?
        .filter(|p| !p.status.is_deleted())
        .map(|_| ())
        .ok_or_else(|| PortalError::validation("partner not found"))
}

async fn live_customer<C: CustomerRepository>(
    customers: &C,
    id: Uuid,
) -> Result<Customer, PortalError> {
    customers
        .find_by_id(id)
        .await?
        .filter(|c| !c.status.is_deleted())
        .ok_or(PortalError::NotFound("customer"))
}

fn customer_name(name: &str) -> Result<String, PortalError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PortalError::validation("name is required"));
    }
    Ok(name.to_owned())
}

// ── ListCustomers ────────────────────────────────────────────────────────────

pub struct ListCustomersUseCase<C: CustomerRepository> {
    pub repo: C,
}

impl<C: CustomerRepository> ListCustomersUseCase<C> {
    pub async fn execute(
        &self,
        actor: &Actor,
        partner_id: Option<Uuid>,
    ) -> Result<Vec<Customer>, PortalError> {
        authorize(actor, Action::CustomerManage)?;
        self.repo.list_live(partner_id).await
    }
}

// ── CreateCustomer ───────────────────────────────────────────────────────────

pub struct CreateCustomerInput {
    pub partner_id: Uuid,
    pub name: String,
}

pub struct CreateCustomerUseCase<P: PartnerRepository, C: CustomerRepository, A: AuditRepository> {
    pub partners: P,
    pub customers: C,
    pub audit: A,
}

impl<P: PartnerRepository, C: CustomerRepository, A: AuditRepository>
    CreateCustomerUseCase<P, C, A>
{
    pub async fn execute(
        &self,
        actor: &Actor,
        input: CreateCustomerInput,
    ) -> Result<Customer, PortalError> {
        authorize(actor, Action::CustomerManage)?;
        let name = customer_name(&input.name)?;
        require_partner(&self.partners, input.partner_id).await?;

        let now = Utc::now();
        let customer = Customer {
            id: Uuid::now_v7(),
            partner_id: input.partner_id,
            name,
            status: RecordStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.customers.create(&customer).await?;
        record(
            &self.audit,
            AuditEntry::new(Some(actor), "customer.create", "customer", Some(customer.id))
                .after(&customer),
        )
        .await;
        Ok(customer)
    }
}

// ── UpdateCustomer ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateCustomerInput {
    pub name: Option<String>,
    pub status: Option<RecordStatus>,
    /// Reassign the customer to another partner.
    pub partner_id: Option<Uuid>,
}

pub struct UpdateCustomerUseCase<P: PartnerRepository, C: CustomerRepository, A: AuditRepository> {
    pub partners: P,
    pub customers: C,
    pub audit: A,
}

impl<P: PartnerRepository, C: CustomerRepository, A: AuditRepository>
    UpdateCustomerUseCase<P, C, A>
{
    pub async fn execute(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateCustomerInput,
    ) -> Result<Customer, PortalError> {
        authorize(actor, Action::CustomerManage)?;
        let before = live_customer(&self.customers, id).await?;

        let mut customer = before.clone();
        if let Some(name) = &input.name {
            customer.name = customer_name(name)?;
        }
        if let Some(status) = input.status {
            if status.is_deleted() {
                return Err(PortalError::validation("use DELETE to remove a customer"));
            }
            customer.status = status;
        }
        if let Some(partner_id) = input.partner_id {
            if partner_id != before.partner_id {
                require_partner(&self.partners, partner_id).await?;
                customer.partner_id = partner_id;
            }
        }
        customer.updated_at = Utc::now();

        self.customers.update(&customer).await?;
        if customer.partner_id != before.partner_id {
            tracing::info!(
                customer_id = %customer.id,
                from = %before.partner_id,
                to = %customer.partner_id,
                "customer reassigned"
            );
        }
        record(
            &self.audit,
            AuditEntry::new(Some(actor), "customer.update", "customer", Some(customer.id))
                .before(&before)
                .after(&customer),
        )
        .await;
        Ok(customer)
    }
}

// ── DeleteCustomer ───────────────────────────────────────────────────────────

pub struct DeleteCustomerUseCase<C: CustomerRepository, A: AuditRepository> {
    pub customers: C,
    pub audit: A,
}

impl<C: CustomerRepository, A: AuditRepository> DeleteCustomerUseCase<C, A> {
    /// Soft delete. The customer drops out of its partner's visibility immediately.
    pub async fn execute(&self, actor: &Actor, id: Uuid) -> Result<(), PortalError> {
        authorize(actor, Action::CustomerManage)?;
        let before = live_customer(&self.customers, id).await?;
        let customer = Customer {
            status: RecordStatus::Deleted,
            updated_at: Utc::now(),
            ..before.clone()
        };
        self.customers.update(&customer).await?;
        record(
            &self.audit,
            AuditEntry::new(Some(actor), "customer.delete", "customer", Some(id))
                .before(&before)
                .after(&customer),
        )
        .await;
        Ok(())
    }
}
