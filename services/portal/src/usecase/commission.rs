use uuid::Uuid;

use belzir_auth_types::identity::Actor;

use crate::domain::capability::{Action, authorize};
use crate::domain::repository::{AuditRepository, CommissionFilter, CommissionRepository};
use crate::domain::types::{AuditEntry, Commission};
use crate::error::PortalError;
use crate::usecase::audit::record;

pub struct CommissionList {
    pub items: Vec<Commission>,
    pub total: i64,
}

impl CommissionList {
    fn new(items: Vec<Commission>) -> Self {
        let total = items.iter().map(|c| c.amount).sum();
        Self { items, total }
    }
}

// ── ListCommissions ──────────────────────────────────────────────────────────

pub struct ListCommissionsUseCase<M: CommissionRepository> {
    pub repo: M,
}

impl<M: CommissionRepository> ListCommissionsUseCase<M> {
    pub async fn execute(
        &self,
        actor: &Actor,
        filter: CommissionFilter,
    ) -> Result<CommissionList, PortalError> {
        authorize(actor, Action::CommissionRead)?;
        Ok(CommissionList::new(self.repo.list(filter).await?))
    }
}

// ── ListMyCommissions ────────────────────────────────────────────────────────

pub struct ListMyCommissionsUseCase<M: CommissionRepository> {
    pub repo: M,
}

impl<M: CommissionRepository> ListMyCommissionsUseCase<M> {
    pub async fn execute(&self, actor: &Actor) -> Result<CommissionList, PortalError> {
        authorize(actor, Action::CommissionSelfView)?;
        let partner_id = actor
            .partner_id
            .ok_or(PortalError::ScopeMissing("partner_id"))?;
        let items = self
            .repo
            .list(CommissionFilter {
                partner_id: Some(partner_id),
                customer_id: None,
            })
            .await?;
        Ok(CommissionList::new(items))
    }
}

// ── DeleteCommission ─────────────────────────────────────────────────────────

/// Deleting a commission never touches the employee or device it came from.
pub struct DeleteCommissionUseCase<M: CommissionRepository, A: AuditRepository> {
    pub repo: M,
    pub audit: A,
}

impl<M: CommissionRepository, A: AuditRepository> DeleteCommissionUseCase<M, A> {
    pub async fn execute(&self, actor: &Actor, id: Uuid) -> Result<(), PortalError> {
        authorize(actor, Action::CommissionDelete)?;
        let commission = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(PortalError::NotFound("commission"))?;
        if !self.repo.delete(id).await? {
            return Err(PortalError::NotFound("commission"));
        }
        record(
            &self.audit,
            AuditEntry::new(Some(actor), "commission.delete", "commission", Some(id))
                .before(&commission),
        )
        .await;
        Ok(())
    }
}
