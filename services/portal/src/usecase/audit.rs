use belzir_auth_types::identity::Actor;
use belzir_domain::pagination::PageRequest;

use crate::domain::capability::{Action, authorize};
use crate::domain::repository::AuditRepository;
use crate::domain::types::AuditEntry;
use crate::error::PortalError;

/// Append an audit entry. A failed write is logged and swallowed so it never
/// undoes or masks the mutation it describes.
pub async fn record<A: AuditRepository>(audit: &A, entry: AuditEntry) {
    if let Err(e) = audit.append(&entry).await {
        tracing::error!(
            error = ?e,
            action = %entry.action,
            entity_type = %entry.entity_type,
            entity_id = ?entry.entity_id,
            "failed to write audit log"
        );
    }
}

// ── ListAuditLogs ────────────────────────────────────────────────────────────

pub struct ListAuditLogsUseCase<A: AuditRepository> {
    pub repo: A,
}

impl<A: AuditRepository> ListAuditLogsUseCase<A> {
    /// Newest first, with the total row count.
    pub async fn execute(
        &self,
        actor: &Actor,
        page: PageRequest,
    ) -> Result<(Vec<AuditEntry>, u64), PortalError> {
        authorize(actor, Action::AuditRead)?;
        let page = page.clamped();
        let items = self.repo.list(page).await?;
        let total = self.repo.count().await?;
        Ok((items, total))
    }
}
