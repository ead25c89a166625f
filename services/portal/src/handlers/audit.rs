use axum::{
    Json,
    extract::{RawQuery, State},
};

use belzir_auth_types::identity::Actor;
use belzir_domain::pagination::PageRequest;

use crate::domain::types::AuditEntry;
use crate::error::PortalError;
use crate::handlers::{ItemsResponse, parse_query};
use crate::state::AppState;
use crate::usecase::audit::ListAuditLogsUseCase;

// ── GET /audit-logs ──────────────────────────────────────────────────────────

pub async fn list_audit_logs(
    actor: Actor,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<ItemsResponse<AuditEntry>>, PortalError> {
    let page: PageRequest = parse_query(raw_query)?;
    let usecase = ListAuditLogsUseCase {
        repo: state.audit_repo(),
    };
    let (items, total) = usecase.execute(&actor, page).await?;
    Ok(ItemsResponse::with_total(
        items,
        i64::try_from(total).unwrap_or(i64::MAX),
    ))
}
