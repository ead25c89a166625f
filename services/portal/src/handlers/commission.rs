use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use belzir_auth_types::identity::Actor;

use crate::domain::repository::CommissionFilter;
use crate::domain::types::Commission;
use crate::error::PortalError;
use crate::handlers::{ItemsResponse, parse_query};
use crate::state::AppState;
use crate::usecase::commission::{
    DeleteCommissionUseCase, ListCommissionsUseCase, ListMyCommissionsUseCase,
};

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct CommissionListQuery {
    pub partner_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
}

// ── GET /commissions ─────────────────────────────────────────────────────────

pub async fn list_commissions(
    actor: Actor,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<ItemsResponse<Commission>>, PortalError> {
    let query: CommissionListQuery = parse_query(raw_query)?;
    let usecase = ListCommissionsUseCase {
        repo: state.commission_repo(),
    };
    let list = usecase
        .execute(
            &actor,
            CommissionFilter {
                partner_id: query.partner_id,
                customer_id: query.customer_id,
            },
        )
        .await?;
    Ok(ItemsResponse::with_total(list.items, list.total))
}

// ── GET /commissions/me ──────────────────────────────────────────────────────

pub async fn list_my_commissions(
    actor: Actor,
    State(state): State<AppState>,
) -> Result<Json<ItemsResponse<Commission>>, PortalError> {
    let usecase = ListMyCommissionsUseCase {
        repo: state.commission_repo(),
    };
    let list = usecase.execute(&actor).await?;
    Ok(ItemsResponse::with_total(list.items, list.total))
}

// ── DELETE /commissions/{id} ─────────────────────────────────────────────────

pub async fn delete_commission(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, PortalError> {
    let usecase = DeleteCommissionUseCase {
        repo: state.commission_repo(),
        audit: state.audit_repo(),
    };
    usecase.execute(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
