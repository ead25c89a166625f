use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use belzir_auth_types::identity::Actor;
use belzir_domain::record::RecordStatus;

use crate::domain::types::{Customer, Partner, PartnerDashboard};
use crate::error::PortalError;
use crate::handlers::{ItemResponse, ItemsResponse, JsonBody};
use crate::state::AppState;
use crate::usecase::partner::{
    CreatePartnerInput, CreatePartnerUseCase, DeletePartnerUseCase, ListMyCustomersUseCase,
    ListPartnersUseCase, PartnerDashboardUseCase, UpdatePartnerInput, UpdatePartnerUseCase,
};

// ── GET /partners ────────────────────────────────────────────────────────────

pub async fn list_partners(
    actor: Actor,
    State(state): State<AppState>,
) -> Result<Json<ItemsResponse<Partner>>, PortalError> {
    let usecase = ListPartnersUseCase {
        repo: state.partner_repo(),
    };
    Ok(ItemsResponse::new(usecase.execute(&actor).await?))
}

// ── POST /partners ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreatePartnerRequest {
    pub name: String,
    pub commission_rate: Option<f64>,
}

pub async fn create_partner(
    actor: Actor,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreatePartnerRequest>,
) -> Result<(StatusCode, Json<ItemResponse<Partner>>), PortalError> {
    let usecase = CreatePartnerUseCase {
        repo: state.partner_repo(),
        settings: state.settings_repo(),
        audit: state.audit_repo(),
    };
    let partner = usecase
        .execute(
            &actor,
            CreatePartnerInput {
                name: body.name,
                commission_rate: body.commission_rate,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, ItemResponse::new(partner)))
}

// ── PATCH /partners/{id} ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdatePartnerRequest {
    pub name: Option<String>,
    pub commission_rate: Option<f64>,
    pub status: Option<RecordStatus>,
}

pub async fn update_partner(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<UpdatePartnerRequest>,
) -> Result<Json<ItemResponse<Partner>>, PortalError> {
    let usecase = UpdatePartnerUseCase {
        repo: state.partner_repo(),
        audit: state.audit_repo(),
    };
    let partner = usecase
        .execute(
            &actor,
            id,
            UpdatePartnerInput {
                name: body.name,
                commission_rate: body.commission_rate,
                status: body.status,
            },
        )
        .await?;
    Ok(ItemResponse::new(partner))
}

// ── DELETE /partners/{id} ────────────────────────────────────────────────────

pub async fn delete_partner(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, PortalError> {
    let usecase = DeletePartnerUseCase {
        repo: state.partner_repo(),
        audit: state.audit_repo(),
    };
    usecase.execute(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /partners/me/customers ───────────────────────────────────────────────

pub async fn list_my_customers(
    actor: Actor,
    State(state): State<AppState>,
) -> Result<Json<ItemsResponse<Customer>>, PortalError> {
    let usecase = ListMyCustomersUseCase {
        customers: state.customer_repo(),
    };
    Ok(ItemsResponse::new(usecase.execute(&actor).await?))
}

// ── GET /partners/me/dashboard ───────────────────────────────────────────────

pub async fn get_dashboard(
    actor: Actor,
    State(state): State<AppState>,
) -> Result<Json<ItemResponse<PartnerDashboard>>, PortalError> {
    let usecase = PartnerDashboardUseCase {
        customers: state.customer_repo(),
        employees: state.employee_repo(),
        commissions: state.commission_repo(),
    };
    Ok(ItemResponse::new(usecase.execute(&actor).await?))
}
