use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use belzir_auth_types::identity::Actor;
use belzir_domain::record::RecordStatus;

use crate::domain::types::Customer;
use crate::error::PortalError;
use crate::handlers::{ItemResponse, ItemsResponse, JsonBody, parse_query};
use crate::state::AppState;
use crate::usecase::customer::{
    CreateCustomerInput, CreateCustomerUseCase, DeleteCustomerUseCase, ListCustomersUseCase,
    UpdateCustomerInput, UpdateCustomerUseCase,
};

// ── GET /customers ───────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct CustomerListQuery {
    pub partner_id: Option<Uuid>,
}

pub async fn list_customers(
    actor: Actor,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<ItemsResponse<Customer>>, PortalError> {
    let query: CustomerListQuery = parse_query(raw_query)?;
    let usecase = ListCustomersUseCase {
        repo: state.customer_repo(),
    };
    Ok(ItemsResponse::new(
        usecase.execute(&actor, query.partner_id).await?,
    ))
}

// ── POST /customers ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCustomerRequest {
    pub partner_id: Uuid,
    pub name: String,
}

pub async fn create_customer(
    actor: Actor,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ItemResponse<Customer>>), PortalError> {
    let usecase = CreateCustomerUseCase {
        partners: state.partner_repo(),
        customers: state.customer_repo(),
        audit: state.audit_repo(),
    };
    let customer = usecase
        .execute(
            &actor,
            CreateCustomerInput {
                partner_id: body.partner_id,
                name: body.name,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, ItemResponse::new(customer)))
}

// ── PATCH /customers/{id} ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub status: Option<RecordStatus>,
    pub partner_id: Option<Uuid>,
}

pub async fn update_customer(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<UpdateCustomerRequest>,
) -> Result<Json<ItemResponse<Customer>>, PortalError> {
    let usecase = UpdateCustomerUseCase {
        partners: state.partner_repo(),
        customers: state.customer_repo(),
        audit: state.audit_repo(),
    };
    let customer = usecase
        .execute(
            &actor,
            id,
            UpdateCustomerInput {
                name: body.name,
                status: body.status,
                partner_id: body.partner_id,
            },
        )
        .await?;
    Ok(ItemResponse::new(customer))
}

// ── DELETE /customers/{id} ───────────────────────────────────────────────────

pub async fn delete_customer(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, PortalError> {
    let usecase = DeleteCustomerUseCase {
        customers: state.customer_repo(),
        audit: state.audit_repo(),
    };
    usecase.execute(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
