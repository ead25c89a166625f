use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use belzir_auth_types::identity::Actor;
use belzir_domain::device::{DeviceOs, DeviceStatus};

use crate::domain::types::Device;
use crate::error::PortalError;
use crate::handlers::{ItemResponse, ItemsResponse, JsonBody};
use crate::state::AppState;
use crate::usecase::device::{
    AssignDeviceUseCase, CreateDeviceInput, CreateDeviceUseCase, DeleteDeviceUseCase,
    ListDevicesUseCase, UnassignDeviceUseCase, UpdateDeviceInput, UpdateDeviceUseCase,
};

type ItemJson = Json<ItemResponse<Device>>;

// ── GET /devices ─────────────────────────────────────────────────────────────

pub async fn list_devices(
    actor: Actor,
    State(state): State<AppState>,
) -> Result<Json<ItemsResponse<Device>>, PortalError> {
    let usecase = ListDevicesUseCase {
        customers: state.customer_repo(),
        devices: state.device_repo(),
    };
    Ok(ItemsResponse::new(usecase.execute(&actor).await?))
}

// ── POST /devices ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateDeviceRequest {
    pub name: String,
    pub os: Option<DeviceOs>,
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub cyber_protection_enabled: bool,
    #[serde(default)]
    pub encryption_enabled: bool,
}

pub async fn create_device(
    actor: Actor,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateDeviceRequest>,
) -> Result<(StatusCode, ItemJson), PortalError> {
    let usecase = CreateDeviceUseCase {
        customers: state.customer_repo(),
        devices: state.device_repo(),
        audit: state.audit_repo(),
    };
    let device = usecase
        .execute(
            &actor,
            CreateDeviceInput {
                name: body.name,
                os: body.os,
                customer_id: body.customer_id,
                cyber_protection_enabled: body.cyber_protection_enabled,
                encryption_enabled: body.encryption_enabled,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, ItemResponse::new(device)))
}

// ── PATCH /devices/{id} ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateDeviceRequest {
    pub name: Option<String>,
    pub os: Option<DeviceOs>,
    pub status: Option<DeviceStatus>,
    pub cyber_protection_enabled: Option<bool>,
    pub encryption_enabled: Option<bool>,
}

pub async fn update_device(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<UpdateDeviceRequest>,
) -> Result<ItemJson, PortalError> {
    let usecase = UpdateDeviceUseCase {
        customers: state.customer_repo(),
        devices: state.device_repo(),
        audit: state.audit_repo(),
    };
    let device = usecase
        .execute(
            &actor,
            id,
            UpdateDeviceInput {
                name: body.name,
                os: body.os,
                status: body.status,
                cyber_protection_enabled: body.cyber_protection_enabled,
                encryption_enabled: body.encryption_enabled,
            },
        )
        .await?;
    Ok(ItemResponse::new(device))
}

// ── PATCH /devices/{id}/assign ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AssignDeviceRequest {
    pub employee_id: Uuid,
}

pub async fn assign_device(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<AssignDeviceRequest>,
) -> Result<ItemJson, PortalError> {
    let usecase = AssignDeviceUseCase {
        customers: state.customer_repo(),
        employees: state.employee_repo(),
        devices: state.device_repo(),
        audit: state.audit_repo(),
    };
    Ok(ItemResponse::new(
        usecase.execute(&actor, id, body.employee_id).await?,
    ))
}

// ── PATCH /devices/{id}/unassign ─────────────────────────────────────────────

pub async fn unassign_device(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ItemJson, PortalError> {
    let usecase = UnassignDeviceUseCase {
        customers: state.customer_repo(),
        employees: state.employee_repo(),
        devices: state.device_repo(),
        audit: state.audit_repo(),
    };
    Ok(ItemResponse::new(usecase.execute(&actor, id).await?))
}

// ── DELETE /devices/{id} ─────────────────────────────────────────────────────

pub async fn delete_device(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, PortalError> {
    let usecase = DeleteDeviceUseCase {
        customers: state.customer_repo(),
        devices: state.device_repo(),
        audit: state.audit_repo(),
    };
    usecase.execute(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
