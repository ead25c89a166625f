use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use belzir_auth_types::identity::Actor;
use belzir_domain::employee::{AcquisitionOption, EmployeeStatus};

use crate::domain::types::Employee;
use crate::error::PortalError;
use crate::handlers::{ItemResponse, ItemsResponse, JsonBody, double_option, parse_optional_body};
use crate::state::AppState;
use crate::usecase::employee::{
    CreateEmployeeInput, CreateEmployeeUseCase, DeleteEmployeeUseCase, GetEmployeeUseCase,
    ListEmployeesUseCase, UpdateEmployeeInput, UpdateEmployeeUseCase,
};
use crate::usecase::offboarding::{
    CompleteOffboardingUseCase, ReceiveDeviceUseCase, StartOffboardingUseCase,
};
use crate::usecase::onboarding::{
    CompleteOnboardingUseCase, OnboardingStep2Input, OnboardingStep2UseCase,
};

type ItemJson = Json<ItemResponse<Employee>>;

// ── GET /employees ───────────────────────────────────────────────────────────

pub async fn list_employees(
    actor: Actor,
    State(state): State<AppState>,
) -> Result<Json<ItemsResponse<Employee>>, PortalError> {
    let usecase = ListEmployeesUseCase {
        customers: state.customer_repo(),
        employees: state.employee_repo(),
    };
    let items = usecase.execute(&actor).await?;
    Ok(ItemsResponse::new(items))
}

// ── GET /employees/{id} ──────────────────────────────────────────────────────

pub async fn get_employee(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ItemJson, PortalError> {
    let usecase = GetEmployeeUseCase {
        customers: state.customer_repo(),
        employees: state.employee_repo(),
    };
    Ok(ItemResponse::new(usecase.execute(&actor, id).await?))
}

// ── POST /employees ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateEmployeeRequest {
    pub customer_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub location: String,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub status: Option<EmployeeStatus>,
    pub onboarding_step: Option<u8>,
    pub offboarding_step: Option<u8>,
    pub account_disabled: Option<bool>,
}

pub async fn create_employee(
    actor: Actor,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateEmployeeRequest>,
) -> Result<(StatusCode, ItemJson), PortalError> {
    let usecase = CreateEmployeeUseCase {
        customers: state.customer_repo(),
        employees: state.employee_repo(),
        audit: state.audit_repo(),
    };
    let employee = usecase
        .execute(
            &actor,
            CreateEmployeeInput {
                customer_id: body.customer_id,
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                location: body.location,
                job_title: body.job_title,
                department: body.department,
                start_date: body.start_date,
                status: body.status,
                onboarding_step: body.onboarding_step,
                offboarding_step: body.offboarding_step,
                account_disabled: body.account_disabled,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, ItemResponse::new(employee)))
}

// ── PATCH /employees/{id} ────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct UpdateEmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub status: Option<EmployeeStatus>,
    pub onboarding_step: Option<u8>,
    pub offboarding_step: Option<u8>,
    pub account_disabled: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub device_id: Option<Option<Uuid>>,
}

pub async fn update_employee(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<UpdateEmployeeRequest>,
) -> Result<ItemJson, PortalError> {
    let usecase = UpdateEmployeeUseCase {
        customers: state.customer_repo(),
        employees: state.employee_repo(),
        devices: state.device_repo(),
        audit: state.audit_repo(),
    };
    let employee = usecase
        .execute(
            &actor,
            id,
            UpdateEmployeeInput {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                location: body.location,
                job_title: body.job_title,
                department: body.department,
                start_date: body.start_date,
                status: body.status,
                onboarding_step: body.onboarding_step,
                offboarding_step: body.offboarding_step,
                account_disabled: body.account_disabled,
                device_id: body.device_id,
            },
        )
        .await?;
    Ok(ItemResponse::new(employee))
}

// ── DELETE /employees/{id} ───────────────────────────────────────────────────

pub async fn delete_employee(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, PortalError> {
    let usecase = DeleteEmployeeUseCase {
        employees: state.employee_repo(),
        devices: state.device_repo(),
        audit: state.audit_repo(),
    };
    usecase.execute(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PATCH /employees/{id}/onboarding/step2 ───────────────────────────────────

#[derive(Deserialize)]
pub struct OnboardingStep2Request {
    pub device_acquisition_option: AcquisitionOption,
    pub device_id: Option<Uuid>,
    #[serde(default)]
    pub device_approved: bool,
    #[serde(default)]
    pub setup_approved: bool,
    #[serde(default)]
    pub via_partner: bool,
}

pub async fn onboarding_step2(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<OnboardingStep2Request>,
) -> Result<ItemJson, PortalError> {
    let usecase = OnboardingStep2UseCase {
        partners: state.partner_repo(),
        customers: state.customer_repo(),
        employees: state.employee_repo(),
        devices: state.device_repo(),
        audit: state.audit_repo(),
    };
    let employee = usecase
        .execute(
            &actor,
            id,
            OnboardingStep2Input {
                option: body.device_acquisition_option,
                device_id: body.device_id,
                device_approved: body.device_approved,
                setup_approved: body.setup_approved,
                via_partner: body.via_partner,
            },
        )
        .await?;
    Ok(ItemResponse::new(employee))
}

// ── PATCH /employees/{id}/onboarding/step3/complete ──────────────────────────

pub async fn complete_onboarding(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ItemJson, PortalError> {
    let usecase = CompleteOnboardingUseCase {
        employees: state.employee_repo(),
        audit: state.audit_repo(),
    };
    Ok(ItemResponse::new(usecase.execute(&actor, id).await?))
}

// ── POST /employees/{id}/offboarding/start ───────────────────────────────────

pub async fn start_offboarding(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ItemJson, PortalError> {
    let usecase = StartOffboardingUseCase {
        customers: state.customer_repo(),
        employees: state.employee_repo(),
        audit: state.audit_repo(),
    };
    Ok(ItemResponse::new(usecase.execute(&actor, id).await?))
}

// ── PATCH /employees/{id}/offboarding/step2/receive-device ───────────────────

pub async fn receive_device(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ItemJson, PortalError> {
    let usecase = ReceiveDeviceUseCase {
        customers: state.customer_repo(),
        employees: state.employee_repo(),
        devices: state.device_repo(),
        audit: state.audit_repo(),
    };
    Ok(ItemResponse::new(usecase.execute(&actor, id).await?))
}

// ── PATCH /employees/{id}/offboarding/step3/complete ─────────────────────────

fn default_archive() -> bool {
    true
}

#[derive(Deserialize)]
pub struct CompleteOffboardingRequest {
    #[serde(default = "default_archive")]
    pub archive: bool,
}

impl Default for CompleteOffboardingRequest {
    fn default() -> Self {
        Self { archive: true }
    }
}

pub async fn complete_offboarding(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<ItemJson, PortalError> {
    let body: CompleteOffboardingRequest = parse_optional_body(&body)?;
    let usecase = CompleteOffboardingUseCase {
        customers: state.customer_repo(),
        employees: state.employee_repo(),
        audit: state.audit_repo(),
    };
    Ok(ItemResponse::new(
        usecase.execute(&actor, id, body.archive).await?,
    ))
}
