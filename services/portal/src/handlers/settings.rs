use axum::{Json, extract::State};
use serde::Deserialize;

use belzir_auth_types::identity::Actor;

use crate::domain::types::SystemSettings;
use crate::error::PortalError;
use crate::handlers::{ItemResponse, JsonBody};
use crate::state::AppState;
use crate::usecase::settings::{GetSettingsUseCase, UpdateSettingsInput, UpdateSettingsUseCase};

// ── GET /settings ────────────────────────────────────────────────────────────

pub async fn get_settings(
    actor: Actor,
    State(state): State<AppState>,
) -> Result<Json<ItemResponse<SystemSettings>>, PortalError> {
    let usecase = GetSettingsUseCase {
        repo: state.settings_repo(),
    };
    Ok(ItemResponse::new(usecase.execute(&actor).await?))
}

// ── PATCH /settings ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    pub company_name: Option<String>,
    pub support_email: Option<String>,
    pub default_partner_commission_rate: Option<f64>,
    pub maintenance_mode: Option<bool>,
}

pub async fn update_settings(
    actor: Actor,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UpdateSettingsRequest>,
) -> Result<Json<ItemResponse<SystemSettings>>, PortalError> {
    let usecase = UpdateSettingsUseCase {
        repo: state.settings_repo(),
        audit: state.audit_repo(),
    };
    let settings = usecase
        .execute(
            &actor,
            UpdateSettingsInput {
                company_name: body.company_name,
                support_email: body.support_email,
                default_partner_commission_rate: body.default_partner_commission_rate,
                maintenance_mode: body.maintenance_mode,
            },
        )
        .await?;
    Ok(ItemResponse::new(settings))
}
