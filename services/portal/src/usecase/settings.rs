use chrono::Utc;

use belzir_auth_types::identity::Actor;

use crate::domain::capability::{Action, authorize};
use crate::domain::repository::{AuditRepository, SettingsRepository};
use crate::domain::types::{AuditEntry, SystemSettings};
use crate::error::PortalError;
use crate::usecase::audit::record;

pub(crate) fn check_rate(rate: f64, field: &str) -> Result<f64, PortalError> {
    if rate.is_finite() && (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(PortalError::validation(format!(
            "{field} must be between 0 and 1"
        )))
    }
}

// ── GetSettings ──────────────────────────────────────────────────────────────

pub struct GetSettingsUseCase<S: SettingsRepository> {
    pub repo: S,
}

impl<S: SettingsRepository> GetSettingsUseCase<S> {
    pub async fn execute(&self, actor: &Actor) -> Result<SystemSettings, PortalError> {
        authorize(actor, Action::SettingsRead)?;
        self.repo.get().await
    }
}

// ── UpdateSettings ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateSettingsInput {
    pub company_name: Option<String>,
    pub support_email: Option<String>,
    pub default_partner_commission_rate: Option<f64>,
    pub maintenance_mode: Option<bool>,
}

pub struct UpdateSettingsUseCase<S: SettingsRepository, A: AuditRepository> {
    pub repo: S,
    pub audit: A,
}

impl<S: SettingsRepository, A: AuditRepository> UpdateSettingsUseCase<S, A> {
    pub async fn execute(
        &self,
        actor: &Actor,
        input: UpdateSettingsInput,
    ) -> Result<SystemSettings, PortalError> {
        authorize(actor, Action::SettingsUpdate)?;
        let before = self.repo.get().await?;

        let mut settings = before.clone();
        if let Some(name) = input.company_name {
            let name = name.trim();
            if name.is_empty() {
                return Err(PortalError::validation("company_name must not be empty"));
            }
            settings.company_name = name.to_owned();
        }
        if let Some(email) = input.support_email {
            settings.support_email = email.trim().to_lowercase();
        }
        if let Some(rate) = input.default_partner_commission_rate {
            settings.default_partner_commission_rate =
                check_rate(rate, "default_partner_commission_rate")?;
        }
        if let Some(mode) = input.maintenance_mode {
            settings.maintenance_mode = mode;
        }
        settings.updated_at = Utc::now();

        self.repo.update(&settings).await?;
        record(
            &self.audit,
            AuditEntry::new(Some(actor), "settings.update", "settings", None)
                .before(&before)
                .after(&settings),
        )
        .await;
        Ok(settings)
    }
}
