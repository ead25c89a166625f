use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAuditRepository, DbCommissionRepository, DbCustomerRepository, DbDeviceRepository,
    DbEmployeeRepository, DbPartnerRepository, DbSettingsRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn partner_repo(&self) -> DbPartnerRepository {
        DbPartnerRepository {
            db: self.db.clone(),
        }
    }

    pub fn customer_repo(&self) -> DbCustomerRepository {
        DbCustomerRepository {
            db: self.db.clone(),
        }
    }

    pub fn employee_repo(&self) -> DbEmployeeRepository {
        DbEmployeeRepository {
            db: self.db.clone(),
        }
    }

    pub fn device_repo(&self) -> DbDeviceRepository {
        DbDeviceRepository {
            db: self.db.clone(),
        }
    }

    pub fn commission_repo(&self) -> DbCommissionRepository {
        DbCommissionRepository {
            db: self.db.clone(),
        }
    }

    pub fn audit_repo(&self) -> DbAuditRepository {
        DbAuditRepository {
            db: self.db.clone(),
        }
    }

    pub fn settings_repo(&self) -> DbSettingsRepository {
        DbSettingsRepository {
            db: self.db.clone(),
        }
    }
}
