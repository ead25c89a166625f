#![allow(async_fn_in_trait)]

use uuid::Uuid;

use belzir_domain::pagination::PageRequest;

use crate::domain::scope::Visibility;
use crate::domain::types::{
    AuditEntry, Commission, Customer, Device, DeviceMove, Employee, LifecycleWrite, Partner,
    SystemSettings,
};
use crate::error::PortalError;

/// Repository for partners. Rows are soft-deleted via their status.
pub trait PartnerRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Partner>, PortalError>;

    /// All partners whose status is not `deleted`, ordered by name.
    async fn list_live(&self) -> Result<Vec<Partner>, PortalError>;

    /// Fails with `DuplicateKey` when the name is taken.
    async fn create(&self, partner: &Partner) -> Result<(), PortalError>;

    async fn update(&self, partner: &Partner) -> Result<(), PortalError>;
}

/// Repository for customers. Rows are soft-deleted via their status.
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, PortalError>;

    /// Non-deleted customers, optionally restricted to one partner.
    async fn list_live(&self, partner_id: Option<Uuid>) -> Result<Vec<Customer>, PortalError>;

    /// Ids of the partner's non-deleted customers.
    async fn live_ids_for_partner(&self, partner_id: Uuid) -> Result<Vec<Uuid>, PortalError>;

    /// Fails with `DuplicateKey` when the name is taken within the partner.
    async fn create(&self, customer: &Customer) -> Result<(), PortalError>;

    async fn update(&self, customer: &Customer) -> Result<(), PortalError>;
}

/// Repository for employees and the atomic lifecycle writes that touch them.
pub trait EmployeeRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, PortalError>;

    async fn list(&self, visibility: &Visibility) -> Result<Vec<Employee>, PortalError>;

    /// Fails with `DuplicateKey` when the email is taken within the customer.
    async fn create(&self, employee: &Employee) -> Result<(), PortalError>;

    /// Apply the employee update, device moves and commission insert as one unit.
    ///
    /// A `Claim` that matches no available device aborts the whole write with
    /// `InvalidTransition`.
    async fn apply(&self, write: &LifecycleWrite) -> Result<(), PortalError>;

    /// Delete the employee after applying `releases`. Returns `true` if a row was deleted.
    async fn remove(&self, id: Uuid, releases: &[DeviceMove]) -> Result<bool, PortalError>;
}

/// Repository for devices. Assignment state only changes through
/// [`EmployeeRepository::apply`].
pub trait DeviceRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Device>, PortalError>;

    async fn list(&self, visibility: &Visibility) -> Result<Vec<Device>, PortalError>;

    async fn create(&self, device: &Device) -> Result<(), PortalError>;

    /// Persist name, os and security flags. Ownership and assignment are untouched.
    async fn update_details(&self, device: &Device) -> Result<(), PortalError>;

    /// Delete only if the device is available and unheld. Returns `true` if a row was deleted.
    async fn delete_available(&self, id: Uuid) -> Result<bool, PortalError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommissionFilter {
    pub partner_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
}

/// Repository for commissions. Inserts happen through [`EmployeeRepository::apply`].
pub trait CommissionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Commission>, PortalError>;

    /// Newest first.
    async fn list(&self, filter: CommissionFilter) -> Result<Vec<Commission>, PortalError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, PortalError>;
}

/// Append-only audit trail.
pub trait AuditRepository: Send + Sync {
    async fn append(&self, entry: &AuditEntry) -> Result<(), PortalError>;

    /// Newest first.
    async fn list(&self, page: PageRequest) -> Result<Vec<AuditEntry>, PortalError>;

    async fn count(&self) -> Result<u64, PortalError>;
}

/// The settings singleton.
pub trait SettingsRepository: Send + Sync {
    /// Returns the stored settings, creating the defaults on first read.
    async fn get(&self) -> Result<SystemSettings, PortalError>;

    async fn update(&self, settings: &SystemSettings) -> Result<(), PortalError>;
}
