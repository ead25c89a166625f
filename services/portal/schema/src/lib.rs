//! sea-orm entities for the portal tables.
//!
//! Enum-valued columns are stored as text; `infra/db.rs` converts them to the
//! `belzir-domain` enums.

pub mod audit_logs;
pub mod commissions;
pub mod customers;
pub mod devices;
pub mod employees;
pub mod partners;
pub mod system_settings;
