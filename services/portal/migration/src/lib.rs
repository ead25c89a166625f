use sea_orm_migration::prelude::*;

mod m20260301_000001_create_partners;
mod m20260301_000002_create_customers;
mod m20260301_000003_create_employees;
mod m20260301_000004_create_devices;
mod m20260301_000005_create_commissions;
mod m20260301_000006_create_audit_logs;
mod m20260301_000007_create_system_settings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_partners::Migration),
            Box::new(m20260301_000002_create_customers::Migration),
            Box::new(m20260301_000003_create_employees::Migration),
            Box::new(m20260301_000004_create_devices::Migration),
            Box::new(m20260301_000005_create_commissions::Migration),
            Box::new(m20260301_000006_create_audit_logs::Migration),
            Box::new(m20260301_000007_create_system_settings::Migration),
        ]
    }
}
