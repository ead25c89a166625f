use serde_json::json;
use uuid::Uuid;

use belzir_domain::device::DeviceStatus;
use belzir_domain::employee::EmployeeStatus;

use belzir_portal::usecase::reconcile::{ReconcileReport, ReconcileUseCase};

use crate::helpers::{Fixture, MemoryStore, assert_links_consistent};

fn reconcile(store: &MemoryStore) -> ReconcileUseCase<MemoryStore, MemoryStore, MemoryStore> {
    ReconcileUseCase {
        employees: store.clone(),
        devices: store.clone(),
        audit: store.clone(),
    }
}

/// Seeds one of each kind of damage and returns (orphaned device, employee
/// with dangling link, employee with stray step).
fn damage(fx: &Fixture) -> (Uuid, Uuid, Uuid) {
    let mut world = fx.store.world.lock().unwrap();

    let pooled = world
        .devices
        .iter_mut()
        .find(|d| d.id == fx.pooled.id)
        .unwrap();
    pooled.status = DeviceStatus::Assigned;
    pooled.assigned_employee_id = Some(Uuid::now_v7());
    drop(world);

    let dangling = fx.employee(EmployeeStatus::Active);
    let stray = fx.employee(EmployeeStatus::Active);

    let mut world = fx.store.world.lock().unwrap();
    for e in world.employees.iter_mut() {
        if e.id == dangling.id {
            e.device_id = Some(fx.owned.id);
        }
        if e.id == stray.id {
            e.onboarding_step = Some(2);
        }
    }
    (fx.pooled.id, dangling.id, stray.id)
}

#[tokio::test]
async fn should_leave_consistent_data_alone() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Active);
    fx.store.link(employee.id, fx.owned.id);

    let report = reconcile(&fx.store).execute(false).await.unwrap();

    assert_eq!(report.repairs(), 0);
    assert_eq!(report.devices_scanned, 2);
    assert_eq!(report.employees_scanned, 1);
    assert!(fx.store.audit_actions().is_empty());
}

#[tokio::test]
async fn should_repair_links_and_steps() {
    let fx = Fixture::new();
    let (orphaned, dangling, stray) = damage(&fx);

    let report = reconcile(&fx.store).execute(false).await.unwrap();

    assert_eq!(
        report,
        ReconcileReport {
            dry_run: false,
            devices_scanned: 2,
            employees_scanned: 2,
            devices_released: vec![orphaned],
            employees_cleared: vec![dangling],
            employees_normalized: vec![stray],
        }
    );
    assert!(fx.store.device(orphaned).is_free());
    assert_eq!(fx.store.employee(dangling).device_id, None);
    assert_eq!(fx.store.employee(stray).onboarding_step, None);
    assert_links_consistent(&fx.store);

    let actions = fx.store.audit_actions();
    assert_eq!(
        actions,
        vec![
            "reconcile.device.release",
            "reconcile.employee.repair",
            "reconcile.employee.repair",
        ]
    );
}

#[tokio::test]
async fn should_audit_each_employee_once() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Active);
    {
        let mut world = fx.store.world.lock().unwrap();
        let e = world
            .employees
            .iter_mut()
            .find(|e| e.id == employee.id)
            .unwrap();
        e.device_id = Some(fx.owned.id);
        e.onboarding_step = Some(2);
    }

    let report = reconcile(&fx.store).execute(false).await.unwrap();

    assert_eq!(report.employees_cleared, vec![employee.id]);
    assert_eq!(report.employees_normalized, vec![employee.id]);
    let repaired = fx.store.employee(employee.id);
    assert_eq!(repaired.device_id, None);
    assert_eq!(repaired.onboarding_step, None);

    let world = fx.store.world.lock().unwrap();
    assert_eq!(world.audit.len(), 1);
    let entry = &world.audit[0];
    assert_eq!(entry.action, "reconcile.employee.repair");
    assert_eq!(entry.entity_id, Some(employee.id));
    assert_eq!(
        entry.meta,
        Some(json!({ "repairs": ["clear_device", "normalize"] }))
    );
}

#[tokio::test]
async fn should_only_report_on_dry_run() {
    let fx = Fixture::new();
    let (orphaned, dangling, stray) = damage(&fx);

    let report = reconcile(&fx.store).execute(true).await.unwrap();

    assert!(report.dry_run);
    assert_eq!(report.repairs(), 3);
    assert_eq!(fx.store.device(orphaned).status, DeviceStatus::Assigned);
    assert_eq!(fx.store.employee(dangling).device_id, Some(fx.owned.id));
    assert_eq!(fx.store.employee(stray).onboarding_step, Some(2));
    assert!(fx.store.audit_actions().is_empty());
}

#[tokio::test]
async fn should_converge_after_one_pass() {
    let fx = Fixture::new();
    damage(&fx);

    reconcile(&fx.store).execute(false).await.unwrap();
    let second = reconcile(&fx.store).execute(false).await.unwrap();

    assert_eq!(second.repairs(), 0);
}

#[tokio::test]
async fn should_release_device_claimed_by_someone_else() {
    let fx = Fixture::new();
    let holder = fx.employee(EmployeeStatus::Active);
    let claimant = fx.employee(EmployeeStatus::Active);
    fx.store.link(holder.id, fx.owned.id);
    {
        let mut world = fx.store.world.lock().unwrap();
        let e = world
            .employees
            .iter_mut()
            .find(|e| e.id == claimant.id)
            .unwrap();
        e.device_id = Some(fx.owned.id);
    }

    let report = reconcile(&fx.store).execute(false).await.unwrap();

    assert!(report.devices_released.is_empty());
    assert_eq!(report.employees_cleared, vec![claimant.id]);
    assert_eq!(fx.store.employee(holder.id).device_id, Some(fx.owned.id));
    assert_eq!(fx.store.employee(claimant.id).device_id, None);
    assert_links_consistent(&fx.store);
}
