use belzir_domain::device::{DeviceOs, DeviceStatus, OwnerType};
use belzir_domain::employee::EmployeeStatus;
use uuid::Uuid;

use belzir_portal::domain::repository::DeviceRepository;
use belzir_portal::error::PortalError;
use belzir_portal::usecase::device::{
    CreateDeviceInput, CreateDeviceUseCase, DeleteDeviceUseCase, UpdateDeviceInput,
    UpdateDeviceUseCase,
};

use crate::helpers::{Fixture, MemoryStore, assert_links_consistent};

fn create(store: &MemoryStore) -> CreateDeviceUseCase<MemoryStore, MemoryStore, MemoryStore> {
    CreateDeviceUseCase {
        customers: store.clone(),
        devices: store.clone(),
        audit: store.clone(),
    }
}

fn update(store: &MemoryStore) -> UpdateDeviceUseCase<MemoryStore, MemoryStore, MemoryStore> {
    UpdateDeviceUseCase {
        customers: store.clone(),
        devices: store.clone(),
        audit: store.clone(),
    }
}

fn delete(store: &MemoryStore) -> DeleteDeviceUseCase<MemoryStore, MemoryStore, MemoryStore> {
    DeleteDeviceUseCase {
        customers: store.clone(),
        devices: store.clone(),
        audit: store.clone(),
    }
}

fn laptop(customer_id: Option<Uuid>) -> CreateDeviceInput {
    CreateDeviceInput {
        name: "MacBook Air".into(),
        os: Some(DeviceOs::Macos),
        customer_id,
        cyber_protection_enabled: false,
        encryption_enabled: true,
    }
}

// ── Assign ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_assign_available_device_to_active_employee() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Active);

    let device = fx
        .assign()
        .execute(&fx.customer_actor(), fx.pooled.id, employee.id)
        .await
        .unwrap();

    assert_eq!(device.status, DeviceStatus::Assigned);
    assert_eq!(device.assigned_employee_id, Some(employee.id));
    assert_eq!(fx.store.employee(employee.id).device_id, Some(fx.pooled.id));
    assert_links_consistent(&fx.store);
    let actions = fx.store.audit_actions();
    assert!(actions.iter().any(|a| a == "device.assign"));
    assert!(actions.iter().any(|a| a == "employee.device.assign"));
}

#[tokio::test]
async fn should_reject_assigning_already_assigned_device() {
    let fx = Fixture::new();
    let holder = fx.employee(EmployeeStatus::Active);
    let other = fx.employee(EmployeeStatus::Active);
    fx.store.link(holder.id, fx.pooled.id);

    let result = fx
        .assign()
        .execute(&fx.superadmin(), fx.pooled.id, other.id)
        .await;

    assert!(
        matches!(result, Err(PortalError::InvalidTransition(_))),
        "expected InvalidTransition, got {result:?}"
    );
    assert_eq!(fx.store.device(fx.pooled.id).assigned_employee_id, Some(holder.id));
    assert_eq!(fx.store.employee(other.id).device_id, None);
}

#[tokio::test]
async fn should_reject_assigning_to_archived_or_offboarding_employee() {
    for status in [EmployeeStatus::Archived, EmployeeStatus::Offboarding] {
        let fx = Fixture::new();
        let employee = fx.employee(status);

        let result = fx
            .assign()
            .execute(&fx.superadmin(), fx.pooled.id, employee.id)
            .await;

        assert!(matches!(result, Err(PortalError::InvalidTransition(_))));
        assert!(fx.store.device(fx.pooled.id).is_free());
    }
}

#[tokio::test]
async fn should_release_previous_device_on_reassign() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Active);
    fx.store.link(employee.id, fx.owned.id);

    fx.assign()
        .execute(&fx.customer_actor(), fx.pooled.id, employee.id)
        .await
        .unwrap();

    assert!(fx.store.device(fx.owned.id).is_free());
    assert_eq!(fx.store.device(fx.pooled.id).assigned_employee_id, Some(employee.id));
    assert_links_consistent(&fx.store);
}

#[tokio::test]
async fn should_forbid_partner_from_assigning() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Active);

    let result = fx
        .assign()
        .execute(&fx.partner_actor(), fx.owned.id, employee.id)
        .await;

    assert!(matches!(result, Err(PortalError::Forbidden)));
}

// ── Unassign ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_unassign_and_clear_holder() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Active);
    fx.store.link(employee.id, fx.pooled.id);

    let device = fx
        .unassign()
        .execute(&fx.customer_actor(), fx.pooled.id)
        .await
        .unwrap();

    assert_eq!(device.status, DeviceStatus::Available);
    assert!(fx.store.device(fx.pooled.id).is_free());
    assert_eq!(fx.store.employee(employee.id).device_id, None);
    assert_links_consistent(&fx.store);
}

#[tokio::test]
async fn should_reject_unassigning_available_device() {
    let fx = Fixture::new();

    let result = fx.unassign().execute(&fx.superadmin(), fx.pooled.id).await;

    assert!(matches!(result, Err(PortalError::InvalidTransition(_))));
}

// ── Create / update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_customer_owned_device_for_customer_actor() {
    let fx = Fixture::new();

    let device = create(&fx.store)
        .execute(&fx.customer_actor(), laptop(None))
        .await
        .unwrap();

    assert_eq!(device.owner_type, OwnerType::Customer);
    assert_eq!(device.customer_id, Some(fx.customer.id));
    assert_eq!(device.status, DeviceStatus::Available);
}

#[tokio::test]
async fn should_create_pooled_device_for_superadmin_by_default() {
    let fx = Fixture::new();

    let pooled = create(&fx.store)
        .execute(&fx.superadmin(), laptop(None))
        .await
        .unwrap();
    let owned = create(&fx.store)
        .execute(&fx.superadmin(), laptop(Some(fx.customer.id)))
        .await
        .unwrap();

    assert!(pooled.is_pooled());
    assert!(owned.is_owned_by(fx.customer.id));
    assert_eq!(fx.store.audit_actions().len(), 2);
}

#[tokio::test]
async fn should_forbid_partner_from_creating_devices() {
    let fx = Fixture::new();

    let result = create(&fx.store)
        .execute(&fx.partner_actor(), laptop(None))
        .await;

    assert!(matches!(result, Err(PortalError::Forbidden)));
}

#[tokio::test]
async fn should_reject_direct_status_change_for_every_role() {
    let fx = Fixture::new();

    for actor in [fx.customer_actor(), fx.superadmin()] {
        let result = update(&fx.store)
            .execute(
                &actor,
                fx.owned.id,
                UpdateDeviceInput {
                    status: Some(DeviceStatus::Assigned),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(PortalError::InvalidTransition(_))));
    }
    assert!(fx.store.device(fx.owned.id).is_free());
}

#[tokio::test]
async fn should_update_details_of_owned_device() {
    let fx = Fixture::new();

    let device = update(&fx.store)
        .execute(
            &fx.customer_actor(),
            fx.owned.id,
            UpdateDeviceInput {
                name: Some("Renamed".into()),
                encryption_enabled: Some(false),
                status: Some(DeviceStatus::Available),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(device.name, "Renamed");
    assert!(!fx.store.device(fx.owned.id).encryption_enabled);
}

#[tokio::test]
async fn should_forbid_customer_editing_pooled_device() {
    let fx = Fixture::new();

    let result = update(&fx.store)
        .execute(
            &fx.customer_actor(),
            fx.pooled.id,
            UpdateDeviceInput {
                name: Some("Mine now".into()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(PortalError::Forbidden)));
}

// ── Delete ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_deleting_assigned_device() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Active);
    fx.store.link(employee.id, fx.owned.id);

    let result = delete(&fx.store)
        .execute(&fx.customer_actor(), fx.owned.id)
        .await;

    assert!(matches!(result, Err(PortalError::Conflict(_))));
    assert_eq!(fx.store.device(fx.owned.id).status, DeviceStatus::Assigned);
}

#[tokio::test]
async fn should_delete_available_device_for_good() {
    let fx = Fixture::new();

    delete(&fx.store)
        .execute(&fx.customer_actor(), fx.owned.id)
        .await
        .unwrap();

    assert_eq!(fx.store.find_by_id(fx.owned.id).await.unwrap(), None);
    let again = delete(&fx.store)
        .execute(&fx.customer_actor(), fx.owned.id)
        .await;
    assert!(matches!(again, Err(PortalError::NotFound(_))));
    assert!(fx.store.audit_actions().iter().any(|a| a == "device.delete"));
}

#[tokio::test]
async fn should_forbid_customer_deleting_pooled_device() {
    let fx = Fixture::new();

    let result = delete(&fx.store)
        .execute(&fx.customer_actor(), fx.pooled.id)
        .await;

    assert!(matches!(result, Err(PortalError::Forbidden)));
    assert!(fx.store.device(fx.pooled.id).is_free());
}
