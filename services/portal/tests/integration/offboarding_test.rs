use belzir_domain::device::DeviceStatus;
use belzir_domain::employee::EmployeeStatus;

use belzir_portal::error::PortalError;
use belzir_portal::usecase::employee::UpdateEmployeeInput;

use crate::helpers::{Fixture, assert_links_consistent};

#[tokio::test]
async fn should_offboard_and_archive_through_workflow() {
    let fx = Fixture::new();
    let customer = fx.customer_actor();
    let employee = fx.employee(EmployeeStatus::Active);
    fx.store.link(employee.id, fx.owned.id);

    // Direct PATCH to archived is not a toggle.
    let direct = fx
        .update_employee()
        .execute(
            &customer,
            employee.id,
            UpdateEmployeeInput {
                status: Some(EmployeeStatus::Archived),
                ..Default::default()
            },
        )
        .await;
    assert!(
        matches!(direct, Err(PortalError::InvalidTransition(_))),
        "expected InvalidTransition, got {direct:?}"
    );
    assert_eq!(fx.store.employee(employee.id).status, EmployeeStatus::Active);

    let started = fx
        .start_offboarding()
        .execute(&customer, employee.id)
        .await
        .unwrap();
    assert_eq!(started.status, EmployeeStatus::Offboarding);
    assert_eq!(started.offboarding_step, Some(1));
    assert!(started.account_disabled);

    let received = fx
        .receive_device()
        .execute(&customer, employee.id)
        .await
        .unwrap();
    assert_eq!(received.offboarding_step, Some(2));
    assert_eq!(received.device_id, None);
    let device = fx.store.device(fx.owned.id);
    assert_eq!(device.status, DeviceStatus::Available);
    assert_eq!(device.assigned_employee_id, None);

    let archived = fx
        .complete_offboarding()
        .execute(&customer, employee.id, true)
        .await
        .unwrap();
    assert_eq!(archived.status, EmployeeStatus::Archived);
    assert_eq!(archived.offboarding_step, None);
    assert_eq!(archived.onboarding_step, None);
    assert!(archived.account_disabled);
    assert_links_consistent(&fx.store);

    let actions = fx.store.audit_actions();
    for expected in [
        "employee.offboarding.start",
        "employee.offboarding.step2.receiveDevice",
        "device.unassign",
        "employee.offboarding.step3.complete",
    ] {
        assert!(actions.iter().any(|a| a == expected), "missing {expected}");
    }
}

#[tokio::test]
async fn should_return_to_active_when_not_archiving() {
    let fx = Fixture::new();
    let customer = fx.customer_actor();
    let employee = fx.employee(EmployeeStatus::Active);

    fx.start_offboarding().execute(&customer, employee.id).await.unwrap();
    fx.receive_device().execute(&customer, employee.id).await.unwrap();
    let back = fx
        .complete_offboarding()
        .execute(&fx.superadmin(), employee.id, false)
        .await
        .unwrap();

    assert_eq!(back.status, EmployeeStatus::Active);
    assert_eq!(back.offboarding_step, None);
    assert!(back.account_disabled);
}

#[tokio::test]
async fn should_reject_second_offboarding_start() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Active);
    let actor = fx.partner_actor();

    fx.start_offboarding().execute(&actor, employee.id).await.unwrap();
    let again = fx.start_offboarding().execute(&actor, employee.id).await;

    assert!(matches!(again, Err(PortalError::InvalidTransition(_))));
}

#[tokio::test]
async fn should_reject_receive_device_before_start() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Active);

    let result = fx
        .receive_device()
        .execute(&fx.customer_actor(), employee.id)
        .await;

    assert!(matches!(result, Err(PortalError::InvalidTransition(_))));
}

#[tokio::test]
async fn should_reject_completion_before_device_received() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Active);
    let customer = fx.customer_actor();

    fx.start_offboarding().execute(&customer, employee.id).await.unwrap();
    let result = fx
        .complete_offboarding()
        .execute(&customer, employee.id, true)
        .await;

    assert!(matches!(result, Err(PortalError::InvalidTransition(_))));
    assert_eq!(
        fx.store.employee(employee.id).status,
        EmployeeStatus::Offboarding
    );
}

#[tokio::test]
async fn should_forbid_superadmin_from_starting_offboarding() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Active);

    let result = fx
        .start_offboarding()
        .execute(&fx.superadmin(), employee.id)
        .await;

    assert!(matches!(result, Err(PortalError::Forbidden)));
}

#[tokio::test]
async fn should_forbid_partner_from_receiving_device() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Active);
    fx.start_offboarding()
        .execute(&fx.partner_actor(), employee.id)
        .await
        .unwrap();

    let result = fx
        .receive_device()
        .execute(&fx.partner_actor(), employee.id)
        .await;

    assert!(matches!(result, Err(PortalError::Forbidden)));
}

#[tokio::test]
async fn should_receive_device_when_employee_holds_none() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Active);
    let customer = fx.customer_actor();

    fx.start_offboarding().execute(&customer, employee.id).await.unwrap();
    let received = fx
        .receive_device()
        .execute(&customer, employee.id)
        .await
        .unwrap();

    assert_eq!(received.offboarding_step, Some(2));
    assert!(!fx.store.audit_actions().iter().any(|a| a == "device.unassign"));
}
