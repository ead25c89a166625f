use belzir_domain::commission::CommissionKind;
use belzir_domain::device::DeviceStatus;
use belzir_domain::employee::{AcquisitionOption, EmployeeStatus};
use uuid::Uuid;

use belzir_portal::error::PortalError;
use belzir_portal::usecase::employee::CreateEmployeeInput;
use belzir_portal::usecase::onboarding::OnboardingStep2Input;

use crate::helpers::{Fixture, assert_links_consistent, test_customer, test_device};

fn choose(option: AcquisitionOption, device_id: Option<Uuid>, via_partner: bool) -> OnboardingStep2Input {
    OnboardingStep2Input {
        option,
        device_id,
        device_approved: true,
        setup_approved: true,
        via_partner,
    }
}

fn new_hire() -> CreateEmployeeInput {
    CreateEmployeeInput {
        first_name: "Grace".into(),
        last_name: "Hopper".into(),
        email: "Grace.Hopper@Example.com".into(),
        location: "Arlington".into(),
        ..Default::default()
    }
}

// ── Full onboarding ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_onboard_employee_with_pooled_device_end_to_end() {
    let fx = Fixture::new();
    let customer = fx.customer_actor();

    let created = fx.create_employee().execute(&customer, new_hire()).await.unwrap();
    assert_eq!(created.status, EmployeeStatus::Onboarding);
    assert_eq!(created.onboarding_step, Some(1));
    assert_eq!(created.customer_id, fx.customer.id);
    assert_eq!(created.email, "grace.hopper@example.com");

    let after_step2 = fx
        .step2()
        .execute(
            &customer,
            created.id,
            choose(AcquisitionOption::Inventory, Some(fx.pooled.id), false),
        )
        .await
        .unwrap();
    assert_eq!(after_step2.onboarding_step, Some(2));
    assert_eq!(after_step2.device_id, Some(fx.pooled.id));

    let device = fx.store.device(fx.pooled.id);
    assert_eq!(device.status, DeviceStatus::Assigned);
    assert_eq!(device.assigned_employee_id, Some(created.id));

    let done = fx
        .complete_onboarding()
        .execute(&fx.superadmin(), created.id)
        .await
        .unwrap();
    assert_eq!(done.status, EmployeeStatus::Active);
    assert_eq!(done.onboarding_step, None);
    assert_eq!(fx.store.employee(created.id), done);
    assert_links_consistent(&fx.store);

    let actions = fx.store.audit_actions();
    for expected in [
        "employee.create",
        "employee.onboarding.step2",
        "device.assign",
        "employee.onboarding.step3.complete",
    ] {
        assert!(actions.iter().any(|a| a == expected), "missing {expected}");
    }
}

#[tokio::test]
async fn should_accept_customer_owned_device_in_step2() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Onboarding);

    fx.step2()
        .execute(
            &fx.customer_actor(),
            employee.id,
            choose(AcquisitionOption::Inventory, Some(fx.owned.id), false),
        )
        .await
        .unwrap();

    assert_eq!(fx.store.device(fx.owned.id).assigned_employee_id, Some(employee.id));
    assert_links_consistent(&fx.store);
}

// ── Commission derivation ────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_purchase_commission_through_partner() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Onboarding);

    fx.step2()
        .execute(
            &fx.customer_actor(),
            employee.id,
            choose(AcquisitionOption::Purchase, None, true),
        )
        .await
        .unwrap();

    let commissions = fx.store.commissions();
    assert_eq!(commissions.len(), 1);
    let commission = &commissions[0];
    assert_eq!(commission.amount, 100);
    assert_eq!(commission.kind, CommissionKind::Purchase);
    assert_eq!(commission.partner_id, fx.partner.id);
    assert_eq!(commission.customer_id, fx.customer.id);
    assert_eq!(commission.employee_id, employee.id);
    assert!(fx.store.audit_actions().iter().any(|a| a == "commission.create"));
}

#[tokio::test]
async fn should_create_lease_commission_through_partner() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Onboarding);

    fx.step2()
        .execute(
            &fx.customer_actor(),
            employee.id,
            choose(AcquisitionOption::Lease, None, true),
        )
        .await
        .unwrap();

    let commissions = fx.store.commissions();
    assert_eq!(commissions.len(), 1);
    assert_eq!(commissions[0].amount, 25);
    assert_eq!(commissions[0].kind, CommissionKind::Lease);
}

#[tokio::test]
async fn should_never_create_commission_for_inventory_selection() {
    for via_partner in [true, false] {
        let fx = Fixture::new();
        let employee = fx.employee(EmployeeStatus::Onboarding);

        fx.step2()
            .execute(
                &fx.customer_actor(),
                employee.id,
                choose(AcquisitionOption::Inventory, Some(fx.pooled.id), via_partner),
            )
            .await
            .unwrap();

        assert!(fx.store.commissions().is_empty());
    }
}

#[tokio::test]
async fn should_not_create_commission_without_partner_channel() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Onboarding);

    fx.step2()
        .execute(
            &fx.customer_actor(),
            employee.id,
            choose(AcquisitionOption::Purchase, None, false),
        )
        .await
        .unwrap();

    assert!(fx.store.commissions().is_empty());
}

// ── Step 2 rejections ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_step2_with_assigned_device_and_write_nothing() {
    let fx = Fixture::new();
    let holder = fx.employee(EmployeeStatus::Active);
    fx.store.link(holder.id, fx.pooled.id);
    let employee = fx.employee(EmployeeStatus::Onboarding);

    let result = fx
        .step2()
        .execute(
            &fx.customer_actor(),
            employee.id,
            choose(AcquisitionOption::Purchase, Some(fx.pooled.id), true),
        )
        .await;

    assert!(
        matches!(result, Err(PortalError::InvalidTransition(_))),
        "expected InvalidTransition, got {result:?}"
    );
    assert_eq!(fx.store.employee(employee.id), employee);
    assert!(fx.store.commissions().is_empty());
    assert_eq!(fx.store.device(fx.pooled.id).assigned_employee_id, Some(holder.id));
}

#[tokio::test]
async fn should_reject_step2_with_other_customers_device() {
    let fx = Fixture::new();
    let other = test_customer(fx.partner.id);
    fx.store.insert_customer(other.clone());
    let foreign = test_device(Some(other.id));
    fx.store.insert_device(foreign.clone());
    let employee = fx.employee(EmployeeStatus::Onboarding);

    let result = fx
        .step2()
        .execute(
            &fx.customer_actor(),
            employee.id,
            choose(AcquisitionOption::Inventory, Some(foreign.id), false),
        )
        .await;

    assert!(matches!(result, Err(PortalError::Validation(_))));
    assert!(fx.store.device(foreign.id).is_free());
}

#[tokio::test]
async fn should_reject_step2_with_unknown_device() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Onboarding);

    let result = fx
        .step2()
        .execute(
            &fx.customer_actor(),
            employee.id,
            choose(AcquisitionOption::Inventory, Some(Uuid::now_v7()), false),
        )
        .await;

    assert!(matches!(result, Err(PortalError::Validation(_))));
}

#[tokio::test]
async fn should_reject_step2_twice() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Onboarding);
    let actor = fx.customer_actor();

    fx.step2()
        .execute(&actor, employee.id, choose(AcquisitionOption::Independent, None, false))
        .await
        .unwrap();
    let again = fx
        .step2()
        .execute(&actor, employee.id, choose(AcquisitionOption::Independent, None, false))
        .await;

    assert!(matches!(again, Err(PortalError::InvalidTransition(_))));
}

#[tokio::test]
async fn should_forbid_step2_for_partner_and_superadmin() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Onboarding);

    for actor in [fx.partner_actor(), fx.superadmin()] {
        let result = fx
            .step2()
            .execute(&actor, employee.id, choose(AcquisitionOption::Independent, None, false))
            .await;
        assert!(matches!(result, Err(PortalError::Forbidden)));
    }
}

// ── Step 3 ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_approvals_to_complete_onboarding() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Onboarding);
    let mut input = choose(AcquisitionOption::Independent, None, false);
    input.setup_approved = false;

    fx.step2()
        .execute(&fx.customer_actor(), employee.id, input)
        .await
        .unwrap();
    let result = fx
        .complete_onboarding()
        .execute(&fx.superadmin(), employee.id)
        .await;

    assert!(matches!(result, Err(PortalError::InvalidTransition(_))));
    assert_eq!(fx.store.employee(employee.id).status, EmployeeStatus::Onboarding);
}

#[tokio::test]
async fn should_forbid_customer_from_completing_onboarding() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Onboarding);

    let result = fx
        .complete_onboarding()
        .execute(&fx.customer_actor(), employee.id)
        .await;

    assert!(matches!(result, Err(PortalError::Forbidden)));
}
