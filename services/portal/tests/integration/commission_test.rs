use chrono::{Duration, Utc};
use uuid::Uuid;

use belzir_domain::commission::CommissionKind;
use belzir_domain::employee::EmployeeStatus;
use belzir_domain::record::RecordStatus;

use belzir_auth_types::identity::Actor;
use belzir_domain::role::Role;
use belzir_portal::domain::repository::CommissionFilter;
use belzir_portal::domain::types::{Commission, SystemSettings};
use belzir_portal::error::PortalError;
use belzir_portal::usecase::commission::{
    DeleteCommissionUseCase, ListCommissionsUseCase, ListMyCommissionsUseCase,
};
use belzir_portal::usecase::customer::{CreateCustomerInput, CreateCustomerUseCase};
use belzir_portal::usecase::partner::{
    CreatePartnerInput, CreatePartnerUseCase, PartnerDashboardUseCase,
};

use crate::helpers::{Fixture, MemoryStore, test_customer, test_employee};

fn commission(partner_id: Uuid, customer_id: Uuid, amount: i64, age_minutes: i64) -> Commission {
    Commission {
        id: Uuid::now_v7(),
        partner_id,
        customer_id,
        employee_id: Uuid::now_v7(),
        device_id: None,
        kind: if amount >= 100 {
            CommissionKind::Purchase
        } else {
            CommissionKind::Lease
        },
        amount,
        created_at: Utc::now() - Duration::minutes(age_minutes),
    }
}

fn seed(store: &MemoryStore, items: &[Commission]) {
    store
        .world
        .lock()
        .unwrap()
        .commissions
        .extend(items.iter().cloned());
}

// ── Listing ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_all_commissions_newest_first_with_total() {
    let fx = Fixture::new();
    let other = test_customer(fx.partner.id);
    fx.store.insert_customer(other.clone());
    let old = commission(fx.partner.id, fx.customer.id, 100, 30);
    let new = commission(fx.partner.id, other.id, 25, 1);
    seed(&fx.store, &[old.clone(), new.clone()]);

    let list = ListCommissionsUseCase {
        repo: fx.store.clone(),
    }
    .execute(&fx.superadmin(), CommissionFilter::default())
    .await
    .unwrap();

    assert_eq!(list.total, 125);
    assert_eq!(list.items, vec![new, old.clone()]);

    let filtered = ListCommissionsUseCase {
        repo: fx.store.clone(),
    }
    .execute(
        &fx.superadmin(),
        CommissionFilter {
            partner_id: None,
            customer_id: Some(fx.customer.id),
        },
    )
    .await
    .unwrap();
    assert_eq!(filtered.items, vec![old]);
    assert_eq!(filtered.total, 100);
}

#[tokio::test]
async fn should_forbid_commission_list_for_partner() {
    let fx = Fixture::new();

    let result = ListCommissionsUseCase {
        repo: fx.store.clone(),
    }
    .execute(&fx.partner_actor(), CommissionFilter::default())
    .await;

    assert!(matches!(result, Err(PortalError::Forbidden)));
}

#[tokio::test]
async fn should_list_only_own_commissions_for_partner() {
    let fx = Fixture::new();
    let mine = commission(fx.partner.id, fx.customer.id, 100, 5);
    seed(
        &fx.store,
        &[mine.clone(), commission(Uuid::now_v7(), Uuid::now_v7(), 25, 1)],
    );
    let use_case = ListMyCommissionsUseCase {
        repo: fx.store.clone(),
    };

    let list = use_case.execute(&fx.partner_actor()).await.unwrap();
    assert_eq!(list.items, vec![mine]);
    assert_eq!(list.total, 100);

    let customer = use_case.execute(&fx.customer_actor()).await;
    assert!(matches!(customer, Err(PortalError::Forbidden)));
}

#[tokio::test]
async fn should_fail_closed_for_partner_without_affiliation() {
    let fx = Fixture::new();
    let actor = Actor {
        user_id: Uuid::now_v7(),
        role: Role::Partner,
        partner_id: None,
        customer_id: None,
    };

    let result = ListMyCommissionsUseCase {
        repo: fx.store.clone(),
    }
    .execute(&actor)
    .await;

    assert!(matches!(result, Err(PortalError::ScopeMissing("partner_id"))));
}

// ── Delete ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_commission_and_audit_it() {
    let fx = Fixture::new();
    let c = commission(fx.partner.id, fx.customer.id, 100, 0);
    seed(&fx.store, std::slice::from_ref(&c));
    let use_case = DeleteCommissionUseCase {
        repo: fx.store.clone(),
        audit: fx.store.clone(),
    };

    use_case.execute(&fx.superadmin(), c.id).await.unwrap();

    assert!(fx.store.commissions().is_empty());
    assert_eq!(fx.store.audit_actions(), vec!["commission.delete"]);
    let again = use_case.execute(&fx.superadmin(), c.id).await;
    assert!(matches!(again, Err(PortalError::NotFound("commission"))));
}

// ── Partner dashboard ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_summarize_partner_dashboard() {
    let fx = Fixture::new();
    let second = test_customer(fx.partner.id);
    fx.store.insert_customer(second.clone());
    fx.employee(EmployeeStatus::Active);
    fx.employee(EmployeeStatus::Active);
    fx.employee(EmployeeStatus::Onboarding);
    fx.store
        .insert_employee(test_employee(second.id, EmployeeStatus::Leave));
    seed(
        &fx.store,
        &[
            commission(fx.partner.id, fx.customer.id, 100, 2),
            commission(fx.partner.id, second.id, 25, 1),
            commission(Uuid::now_v7(), Uuid::now_v7(), 100, 1),
        ],
    );

    let dashboard = PartnerDashboardUseCase {
        customers: fx.store.clone(),
        employees: fx.store.clone(),
        commissions: fx.store.clone(),
    }
    .execute(&fx.partner_actor())
    .await
    .unwrap();

    assert_eq!(dashboard.partner_id, fx.partner.id);
    assert_eq!(dashboard.commission_total, 125);
    assert_eq!(dashboard.employees_by_status.get("active"), Some(&2));
    assert_eq!(dashboard.employees_by_status.get("onboarding"), Some(&1));
    assert_eq!(dashboard.employees_by_status.get("leave"), Some(&1));
    assert_eq!(dashboard.customers.len(), 2);
    let first = dashboard
        .customers
        .iter()
        .find(|c| c.customer_id == fx.customer.id)
        .unwrap();
    assert_eq!(first.commission_total, 100);
}

// ── Partner and customer records ─────────────────────────────────────────────

#[tokio::test]
async fn should_default_partner_rate_from_settings() {
    let fx = Fixture::new();
    fx.store.world.lock().unwrap().settings = Some(SystemSettings {
        default_partner_commission_rate: 0.12,
        ..SystemSettings::default()
    });
    let use_case = CreatePartnerUseCase {
        repo: fx.store.clone(),
        settings: fx.store.clone(),
        audit: fx.store.clone(),
    };

    let partner = use_case
        .execute(
            &fx.superadmin(),
            CreatePartnerInput {
                name: "Northwind".into(),
                commission_rate: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(partner.commission_rate, 0.12);
    assert_eq!(partner.status, RecordStatus::Active);

    let too_high = use_case
        .execute(
            &fx.superadmin(),
            CreatePartnerInput {
                name: "Contoso".into(),
                commission_rate: Some(1.5),
            },
        )
        .await;
    assert!(matches!(too_high, Err(PortalError::Validation(_))));

    let duplicate = use_case
        .execute(
            &fx.superadmin(),
            CreatePartnerInput {
                name: "Northwind".into(),
                commission_rate: Some(0.1),
            },
        )
        .await;
    assert!(matches!(duplicate, Err(PortalError::DuplicateKey(_))));
}

#[tokio::test]
async fn should_reject_customer_under_unknown_partner() {
    let fx = Fixture::new();

    let result = CreateCustomerUseCase {
        partners: fx.store.clone(),
        customers: fx.store.clone(),
        audit: fx.store.clone(),
    }
    .execute(
        &fx.superadmin(),
        CreateCustomerInput {
            partner_id: Uuid::now_v7(),
            name: "Fabrikam".into(),
        },
    )
    .await;

    assert!(matches!(result, Err(PortalError::Validation(_))));
}
