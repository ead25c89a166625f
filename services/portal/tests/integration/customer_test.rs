use belzir_domain::employee::EmployeeStatus;
use belzir_domain::record::RecordStatus;
use uuid::Uuid;

use belzir_auth_types::identity::Actor;
use belzir_portal::error::PortalError;
use belzir_portal::usecase::customer::{
    DeleteCustomerUseCase, ListCustomersUseCase, UpdateCustomerInput, UpdateCustomerUseCase,
};
use belzir_portal::usecase::employee::ListEmployeesUseCase;
use belzir_portal::usecase::partner::ListMyCustomersUseCase;

use crate::helpers::{Fixture, MemoryStore, test_customer, test_partner};

fn update_customer(
    store: &MemoryStore,
) -> UpdateCustomerUseCase<MemoryStore, MemoryStore, MemoryStore> {
    UpdateCustomerUseCase {
        partners: store.clone(),
        customers: store.clone(),
        audit: store.clone(),
    }
}

fn delete_customer(store: &MemoryStore) -> DeleteCustomerUseCase<MemoryStore, MemoryStore> {
    DeleteCustomerUseCase {
        customers: store.clone(),
        audit: store.clone(),
    }
}

fn list_customers(store: &MemoryStore) -> ListCustomersUseCase<MemoryStore> {
    ListCustomersUseCase {
        repo: store.clone(),
    }
}

fn list_employees(store: &MemoryStore) -> ListEmployeesUseCase<MemoryStore, MemoryStore> {
    ListEmployeesUseCase {
        customers: store.clone(),
        employees: store.clone(),
    }
}

#[tokio::test]
async fn should_move_employee_visibility_with_reassignment() {
    let fx = Fixture::new();
    let employee = fx.employee(EmployeeStatus::Active);
    let other = test_partner(0.1);
    fx.store.insert_partner(other.clone());
    let old_partner = fx.partner_actor();
    let new_partner = Actor::partner(Uuid::now_v7(), other.id);

    let before = list_employees(&fx.store).execute(&old_partner).await.unwrap();
    assert_eq!(before.len(), 1);
    assert!(list_employees(&fx.store).execute(&new_partner).await.unwrap().is_empty());

    let customer = update_customer(&fx.store)
        .execute(
            &fx.superadmin(),
            fx.customer.id,
            UpdateCustomerInput {
                partner_id: Some(other.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(customer.partner_id, other.id);

    assert!(list_employees(&fx.store).execute(&old_partner).await.unwrap().is_empty());
    let after = list_employees(&fx.store).execute(&new_partner).await.unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id, employee.id);
    assert!(fx.store.audit_actions().contains(&"customer.update".to_owned()));
}

#[tokio::test]
async fn should_reject_reassignment_to_deleted_partner() {
    let fx = Fixture::new();
    let mut gone = test_partner(0.1);
    gone.status = RecordStatus::Deleted;
    fx.store.insert_partner(gone.clone());

    let result = update_customer(&fx.store)
        .execute(
            &fx.superadmin(),
            fx.customer.id,
            UpdateCustomerInput {
                partner_id: Some(gone.id),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(PortalError::Validation(_))));
    assert_eq!(fx.store.customer(fx.customer.id).partner_id, fx.partner.id);
}

#[tokio::test]
async fn should_reject_deleted_status_on_update() {
    let fx = Fixture::new();

    let result = update_customer(&fx.store)
        .execute(
            &fx.superadmin(),
            fx.customer.id,
            UpdateCustomerInput {
                status: Some(RecordStatus::Deleted),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(PortalError::Validation(_))));
    assert_eq!(fx.store.customer(fx.customer.id).status, RecordStatus::Active);
}

#[tokio::test]
async fn should_reject_rename_onto_sibling_customer() {
    let fx = Fixture::new();
    let sibling = test_customer(fx.partner.id);
    fx.store.insert_customer(sibling.clone());

    let result = update_customer(&fx.store)
        .execute(
            &fx.superadmin(),
            fx.customer.id,
            UpdateCustomerInput {
                name: Some(sibling.name.clone()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(PortalError::DuplicateKey(_))));
    assert_eq!(fx.store.customer(fx.customer.id).name, fx.customer.name);
}

#[tokio::test]
async fn should_allow_same_name_under_another_partner() {
    let fx = Fixture::new();
    let other = test_partner(0.1);
    fx.store.insert_partner(other.clone());
    let elsewhere = test_customer(other.id);
    fx.store.insert_customer(elsewhere.clone());

    let customer = update_customer(&fx.store)
        .execute(
            &fx.superadmin(),
            fx.customer.id,
            UpdateCustomerInput {
                name: Some(elsewhere.name.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(customer.name, elsewhere.name);
}

#[tokio::test]
async fn should_hide_soft_deleted_customer_but_keep_row() {
    let fx = Fixture::new();

    delete_customer(&fx.store)
        .execute(&fx.superadmin(), fx.customer.id)
        .await
        .unwrap();

    let live = list_customers(&fx.store)
        .execute(&fx.superadmin(), None)
        .await
        .unwrap();
    assert!(live.iter().all(|c| c.id != fx.customer.id));

    let mine = ListMyCustomersUseCase {
        customers: fx.store.clone(),
    }
    .execute(&fx.partner_actor())
    .await
    .unwrap();
    assert!(mine.is_empty());

    assert_eq!(fx.store.customer(fx.customer.id).status, RecordStatus::Deleted);
    assert!(fx.store.audit_actions().contains(&"customer.delete".to_owned()));
}

#[tokio::test]
async fn should_not_delete_customer_twice() {
    let fx = Fixture::new();
    let delete = delete_customer(&fx.store);

    delete.execute(&fx.superadmin(), fx.customer.id).await.unwrap();
    let again = delete.execute(&fx.superadmin(), fx.customer.id).await;

    assert!(matches!(again, Err(PortalError::NotFound("customer"))));
}

#[tokio::test]
async fn should_forbid_customer_management_for_partner() {
    let fx = Fixture::new();

    let result = update_customer(&fx.store)
        .execute(
            &fx.partner_actor(),
            fx.customer.id,
            UpdateCustomerInput {
                name: Some("Renamed".into()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(PortalError::Forbidden)));
}
