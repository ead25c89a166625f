use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use belzir_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    audit::list_audit_logs,
    commission::{delete_commission, list_commissions, list_my_commissions},
    customer::{create_customer, delete_customer, list_customers, update_customer},
    device::{
        assign_device, create_device, delete_device, list_devices, unassign_device,
        update_device,
    },
    employee::{
        complete_offboarding, complete_onboarding, create_employee, delete_employee,
        get_employee, list_employees, onboarding_step2, receive_device, start_offboarding,
        update_employee,
    },
    health::{healthz, readyz},
    partner::{
        create_partner, delete_partner, get_dashboard, list_my_customers, list_partners,
        update_partner,
    },
    settings::{get_settings, update_settings},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Employees
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee)
                .patch(update_employee)
                .delete(delete_employee),
        )
        // Onboarding
        .route("/employees/{id}/onboarding/step2", patch(onboarding_step2))
        .route(
            "/employees/{id}/onboarding/step3/complete",
            patch(complete_onboarding),
        )
        // Offboarding
        .route("/employees/{id}/offboarding/start", post(start_offboarding))
        .route(
            "/employees/{id}/offboarding/step2/receive-device",
            patch(receive_device),
        )
        .route(
            "/employees/{id}/offboarding/step3/complete",
            patch(complete_offboarding),
        )
        // Devices
        .route("/devices", get(list_devices).post(create_device))
        .route("/devices/{id}", patch(update_device).delete(delete_device))
        .route("/devices/{id}/assign", patch(assign_device))
        .route("/devices/{id}/unassign", patch(unassign_device))
        // Partners
        .route("/partners", get(list_partners).post(create_partner))
        .route("/partners/{id}", patch(update_partner).delete(delete_partner))
        .route("/partners/me/customers", get(list_my_customers))
        .route("/partners/me/dashboard", get(get_dashboard))
        // Customers
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            patch(update_customer).delete(delete_customer),
        )
        // Commissions
        .route("/commissions", get(list_commissions))
        .route("/commissions/me", get(list_my_commissions))
        .route("/commissions/{id}", delete(delete_commission))
        // Audit
        .route("/audit-logs", get(list_audit_logs))
        // Settings
        .route("/settings", get(get_settings).patch(update_settings))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
