//! Commission derivation for onboarding step 2.

use chrono::Utc;
use uuid::Uuid;

use belzir_domain::commission::CommissionKind;
use belzir_domain::employee::AcquisitionOption;

use crate::domain::types::{Commission, Customer, Employee, Partner};

pub const PURCHASE_BASE_AMOUNT: i64 = 2000;
pub const LEASE_BASE_AMOUNT: i64 = 500;

/// Kind and base amount for options that earn a commission.
pub fn rule_for_option(option: AcquisitionOption) -> Option<(CommissionKind, i64)> {
    match option {
        AcquisitionOption::Purchase => Some((CommissionKind::Purchase, PURCHASE_BASE_AMOUNT)),
        AcquisitionOption::Lease => Some((CommissionKind::Lease, LEASE_BASE_AMOUNT)),
        AcquisitionOption::Inventory | AcquisitionOption::Independent => None,
    }
}

/// `round(base * rate)`, or `None` when that is not positive.
pub fn amount_for(base: i64, rate: f64) -> Option<i64> {
    let amount = (base as f64 * rate).round() as i64;
    (amount > 0).then_some(amount)
}

/// Build the commission earned by an onboarding step 2, if any.
///
/// Only purchases and leases made through the partner earn one.
pub fn derive_commission(
    partner: &Partner,
    customer: &Customer,
    employee: &Employee,
    option: AcquisitionOption,
    via_partner: bool,
) -> Option<Commission> {
    if !via_partner {
        return None;
    }
    let (kind, base) = rule_for_option(option)?;
    let amount = amount_for(base, partner.commission_rate)?;
    Some(Commission {
        id: Uuid::now_v7(),
        partner_id: partner.id,
        customer_id: customer.id,
        employee_id: employee.id,
        device_id: employee.device_id,
        kind,
        amount,
        created_at: Utc::now(),
    })
}
