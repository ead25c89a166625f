//! Row visibility for an actor.
//!
//! A [`Visibility`] is resolved per request from the actor and the current
//! customer set (see `usecase::scope`), then applied either as a query filter
//! in `infra/db.rs` or through the predicates below.

use uuid::Uuid;

use crate::domain::types::{Commission, Customer, Device, Employee};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Superadmin: no restriction.
    All,
    /// Partner: rows belonging to its non-deleted customers.
    Partner {
        partner_id: Uuid,
        customer_ids: Vec<Uuid>,
    },
    /// Customer: its own rows, plus pooled devices.
    Customer { customer_id: Uuid },
}

impl Visibility {
    pub fn sees_customer(&self, customer_id: Uuid) -> bool {
        match self {
            Self::All => true,
            Self::Partner { customer_ids, .. } => customer_ids.contains(&customer_id),
            Self::Customer { customer_id: own } => *own == customer_id,
        }
    }

    pub fn sees_customer_record(&self, customer: &Customer) -> bool {
        self.sees_customer(customer.id)
    }

    pub fn sees_employee(&self, employee: &Employee) -> bool {
        self.sees_customer(employee.customer_id)
    }

    /// Customers see pooled devices and their own. Partners see devices owned
    /// by their customers only.
    pub fn sees_device(&self, device: &Device) -> bool {
        match self {
            Self::All => true,
            Self::Partner { customer_ids, .. } => device
                .customer_id
                .is_some_and(|id| customer_ids.contains(&id)),
            Self::Customer { customer_id } => {
                device.is_pooled() || device.is_owned_by(*customer_id)
            }
        }
    }

    pub fn sees_commission(&self, commission: &Commission) -> bool {
        match self {
            Self::All => true,
            Self::Partner { partner_id, .. } => commission.partner_id == *partner_id,
            Self::Customer { customer_id } => commission.customer_id == *customer_id,
        }
    }

    /// The actor's own customer, for customer actors.
    pub fn own_customer(&self) -> Option<Uuid> {
        match self {
            Self::Customer { customer_id } => Some(*customer_id),
            _ => None,
        }
    }
}
