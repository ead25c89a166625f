use belzir_auth_types::identity::Actor;
use belzir_domain::role::Role;

use crate::domain::repository::CustomerRepository;
use crate::domain::scope::Visibility;
use crate::error::PortalError;

/// Resolve what `actor` may see.
///
/// A partner's customer set is re-read on every call since customers can be
/// reassigned or deleted between requests.
pub async fn resolve_visibility<C: CustomerRepository>(
    customers: &C,
    actor: &Actor,
) -> Result<Visibility, PortalError> {
    match actor.role {
        Role::Superadmin => Ok(Visibility::All),
        Role::Partner => {
            let partner_id = actor
                .partner_id
                .ok_or(PortalError::ScopeMissing("partner_id"))?;
            let customer_ids = customers.live_ids_for_partner(partner_id).await?;
            Ok(Visibility::Partner {
                partner_id,
                customer_ids,
            })
        }
        Role::Customer => {
            let customer_id = actor
                .customer_id
                .ok_or(PortalError::ScopeMissing("customer_id"))?;
            Ok(Visibility::Customer { customer_id })
        }
    }
}
