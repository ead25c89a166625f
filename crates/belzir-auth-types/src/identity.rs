//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use serde::Serialize;
use uuid::Uuid;

use belzir_domain::role::{AccountStatus, Role};

pub const USER_ID_HEADER: &str = "x-belzir-user-id";
pub const USER_ROLE_HEADER: &str = "x-belzir-user-role";
pub const PARTNER_ID_HEADER: &str = "x-belzir-partner-id";
pub const CUSTOMER_ID_HEADER: &str = "x-belzir-customer-id";
pub const ACCOUNT_STATUS_HEADER: &str = "x-belzir-account-status";

/// An already-authenticated user acting on the portal.
///
/// `partner_id` / `customer_id` carry the actor's affiliation. They are not
/// validated against the role here; the scoping resolver fails closed when the
/// field its role requires is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
    pub partner_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
}

impl Actor {
    pub fn superadmin(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Superadmin,
            partner_id: None,
            customer_id: None,
        }
    }

    pub fn partner(user_id: Uuid, partner_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Partner,
            partner_id: Some(partner_id),
            customer_id: None,
        }
    }

    pub fn customer(user_id: Uuid, customer_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Customer,
            partner_id: None,
            customer_id: Some(customer_id),
        }
    }
}

/// Returns 401 if the user id or role header is absent or malformed, if an
/// affiliation header is present but not a UUID, or if the account is not
/// active. A missing account-status header means active.
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // Values are read synchronously so the returned future is 'static.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };

        let user_id = header(USER_ID_HEADER).and_then(|s| s.parse::<Uuid>().ok());
        let role = header(USER_ROLE_HEADER).and_then(|s| s.parse::<Role>().ok());
        let partner_id = header(PARTNER_ID_HEADER).map(|s| s.parse::<Uuid>());
        let customer_id = header(CUSTOMER_ID_HEADER).map(|s| s.parse::<Uuid>());
        let status = header(ACCOUNT_STATUS_HEADER).map(|s| s.parse::<AccountStatus>());

        async move {
            let user_id = user_id.ok_or(StatusCode::UNAUTHORIZED)?;
            let role = role.ok_or(StatusCode::UNAUTHORIZED)?;
            let partner_id = partner_id
                .transpose()
                .map_err(|_| StatusCode::UNAUTHORIZED)?;
            let customer_id = customer_id
                .transpose()
                .map_err(|_| StatusCode::UNAUTHORIZED)?;
            match status.transpose() {
                Ok(None | Some(AccountStatus::Active)) => {}
                Ok(Some(AccountStatus::Inactive)) | Err(_) => {
                    return Err(StatusCode::UNAUTHORIZED);
                }
            }
            Ok(Self {
                user_id,
                role,
                partner_id,
                customer_id,
            })
        }
    }
}
