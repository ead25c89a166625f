//! Mock identity helpers for HTTP tests.
//!
//! Services behind the gateway receive identity headers injected by the
//! gateway. In tests, `MockActor` produces those headers directly so no real
//! gateway or token is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use belzir_auth_types::identity::{
    ACCOUNT_STATUS_HEADER, Actor, CUSTOMER_ID_HEADER, PARTNER_ID_HEADER, USER_ID_HEADER,
    USER_ROLE_HEADER,
};

/// Configurable identity injected into test requests.
pub struct MockActor {
    pub actor: Actor,
    pub inactive: bool,
}

impl MockActor {
    pub fn superadmin() -> Self {
        Self::from_actor(Actor::superadmin(Uuid::new_v4()))
    }

    pub fn partner(partner_id: Uuid) -> Self {
        Self::from_actor(Actor::partner(Uuid::new_v4(), partner_id))
    }

    pub fn customer(customer_id: Uuid) -> Self {
        Self::from_actor(Actor::customer(Uuid::new_v4(), customer_id))
    }

    pub fn from_actor(actor: Actor) -> Self {
        Self {
            actor,
            inactive: false,
        }
    }

    /// Mark the account as inactive; the extractor must reject it.
    pub fn deactivated(mut self) -> Self {
        self.inactive = true;
        self
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        let mut put = |name: &'static str, value: String| {
            if let Ok(value) = HeaderValue::from_str(&value) {
                map.insert(HeaderName::from_static(name), value);
            }
        };
        put(USER_ID_HEADER, self.actor.user_id.to_string());
        put(USER_ROLE_HEADER, self.actor.role.as_str().to_owned());
        if let Some(partner_id) = self.actor.partner_id {
            put(PARTNER_ID_HEADER, partner_id.to_string());
        }
        if let Some(customer_id) = self.actor.customer_id {
            put(CUSTOMER_ID_HEADER, customer_id.to_string());
        }
        if self.inactive {
            put(ACCOUNT_STATUS_HEADER, "inactive".to_owned());
        }
        map
    }
}
