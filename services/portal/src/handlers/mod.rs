pub mod audit;
pub mod commission;
pub mod customer;
pub mod device;
pub mod employee;
pub mod health;
pub mod partner;
pub mod settings;

use axum::extract::FromRequest;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

use crate::error::PortalError;

// ── Response envelopes ───────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ItemResponse<T: Serialize> {
    pub item: T,
}

impl<T: Serialize> ItemResponse<T> {
    pub fn new(item: T) -> axum::Json<Self> {
        axum::Json(Self { item })
    }
}

#[derive(Serialize)]
pub struct ItemsResponse<T: Serialize> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl<T: Serialize> ItemsResponse<T> {
    pub fn new(items: Vec<T>) -> axum::Json<Self> {
        axum::Json(Self { items, total: None })
    }

    pub fn with_total(items: Vec<T>, total: i64) -> axum::Json<Self> {
        axum::Json(Self {
            items,
            total: Some(total),
        })
    }
}

// ── Request helpers ──────────────────────────────────────────────────────────

/// JSON request body whose rejections render as `VALIDATION_ERROR`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(PortalError))]
pub struct JsonBody<T>(pub T);

/// Parse an optional JSON body; an empty body yields the default.
pub(crate) fn parse_optional_body<B: DeserializeOwned + Default>(
    body: &[u8],
) -> Result<B, PortalError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(B::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| PortalError::validation(format!("invalid body: {e}")))
}

/// Parse a raw query string; an absent query yields the default.
pub(crate) fn parse_query<Q: DeserializeOwned + Default>(
    raw_query: Option<String>,
) -> Result<Q, PortalError> {
    raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| PortalError::validation(format!("invalid query: {e}")))
        .map(Option::unwrap_or_default)
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
