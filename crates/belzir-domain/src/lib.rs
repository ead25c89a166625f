//! Domain types shared across all Belzir crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; the `infra/` layer converts
//! them to and from their stored text form via `as_str` / `FromStr`.

pub mod commission;
pub mod device;
pub mod employee;
pub mod pagination;
pub mod record;
pub mod role;

/// Returned by `FromStr` impls when a stored or wire value names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
