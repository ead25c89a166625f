//! Identity types shared across Belzir crates.
//!
//! Authentication happens upstream; this crate only turns the gateway's
//! identity headers into an [`identity::Actor`].

pub mod identity;
