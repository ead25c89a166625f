//! Test utilities for Belzir services.
//!
//! Dev-dependency only.

pub mod auth;
