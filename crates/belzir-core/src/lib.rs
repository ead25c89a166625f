//! HTTP plumbing shared by Belzir services.

pub mod error;
pub mod middleware;
pub mod serde;
pub mod tracing;
