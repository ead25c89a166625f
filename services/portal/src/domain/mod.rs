pub mod capability;
pub mod commission;
pub mod lifecycle;
pub mod repository;
pub mod scope;
pub mod types;
