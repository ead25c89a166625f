pub mod audit;
pub mod commission;
pub mod customer;
pub mod device;
pub mod employee;
pub mod offboarding;
pub mod onboarding;
pub mod partner;
pub mod reconcile;
pub mod scope;
pub mod settings;
